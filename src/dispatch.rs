// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    output::OutputFormat,
    reporter::{Color, ReporterOpts, TestReporter},
    runner::TestRunnerOpts,
    test_filter::TestFilter,
    test_list::TestList,
    toolchain::ToolchainOpts,
};
use anyhow::Result;
use camino::Utf8PathBuf;
use structopt::StructOpt;

/// Differential test harness for a C compiler under development.
///
/// Every test case in the corpus is compiled by a trusted reference compiler
/// and by the candidate compiler, and the two sides must agree on whether
/// the input is accepted and on the exit status of the compiled program.
#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub enum Opts {
    /// List test cases in the corpus
    ListTests {
        /// Output format
        #[structopt(short = "T", long, default_value, possible_values = &OutputFormat::variants(), case_insensitive = true)]
        format: OutputFormat,

        #[structopt(flatten)]
        corpus: CorpusOpts,

        /// Coloring: always, auto, never
        #[structopt(long, default_value, possible_values = &Color::variants(), case_insensitive = true)]
        color: Color,
    },
    /// Run every test case through both toolchains and compare them
    Run {
        #[structopt(flatten)]
        corpus: CorpusOpts,

        #[structopt(flatten)]
        toolchain: ToolchainOpts,

        #[structopt(flatten)]
        runner_opts: TestRunnerOpts,

        #[structopt(flatten)]
        reporter_opts: ReporterOpts,

        /// Coloring: always, auto, never
        #[structopt(long, default_value, possible_values = &Color::variants(), case_insensitive = true)]
        color: Color,
    },
}

/// Corpus location and test-case selection.
#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct CorpusOpts {
    /// Directory holding the corpus of C sources
    #[structopt(long, default_value = "tests/end2end")]
    corpus_dir: Utf8PathBuf,

    /// Only evaluate test cases whose file name contains one of these substrings
    filter: Vec<String>,
}

impl CorpusOpts {
    fn compute(&self) -> Result<TestList> {
        let filter = TestFilter::new(&self.filter);
        TestList::discover(&self.corpus_dir, &filter)
    }
}

impl Opts {
    /// Executes the selected subcommand, returning the process exit code.
    pub fn exec(self) -> Result<i32> {
        match self {
            Opts::ListTests {
                format,
                corpus,
                color,
            } => {
                let test_list = corpus.compute()?;
                let reporter = TestReporter::new(color, ReporterOpts::default());
                reporter.write_list(&test_list, format)?;
                Ok(0)
            }
            Opts::Run {
                corpus,
                toolchain,
                runner_opts,
                reporter_opts,
                color,
            } => {
                let test_list = corpus.compute()?;
                let toolchain = toolchain.resolve()?;
                let reporter = TestReporter::new(color, reporter_opts);
                let runner = runner_opts.build(&test_list, toolchain);
                let run_stats = runner.try_execute(|event| reporter.report_event(event))?;
                Ok(if run_stats.is_success() { 0 } else { 1 })
            }
        }
    }
}
