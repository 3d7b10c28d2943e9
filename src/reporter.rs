// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    output::OutputFormat,
    runner::{RunStats, TestOutcome, TestVerdict},
    test_list::{test_name_spec, TestInstance, TestList},
};
use anyhow::{Context, Result};
use std::{fmt, io, io::Write, time::Instant};
use structopt::{clap::arg_enum, StructOpt};
use termcolor::{BufferWriter, ColorChoice, ColorSpec, NoColor, WriteColor};

arg_enum! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum Color {
        Always,
        Auto,
        Never,
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Auto
    }
}

impl Color {
    pub(crate) fn color_choice(self, stream: atty::Stream) -> ColorChoice {
        // https://docs.rs/termcolor/1.1.2/termcolor/index.html#detecting-presence-of-a-terminal
        match self {
            Color::Always => ColorChoice::Always,
            Color::Auto => {
                if atty::is(stream) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                }
            }
            Color::Never => ColorChoice::Never,
        }
    }
}

arg_enum! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum FailureOutput {
        Immediate,
        Never,
    }
}

impl Default for FailureOutput {
    fn default() -> Self {
        FailureOutput::Immediate
    }
}

#[derive(Debug, Default, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct ReporterOpts {
    /// Echo captured tool diagnostics on failures
    #[structopt(long, default_value, possible_values = &FailureOutput::variants(), case_insensitive = true)]
    failure_output: FailureOutput,
}

/// Functionality to report test results to stdout.
pub struct TestReporter {
    stdout: BufferWriter,
    opts: ReporterOpts,
}

impl TestReporter {
    /// Creates a new instance with the given color choice.
    pub fn new(color: Color, opts: ReporterOpts) -> Self {
        let stdout = BufferWriter::stdout(color.color_choice(atty::Stream::Stdout));
        Self { stdout, opts }
    }

    /// Write a list of test cases in the given format.
    pub fn write_list(&self, test_list: &TestList, output_format: OutputFormat) -> Result<()> {
        let mut buffer = self.stdout.buffer();
        test_list.write(output_format, &mut buffer)?;
        self.stdout.print(&buffer).context("error writing output")
    }

    /// Report a test event.
    pub fn report_event(&self, event: TestEvent<'_>) -> Result<()> {
        let mut buffer = self.stdout.buffer();
        self.write_event(event, &mut buffer)?;
        self.stdout.print(&buffer).context("error writing output")
    }

    // ---
    // Helper methods
    // ---

    /// Report this test event to the given writer.
    fn write_event(&self, event: TestEvent<'_>, mut writer: impl WriteColor) -> io::Result<()> {
        match event {
            TestEvent::RunStarted { test_list } => {
                writer.set_color(&Self::pass_spec())?;
                write!(writer, "{:>12} ", "Starting")?;
                writer.reset()?;

                let count_spec = Self::count_spec();

                writer.set_color(&count_spec)?;
                write!(writer, "{}", test_list.run_count())?;
                writer.reset()?;
                write!(writer, " test cases against ")?;
                writer.set_color(&count_spec)?;
                write!(writer, "{}", test_list.corpus_dir())?;
                writer.reset()?;

                let skip_count = test_list.skip_count();
                if skip_count > 0 {
                    write!(writer, " (")?;
                    writer.set_color(&count_spec)?;
                    write!(writer, "{}", skip_count)?;
                    writer.reset()?;
                    write!(writer, " skipped)")?;
                }

                writeln!(writer)?;
            }
            TestEvent::TestStarted { .. } => {
                // The line for a test case is written once its outcome is
                // known.
            }
            TestEvent::TestFinished {
                test_instance,
                outcome,
            } => {
                // First, print the status.
                let status_str = match &outcome.verdict {
                    TestVerdict::Pass => {
                        writer.set_color(&Self::pass_spec())?;
                        "PASS"
                    }
                    TestVerdict::Fail(failure) => {
                        writer.set_color(&Self::fail_spec())?;
                        failure.status_str()
                    }
                };
                write!(writer, "{:>12} ", status_str)?;
                writer.reset()?;

                // Next, print the time taken.
                // * > means right-align.
                // * 8 is the number of characters to pad to.
                // * .3 means print three digits after the decimal point.
                write!(writer, "[{:>8.3?}s] ", outcome.time_taken.as_secs_f64())?;

                // Print the name of the test case, and why it failed.
                self.write_instance(test_instance, &mut writer)?;
                if let TestVerdict::Fail(failure) = &outcome.verdict {
                    write!(writer, " ({})", failure)?;
                }
                writeln!(writer)?;

                // Echo the failing tool's diagnostics if requested.
                if let TestVerdict::Fail(failure) = &outcome.verdict {
                    if self.opts.failure_output == FailureOutput::Immediate {
                        if let Some((label, stderr)) = failure.captured_stderr() {
                            if !stderr.is_empty() {
                                writer.set_color(&Self::fail_spec())?;
                                write!(writer, "\n--- STDERR: {}: ", label)?;
                                self.write_instance(test_instance, NoColor::new(&mut writer))?;
                                writeln!(writer, " ---")?;

                                writer.set_color(&Self::fail_output_spec())?;
                                NoColor::new(&mut writer).write_all(stderr)?;

                                writer.reset()?;
                                writeln!(writer)?;
                            }
                        }
                    }
                }
            }
            TestEvent::TestSkipped { test_instance } => {
                writer.set_color(&Self::skip_spec())?;
                write!(writer, "{:>12} ", "SKIP")?;
                writer.reset()?;
                // same spacing as [   0.034s]
                write!(writer, "[         ] ")?;

                self.write_instance(test_instance, &mut writer)?;
                writeln!(writer)?;
            }
            TestEvent::RunBeginCancel { remaining, reason } => {
                writer.set_color(&Self::fail_spec())?;
                write!(writer, "{:>12} ", "Canceling")?;
                writer.reset()?;
                write!(writer, "due to ")?;

                writer.set_color(&Self::count_spec())?;
                match reason {
                    CancelReason::Signal => write!(writer, "signal")?,
                }
                writer.reset()?;
                write!(writer, ", ")?;

                writer.set_color(&Self::count_spec())?;
                write!(writer, "{}", remaining)?;
                writer.reset()?;
                writeln!(writer, " test cases not yet run")?;
            }
            TestEvent::RunFinished {
                start_time,
                run_stats:
                    RunStats {
                        initial_run_count,
                        final_run_count,
                        passed,
                        mismatched,
                        stage_failed,
                        exec_failed,
                        skipped,
                    },
            } => {
                let summary_spec = if mismatched > 0 || stage_failed > 0 || exec_failed > 0 {
                    Self::fail_spec()
                } else {
                    Self::pass_spec()
                };
                writer.set_color(&summary_spec)?;
                write!(writer, "{:>12} ", "Summary")?;
                writer.reset()?;

                write!(writer, "[{:>8.3?}s] ", start_time.elapsed().as_secs_f64())?;

                let count_spec = Self::count_spec();

                writer.set_color(&count_spec)?;
                write!(writer, "{}", final_run_count)?;
                if final_run_count != initial_run_count {
                    write!(writer, "/{}", initial_run_count)?;
                }
                writer.reset()?;
                write!(writer, " test cases run: ")?;

                writer.set_color(&count_spec)?;
                write!(writer, "{}", passed)?;
                writer.set_color(&Self::pass_spec())?;
                write!(writer, " passed")?;
                writer.reset()?;
                write!(writer, ", ")?;

                if mismatched > 0 {
                    writer.set_color(&count_spec)?;
                    write!(writer, "{}", mismatched)?;
                    writer.set_color(&Self::fail_spec())?;
                    write!(writer, " mismatched")?;
                    writer.reset()?;
                    write!(writer, ", ")?;
                }

                if stage_failed > 0 {
                    writer.set_color(&count_spec)?;
                    write!(writer, "{}", stage_failed)?;
                    writer.set_color(&Self::fail_spec())?;
                    write!(writer, " stage failed")?;
                    writer.reset()?;
                    write!(writer, ", ")?;
                }

                if exec_failed > 0 {
                    writer.set_color(&count_spec)?;
                    write!(writer, "{}", exec_failed)?;
                    writer.set_color(&Self::fail_spec())?;
                    write!(writer, " exec failed")?;
                    writer.reset()?;
                    write!(writer, ", ")?;
                }

                writer.set_color(&count_spec)?;
                write!(writer, "{}", skipped)?;
                writer.set_color(&Self::skip_spec())?;
                write!(writer, " skipped")?;
                writer.reset()?;

                writeln!(writer)?;
            }
        }
        Ok(())
    }

    fn write_instance(
        &self,
        instance: TestInstance<'_>,
        mut writer: impl WriteColor,
    ) -> io::Result<()> {
        writer.set_color(&test_name_spec())?;
        write!(writer, "{}", instance.file)?;
        writer.reset()
    }

    fn count_spec() -> ColorSpec {
        let mut color_spec = ColorSpec::new();
        color_spec.set_bold(true);
        color_spec
    }

    fn pass_spec() -> ColorSpec {
        let mut color_spec = ColorSpec::new();
        color_spec
            .set_fg(Some(termcolor::Color::Green))
            .set_bold(true);
        color_spec
    }

    fn fail_spec() -> ColorSpec {
        let mut color_spec = ColorSpec::new();
        color_spec
            .set_fg(Some(termcolor::Color::Red))
            .set_bold(true);
        color_spec
    }

    fn fail_output_spec() -> ColorSpec {
        let mut color_spec = ColorSpec::new();
        color_spec.set_fg(Some(termcolor::Color::Red));
        color_spec
    }

    fn skip_spec() -> ColorSpec {
        let mut color_spec = ColorSpec::new();
        color_spec
            .set_fg(Some(termcolor::Color::Yellow))
            .set_bold(true);
        color_spec
    }
}

impl fmt::Debug for TestReporter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TestReporter")
            .field("stdout", &"BufferWriter { .. }")
            .field("opts", &self.opts)
            .finish()
    }
}

/// Events emitted while a run progresses.
#[derive(Clone, Debug)]
pub enum TestEvent<'a> {
    /// The test run started.
    RunStarted {
        /// The list of test cases that will be run.
        test_list: &'a TestList,
    },

    /// A test case started running.
    TestStarted {
        /// The test case that was started.
        test_instance: TestInstance<'a>,
    },

    /// A test case finished running.
    TestFinished {
        /// The test case that finished running.
        test_instance: TestInstance<'a>,

        /// How the test case was judged.
        outcome: TestOutcome,
    },

    /// A test case was skipped.
    TestSkipped {
        /// The test case that was skipped.
        test_instance: TestInstance<'a>,
    },

    /// A cancellation notice was received.
    RunBeginCancel {
        /// The number of test cases not yet run.
        remaining: usize,

        /// The reason this run was canceled.
        reason: CancelReason,
    },

    /// The test run finished.
    RunFinished {
        /// The time at which the run was started.
        start_time: Instant,

        /// Statistics for the run.
        run_stats: RunStats,
    },
}

/// The reason why a test run is being canceled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// A termination signal was received.
    Signal,
}
