// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    output::OutputFormat,
    test_filter::{FilterMatch, TestFilter},
    toolchain::canonicalize_utf8,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::{collections::BTreeMap, io};
use termcolor::{ColorSpec, NoColor, WriteColor};

/// List of test cases discovered in a corpus directory.
///
/// Test cases are held sorted by path, so repeated runs over an unchanged
/// corpus evaluate and report in the same order.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestList {
    /// The corpus directory the test cases were discovered in.
    corpus_dir: Utf8PathBuf,

    /// Number of test cases, including ones skipped by the filter.
    test_count: usize,

    test_files: BTreeMap<Utf8PathBuf, TestFileInfo>,

    // Values computed on first access.
    #[serde(skip)]
    skip_count: OnceCell<usize>,
}

/// Information about a single test case.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestFileInfo {
    /// Whether the test case matches the provided filter.
    ///
    /// Only matching test cases are run.
    pub filter_match: FilterMatch,

    /// The canonicalized source path, safe to hand to tools running in
    /// per-test scratch directories.
    #[serde(skip)]
    pub source: Utf8PathBuf,
}

impl TestList {
    /// Discovers `.c` test cases directly under the corpus directory.
    ///
    /// A missing or unreadable corpus directory is a fatal configuration
    /// error: there is nothing to iterate over, so no per-test recovery is
    /// possible.
    pub fn discover(corpus_dir: &Utf8Path, filter: &TestFilter) -> Result<Self> {
        let mut test_files = BTreeMap::new();
        let read_dir = corpus_dir
            .read_dir_utf8()
            .with_context(|| format!("error reading corpus directory {}", corpus_dir))?;
        for entry in read_dir {
            let entry = entry
                .with_context(|| format!("error reading corpus directory {}", corpus_dir))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.into_path();
            if path.extension() != Some("c") {
                continue;
            }
            let source = canonicalize_utf8(&path)
                .with_context(|| format!("error resolving test case {}", path))?;
            let file_name = path.file_name().expect("read_dir entries have file names");
            let filter_match = filter.filter_match(file_name);
            test_files.insert(
                path,
                TestFileInfo {
                    filter_match,
                    source,
                },
            );
        }

        Ok(Self {
            corpus_dir: corpus_dir.to_owned(),
            test_count: test_files.len(),
            test_files,
            skip_count: OnceCell::new(),
        })
    }

    /// Creates a test list from an explicit set of files.
    ///
    /// Paths are used as-is, without touching the filesystem; `discover` is
    /// the production entry point.
    pub fn new_with_files(
        corpus_dir: impl Into<Utf8PathBuf>,
        files: impl IntoIterator<Item = Utf8PathBuf>,
        filter: &TestFilter,
    ) -> Self {
        let test_files: BTreeMap<_, _> = files
            .into_iter()
            .map(|path| {
                let file_name = path.file_name().unwrap_or_else(|| path.as_str());
                let filter_match = filter.filter_match(file_name);
                let source = path.clone();
                (
                    path,
                    TestFileInfo {
                        filter_match,
                        source,
                    },
                )
            })
            .collect();
        Self {
            corpus_dir: corpus_dir.into(),
            test_count: test_files.len(),
            test_files,
            skip_count: OnceCell::new(),
        }
    }

    /// Returns the corpus directory the test cases came from.
    pub fn corpus_dir(&self) -> &Utf8Path {
        &self.corpus_dir
    }

    /// Returns the total number of test cases.
    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// Returns the total number of skipped test cases.
    pub fn skip_count(&self) -> usize {
        *self.skip_count.get_or_init(|| {
            self.iter_tests()
                .filter(|instance| !instance.info.filter_match.is_match())
                .count()
        })
    }

    /// Returns the total number of test cases that aren't skipped.
    ///
    /// It is always the case that `run_count + skip_count == test_count`.
    pub fn run_count(&self) -> usize {
        self.test_count - self.skip_count()
    }

    /// Returns the info for a given test case, or `None` if it wasn't in the
    /// list.
    pub fn get(&self, file: impl AsRef<Utf8Path>) -> Option<&TestFileInfo> {
        self.test_files.get(file.as_ref())
    }

    /// Outputs this list to the given writer.
    pub fn write(&self, output_format: OutputFormat, writer: impl WriteColor) -> Result<()> {
        match output_format {
            OutputFormat::Plain => self.write_plain(writer).context("error writing test list"),
            OutputFormat::Serializable(format) => format.to_writer(self, writer),
        }
    }

    /// Iterates over all the test cases.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &TestFileInfo)> + '_ {
        self.test_files
            .iter()
            .map(|(path, info)| (path.as_path(), info))
    }

    /// Iterates over the list of test cases in evaluation order.
    pub fn iter_tests(&self) -> impl Iterator<Item = TestInstance<'_>> + '_ {
        self.test_files
            .iter()
            .map(|(file, info)| TestInstance::new(file, info))
    }

    /// Outputs this list as a string with the given format.
    pub fn to_string(&self, output_format: OutputFormat) -> Result<String> {
        // Ugh this sucks. String really should have an io::Write impl that errors on non-UTF8 text.
        let mut buf = NoColor::new(vec![]);
        self.write(output_format, &mut buf)?;
        Ok(String::from_utf8(buf.into_inner()).expect("buffer is valid UTF-8"))
    }

    // ---
    // Helper methods
    // ---

    fn write_plain(&self, mut writer: impl WriteColor) -> io::Result<()> {
        writer.set_color(&corpus_dir_spec())?;
        write!(writer, "{}", self.corpus_dir)?;
        writer.reset()?;
        writeln!(writer, ":")?;

        for (file, info) in &self.test_files {
            let file_name = file.file_name().unwrap_or_else(|| file.as_str());
            writer.set_color(&test_name_spec())?;
            write!(writer, "    {}", file_name)?;
            writer.reset()?;

            if !info.filter_match.is_match() {
                write!(writer, " (skipped)")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Represents a single test case handed to the runner.
#[derive(Clone, Copy, Debug)]
pub struct TestInstance<'a> {
    /// The test-case path as discovered, used for display.
    pub file: &'a Utf8Path,

    /// Information about the test case.
    pub info: &'a TestFileInfo,
}

impl<'a> TestInstance<'a> {
    /// Creates a new `TestInstance`.
    pub(crate) fn new(file: &'a (impl AsRef<Utf8Path> + ?Sized), info: &'a TestFileInfo) -> Self {
        Self {
            file: file.as_ref(),
            info,
        }
    }
}

pub(super) fn corpus_dir_spec() -> ColorSpec {
    let mut color_spec = ColorSpec::new();
    color_spec
        .set_fg(Some(termcolor::Color::Magenta))
        .set_bold(true);
    color_spec
}

pub(super) fn test_name_spec() -> ColorSpec {
    let mut color_spec = ColorSpec::new();
    color_spec
        .set_fg(Some(termcolor::Color::Blue))
        .set_bold(true);
    color_spec
}
