// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::convert::TryFrom;
use structopt::StructOpt;

/// Locations of the external tools the pipeline drives.
///
/// Defaults match the conventional layout this harness grew up with: `gcc`
/// as the oracle, a `./toycc` candidate that writes `out.s` into its working
/// directory, and the system assembler and linker.
#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct ToolchainOpts {
    /// Reference C compiler used as the oracle
    #[structopt(long, default_value = "gcc")]
    pub reference_cc: Utf8PathBuf,

    /// Compiler under test
    #[structopt(long, default_value = "./toycc")]
    pub candidate_cc: Utf8PathBuf,

    /// Assembler invoked on the candidate's assembly output
    #[structopt(long, default_value = "as")]
    pub assembler: Utf8PathBuf,

    /// Linker invoked on the assembled object file
    #[structopt(long, default_value = "ld")]
    pub linker: Utf8PathBuf,

    /// File name of the assembly the candidate writes to its working directory
    #[structopt(long, default_value = "out.s")]
    pub emitted_asm: String,
}

impl ToolchainOpts {
    /// Resolves the tool paths up front.
    ///
    /// Every stage runs from a per-test scratch directory, so paths with
    /// more than one component must be made absolute before the working
    /// directory changes under them. Bare names are left alone for `PATH`
    /// lookup. An unresolvable path is a configuration error that aborts
    /// the run before any test case is evaluated.
    pub fn resolve(self) -> Result<Toolchain> {
        Ok(Toolchain {
            reference_cc: absolutize(&self.reference_cc)
                .context("error resolving reference compiler")?,
            candidate_cc: absolutize(&self.candidate_cc)
                .context("error resolving candidate compiler")?,
            assembler: absolutize(&self.assembler).context("error resolving assembler")?,
            linker: absolutize(&self.linker).context("error resolving linker")?,
            emitted_asm: self.emitted_asm,
        })
    }
}

/// A toolchain with all paths resolved, ready to be invoked from arbitrary
/// working directories.
#[derive(Clone, Debug)]
pub struct Toolchain {
    pub reference_cc: Utf8PathBuf,
    pub candidate_cc: Utf8PathBuf,
    pub assembler: Utf8PathBuf,
    pub linker: Utf8PathBuf,
    /// Assembly file name the candidate emits, relative to its working
    /// directory.
    pub emitted_asm: String,
}

fn absolutize(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() || path.components().count() > 1 {
        canonicalize_utf8(path)
    } else {
        Ok(path.to_owned())
    }
}

pub(crate) fn canonicalize_utf8(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("{} does not exist or is unreadable", path))?;
    Utf8PathBuf::try_from(canonical)
        .with_context(|| format!("canonical form of {} is not valid UTF-8", path))
}
