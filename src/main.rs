// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use diffrunner::dispatch::Opts;
use structopt::StructOpt;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn main() -> anyhow::Result<()> {
    install_subscriber();

    let opts = Opts::from_args();
    let exit_code = opts.exec()?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Diagnostics go to stderr so they never interleave with report output.
fn install_subscriber() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("DIFFRUNNER_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
