// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Differential test harness for a C compiler under development.
//!
//! Every `.c` file in a corpus directory is driven through two toolchains: a
//! trusted reference compiler that produces a runnable binary directly, and
//! the candidate compiler whose assembly output is assembled and linked with
//! the system tools. The two sides are compared where their behavior is
//! observable: the compile exit status, and the exit status of the resulting
//! binaries.

pub mod dispatch;
pub mod output;
pub mod reporter;
pub mod runner;
pub mod test_filter;
pub mod test_list;
pub mod toolchain;
