// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    reporter::{CancelReason, TestEvent},
    test_list::{TestInstance, TestList},
    toolchain::Toolchain,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use duct::cmd;
use signal_hook::{consts::TERM_SIGNALS, flag};
use std::{
    convert::Infallible,
    fmt,
    marker::PhantomData,
    path::Path,
    process::ExitStatus,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use structopt::StructOpt;
use tracing::{debug, warn};

/// Test runner options.
#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct TestRunnerOpts {
    /// Kill any stage still running after this many seconds
    #[structopt(long, default_value = "60")]
    pub stage_timeout: u64,
}

impl Default for TestRunnerOpts {
    fn default() -> Self {
        Self { stage_timeout: 60 }
    }
}

impl TestRunnerOpts {
    /// Creates a new test runner.
    pub fn build(self, test_list: &TestList, toolchain: Toolchain) -> TestRunner<'_> {
        TestRunner {
            test_list,
            toolchain,
            stage_timeout: Duration::from_secs(self.stage_timeout),
            canceled: register_cancel_flag(),
        }
    }
}

/// Context for evaluating test cases.
pub struct TestRunner<'list> {
    test_list: &'list TestList,
    toolchain: Toolchain,
    stage_timeout: Duration,
    canceled: Arc<AtomicBool>,
}

impl<'list> TestRunner<'list> {
    /// Evaluates every matching test case, sequentially and in discovery
    /// order.
    ///
    /// The callback is called with the results of each test case.
    pub fn execute<F>(&self, mut callback: F) -> RunStats
    where
        F: FnMut(TestEvent<'list>),
    {
        self.try_execute::<Infallible, _>(|test_event| {
            callback(test_event);
            Ok(())
        })
        .expect("Err branch is infallible")
    }

    /// Evaluates every matching test case, reporting progress through the
    /// callback.
    ///
    /// One bad test case never aborts the run: per-case failures become
    /// outcomes and iteration continues. If the callback returns an error,
    /// it is propagated and the run stops early.
    pub fn try_execute<E, F>(&self, callback: F) -> Result<RunStats, E>
    where
        F: FnMut(TestEvent<'list>) -> Result<(), E>,
    {
        let mut ctx = CallbackContext::new(callback, self.test_list.run_count());

        ctx.run_started(self.test_list)?;

        for test_instance in self.test_list.iter_tests() {
            if self.canceled.load(Ordering::Acquire) {
                ctx.begin_cancel(CancelReason::Signal)?;
                break;
            }

            if !test_instance.info.filter_match.is_match() {
                ctx.test_skipped(test_instance)?;
                continue;
            }

            ctx.test_started(test_instance)?;
            let outcome = self.evaluate(test_instance);
            ctx.test_finished(test_instance, outcome)?;
        }

        ctx.run_finished()
    }

    // ---
    // Helper methods
    // ---

    /// Evaluates an individual test case, containing harness-level errors.
    fn evaluate(&self, test: TestInstance<'list>) -> TestOutcome {
        let start_time = Instant::now();
        let verdict = match self.evaluate_inner(test) {
            Ok(verdict) => verdict,
            Err(err) => TestVerdict::Fail(TestFailure::ExecFail {
                message: format!("{:#}", err),
            }),
        };
        TestOutcome {
            verdict,
            time_taken: start_time.elapsed(),
        }
    }

    /// Drives both toolchains through the pipeline and compares them at the
    /// compile and runtime checkpoints.
    fn evaluate_inner(&self, test: TestInstance<'list>) -> Result<TestVerdict> {
        // Each test case gets its own artifact namespace so evaluations
        // never trample each other's out.s/out.o/out.
        let scratch = Utf8TempDir::new().context("error creating scratch directory")?;
        let scratch_dir = scratch.path();
        let source = test.info.source.as_path();

        // Compile on both sides. Exit statuses are checkpoint data here,
        // not gates: a nonzero exit can be the correct response to invalid
        // input.
        let ref_bin = scratch_dir.join("ref");
        let reference = self.run_tool(
            Stage::Compile,
            &self.toolchain.reference_cc,
            &[source.as_str(), "-o", ref_bin.as_str()],
            scratch_dir,
        )?;
        let candidate = self.run_tool(
            Stage::Compile,
            &self.toolchain.candidate_cc,
            &[source.as_str()],
            scratch_dir,
        )?;

        // A compiler that crashed or hung is its own failure category; a
        // clean nonzero exit is not.
        if let Some(failure) = compiler_crash(ToolchainKind::Candidate, &candidate) {
            return Ok(TestVerdict::Fail(failure));
        }
        if let Some(failure) = compiler_crash(ToolchainKind::Reference, &reference) {
            return Ok(TestVerdict::Fail(failure));
        }

        // Compile checkpoint: the two exit statuses must agree.
        if reference.status != candidate.status {
            return Ok(TestVerdict::Fail(TestFailure::CompileMismatch {
                reference: reference.status,
                candidate: candidate.status,
            }));
        }
        if reference.status != ExecStatus::Exited(0) {
            // Both toolchains rejected the input the same way; nothing to
            // run.
            return Ok(TestVerdict::Pass);
        }

        let asm = scratch_dir.join(&self.toolchain.emitted_asm);
        if !asm.exists() {
            return Ok(TestVerdict::Fail(TestFailure::MissingArtifact {
                toolchain: ToolchainKind::Candidate,
                path: self.toolchain.emitted_asm.clone().into(),
            }));
        }
        if !ref_bin.exists() {
            return Ok(TestVerdict::Fail(TestFailure::MissingArtifact {
                toolchain: ToolchainKind::Reference,
                path: "ref".into(),
            }));
        }

        // Assemble. The assembler is assumed correct, so any failure means
        // the candidate emitted assembly it couldn't consume.
        let obj = scratch_dir.join("out.o");
        let assemble = self.run_tool(
            Stage::Assemble,
            &self.toolchain.assembler,
            &[asm.as_str(), "-o", obj.as_str()],
            scratch_dir,
        )?;
        if assemble.status != ExecStatus::Exited(0) {
            return Ok(TestVerdict::Fail(TestFailure::AssembleFailure {
                output: assemble,
            }));
        }

        // Link, under the same assumed-correct-tool reasoning.
        let out_bin = scratch_dir.join("out");
        let link = self.run_tool(
            Stage::Link,
            &self.toolchain.linker,
            &[obj.as_str(), "-o", out_bin.as_str()],
            scratch_dir,
        )?;
        if link.status != ExecStatus::Exited(0) {
            return Ok(TestVerdict::Fail(TestFailure::LinkFailure { output: link }));
        }

        // Execute both binaries and compare how they terminated.
        let ref_run = self.run_tool(Stage::Execute, &ref_bin, &[], scratch_dir)?;
        let out_run = self.run_tool(Stage::Execute, &out_bin, &[], scratch_dir)?;

        // Two hung binaries are a stage failure, never "equal".
        if ref_run.status == ExecStatus::TimedOut {
            return Ok(TestVerdict::Fail(TestFailure::ExecuteTimeout {
                toolchain: ToolchainKind::Reference,
            }));
        }
        if out_run.status == ExecStatus::TimedOut {
            return Ok(TestVerdict::Fail(TestFailure::ExecuteTimeout {
                toolchain: ToolchainKind::Candidate,
            }));
        }

        // Runtime checkpoint. Tagged statuses compare as a whole: two runs
        // killed by the same signal agree, a signal never equals an exit
        // code.
        if ref_run.status != out_run.status {
            return Ok(TestVerdict::Fail(TestFailure::RuntimeMismatch {
                reference: ref_run.status,
                candidate: out_run.status,
            }));
        }

        Ok(TestVerdict::Pass)
    }

    /// Runs one external tool to completion, enforcing the stage deadline.
    fn run_tool(
        &self,
        stage: Stage,
        program: &Utf8Path,
        args: &[&str],
        cwd: &Utf8Path,
    ) -> Result<ToolOutput> {
        debug!("{}: running {} {:?}", stage, program, args);
        let expression = cmd(AsRef::<Path>::as_ref(program), args.iter().copied())
            .dir(cwd)
            // Capture stdout and stderr. Neither is ever compared, but tool
            // diagnostics are kept for failure reporting.
            .stdout_capture()
            .stderr_capture()
            .unchecked();

        let handle = expression
            .start()
            .with_context(|| format!("error starting {} '{}'", stage, program))?;

        let deadline = Instant::now() + self.stage_timeout;
        loop {
            let done = handle
                .try_wait()
                .with_context(|| format!("error waiting for {} '{}'", stage, program))?
                .is_some();
            if done {
                break;
            }
            if Instant::now() >= deadline {
                warn!(
                    "{}: '{}' still running after {:?}, killing it",
                    stage, program, self.stage_timeout
                );
                handle
                    .kill()
                    .with_context(|| format!("error killing {} '{}'", stage, program))?;
                let output = handle
                    .into_output()
                    .with_context(|| format!("error reaping {} '{}'", stage, program))?;
                return Ok(ToolOutput {
                    status: ExecStatus::TimedOut,
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }

        let output = handle
            .into_output()
            .with_context(|| format!("error waiting for {} '{}'", stage, program))?;
        Ok(ToolOutput {
            status: exec_status(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

fn compiler_crash(toolchain: ToolchainKind, output: &ToolOutput) -> Option<TestFailure> {
    match output.status {
        ExecStatus::Exited(_) => None,
        status => Some(TestFailure::CompilerCrash {
            toolchain,
            status,
            stderr: output.stderr.clone(),
        }),
    }
}

/// Converts an exit status into a tagged termination cause.
///
/// `code()` is `None` only when the process was terminated by a signal, so
/// the signal number is recoverable on Unix.
fn exec_status(exit_status: ExitStatus) -> ExecStatus {
    match exit_status.code() {
        Some(code) => ExecStatus::Exited(code),
        None => abort_status(exit_status),
    }
}

#[cfg(unix)]
fn abort_status(exit_status: ExitStatus) -> ExecStatus {
    use std::os::unix::process::ExitStatusExt;
    ExecStatus::Signaled(exit_status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn abort_status(_exit_status: ExitStatus) -> ExecStatus {
    // There is no signal to recover off Unix.
    ExecStatus::Signaled(0)
}

/// Registers termination-signal handling for run-level cancellation.
///
/// The first signal sets the flag, so the loop stops launching new test
/// cases but still writes its report; a second signal terminates the
/// process immediately.
fn register_cancel_flag() -> Arc<AtomicBool> {
    let canceled = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        flag::register_conditional_shutdown(*signal, 130, Arc::clone(&canceled))
            .expect("signal handler registered");
        flag::register(*signal, Arc::clone(&canceled)).expect("signal handler registered");
    }
    canceled
}

/// A stage of the comparison pipeline, in execution order.
#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Stage {
    Compile,
    Assemble,
    Link,
    Execute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Compile => f.pad("compile"),
            Stage::Assemble => f.pad("assemble"),
            Stage::Link => f.pad("link"),
            Stage::Execute => f.pad("execute"),
        }
    }
}

/// Which of the two toolchains under comparison something belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToolchainKind {
    /// The trusted oracle.
    Reference,
    /// The compiler being validated.
    Candidate,
}

impl ToolchainKind {
    fn compiler_str(self) -> &'static str {
        match self {
            ToolchainKind::Reference => "reference compiler",
            ToolchainKind::Candidate => "candidate compiler",
        }
    }

    fn binary_str(self) -> &'static str {
        match self {
            ToolchainKind::Reference => "reference binary",
            ToolchainKind::Candidate => "candidate binary",
        }
    }
}

/// How an external process terminated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExecStatus {
    /// Clean exit with a status code.
    Exited(i32),
    /// Killed by a signal before it could exit.
    Signaled(i32),
    /// Still running at the stage deadline; killed by the harness.
    TimedOut,
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecStatus::Exited(code) => write!(f, "exited with code {}", code),
            ExecStatus::Signaled(signal) => match signal_str(*signal) {
                Some(s) => write!(f, "aborted with signal {} (SIG{})", signal, s),
                None => write!(f, "aborted with signal {}", signal),
            },
            ExecStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Signal numbers shared by Linux and the BSDs; anything else prints
/// numerically.
fn signal_str(signal: i32) -> Option<&'static str> {
    match signal {
        1 => Some("HUP"),
        2 => Some("INT"),
        3 => Some("QUIT"),
        4 => Some("ILL"),
        6 => Some("ABRT"),
        8 => Some("FPE"),
        9 => Some("KILL"),
        11 => Some("SEGV"),
        13 => Some("PIPE"),
        14 => Some("ALRM"),
        15 => Some("TERM"),
        _ => None,
    }
}

/// Captured results of one tool invocation.
#[derive(Clone, Debug)]
pub struct ToolOutput {
    pub status: ExecStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Information about a test case that finished running.
#[derive(Clone, Debug)]
pub struct TestOutcome {
    pub verdict: TestVerdict,
    pub time_taken: Duration,
}

/// Pass/fail verdict for one test case.
#[derive(Clone, Debug)]
pub enum TestVerdict {
    /// Both toolchains agreed at every checkpoint.
    Pass,
    Fail(TestFailure),
}

impl TestVerdict {
    /// Returns true if the test case passed.
    pub fn is_success(&self) -> bool {
        matches!(self, TestVerdict::Pass)
    }
}

/// Why a test case failed.
#[derive(Clone, Debug)]
pub enum TestFailure {
    /// The two compilers disagreed about whether to accept the input.
    CompileMismatch {
        reference: ExecStatus,
        candidate: ExecStatus,
    },

    /// A compiler terminated abnormally instead of exiting.
    CompilerCrash {
        toolchain: ToolchainKind,
        status: ExecStatus,
        stderr: Vec<u8>,
    },

    /// A compiler exited successfully without producing its artifact.
    MissingArtifact {
        toolchain: ToolchainKind,
        path: Utf8PathBuf,
    },

    /// The assembler could not consume the candidate's assembly.
    AssembleFailure { output: ToolOutput },

    /// The linker could not produce a binary from the assembled object.
    LinkFailure { output: ToolOutput },

    /// The compiled binaries terminated differently.
    RuntimeMismatch {
        reference: ExecStatus,
        candidate: ExecStatus,
    },

    /// A compiled binary was still running at the stage deadline.
    ExecuteTimeout { toolchain: ToolchainKind },

    /// The harness could not drive the pipeline for this test case.
    ExecFail { message: String },
}

impl TestFailure {
    /// The status word shown in the report.
    pub fn status_str(&self) -> &'static str {
        match self {
            TestFailure::ExecFail { .. } => "EXECFAIL",
            _ => "FAIL",
        }
    }

    /// Captured tool diagnostics worth echoing on failure, if any.
    pub fn captured_stderr(&self) -> Option<(&'static str, &[u8])> {
        match self {
            TestFailure::CompilerCrash {
                toolchain, stderr, ..
            } => Some((toolchain.compiler_str(), stderr)),
            TestFailure::AssembleFailure { output } => Some(("assembler", &output.stderr)),
            TestFailure::LinkFailure { output } => Some(("linker", &output.stderr)),
            _ => None,
        }
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFailure::CompileMismatch {
                reference,
                candidate,
            } => write!(
                f,
                "compile checkpoint: reference {}, candidate {}",
                reference, candidate
            ),
            TestFailure::CompilerCrash {
                toolchain, status, ..
            } => write!(f, "{} {}", toolchain.compiler_str(), status),
            TestFailure::MissingArtifact { toolchain, path } => write!(
                f,
                "{} exited successfully but produced no {}",
                toolchain.compiler_str(),
                path
            ),
            TestFailure::AssembleFailure { output } => write!(f, "assembler {}", output.status),
            TestFailure::LinkFailure { output } => write!(f, "linker {}", output.status),
            TestFailure::RuntimeMismatch {
                reference,
                candidate,
            } => write!(
                f,
                "runtime checkpoint: reference binary {}, candidate binary {}",
                reference, candidate
            ),
            TestFailure::ExecuteTimeout { toolchain } => {
                write!(f, "{} timed out", toolchain.binary_str())
            }
            TestFailure::ExecFail { message } => write!(f, "{}", message),
        }
    }
}

/// Statistics for a test run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The total number of tests that were expected to be run at the
    /// beginning.
    ///
    /// If the test run is canceled, this will be more than
    /// `final_run_count`.
    pub initial_run_count: usize,

    /// The total number of tests that were actually evaluated.
    pub final_run_count: usize,

    /// The number of test cases where both toolchains agreed at every
    /// checkpoint.
    pub passed: usize,

    /// The number of checkpoint disagreements, compile-time or runtime.
    pub mismatched: usize,

    /// The number of stage-level failures: compiler crashes, missing
    /// artifacts, assembler or linker failures, and execution timeouts.
    pub stage_failed: usize,

    /// The number of test cases the harness could not drive at all.
    pub exec_failed: usize,

    /// The number of test cases that were skipped.
    pub skipped: usize,
}

impl RunStats {
    /// Returns true if this run is considered a success.
    ///
    /// A run can be marked as failed if any of the following are true:
    /// * the run was canceled: the initial run count is greater than the final run count
    /// * any checkpoint mismatched
    /// * any stage failed
    /// * any test case encountered an execution failure
    pub fn is_success(&self) -> bool {
        if self.initial_run_count > self.final_run_count {
            return false;
        }
        if self.mismatched > 0 || self.stage_failed > 0 || self.exec_failed > 0 {
            return false;
        }
        true
    }
}

struct CallbackContext<F, E> {
    callback: F,
    start_time: Instant,
    run_stats: RunStats,
    phantom: PhantomData<E>,
}

impl<'list, F, E> CallbackContext<F, E>
where
    F: FnMut(TestEvent<'list>) -> Result<(), E>,
{
    fn new(callback: F, initial_run_count: usize) -> Self {
        Self {
            callback,
            start_time: Instant::now(),
            run_stats: RunStats {
                initial_run_count,
                ..RunStats::default()
            },
            phantom: PhantomData,
        }
    }

    fn run_started(&mut self, test_list: &'list TestList) -> Result<(), E> {
        (self.callback)(TestEvent::RunStarted { test_list })
    }

    fn test_started(&mut self, test_instance: TestInstance<'list>) -> Result<(), E> {
        (self.callback)(TestEvent::TestStarted { test_instance })
    }

    fn test_skipped(&mut self, test_instance: TestInstance<'list>) -> Result<(), E> {
        self.run_stats.skipped += 1;
        (self.callback)(TestEvent::TestSkipped { test_instance })
    }

    fn test_finished(
        &mut self,
        test_instance: TestInstance<'list>,
        outcome: TestOutcome,
    ) -> Result<(), E> {
        self.run_stats.final_run_count += 1;
        match &outcome.verdict {
            TestVerdict::Pass => self.run_stats.passed += 1,
            TestVerdict::Fail(failure) => match failure {
                TestFailure::CompileMismatch { .. } | TestFailure::RuntimeMismatch { .. } => {
                    self.run_stats.mismatched += 1;
                }
                TestFailure::CompilerCrash { .. }
                | TestFailure::MissingArtifact { .. }
                | TestFailure::AssembleFailure { .. }
                | TestFailure::LinkFailure { .. }
                | TestFailure::ExecuteTimeout { .. } => {
                    self.run_stats.stage_failed += 1;
                }
                TestFailure::ExecFail { .. } => {
                    self.run_stats.exec_failed += 1;
                }
            },
        }

        (self.callback)(TestEvent::TestFinished {
            test_instance,
            outcome,
        })
    }

    fn begin_cancel(&mut self, reason: CancelReason) -> Result<(), E> {
        (self.callback)(TestEvent::RunBeginCancel {
            remaining: self.run_stats.initial_run_count - self.run_stats.final_run_count,
            reason,
        })
    }

    fn run_finished(&mut self) -> Result<RunStats, E> {
        (self.callback)(TestEvent::RunFinished {
            start_time: self.start_time,
            run_stats: self.run_stats,
        })?;
        Ok(self.run_stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_success() {
        assert!(RunStats::default().is_success(), "empty run => success");
        assert!(
            RunStats {
                initial_run_count: 42,
                final_run_count: 42,
                ..RunStats::default()
            }
            .is_success(),
            "initial run count = final run count => success"
        );
        assert!(
            !RunStats {
                initial_run_count: 42,
                final_run_count: 41,
                ..RunStats::default()
            }
            .is_success(),
            "initial run count > final run count => failure"
        );
        assert!(
            !RunStats {
                initial_run_count: 42,
                final_run_count: 42,
                mismatched: 1,
                ..RunStats::default()
            }
            .is_success(),
            "mismatched => failure"
        );
        assert!(
            !RunStats {
                initial_run_count: 42,
                final_run_count: 42,
                stage_failed: 1,
                ..RunStats::default()
            }
            .is_success(),
            "stage failed => failure"
        );
        assert!(
            !RunStats {
                initial_run_count: 42,
                final_run_count: 42,
                exec_failed: 1,
                ..RunStats::default()
            }
            .is_success(),
            "exec failed => failure"
        );
        assert!(
            RunStats {
                initial_run_count: 42,
                final_run_count: 42,
                skipped: 1,
                ..RunStats::default()
            }
            .is_success(),
            "skipped => not considered a failure"
        );
    }

    #[test]
    fn test_exec_status_display() {
        assert_eq!(ExecStatus::Exited(3).to_string(), "exited with code 3");
        assert_eq!(
            ExecStatus::Signaled(11).to_string(),
            "aborted with signal 11 (SIGSEGV)"
        );
        assert_eq!(ExecStatus::Signaled(42).to_string(), "aborted with signal 42");
        assert_eq!(ExecStatus::TimedOut.to_string(), "timed out");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_status_from_wait_status() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(exec_status(ExitStatus::from_raw(0)), ExecStatus::Exited(0));
        assert_eq!(
            exec_status(ExitStatus::from_raw(3 << 8)),
            ExecStatus::Exited(3)
        );
        assert_eq!(
            exec_status(ExitStatus::from_raw(11)),
            ExecStatus::Signaled(11)
        );
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            TestFailure::CompileMismatch {
                reference: ExecStatus::Exited(1),
                candidate: ExecStatus::Exited(0),
            }
            .to_string(),
            "compile checkpoint: reference exited with code 1, candidate exited with code 0"
        );
        assert_eq!(
            TestFailure::CompilerCrash {
                toolchain: ToolchainKind::Candidate,
                status: ExecStatus::Signaled(11),
                stderr: vec![],
            }
            .to_string(),
            "candidate compiler aborted with signal 11 (SIGSEGV)"
        );
        assert_eq!(
            TestFailure::RuntimeMismatch {
                reference: ExecStatus::Exited(3),
                candidate: ExecStatus::Exited(0),
            }
            .to_string(),
            "runtime checkpoint: reference binary exited with code 3, candidate binary exited with code 0"
        );
        assert_eq!(
            TestFailure::ExecuteTimeout {
                toolchain: ToolchainKind::Candidate,
            }
            .to_string(),
            "candidate binary timed out"
        );
    }
}
