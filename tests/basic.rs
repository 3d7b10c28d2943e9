// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the runner with a scripted toolchain.
//!
//! The "compilers" here are shell scripts: each test case's source encodes
//! the exit codes and misbehaviors both sides should exhibit. This keeps the
//! scenarios hermetic without needing real compilers on the host.

#![cfg(unix)]

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use diffrunner::{
    reporter::TestEvent,
    runner::{
        ExecStatus, RunStats, TestFailure, TestOutcome, TestRunner, TestRunnerOpts, TestVerdict,
        ToolchainKind,
    },
    test_filter::TestFilter,
    test_list::TestList,
    toolchain::{Toolchain, ToolchainOpts},
};
use pretty_assertions::assert_eq;
use std::{collections::HashMap, fs, os::unix::fs::PermissionsExt};

/// Stand-in for the reference compiler: reads the directives baked into the
/// test-case source and either rejects it or writes a runnable binary.
const REFERENCE_CC: &str = r#"#!/bin/sh
src="$1"
out="$3"
code=$(sed -n 's/.*ref-compile:\([0-9]*\).*/\1/p' "$src")
if [ "$code" -ne 0 ]; then
    echo "ref: rejecting $src" >&2
    exit "$code"
fi
run=$(sed -n 's/.*ref-run:\([0-9]*\).*/\1/p' "$src")
printf '#!/bin/sh\nexit %s\n' "$run" > "$out"
chmod +x "$out"
"#;

/// Stand-in for the candidate compiler: writes assembly to out.s in its
/// working directory, or misbehaves on request.
const CANDIDATE_CC: &str = r#"#!/bin/sh
src="$1"
grep -q cand-hang "$src" && exec sleep 60
grep -q cand-crash "$src" && kill -s SEGV $$
code=$(sed -n 's/.*cand-compile:\([0-9]*\).*/\1/p' "$src")
if [ "$code" -ne 0 ]; then
    echo "candidate: rejecting $src" >&2
    exit "$code"
fi
grep -q cand-no-asm "$src" && exit 0
run=$(sed -n 's/.*cand-run:\([0-9]*\).*/\1/p' "$src")
if grep -q cand-bad-asm "$src"; then
    echo '!! not assembly' > out.s
elif grep -q cand-bad-obj "$src"; then
    printf '# undefined-reference\nexit %s\n' "$run" > out.s
else
    printf 'exit %s\n' "$run" > out.s
fi
exit 0
"#;

/// Stand-in assembler: rejects anything that isn't "assembly", otherwise
/// passes the text through as the object file.
const ASSEMBLER: &str = r#"#!/bin/sh
asm="$1"
obj="$3"
if grep -q '!!' "$asm"; then
    echo "as: syntax error in $asm" >&2
    exit 1
fi
cp "$asm" "$obj"
"#;

/// Stand-in linker: rejects objects with unresolved references, otherwise
/// wraps the object into a runnable script.
const LINKER: &str = r#"#!/bin/sh
obj="$1"
bin="$3"
if grep -q undefined-reference "$obj"; then
    echo "ld: undefined reference" >&2
    exit 1
fi
printf '#!/bin/sh\n' > "$bin"
cat "$obj" >> "$bin"
chmod +x "$bin"
"#;

#[derive(Copy, Clone, Debug)]
struct Fixture {
    name: &'static str,
    contents: &'static str,
    expected: Expected,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Expected {
    Pass,
    CompileMismatch,
    RuntimeMismatch,
    AssembleFailure,
    LinkFailure,
    CandidateCrash,
    CandidateTimeout,
    MissingAsm,
}

static FIXTURES: &[Fixture] = &[
    Fixture {
        name: "accept_both.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0\nint main(void) { return 0; }\n",
        expected: Expected::Pass,
    },
    Fixture {
        name: "bad_asm.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0 cand-bad-asm\nint main(void) { return 0; }\n",
        expected: Expected::AssembleFailure,
    },
    Fixture {
        name: "bad_obj.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0 cand-bad-obj\nint main(void) { return 0; }\n",
        expected: Expected::LinkFailure,
    },
    Fixture {
        name: "crash.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0 cand-crash\nint main(void) { return 0; }\n",
        expected: Expected::CandidateCrash,
    },
    Fixture {
        name: "exit_code_match.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:7 cand-run:7\nint main(void) { return 7; }\n",
        expected: Expected::Pass,
    },
    Fixture {
        name: "exit_code_mismatch.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:3 cand-run:0\nint main(void) { return 3; }\n",
        expected: Expected::RuntimeMismatch,
    },
    Fixture {
        name: "hang.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0 cand-hang\nint main(void) { return 0; }\n",
        expected: Expected::CandidateTimeout,
    },
    Fixture {
        name: "no_asm.c",
        contents: "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0 cand-no-asm\nint main(void) { return 0; }\n",
        expected: Expected::MissingAsm,
    },
    Fixture {
        name: "reject_both.c",
        contents: "// ref-compile:1 cand-compile:1 ref-run:0 cand-run:0\nint main(void) { return }\n",
        expected: Expected::Pass,
    },
    Fixture {
        name: "reject_mismatch.c",
        contents: "// ref-compile:1 cand-compile:0 ref-run:0 cand-run:0\nint main(void) { return }\n",
        expected: Expected::CompileMismatch,
    },
];

fn write_script(dir: &Utf8Path, name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

fn scripted_toolchain(dir: &Utf8Path) -> Result<Toolchain> {
    let opts = ToolchainOpts {
        reference_cc: write_script(dir, "ref-cc", REFERENCE_CC)?,
        candidate_cc: write_script(dir, "cand-cc", CANDIDATE_CC)?,
        assembler: write_script(dir, "as", ASSEMBLER)?,
        linker: write_script(dir, "ld", LINKER)?,
        emitted_asm: "out.s".to_owned(),
    };
    opts.resolve()
}

fn write_corpus(dir: &Utf8Path, fixtures: &[Fixture]) -> Result<()> {
    for fixture in fixtures {
        fs::write(dir.join(fixture.name), fixture.contents)?;
    }
    // Discovery must ignore anything that isn't a .c file.
    fs::write(dir.join("README.md"), "not a test case\n")?;
    Ok(())
}

fn execute_collect<'list>(
    runner: &TestRunner<'list>,
) -> (
    Vec<&'list Utf8Path>,
    HashMap<&'list Utf8Path, TestOutcome>,
    RunStats,
) {
    let mut order = Vec::new();
    let mut outcomes = HashMap::new();
    let run_stats = runner.execute(|event| {
        if let TestEvent::TestFinished {
            test_instance,
            outcome,
        } = event
        {
            order.push(test_instance.file);
            outcomes.insert(test_instance.file, outcome);
        }
    });

    (order, outcomes, run_stats)
}

fn check_outcome(fixture: &Fixture, outcome: &TestOutcome) {
    let verdict = &outcome.verdict;
    let valid = match fixture.expected {
        Expected::Pass => matches!(verdict, TestVerdict::Pass),
        Expected::CompileMismatch => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::CompileMismatch {
                reference: ExecStatus::Exited(1),
                candidate: ExecStatus::Exited(0),
            })
        ),
        Expected::RuntimeMismatch => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::RuntimeMismatch {
                reference: ExecStatus::Exited(3),
                candidate: ExecStatus::Exited(0),
            })
        ),
        Expected::AssembleFailure => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::AssembleFailure { .. })
        ),
        Expected::LinkFailure => {
            matches!(verdict, TestVerdict::Fail(TestFailure::LinkFailure { .. }))
        }
        Expected::CandidateCrash => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::CompilerCrash {
                toolchain: ToolchainKind::Candidate,
                status: ExecStatus::Signaled(_),
                ..
            })
        ),
        Expected::CandidateTimeout => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::CompilerCrash {
                toolchain: ToolchainKind::Candidate,
                status: ExecStatus::TimedOut,
                ..
            })
        ),
        Expected::MissingAsm => matches!(
            verdict,
            TestVerdict::Fail(TestFailure::MissingArtifact {
                toolchain: ToolchainKind::Candidate,
                ..
            })
        ),
    };
    if !valid {
        panic!(
            "for {}, mismatch in outcome: expected {:?}, actual {:?}",
            fixture.name, fixture.expected, verdict
        );
    }
}

#[test]
fn test_scenario_matrix() -> Result<()> {
    let tools_dir = Utf8TempDir::new()?;
    let toolchain = scripted_toolchain(tools_dir.path())?;
    let corpus_dir = Utf8TempDir::new()?;
    write_corpus(corpus_dir.path(), FIXTURES)?;

    let test_list = TestList::discover(corpus_dir.path(), &TestFilter::any())?;
    assert_eq!(
        test_list.test_count(),
        FIXTURES.len(),
        "every .c file yields exactly one test case"
    );

    let runner = TestRunnerOpts { stage_timeout: 1 }.build(&test_list, toolchain.clone());
    let (order, outcomes, run_stats) = execute_collect(&runner);

    // Exactly one outcome per discovered test case, in sorted order.
    let actual_order: Vec<_> = order
        .iter()
        .map(|file| file.file_name().expect("file name"))
        .collect();
    let mut expected_order: Vec<_> = FIXTURES.iter().map(|fixture| fixture.name).collect();
    expected_order.sort_unstable();
    assert_eq!(actual_order, expected_order);
    assert_eq!(outcomes.len(), FIXTURES.len());

    for fixture in FIXTURES {
        let file = corpus_dir.path().join(fixture.name);
        let outcome = outcomes
            .get(file.as_path())
            .unwrap_or_else(|| panic!("no outcome for {}", fixture.name));
        check_outcome(fixture, outcome);
    }

    assert_eq!(run_stats.initial_run_count, FIXTURES.len());
    assert_eq!(run_stats.final_run_count, FIXTURES.len());
    assert_eq!(run_stats.passed, 3);
    assert_eq!(run_stats.mismatched, 2);
    assert_eq!(run_stats.stage_failed, 5);
    assert_eq!(run_stats.exec_failed, 0);
    assert_eq!(run_stats.skipped, 0);
    assert!(!run_stats.is_success(), "run is marked failed");

    // Evaluating the same corpus again yields the same report.
    let runner = TestRunnerOpts { stage_timeout: 1 }.build(&test_list, toolchain);
    let (order2, _, run_stats2) = execute_collect(&runner);
    assert_eq!(order, order2, "evaluation order is deterministic");
    assert_eq!(run_stats, run_stats2, "stats are deterministic");

    Ok(())
}

#[test]
fn test_filtered_run_reports_skips() -> Result<()> {
    let tools_dir = Utf8TempDir::new()?;
    let toolchain = scripted_toolchain(tools_dir.path())?;
    let corpus_dir = Utf8TempDir::new()?;
    for name in &["alpha.c", "beta.c", "gamma.c"] {
        fs::write(
            corpus_dir.path().join(name),
            "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0\nint main(void) { return 0; }\n",
        )?;
    }

    let filter = TestFilter::new(&["alpha", "gam"]);
    let test_list = TestList::discover(corpus_dir.path(), &filter)?;
    assert_eq!(test_list.run_count(), 2);

    let runner = TestRunnerOpts::default().build(&test_list, toolchain);
    let (order, outcomes, run_stats) = execute_collect(&runner);

    let actual_order: Vec<_> = order
        .iter()
        .map(|file| file.file_name().expect("file name"))
        .collect();
    assert_eq!(actual_order, vec!["alpha.c", "gamma.c"]);
    assert_eq!(outcomes.len(), 2, "skipped test cases have no outcome");

    assert_eq!(run_stats.passed, 2);
    assert_eq!(run_stats.skipped, 1);
    assert!(
        run_stats.is_success(),
        "skipped test cases don't fail the run"
    );

    Ok(())
}

#[test]
fn test_unrunnable_candidate_is_contained() -> Result<()> {
    let tools_dir = Utf8TempDir::new()?;
    let mut toolchain = scripted_toolchain(tools_dir.path())?;
    // A bare name that PATH lookup can't find: starting the candidate fails,
    // and the failure must stay local to each test case.
    toolchain.candidate_cc = "diffrunner-no-such-compiler".into();

    let corpus_dir = Utf8TempDir::new()?;
    fs::write(
        corpus_dir.path().join("only.c"),
        "// ref-compile:0 cand-compile:0 ref-run:0 cand-run:0\nint main(void) { return 0; }\n",
    )?;

    let test_list = TestList::discover(corpus_dir.path(), &TestFilter::any())?;
    let runner = TestRunnerOpts::default().build(&test_list, toolchain);
    let (order, outcomes, run_stats) = execute_collect(&runner);

    assert_eq!(order.len(), 1, "the test case still produces an outcome");
    let outcome = &outcomes[order[0]];
    assert!(
        matches!(
            outcome.verdict,
            TestVerdict::Fail(TestFailure::ExecFail { .. })
        ),
        "unexpected verdict: {:?}",
        outcome.verdict
    );

    assert_eq!(run_stats.exec_failed, 1);
    assert!(!run_stats.is_success());

    Ok(())
}
