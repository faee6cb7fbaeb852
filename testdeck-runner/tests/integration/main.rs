// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: wire streams are parsed and replayed through a reporter.

use color_eyre::{Result, eyre::eyre};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;
use testdeck_runner::{
    errors::ReportEventError,
    events::parse_event_line,
    reporter::{Reporter, ReporterBuilder},
    terminal::{BufferTerminal, TerminalOp, ViewportHeight},
    tracker::{ModuleOutcome, ModuleStatus, RunSummary, TestState},
};

fn print(text: &str) -> TerminalOp {
    TerminalOp::Print(text.to_owned())
}

fn bounded(lines: usize) -> ViewportHeight {
    ViewportHeight::Bounded(NonZeroUsize::new(lines).expect("nonzero height"))
}

/// Replays `stream` through a reporter, returning the reporter and the number of rejected
/// events.
fn replay(stream: &str, height: ViewportHeight) -> Result<(Reporter<BufferTerminal>, usize)> {
    let mut reporter = ReporterBuilder::default().build(BufferTerminal::new(height));
    let mut rejected = 0;
    for (index, line) in stream.lines().enumerate() {
        let Some(event) = parse_event_line(line, index + 1)? else {
            continue;
        };
        match reporter.report_event(&event) {
            Ok(()) => {}
            Err(ReportEventError::Rejected(_)) => rejected += 1,
            Err(error) => return Err(eyre!(error)),
        }
    }
    Ok((reporter, rejected))
}

fn summary(reporter: &Reporter<BufferTerminal>) -> Result<RunSummary> {
    reporter
        .summary()
        .copied()
        .ok_or_else(|| eyre!("run did not finish"))
}

const FAILING_RUN: &str = indoc! {r#"
    {"time":"2024-05-01T10:00:00Z","action":"run-start"}
    {"time":"2024-05-01T10:00:00Z","action":"module-start","module":"pkg/a"}
    {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/a","test":"TestA"}
    {"time":"2024-05-01T10:00:00.5Z","action":"test-pass","module":"pkg/a","test":"TestA","elapsed":0.5}
    {"time":"2024-05-01T10:00:00.5Z","action":"test-run","module":"pkg/a","test":"TestB"}
    {"time":"2024-05-01T10:00:00.5Z","action":"test-output","module":"pkg/a","test":"TestB","output":"=== RUN   TestB\n"}
    {"time":"2024-05-01T10:00:00.6Z","action":"test-output","module":"pkg/a","test":"TestB","output":"    b_test.go:12: boom\n"}
    {"time":"2024-05-01T10:00:01Z","action":"test-fail","module":"pkg/a","test":"TestB","elapsed":0.5}
    {"time":"2024-05-01T10:00:01Z","action":"module-fail","module":"pkg/a","elapsed":1}
    {"time":"2024-05-01T10:00:02.5Z","action":"run-finish","elapsed":2.5}
"#};

#[test]
fn unbounded_failing_run() -> Result<()> {
    let (mut reporter, rejected) = replay(FAILING_RUN, ViewportHeight::Unbounded)?;
    assert_eq!(rejected, 0);

    assert_eq!(
        reporter.terminal_mut().take_ops(),
        vec![
            print("\npkg/a"),
            print("\n   • TestA    ⏳"),
            TerminalOp::MoveLeft(1),
            print("✅\n"),
            print("\n   • TestB    ⏳"),
            TerminalOp::MoveLeft(1),
            print("❌\n"),
            print("    b_test.go:12: boom\n"),
            TerminalOp::EraseScreen,
            print("\npkg/a ❌\n   • TestA    ✅\n   • TestB    ❌"),
            print(
                "\nPackages: 1 failed, 1 total\nTests: 1 failed, 1 passed, 2 total\n\
                 Time: 2.500s\nRan all test modules.\n"
            ),
        ]
    );

    let summary = summary(&reporter)?;
    assert!(summary.has_failures());
    assert_eq!(
        reporter.tracker().module("pkg/a").map(|module| module.status()),
        Some(ModuleStatus::Finished(ModuleOutcome::Failed))
    );
    Ok(())
}

#[test]
fn bounded_run_swaps_glyphs_in_place() -> Result<()> {
    let (mut reporter, rejected) = replay(FAILING_RUN, bounded(5))?;
    assert_eq!(rejected, 0);

    assert_eq!(
        reporter.terminal_mut().take_ops(),
        vec![
            print("\npkg/a"),
            print("\n"),
            print("⏳ TestA"),
            TerminalOp::MoveLeft(7),
            print("✅"),
            TerminalOp::MoveRight(6),
            print("\n"),
            print("⏳ TestB"),
            TerminalOp::MoveLeft(7),
            print("❌"),
            TerminalOp::MoveRight(6),
            print("\n    b_test.go:12: boom\n"),
            // Module completion doesn't redraw a bounded viewport.
            print(
                "\nPackages: 1 failed, 1 total\nTests: 1 failed, 1 passed, 2 total\n\
                 Time: 2.500s\nRan all test modules.\n"
            ),
        ]
    );
    Ok(())
}

#[test]
fn sentinel_names_span_lines() -> Result<()> {
    let stream = indoc! {r#"
        {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/b","test":"Parent/two␤lines"}
        {"time":"2024-05-01T10:00:01Z","action":"test-skip","module":"pkg/b","test":"Parent/two␤lines"}
    "#};
    let (mut reporter, rejected) = replay(stream, bounded(5))?;
    assert_eq!(rejected, 0);

    assert_eq!(
        reporter.terminal_mut().take_ops(),
        vec![
            print("\npkg/b"),
            print("\n"),
            print("⏳ Parent/two\nlines"),
            TerminalOp::MoveLeft(7),
            TerminalOp::MoveUp(1),
            print("⏩"),
            TerminalOp::MoveDown(1),
            TerminalOp::MoveRight(4),
        ]
    );

    // The stream ended without a run-finish event.
    let summary = reporter.finish()?;
    assert_eq!(summary.tests.skipped, 1);
    assert_eq!(summary.modules.skipped, 1);
    assert_eq!(summary.duration.as_secs(), 1);
    Ok(())
}

#[test]
fn rejected_events_draw_the_error_indicator() -> Result<()> {
    let stream = indoc! {r#"
        {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/a","test":"TestA"}
        {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/a","test":"TestB"}
        {"time":"2024-05-01T10:00:01Z","action":"test-pass","module":"pkg/a","test":"TestA"}
    "#};
    let (reporter, rejected) = replay(stream, ViewportHeight::Unbounded)?;
    assert_eq!(rejected, 1);

    let printed = reporter.terminal().printed();
    assert!(printed.contains("\n\n❗ Error."), "printed: {printed:?}");
    assert_eq!(
        reporter
            .tracker()
            .test("pkg/a", "TestA")
            .and_then(|test| test.state()),
        Some(TestState::Passed)
    );
    assert!(reporter.tracker().test("pkg/a", "TestB").is_none());
    Ok(())
}

#[test]
fn modules_without_tests_are_not_shown() -> Result<()> {
    let stream = indoc! {r#"
        {"time":"2024-05-01T10:00:00Z","action":"run-start"}
        {"time":"2024-05-01T10:00:00Z","action":"module-start","module":"pkg/empty"}
        {"time":"2024-05-01T10:00:00Z","action":"module-skip","module":"pkg/empty"}
        {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/a","test":"TestA"}
        {"time":"2024-05-01T10:00:01Z","action":"test-pass","module":"pkg/a","test":"TestA"}
        {"time":"2024-05-01T10:00:01Z","action":"module-pass","module":"pkg/a"}
        {"time":"2024-05-01T10:00:01Z","action":"run-finish"}
    "#};
    let (reporter, rejected) = replay(stream, ViewportHeight::Unbounded)?;
    assert_eq!(rejected, 0);

    let printed = reporter.terminal().printed();
    assert!(!printed.contains("pkg/empty"), "printed: {printed:?}");
    assert!(reporter.tracker().module("pkg/empty").is_none());

    let summary = summary(&reporter)?;
    assert_eq!(summary.modules.total, 1);
    assert_eq!(summary.tests.passed, 1);
    assert_eq!(summary.duration.as_secs(), 1);
    Ok(())
}

#[test]
fn malformed_lines_are_errors() {
    let error = parse_event_line(r#"{"time":"2024-05-01T10:00:00Z","action":"explode"}"#, 7)
        .expect_err("unknown action");
    assert!(error.to_string().starts_with("line 7"), "error: {error}");
}
