// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{OutcomeCounts, RunSummary};
use crate::{errors::TrackerError, helpers::plural, test_output::genuine_output};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::{fmt, time::Duration};
use tracing::debug;

/// The state of a test that has started.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TestState {
    /// The test is running.
    Running,
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
    /// The test was skipped.
    Skipped,
}

impl TestState {
    /// Returns true if the test has finished.
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// The outcome reported for a test by a terminal event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TestOutcome {
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
    /// The test was skipped.
    Skipped,
}

impl TestOutcome {
    /// The state a test is in after this outcome is accepted.
    pub fn state(self) -> TestState {
        match self {
            Self::Passed => TestState::Passed,
            Self::Failed => TestState::Failed,
            Self::Skipped => TestState::Skipped,
        }
    }
}

/// The outcome reported for a module by a module-level event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ModuleOutcome {
    /// The module passed.
    Passed,
    /// The module failed.
    Failed,
}

impl fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What [`Tracker::on_test_run`] did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TestStart {
    /// The test had already started; nothing changed.
    AlreadyStarted,

    /// The test is now running.
    Started {
        /// True if this is the first test of the module to start.
        first_in_module: bool,
    },
}

/// A single test, as seen through its events.
#[derive(Clone, Debug)]
pub struct TestRecord {
    name: String,
    module_name: String,
    // None if only output has been seen for this test so far.
    state: Option<TestState>,
    output: Vec<String>,
    elapsed: Option<Duration>,
}

impl TestRecord {
    fn new(module_name: &str, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            module_name: module_name.to_owned(),
            state: None,
            output: Vec::new(),
            elapsed: None,
        }
    }

    /// The test name, as received (sentinel tokens are not decoded).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the module this test belongs to.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The state of this test, or `None` if it has only produced output so far.
    pub fn state(&self) -> Option<TestState> {
        self.state
    }

    /// The raw output fragments recorded for this test, in arrival order.
    pub fn output_fragments(&self) -> &[String] {
        &self.output
    }

    /// The output this test genuinely produced, with the echo of its identifier removed.
    ///
    /// This is recomputed on every call, since more fragments may still arrive.
    pub fn genuine_output(&self) -> String {
        genuine_output(&self.output, &self.name)
    }

    /// The time the test took, if the finishing event reported it.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// The derived status of a module.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModuleStatus {
    /// No module-level outcome has been accepted yet.
    Running,
    /// The module finished with the given outcome.
    Finished(ModuleOutcome),
}

/// A named group of tests.
#[derive(Clone, Debug)]
pub struct ModuleRecord {
    name: String,
    tests: IndexMap<String, TestRecord>,
    outcome: Option<ModuleOutcome>,
}

impl ModuleRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            tests: IndexMap::new(),
            outcome: None,
        }
    }

    /// The module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tests in this module that have started, in the order they started.
    pub fn tests(&self) -> impl Iterator<Item = &TestRecord> + '_ {
        self.tests.values().filter(|test| test.state.is_some())
    }

    /// Looks up a test by name, including tests that have only produced output.
    pub fn test(&self, name: &str) -> Option<&TestRecord> {
        self.tests.get(name)
    }

    /// The number of tests in this module that have started.
    pub fn started_test_count(&self) -> usize {
        self.tests().count()
    }

    /// The derived status of this module.
    pub fn status(&self) -> ModuleStatus {
        match self.outcome {
            Some(outcome) => ModuleStatus::Finished(outcome),
            None => ModuleStatus::Running,
        }
    }

    fn has_test_in(&self, states: &[TestState]) -> bool {
        self.tests()
            .any(|test| test.state.is_some_and(|state| states.contains(&state)))
    }

    fn summary_outcome(&self) -> Option<TestState> {
        if self.started_test_count() == 0 {
            return None;
        }
        if self.outcome == Some(ModuleOutcome::Failed) {
            Some(TestState::Failed)
        } else if self.has_test_in(&[TestState::Passed]) {
            Some(TestState::Passed)
        } else {
            Some(TestState::Skipped)
        }
    }
}

/// Tracks the state of every module and test in a run.
///
/// There is one tracker per run. Every operation either applies an event or rejects it
/// with a [`TrackerError`], in which case the state is left unchanged.
#[derive(Clone, Debug, Default)]
pub struct Tracker {
    modules: IndexMap<String, ModuleRecord>,
    run_started_at: Option<DateTime<FixedOffset>>,
    run_finished_at: Option<DateTime<FixedOffset>>,
    first_seen_at: Option<DateTime<FixedOffset>>,
    last_seen_at: Option<DateTime<FixedOffset>>,
    reported_elapsed: Option<Duration>,
}

impl Tracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The modules seen so far, in the order they were first seen.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> + '_ {
        self.modules.values()
    }

    /// Looks up a module by name.
    pub fn module(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    /// Looks up a test by module and test name.
    pub fn test(&self, module: &str, test: &str) -> Option<&TestRecord> {
        self.modules.get(module)?.tests.get(test)
    }

    /// Returns the test that is currently running, if any.
    pub fn running_test(&self) -> Option<&TestRecord> {
        self.modules
            .values()
            .flat_map(|module| module.tests.values())
            .find(|test| test.state == Some(TestState::Running))
    }

    /// Records the timestamp of an incoming event, for computing the run duration.
    pub fn record_timestamp(&mut self, timestamp: DateTime<FixedOffset>) {
        self.first_seen_at.get_or_insert(timestamp);
        self.last_seen_at = Some(timestamp);
    }

    /// The timestamp of the most recent event recorded.
    pub fn last_event_at(&self) -> Option<DateTime<FixedOffset>> {
        self.last_seen_at
    }

    /// Marks the start of the run.
    pub fn on_run_started(&mut self, timestamp: DateTime<FixedOffset>) {
        self.run_started_at = Some(timestamp);
    }

    /// Registers a module that has not run any tests yet.
    pub fn on_module_started(&mut self, module: &str) {
        if !self.modules.contains_key(module) {
            debug!(module, "module registered");
            self.modules
                .insert(module.to_owned(), ModuleRecord::new(module));
        }
    }

    /// Removes a module that turned out to have no tests.
    ///
    /// Returns true if a module was removed.
    pub fn on_module_no_tests(&mut self, module: &str) -> Result<bool, TrackerError> {
        let Some(record) = self.modules.get(module) else {
            return Ok(false);
        };
        let test_count = record.started_test_count();
        if test_count > 0 {
            return Err(TrackerError::ModuleHasTests {
                module: module.to_owned(),
                test_count,
            });
        }

        debug!(module, "module has no tests, removing");
        self.modules.shift_remove(module);
        Ok(true)
    }

    /// Starts a test.
    ///
    /// Only one test may run at a time across the whole tracker.
    pub fn on_test_run(&mut self, module: &str, test: &str) -> Result<TestStart, TrackerError> {
        if self
            .test(module, test)
            .is_some_and(|record| record.state.is_some())
        {
            return Ok(TestStart::AlreadyStarted);
        }

        if let Some(running) = self.running_test() {
            return Err(TrackerError::AnotherTestRunning {
                module: module.to_owned(),
                test: test.to_owned(),
                running_module: running.module_name.clone(),
                running_test: running.name.clone(),
            });
        }

        let module_record = self
            .modules
            .entry(module.to_owned())
            .or_insert_with(|| ModuleRecord::new(module));
        let first_in_module = module_record.started_test_count() == 0;

        let index = match module_record.tests.get_index_of(test) {
            Some(index) => index,
            None => {
                module_record
                    .tests
                    .insert_full(test.to_owned(), TestRecord::new(module, test))
                    .0
            }
        };
        module_record.tests[index].state = Some(TestState::Running);

        // A test that only had output so far takes its display position from this event.
        let last = module_record.tests.len() - 1;
        module_record.tests.move_index(index, last);

        debug!(module, test, first_in_module, "test started");
        Ok(TestStart::Started { first_in_module })
    }

    /// Appends a raw output fragment to a test, creating a bare record if needed.
    pub fn on_test_output(&mut self, module: &str, test: &str, fragment: impl Into<String>) {
        self.modules
            .entry(module.to_owned())
            .or_insert_with(|| ModuleRecord::new(module))
            .tests
            .entry(test.to_owned())
            .or_insert_with(|| TestRecord::new(module, test))
            .output
            .push(fragment.into());
    }

    /// Finishes a running test with the given outcome.
    ///
    /// Returns false if the test had already finished with the same outcome, in which case
    /// nothing changed.
    pub fn on_test_finished(
        &mut self,
        module: &str,
        test: &str,
        outcome: TestOutcome,
        elapsed: Option<Duration>,
    ) -> Result<bool, TrackerError> {
        let record = self
            .modules
            .get_mut(module)
            .and_then(|module_record| module_record.tests.get_mut(test))
            .ok_or_else(|| TrackerError::UnknownTest {
                module: module.to_owned(),
                test: test.to_owned(),
            })?;

        let new_state = outcome.state();
        match record.state {
            Some(state) if state == new_state => Ok(false),
            Some(TestState::Running) => {
                debug!(module, test, state = %new_state, "test finished");
                record.state = Some(new_state);
                record.elapsed = elapsed;
                Ok(true)
            }
            state => Err(TrackerError::TestNotRunning {
                module: module.to_owned(),
                test: test.to_owned(),
                state,
            }),
        }
    }

    /// Marks a running test as passed.
    pub fn on_test_passed(&mut self, module: &str, test: &str) -> Result<bool, TrackerError> {
        self.on_test_finished(module, test, TestOutcome::Passed, None)
    }

    /// Marks a running test as failed.
    pub fn on_test_failed(&mut self, module: &str, test: &str) -> Result<bool, TrackerError> {
        self.on_test_finished(module, test, TestOutcome::Failed, None)
    }

    /// Marks a running test as skipped.
    pub fn on_test_skipped(&mut self, module: &str, test: &str) -> Result<bool, TrackerError> {
        self.on_test_finished(module, test, TestOutcome::Skipped, None)
    }

    /// Finishes a module.
    ///
    /// A module can only pass if at least one of its tests passed or was skipped, and can only
    /// fail if at least one of its tests failed. Returns false if the module had already
    /// finished with the same outcome.
    pub fn on_module_finished(
        &mut self,
        module: &str,
        outcome: ModuleOutcome,
    ) -> Result<bool, TrackerError> {
        let record = self
            .modules
            .get_mut(module)
            .ok_or_else(|| TrackerError::UnknownModule {
                module: module.to_owned(),
            })?;

        match record.outcome {
            Some(existing) if existing == outcome => return Ok(false),
            Some(existing) => {
                return Err(TrackerError::ModuleAlreadyFinished {
                    module: module.to_owned(),
                    outcome: existing,
                });
            }
            None => {}
        }

        match outcome {
            ModuleOutcome::Passed => {
                if !record.has_test_in(&[TestState::Passed, TestState::Skipped]) {
                    return Err(TrackerError::ModulePassWithoutSuccess {
                        module: module.to_owned(),
                    });
                }
            }
            ModuleOutcome::Failed => {
                if !record.has_test_in(&[TestState::Failed]) {
                    return Err(TrackerError::ModuleFailWithoutFailure {
                        module: module.to_owned(),
                    });
                }
            }
        }

        debug!(module, %outcome, "module finished");
        record.outcome = Some(outcome);
        Ok(true)
    }

    /// Marks a module as passed.
    pub fn on_module_passed(&mut self, module: &str) -> Result<bool, TrackerError> {
        self.on_module_finished(module, ModuleOutcome::Passed)
    }

    /// Marks a module as failed.
    pub fn on_module_failed(&mut self, module: &str) -> Result<bool, TrackerError> {
        self.on_module_finished(module, ModuleOutcome::Failed)
    }

    /// Finishes the run and produces a summary.
    ///
    /// An open module with a failed test is marked failed, and one with a passed or skipped
    /// test is marked passed. A module whose only tests never finished stays open and counts
    /// as skipped.
    pub fn on_run_finished(
        &mut self,
        timestamp: DateTime<FixedOffset>,
        elapsed: Option<Duration>,
    ) -> RunSummary {
        self.run_finished_at = Some(timestamp);
        self.reported_elapsed = elapsed;

        for module in self.modules.values_mut() {
            if module.outcome.is_some() || module.started_test_count() == 0 {
                continue;
            }
            let outcome = if module.has_test_in(&[TestState::Failed]) {
                ModuleOutcome::Failed
            } else if module.has_test_in(&[TestState::Passed, TestState::Skipped]) {
                ModuleOutcome::Passed
            } else {
                debug!(module = %module.name, "no test finished, leaving module open");
                continue;
            };
            debug!(module = %module.name, %outcome, "closing module at end of run");
            module.outcome = Some(outcome);
        }

        let summary = self.summary();
        debug!(
            "run finished: {} {}, {} {}",
            summary.modules.total,
            plural::modules_str(summary.modules.total),
            summary.tests.total,
            plural::tests_str(summary.tests.total),
        );
        summary
    }

    /// Computes a summary of the run so far.
    pub fn summary(&self) -> RunSummary {
        let mut modules = OutcomeCounts::default();
        let mut tests = OutcomeCounts::default();

        for module in self.modules.values() {
            if let Some(state) = module.summary_outcome() {
                modules.add(state);
            }
            for test in module.tests() {
                if let Some(state) = test.state {
                    tests.add(state);
                }
            }
        }

        RunSummary {
            modules,
            tests,
            duration: self.elapsed(),
        }
    }

    /// The elapsed time of the run.
    pub fn elapsed(&self) -> Duration {
        if let Some(elapsed) = self.reported_elapsed {
            return elapsed;
        }

        let start = self.run_started_at.or(self.first_seen_at);
        let end = self.run_finished_at.or(self.last_seen_at);
        match (start, end) {
            (Some(start), Some(end)) => end
                .signed_duration_since(start)
                .to_std()
                .unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(module: &ModuleRecord) -> Vec<&str> {
        module.tests().map(|test| test.name()).collect()
    }

    #[test]
    fn test_lifecycle() {
        let mut tracker = Tracker::new();

        assert_eq!(
            tracker.on_test_run("pkg", "TestA"),
            Ok(TestStart::Started {
                first_in_module: true,
            })
        );
        assert_eq!(
            tracker.running_test().map(|test| test.name()),
            Some("TestA")
        );
        assert_eq!(tracker.on_test_passed("pkg", "TestA"), Ok(true));
        assert_eq!(
            tracker.test("pkg", "TestA").unwrap().state(),
            Some(TestState::Passed)
        );
        assert!(tracker.running_test().is_none());

        assert_eq!(
            tracker.on_test_run("pkg", "TestB"),
            Ok(TestStart::Started {
                first_in_module: false,
            })
        );
    }

    #[test]
    fn repeated_run_is_a_no_op() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        assert_eq!(
            tracker.on_test_run("pkg", "TestA"),
            Ok(TestStart::AlreadyStarted)
        );
    }

    #[test]
    fn only_one_test_runs_at_a_time() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();

        assert_eq!(
            tracker.on_test_run("other", "TestB"),
            Err(TrackerError::AnotherTestRunning {
                module: "other".to_owned(),
                test: "TestB".to_owned(),
                running_module: "pkg".to_owned(),
                running_test: "TestA".to_owned(),
            })
        );
        assert!(tracker.module("other").is_none(), "state is unchanged");
    }

    #[test]
    fn terminal_events_are_idempotent() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        assert_eq!(tracker.on_test_failed("pkg", "TestA"), Ok(true));
        assert_eq!(tracker.on_test_failed("pkg", "TestA"), Ok(false));
        assert_eq!(
            tracker.test("pkg", "TestA").unwrap().state(),
            Some(TestState::Failed)
        );
    }

    #[test]
    fn conflicting_terminal_event_is_rejected() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        tracker.on_test_failed("pkg", "TestA").unwrap();

        assert_eq!(
            tracker.on_test_passed("pkg", "TestA"),
            Err(TrackerError::TestNotRunning {
                module: "pkg".to_owned(),
                test: "TestA".to_owned(),
                state: Some(TestState::Failed),
            })
        );
        assert_eq!(
            tracker.test("pkg", "TestA").unwrap().state(),
            Some(TestState::Failed)
        );
    }

    #[test]
    fn terminal_event_for_unknown_test() {
        let mut tracker = Tracker::new();
        assert_eq!(
            tracker.on_test_skipped("pkg", "TestA"),
            Err(TrackerError::UnknownTest {
                module: "pkg".to_owned(),
                test: "TestA".to_owned(),
            })
        );
    }

    #[test]
    fn output_before_run_creates_bare_record() {
        let mut tracker = Tracker::new();
        tracker.on_test_output("pkg", "TestB", "early\n");

        let record = tracker.test("pkg", "TestB").expect("bare record exists");
        assert_eq!(record.state(), None);
        assert_eq!(record.output_fragments(), ["early\n".to_owned()]);
        assert!(tracker.running_test().is_none());

        // A bare test cannot finish without running first.
        assert_eq!(
            tracker.on_test_passed("pkg", "TestB"),
            Err(TrackerError::TestNotRunning {
                module: "pkg".to_owned(),
                test: "TestB".to_owned(),
                state: None,
            })
        );

        tracker.on_test_run("pkg", "TestA").unwrap();
        tracker.on_test_passed("pkg", "TestA").unwrap();
        assert_eq!(
            tracker.on_test_run("pkg", "TestB"),
            Ok(TestStart::Started {
                first_in_module: false,
            })
        );
        let module = tracker.module("pkg").unwrap();
        assert_eq!(names(module), ["TestA", "TestB"]);
        assert_eq!(
            module.test("TestB").unwrap().output_fragments(),
            ["early\n".to_owned()]
        );
    }

    #[test]
    fn tests_keep_first_run_order() {
        let mut tracker = Tracker::new();
        for name in ["zeta", "alpha", "mid"] {
            tracker.on_test_run("pkg", name).unwrap();
            tracker.on_test_passed("pkg", name).unwrap();
        }
        tracker.on_test_run("pkg", "alpha").unwrap();

        assert_eq!(names(tracker.module("pkg").unwrap()), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn module_pass_requires_a_passed_or_skipped_test() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        tracker.on_test_failed("pkg", "TestA").unwrap();

        assert_eq!(
            tracker.on_module_passed("pkg"),
            Err(TrackerError::ModulePassWithoutSuccess {
                module: "pkg".to_owned(),
            })
        );
        assert_eq!(
            tracker.module("pkg").unwrap().status(),
            ModuleStatus::Running
        );

        tracker.on_test_run("pkg", "TestB").unwrap();
        tracker.on_test_skipped("pkg", "TestB").unwrap();
        assert_eq!(tracker.on_module_passed("pkg"), Ok(true));
        assert_eq!(
            tracker.module("pkg").unwrap().status(),
            ModuleStatus::Finished(ModuleOutcome::Passed)
        );
    }

    #[test]
    fn module_fail_requires_a_failed_test() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        tracker.on_test_passed("pkg", "TestA").unwrap();

        assert_eq!(
            tracker.on_module_failed("pkg"),
            Err(TrackerError::ModuleFailWithoutFailure {
                module: "pkg".to_owned(),
            })
        );
        assert_eq!(
            tracker.on_module_failed("missing"),
            Err(TrackerError::UnknownModule {
                module: "missing".to_owned(),
            })
        );
    }

    #[test]
    fn module_outcome_cannot_change() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("pkg", "TestA").unwrap();
        tracker.on_test_failed("pkg", "TestA").unwrap();
        tracker.on_test_run("pkg", "TestB").unwrap();
        tracker.on_test_passed("pkg", "TestB").unwrap();

        assert_eq!(tracker.on_module_failed("pkg"), Ok(true));
        assert_eq!(tracker.on_module_failed("pkg"), Ok(false));
        assert_eq!(
            tracker.on_module_passed("pkg"),
            Err(TrackerError::ModuleAlreadyFinished {
                module: "pkg".to_owned(),
                outcome: ModuleOutcome::Failed,
            })
        );
    }

    #[test]
    fn module_without_tests_is_removed() {
        let mut tracker = Tracker::new();
        tracker.on_module_started("empty");
        tracker.on_module_started("pkg");
        tracker.on_test_run("pkg", "TestA").unwrap();

        assert_eq!(tracker.on_module_no_tests("empty"), Ok(true));
        assert_eq!(tracker.on_module_no_tests("unknown"), Ok(false));
        assert_eq!(
            tracker.on_module_no_tests("pkg"),
            Err(TrackerError::ModuleHasTests {
                module: "pkg".to_owned(),
                test_count: 1,
            })
        );
        let modules: Vec<_> = tracker.modules().map(|module| module.name()).collect();
        assert_eq!(modules, ["pkg"]);
    }

    #[test]
    fn run_finished_mid_test_leaves_module_open() {
        let mut tracker = Tracker::new();
        let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-05-01T10:00:00.500Z").unwrap();

        tracker.on_run_started(start);
        tracker.on_test_run("pkg", "TestA").unwrap();

        let summary = tracker.on_run_finished(end, None);
        assert_eq!(tracker.module("pkg").unwrap().status(), ModuleStatus::Running);
        assert_eq!(
            tracker.test("pkg", "TestA").unwrap().state(),
            Some(TestState::Running)
        );
        assert_eq!(
            summary.modules,
            OutcomeCounts {
                failed: 0,
                skipped: 1,
                passed: 0,
                total: 1,
            }
        );
        assert_eq!(summary.tests.total, 1);
    }

    #[test]
    fn run_finished_closes_open_modules() {
        let mut tracker = Tracker::new();
        let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-05-01T10:00:01.200Z").unwrap();

        tracker.on_run_started(start);
        tracker.on_test_run("pkg/a", "TestA").unwrap();
        tracker.on_test_passed("pkg/a", "TestA").unwrap();
        tracker.on_test_run("pkg/b", "TestB").unwrap();
        tracker.on_test_failed("pkg/b", "TestB").unwrap();

        let summary = tracker.on_run_finished(end, None);
        assert_eq!(
            tracker.module("pkg/a").unwrap().status(),
            ModuleStatus::Finished(ModuleOutcome::Passed)
        );
        assert_eq!(
            tracker.module("pkg/b").unwrap().status(),
            ModuleStatus::Finished(ModuleOutcome::Failed)
        );
        assert_eq!(
            summary,
            RunSummary {
                modules: OutcomeCounts {
                    failed: 1,
                    skipped: 0,
                    passed: 1,
                    total: 2,
                },
                tests: OutcomeCounts {
                    failed: 1,
                    skipped: 0,
                    passed: 1,
                    total: 2,
                },
                duration: Duration::from_millis(1200),
            }
        );
    }

    #[test]
    fn summary_counts() {
        let mut tracker = Tracker::new();
        tracker.on_test_run("skips", "TestA").unwrap();
        tracker.on_test_skipped("skips", "TestA").unwrap();
        tracker.on_module_passed("skips").unwrap();
        tracker.on_test_run("pkg", "TestB").unwrap();
        tracker.on_test_output("pkg", "TestC", "bare output\n");

        let summary = tracker.summary();
        // The running test only counts towards the total.
        assert_eq!(
            summary.tests,
            OutcomeCounts {
                failed: 0,
                skipped: 1,
                passed: 0,
                total: 2,
            }
        );
        assert_eq!(
            summary.modules,
            OutcomeCounts {
                failed: 0,
                skipped: 2,
                passed: 0,
                total: 2,
            }
        );
    }

    #[test]
    fn reported_elapsed_wins() {
        let mut tracker = Tracker::new();
        let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-05-01T10:00:05Z").unwrap();
        tracker.record_timestamp(start);
        tracker.record_timestamp(end);
        assert_eq!(tracker.elapsed(), Duration::from_secs(5));

        let summary = tracker.on_run_finished(end, Some(Duration::from_millis(2500)));
        assert_eq!(summary.duration, Duration::from_millis(2500));
    }
}
