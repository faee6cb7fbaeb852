// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::TestState;
use std::time::Duration;

/// Counts of outcomes for a group of modules or tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OutcomeCounts {
    /// The number that failed.
    pub failed: usize,

    /// The number that were skipped.
    pub skipped: usize,

    /// The number that passed.
    pub passed: usize,

    /// The total number, including those still running.
    pub total: usize,
}

impl OutcomeCounts {
    pub(super) fn add(&mut self, state: TestState) {
        match state {
            TestState::Running => {}
            TestState::Passed => self.passed += 1,
            TestState::Failed => self.failed += 1,
            TestState::Skipped => self.skipped += 1,
        }
        self.total += 1;
    }

    /// Returns true if anything failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// A summary of a test run, computed from the tracker's state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// Module counts.
    pub modules: OutcomeCounts,

    /// Test counts.
    pub tests: OutcomeCounts,

    /// The elapsed time of the run.
    pub duration: Duration,
}

impl RunSummary {
    /// Returns true if any module or test failed.
    pub fn has_failures(&self) -> bool {
        self.modules.has_failures() || self.tests.has_failures()
    }
}
