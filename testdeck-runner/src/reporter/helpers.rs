// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::tracker::{ModuleOutcome, TestState};
use owo_colors::Style;

/// Shown while a test is running.
pub(super) const HOURGLASS: &str = "⏳";
/// Shown for a test or module that passed.
pub(super) const PASS_GLYPH: &str = "✅";
/// Shown for a test or module that failed.
pub(super) const FAIL_GLYPH: &str = "❌";
/// Shown for a skipped test.
pub(super) const SKIP_GLYPH: &str = "⏩";

/// Printed whenever an event is rejected.
pub(super) const ERROR_INDICATOR: &str = "\n\n❗ Error.";

/// The number of cells every status glyph occupies in cursor arithmetic.
pub(super) const GLYPH_WIDTH: usize = 1;

pub(super) fn test_glyph(state: TestState) -> &'static str {
    match state {
        TestState::Running => HOURGLASS,
        TestState::Passed => PASS_GLYPH,
        TestState::Failed => FAIL_GLYPH,
        TestState::Skipped => SKIP_GLYPH,
    }
}

pub(super) fn module_glyph(outcome: ModuleOutcome) -> &'static str {
    match outcome {
        ModuleOutcome::Passed => PASS_GLYPH,
        ModuleOutcome::Failed => FAIL_GLYPH,
    }
}

#[derive(Debug, Default, Clone)]
pub(super) struct Styles {
    pub(super) label: Style,
    pub(super) pass: Style,
    pub(super) fail: Style,
    pub(super) skip: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.label = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
    }
}
