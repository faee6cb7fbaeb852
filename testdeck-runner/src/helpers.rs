// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for testdeck-runner.

use unicode_width::UnicodeWidthChar;

/// Utilities for pluralizing various words based on count.
pub(crate) mod plural {
    /// Returns "module" if `count` is 1, otherwise "modules".
    pub(crate) fn modules_str(count: usize) -> &'static str {
        if count == 1 { "module" } else { "modules" }
    }

    /// Returns "test" if `count` is 1, otherwise "tests".
    pub(crate) fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }
}

/// Returns the number of terminal cells `text` occupies.
pub(crate) fn text_width(text: &str) -> usize {
    // The width of a string may differ from the sum of the widths of its characters, but
    // the sum is what cursor movement is computed from.
    strip_ansi_escapes::strip_str(text)
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum()
}
