// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of transport-safe sentinel tokens in test identifiers.
//!
//! Event sources may not be able to carry literal whitespace inside a test identifier, so
//! spaces, newlines and tabs can arrive as visible placeholder characters instead.

use std::borrow::Cow;

/// Placeholder for a literal space (`␣`).
pub const SPACE_SENTINEL: char = '\u{2423}';

/// Placeholder for a literal newline (`␤`).
pub const NEWLINE_SENTINEL: char = '\u{2424}';

/// Placeholder for a literal tab (`␉`).
pub const TAB_SENTINEL: char = '\u{2409}';

fn decode_char(c: char) -> char {
    match c {
        SPACE_SENTINEL => ' ',
        NEWLINE_SENTINEL => '\n',
        TAB_SENTINEL => '\t',
        other => other,
    }
}

fn is_sentinel(c: char) -> bool {
    matches!(c, SPACE_SENTINEL | NEWLINE_SENTINEL | TAB_SENTINEL)
}

/// Replaces every sentinel token in `text` with the character it stands for.
///
/// Borrows the input if it contains no sentinels.
pub fn decode_sentinels(text: &str) -> Cow<'_, str> {
    if text.contains(is_sentinel) {
        Cow::Owned(text.chars().map(decode_char).collect())
    } else {
        Cow::Borrowed(text)
    }
}
