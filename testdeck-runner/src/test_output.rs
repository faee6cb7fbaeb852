// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconstruction of the output a test genuinely produced.
//!
//! The raw output recorded for a test can contain an echo of the test's own identifier,
//! printed by whatever ran the test rather than by the test itself. The echo may be split
//! across fragment boundaries in any way, and the fragments that carry it may also carry
//! some unrelated text. [`genuine_output`] removes the smallest run of whole fragments that
//! still contains the identifier and returns the rest.

use crate::sentinel::decode_sentinels;
use std::ops::{Range, RangeInclusive};

/// Returns the output of a test with the echo of `identifier` removed.
///
/// `identifier` may contain sentinel tokens; they are decoded before matching, as is the
/// text of the fragments. The returned text is the raw concatenation of the fragments that
/// were kept, in their original order.
pub fn genuine_output(fragments: &[String], identifier: &str) -> String {
    match echo_range(fragments, identifier) {
        Some(range) => {
            let (first, last) = range.into_inner();
            let mut out = fragments[..first].concat();
            out.push_str(&fragments[last + 1..].concat());
            out
        }
        None => fragments.concat(),
    }
}

/// Finds the minimal range of fragments whose concatenation contains `identifier`.
///
/// Returns `None` if the full concatenation doesn't contain it.
pub fn echo_range(fragments: &[String], identifier: &str) -> Option<RangeInclusive<usize>> {
    let identifier = decode_sentinels(identifier);
    if identifier.is_empty() || fragments.is_empty() {
        return None;
    }

    let contains = |range: Range<usize>| {
        let joined = fragments[range].concat();
        decode_sentinels(&joined).contains(identifier.as_ref())
    };

    if !contains(0..fragments.len()) {
        return None;
    }

    let mut first = 0;
    let mut last = fragments.len() - 1;
    while first < last {
        let without_last = contains(first..last);
        let without_first = contains(first + 1..last + 1);
        match (without_last, without_first) {
            (false, false) => break,
            // Only the last fragment is needed to keep the match: narrow from the left.
            (false, true) => first += 1,
            _ => last -= 1,
        }
    }

    Some(first..=last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::sample::Index;
    use test_strategy::proptest;

    fn fragments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn fragments_spelling_the_identifier_are_removed() {
        let mut output = fragments(&["Some tes", "t name"]);
        assert_eq!(echo_range(&output, "Some test name"), Some(0..=1));
        assert_eq!(genuine_output(&output, "Some test name"), "");

        output.push("output that should be printed".to_owned());
        assert_eq!(echo_range(&output, "Some test name"), Some(0..=1));
        assert_eq!(
            genuine_output(&output, "Some test name"),
            "output that should be printed"
        );
    }

    #[test]
    fn identifier_with_sentinels() {
        let output = fragments(&["=== RUN   Some tes", "t name\n", "hello\n"]);
        assert_eq!(genuine_output(&output, "Some␣test␣name"), "hello\n");
    }

    #[test]
    fn sentinels_in_output_are_decoded_before_matching() {
        let output = fragments(&["Parent/Multiline␤", "test name", "boom\n"]);
        assert_eq!(
            genuine_output(&output, "Parent/Multiline\ntest name"),
            "boom\n"
        );
    }

    #[test]
    fn output_without_echo_is_kept() {
        let output = fragments(&["first\n", "second\n"]);
        assert_eq!(echo_range(&output, "TestA"), None);
        assert_eq!(genuine_output(&output, "TestA"), "first\nsecond\n");
    }

    #[test]
    fn echo_in_the_middle() {
        let output = fragments(&["before\n", "Tes", "tA", "\n", "after\n"]);
        assert_eq!(echo_range(&output, "TestA"), Some(1..=2));
        assert_eq!(genuine_output(&output, "TestA"), "before\n\nafter\n");
    }

    #[test]
    fn fragment_sharing_echo_and_output_is_removed_whole() {
        let output = fragments(&["log line TestA", " more\n"]);
        assert_eq!(genuine_output(&output, "TestA"), " more\n");
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(genuine_output(&[], "TestA"), "");
        assert_eq!(genuine_output(&fragments(&["x"]), ""), "x");
    }

    /// Splitting genuine output plus an identifier echo at arbitrary fragment boundaries
    /// always reconstructs the same genuine output.
    #[proptest]
    fn echo_is_stripped_for_any_split(
        #[strategy("[a-z]{1,16}")] identifier: String,
        #[strategy("[0-9 \n]{0,16}")] before: String,
        #[strategy("[0-9 \n]{0,16}")] after: String,
        #[strategy(proptest::collection::vec(proptest::arbitrary::any::<Index>(), 0..5))]
        splits: Vec<Index>,
    ) {
        let mut points: Vec<usize> = splits
            .iter()
            .map(|index| index.index(identifier.len() + 1))
            .collect();
        points.sort_unstable();

        let mut output = Vec::new();
        if !before.is_empty() {
            output.push(before.clone());
        }
        let mut start = 0;
        for point in points {
            output.push(identifier[start..point].to_owned());
            start = point;
        }
        output.push(identifier[start..].to_owned());
        if !after.is_empty() {
            output.push(after.clone());
        }

        let genuine = genuine_output(&output, &identifier);
        assert_eq!(genuine, format!("{before}{after}"));
        assert!(!genuine.contains(&identifier));
    }
}
