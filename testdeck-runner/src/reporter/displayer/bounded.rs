// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering for terminals with a fixed number of lines.
//!
//! A test name may span several lines. At most `height` of them are printed while the test
//! runs, followed by an ellipsis if any were held back; the rest are revealed once the test
//! finishes.

use crate::{
    helpers::text_width,
    reporter::helpers::{GLYPH_WIDTH, HOURGLASS, test_glyph},
    terminal::Terminal,
    tracker::TestState,
};
use std::{io, num::NonZeroUsize};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Width of the hourglass plus the space after it.
const PREFIX_WIDTH: usize = GLYPH_WIDTH + 1;

/// How a (decoded) test name is laid out in a bounded viewport.
#[derive(Debug)]
struct NameBlock<'a> {
    lines: Vec<&'a str>,
    printed: usize,
}

impl<'a> NameBlock<'a> {
    fn new(name: &'a str, height: NonZeroUsize) -> Self {
        let lines: Vec<&str> = name.split('\n').collect();
        let printed = lines.len().min(height.get());
        Self { lines, printed }
    }

    fn is_truncated(&self) -> bool {
        self.lines.len() > self.printed
    }

    fn printed_lines(&self) -> &[&'a str] {
        &self.lines[..self.printed]
    }

    fn remaining_lines(&self) -> &[&'a str] {
        &self.lines[self.printed..]
    }

    fn last_printed_width(&self) -> usize {
        // split always yields at least one line, and height is nonzero.
        self.printed_lines().last().map_or(0, |line| text_width(line))
    }
}

pub(super) fn write_test_started<T: Terminal>(
    terminal: &mut T,
    module_header: Option<&str>,
    name: &str,
    height: NonZeroUsize,
) -> io::Result<()> {
    if let Some(module) = module_header {
        terminal.print(&format!("\n{module}"))?;
    }

    let block = NameBlock::new(name, height);
    let mut text = format!("{HOURGLASS} {}", block.printed_lines().join("\n"));
    if block.is_truncated() {
        text.push_str(ELLIPSIS);
    }
    terminal.print("\n")?;
    terminal.print(&text)?;
    if block.is_truncated() {
        // Rest below the block, so that moving up by the full height reaches its first line.
        terminal.print("\n")?;
    }
    Ok(())
}

pub(super) fn write_test_finished<T: Terminal>(
    terminal: &mut T,
    name: &str,
    height: NonZeroUsize,
    state: TestState,
    failure_output: Option<&str>,
) -> io::Result<()> {
    let block = NameBlock::new(name, height);
    let truncated = block.is_truncated();
    let suffix_width = if truncated { ELLIPSIS_WIDTH } else { 0 };
    let last_width = block.last_printed_width();

    // For a continuation line, or when resting below a truncated block, this overshoots the
    // start of the line; the terminal stops the cursor at the first column.
    terminal.move_left(suffix_width + last_width + PREFIX_WIDTH)?;
    // A truncated block printed exactly `height` lines and the cursor rests on the line after.
    let up = if truncated {
        height.get()
    } else {
        block.printed - 1
    };
    if up > 0 {
        terminal.move_up(up)?;
    }

    let glyph = test_glyph(state);
    if truncated {
        terminal.print(&format!(
            "{glyph} {}{}\n{}",
            block.printed_lines().join("\n"),
            " ".repeat(ELLIPSIS_WIDTH),
            block.remaining_lines().join("\n"),
        ))?;
    } else {
        terminal.print(glyph)?;
        let down = block.printed - 1;
        if down > 0 {
            terminal.move_down(down)?;
        }
        // Continuation lines are printed without the prefix.
        let end_column = if block.printed == 1 {
            PREFIX_WIDTH + last_width
        } else {
            last_width
        };
        let right = end_column.saturating_sub(GLYPH_WIDTH);
        if right > 0 {
            terminal.move_right(right)?;
        }
    }

    if let Some(output) = failure_output {
        terminal.print(&format!("\n{output}"))?;
    }
    Ok(())
}
