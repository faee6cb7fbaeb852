// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The terminal port that renderers draw through.
//!
//! Renderers only ever print text and move the cursor relative to its current position, so
//! the port is small: [`AnsiTerminal`] emits the corresponding ANSI sequences through
//! crossterm, and [`BufferTerminal`] records the operations for tests.

use crossterm::{
    cursor::{MoveDown, MoveLeft, MoveRight, MoveTo, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    fmt,
    io::{self, IsTerminal, Write},
    num::NonZeroUsize,
};

/// The usable height of the terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ViewportHeight {
    /// The terminal is effectively infinitely tall.
    Unbounded,

    /// The terminal has a fixed number of lines.
    Bounded(NonZeroUsize),
}

impl ViewportHeight {
    /// Detects the height of the terminal attached to standard output.
    ///
    /// Returns [`ViewportHeight::Unbounded`] if standard output is not a terminal, or if its
    /// size cannot be determined.
    pub fn detect() -> Self {
        if !io::stdout().is_terminal() {
            return Self::Unbounded;
        }
        match crossterm::terminal::size() {
            Ok((_, rows)) => match NonZeroUsize::new(usize::from(rows)) {
                Some(rows) => Self::Bounded(rows),
                None => Self::Unbounded,
            },
            Err(error) => {
                tracing::debug!("unable to determine terminal size: {error}");
                Self::Unbounded
            }
        }
    }
}

impl fmt::Display for ViewportHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Bounded(lines) => write!(f, "{lines} lines"),
        }
    }
}

/// A terminal that can print text and move the cursor relatively.
pub trait Terminal {
    /// Prints text at the current cursor position.
    fn print(&mut self, text: &str) -> io::Result<()>;

    /// Moves the cursor `n` cells to the left.
    fn move_left(&mut self, n: usize) -> io::Result<()>;

    /// Moves the cursor `n` cells to the right.
    fn move_right(&mut self, n: usize) -> io::Result<()>;

    /// Moves the cursor `n` lines up.
    fn move_up(&mut self, n: usize) -> io::Result<()>;

    /// Moves the cursor `n` lines down.
    fn move_down(&mut self, n: usize) -> io::Result<()>;

    /// Erases the entire screen and moves the cursor to the top left.
    fn erase_screen(&mut self) -> io::Result<()>;

    /// The usable height of this terminal.
    fn height(&self) -> ViewportHeight;

    /// Flushes any buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

/// A [`Terminal`] that writes ANSI escape sequences to a writer.
#[derive(Debug)]
pub struct AnsiTerminal<W> {
    writer: W,
    height: ViewportHeight,
}

impl<W: Write> AnsiTerminal<W> {
    /// Creates a new terminal writing to `writer`.
    pub fn new(writer: W, height: ViewportHeight) -> Self {
        Self { writer, height }
    }

    /// Consumes the terminal, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

// crossterm clamps a move of 0 to 1, so zero-distance moves are never written.
fn cells(n: usize) -> Option<u16> {
    (n > 0).then(|| u16::try_from(n).unwrap_or(u16::MAX))
}

impl<W: Write> Terminal for AnsiTerminal<W> {
    fn print(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, Print(text))
    }

    fn move_left(&mut self, n: usize) -> io::Result<()> {
        match cells(n) {
            Some(n) => queue!(self.writer, MoveLeft(n)),
            None => Ok(()),
        }
    }

    fn move_right(&mut self, n: usize) -> io::Result<()> {
        match cells(n) {
            Some(n) => queue!(self.writer, MoveRight(n)),
            None => Ok(()),
        }
    }

    fn move_up(&mut self, n: usize) -> io::Result<()> {
        match cells(n) {
            Some(n) => queue!(self.writer, MoveUp(n)),
            None => Ok(()),
        }
    }

    fn move_down(&mut self, n: usize) -> io::Result<()> {
        match cells(n) {
            Some(n) => queue!(self.writer, MoveDown(n)),
            None => Ok(()),
        }
    }

    fn erase_screen(&mut self) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn height(&self) -> ViewportHeight {
        self.height
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A single operation recorded by a [`BufferTerminal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TerminalOp {
    /// Text was printed.
    Print(String),
    /// The cursor moved left.
    MoveLeft(usize),
    /// The cursor moved right.
    MoveRight(usize),
    /// The cursor moved up.
    MoveUp(usize),
    /// The cursor moved down.
    MoveDown(usize),
    /// The screen was erased.
    EraseScreen,
}

/// A [`Terminal`] that records every operation in memory.
///
/// Used to test renderers.
#[derive(Clone, Debug)]
pub struct BufferTerminal {
    ops: Vec<TerminalOp>,
    height: ViewportHeight,
}

impl BufferTerminal {
    /// Creates a new, empty buffer with the given height.
    pub fn new(height: ViewportHeight) -> Self {
        Self {
            ops: Vec::new(),
            height,
        }
    }

    /// The operations recorded so far.
    pub fn ops(&self) -> &[TerminalOp] {
        &self.ops
    }

    /// Removes and returns the operations recorded so far.
    pub fn take_ops(&mut self) -> Vec<TerminalOp> {
        std::mem::take(&mut self.ops)
    }

    /// The concatenation of all printed text, ignoring cursor movement.
    pub fn printed(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TerminalOp::Print(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replays the recorded operations onto a grid of cells and returns its rows, with
    /// trailing spaces trimmed.
    ///
    /// Every character takes one cell, matching the cursor arithmetic of the renderers. Moves
    /// stop at the first row and column, and the grid grows downwards instead of scrolling.
    pub fn screen(&self) -> Vec<String> {
        let mut rows: Vec<Vec<char>> = vec![Vec::new()];
        let (mut row, mut col) = (0usize, 0usize);

        for op in &self.ops {
            match op {
                TerminalOp::Print(text) => {
                    for c in text.chars() {
                        if c == '\n' {
                            row += 1;
                            col = 0;
                            continue;
                        }
                        if rows.len() <= row {
                            rows.resize_with(row + 1, Vec::new);
                        }
                        let line = &mut rows[row];
                        if line.len() <= col {
                            line.resize(col + 1, ' ');
                        }
                        line[col] = c;
                        col += 1;
                    }
                }
                TerminalOp::MoveLeft(n) => col = col.saturating_sub(*n),
                TerminalOp::MoveRight(n) => col += n,
                TerminalOp::MoveUp(n) => row = row.saturating_sub(*n),
                TerminalOp::MoveDown(n) => row += n,
                TerminalOp::EraseScreen => {
                    rows = vec![Vec::new()];
                    (row, col) = (0, 0);
                }
            }
        }

        rows.into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_owned())
            .collect()
    }
}

impl Terminal for BufferTerminal {
    fn print(&mut self, text: &str) -> io::Result<()> {
        self.ops.push(TerminalOp::Print(text.to_owned()));
        Ok(())
    }

    fn move_left(&mut self, n: usize) -> io::Result<()> {
        self.ops.push(TerminalOp::MoveLeft(n));
        Ok(())
    }

    fn move_right(&mut self, n: usize) -> io::Result<()> {
        self.ops.push(TerminalOp::MoveRight(n));
        Ok(())
    }

    fn move_up(&mut self, n: usize) -> io::Result<()> {
        self.ops.push(TerminalOp::MoveUp(n));
        Ok(())
    }

    fn move_down(&mut self, n: usize) -> io::Result<()> {
        self.ops.push(TerminalOp::MoveDown(n));
        Ok(())
    }

    fn erase_screen(&mut self) -> io::Result<()> {
        self.ops.push(TerminalOp::EraseScreen);
        Ok(())
    }

    fn height(&self) -> ViewportHeight {
        self.height
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
