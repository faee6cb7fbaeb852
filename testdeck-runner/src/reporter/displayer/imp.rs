// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    bounded,
    formatters::{CLOSING_LINE, format_summary},
    unbounded,
};
use crate::{
    reporter::helpers::{ERROR_INDICATOR, Styles},
    sentinel::decode_sentinels,
    terminal::{Terminal, ViewportHeight},
    tracker::{RunSummary, TestRecord, TestState, Tracker},
};
use std::{io, num::NonZeroUsize};

/// The rendering strategy, chosen once from the terminal's height.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DisplayStrategy {
    Unbounded,
    Bounded(NonZeroUsize),
}

impl DisplayStrategy {
    pub(crate) fn new(height: ViewportHeight) -> Self {
        match height {
            ViewportHeight::Unbounded => Self::Unbounded,
            ViewportHeight::Bounded(height) => Self::Bounded(height),
        }
    }
}

#[derive(Debug)]
pub(crate) struct DisplayReporterBuilder {
    pub(crate) height: ViewportHeight,
    pub(crate) should_colorize: bool,
    pub(crate) show_failure_output: bool,
}

impl DisplayReporterBuilder {
    pub(crate) fn build(self) -> DisplayReporter {
        let mut styles = Styles::default();
        if self.should_colorize {
            styles.colorize();
        }
        DisplayReporter {
            strategy: DisplayStrategy::new(self.height),
            styles,
            show_failure_output: self.show_failure_output,
        }
    }
}

/// Turns tracker state changes into terminal operations.
#[derive(Debug)]
pub(crate) struct DisplayReporter {
    strategy: DisplayStrategy,
    styles: Styles,
    show_failure_output: bool,
}

impl DisplayReporter {
    pub(crate) fn strategy(&self) -> DisplayStrategy {
        self.strategy
    }

    pub(crate) fn write_test_started<T: Terminal>(
        &self,
        terminal: &mut T,
        test: &TestRecord,
        first_in_module: bool,
    ) -> io::Result<()> {
        let module_header = first_in_module.then(|| test.module_name());
        let name = decode_sentinels(test.name());
        match self.strategy {
            DisplayStrategy::Unbounded => {
                unbounded::write_test_started(terminal, module_header, &name)
            }
            DisplayStrategy::Bounded(height) => {
                bounded::write_test_started(terminal, module_header, &name, height)
            }
        }
    }

    pub(crate) fn write_test_finished<T: Terminal>(
        &self,
        terminal: &mut T,
        test: &TestRecord,
    ) -> io::Result<()> {
        let Some(state) = test.state() else {
            return Ok(());
        };
        let failure_output = self.failure_output(test, state);
        match self.strategy {
            DisplayStrategy::Unbounded => {
                unbounded::write_test_finished(terminal, state, failure_output.as_deref())
            }
            DisplayStrategy::Bounded(height) => bounded::write_test_finished(
                terminal,
                &decode_sentinels(test.name()),
                height,
                state,
                failure_output.as_deref(),
            ),
        }
    }

    pub(crate) fn write_module_finished<T: Terminal>(
        &self,
        terminal: &mut T,
        tracker: &Tracker,
    ) -> io::Result<()> {
        match self.strategy {
            DisplayStrategy::Unbounded => unbounded::write_all_modules(terminal, tracker),
            // Earlier lines may have scrolled out of a bounded viewport.
            DisplayStrategy::Bounded(_) => Ok(()),
        }
    }

    pub(crate) fn write_summary<T: Terminal>(
        &self,
        terminal: &mut T,
        summary: &RunSummary,
    ) -> io::Result<()> {
        terminal.print(&format!(
            "\n{}\n{CLOSING_LINE}\n",
            format_summary(summary, &self.styles)
        ))
    }

    pub(crate) fn write_error<T: Terminal>(&self, terminal: &mut T) -> io::Result<()> {
        terminal.print(ERROR_INDICATOR)
    }

    fn failure_output(&self, test: &TestRecord, state: TestState) -> Option<String> {
        if !self.show_failure_output || state != TestState::Failed {
            return None;
        }
        let output = test.genuine_output();
        (!output.is_empty()).then_some(output)
    }
}
