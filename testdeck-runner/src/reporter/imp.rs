// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes test events to the tracker and the displayer.
//!
//! The main structure in this module is [`Reporter`].

use super::displayer::{DisplayReporter, DisplayReporterBuilder};
use crate::{
    errors::ReportEventError,
    events::{TestEvent, TestEventKind},
    terminal::Terminal,
    tracker::{RunSummary, TestStart, Tracker},
};
use tracing::{debug, warn};

/// Reporter builder.
#[derive(Debug)]
pub struct ReporterBuilder {
    should_colorize: bool,
    show_failure_output: bool,
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self {
            should_colorize: false,
            show_failure_output: true,
        }
    }
}

impl ReporterBuilder {
    /// Set to true if the reporter should colorize output.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Sets whether the genuine output of failed tests is printed.
    pub fn set_show_failure_output(&mut self, show_failure_output: bool) -> &mut Self {
        self.show_failure_output = show_failure_output;
        self
    }

    /// Creates a new reporter drawing to `terminal`.
    ///
    /// The rendering strategy is chosen once, from the terminal's height.
    pub fn build<T: Terminal>(&self, terminal: T) -> Reporter<T> {
        let display_reporter = DisplayReporterBuilder {
            height: terminal.height(),
            should_colorize: self.should_colorize,
            show_failure_output: self.show_failure_output,
        }
        .build();
        debug!(strategy = ?display_reporter.strategy(), "reporter created");

        Reporter {
            tracker: Tracker::new(),
            terminal,
            display_reporter,
            summary: None,
        }
    }
}

/// Applies test events to a [`Tracker`] and renders the resulting changes to a terminal.
#[derive(Debug)]
pub struct Reporter<T> {
    tracker: Tracker,
    terminal: T,
    display_reporter: DisplayReporter,
    summary: Option<RunSummary>,
}

impl<T: Terminal> Reporter<T> {
    /// Reports a test event.
    ///
    /// If the tracker rejects the event, the error indicator is rendered and
    /// [`ReportEventError::Rejected`] is returned; the caller may carry on with the next event.
    pub fn report_event(&mut self, event: &TestEvent) -> Result<(), ReportEventError> {
        self.tracker.record_timestamp(event.timestamp);

        let result = match self.apply_event(event) {
            Err(ReportEventError::Rejected(error)) => {
                warn!("{error}");
                self.display_reporter
                    .write_error(&mut self.terminal)
                    .map_err(ReportEventError::Io)?;
                Err(ReportEventError::Rejected(error))
            }
            other => other,
        };
        self.terminal.flush().map_err(ReportEventError::Io)?;
        result
    }

    /// Marks the reporter done, printing the summary if no run-finish event was seen.
    pub fn finish(&mut self) -> Result<RunSummary, ReportEventError> {
        if let Some(summary) = self.summary {
            return Ok(summary);
        }

        debug!("event stream ended before the run finished");
        let summary = match self.tracker.last_event_at() {
            Some(timestamp) => self.tracker.on_run_finished(timestamp, None),
            None => self.tracker.summary(),
        };
        self.write_summary(summary)?;
        self.terminal.flush().map_err(ReportEventError::Io)?;
        Ok(summary)
    }

    /// The tracker holding the state of the run.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The summary of the run, once it has finished.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// The terminal this reporter draws to.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Returns a mutable reference to the terminal this reporter draws to.
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Consumes the reporter, returning the terminal.
    pub fn into_terminal(self) -> T {
        self.terminal
    }

    // ---
    // Helper methods
    // ---

    fn apply_event(&mut self, event: &TestEvent) -> Result<(), ReportEventError> {
        match &event.kind {
            TestEventKind::RunStarted => {
                self.tracker.on_run_started(event.timestamp);
            }
            TestEventKind::RunFinished { elapsed } => {
                if self.summary.is_some() {
                    debug!("ignoring repeated run-finish event");
                    return Ok(());
                }
                let summary = self.tracker.on_run_finished(event.timestamp, *elapsed);
                self.write_summary(summary)?;
            }
            TestEventKind::ModuleStarted { module } => {
                self.tracker.on_module_started(module);
            }
            TestEventKind::ModuleFinished {
                module, outcome, ..
            } => {
                if self.tracker.on_module_finished(module, *outcome)? {
                    self.display_reporter
                        .write_module_finished(&mut self.terminal, &self.tracker)
                        .map_err(ReportEventError::Io)?;
                }
            }
            TestEventKind::ModuleNoTests { module } => {
                self.tracker.on_module_no_tests(module)?;
            }
            TestEventKind::TestStarted { module, test } => {
                if let TestStart::Started { first_in_module } =
                    self.tracker.on_test_run(module, test)?
                {
                    let record = self
                        .tracker
                        .test(module, test)
                        .ok_or_else(|| inconsistent(module, test))?;
                    self.display_reporter
                        .write_test_started(&mut self.terminal, record, first_in_module)
                        .map_err(ReportEventError::Io)?;
                }
            }
            TestEventKind::TestFinished {
                module,
                test,
                outcome,
                elapsed,
            } => {
                if self
                    .tracker
                    .on_test_finished(module, test, *outcome, *elapsed)?
                {
                    let record = self
                        .tracker
                        .test(module, test)
                        .ok_or_else(|| inconsistent(module, test))?;
                    self.display_reporter
                        .write_test_finished(&mut self.terminal, record)
                        .map_err(ReportEventError::Io)?;
                }
            }
            TestEventKind::TestOutput {
                module,
                test,
                output,
            } => {
                self.tracker.on_test_output(module, test, output.as_str());
            }
        }
        Ok(())
    }

    fn write_summary(&mut self, summary: RunSummary) -> Result<(), ReportEventError> {
        self.summary = Some(summary);
        self.display_reporter
            .write_summary(&mut self.terminal, &summary)
            .map_err(ReportEventError::Io)
    }
}

fn inconsistent(module: &str, test: &str) -> ReportEventError {
    ReportEventError::Inconsistent {
        module: module.to_owned(),
        test: test.to_owned(),
    }
}
