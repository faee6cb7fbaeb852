// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{ExpectedError, Result};
use std::io::BufRead;
use testdeck_runner::{
    errors::DisplayErrorChain,
    events::parse_event_line,
    reporter::Reporter,
    terminal::Terminal,
    tracker::RunSummary,
};
use tracing::{debug, warn};

/// Feeds every event in `reader` to `reporter`, then finishes the run.
///
/// Lines that fail to parse are logged and skipped. Events the tracker rejects are drawn as an
/// error indicator by the reporter and otherwise ignored.
pub(super) fn run_events<R: BufRead, T: Terminal>(
    reader: R,
    input: &str,
    reporter: &mut Reporter<T>,
) -> Result<RunSummary> {
    let mut event_count = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|err| ExpectedError::InputReadError {
            input: input.to_owned(),
            line_number,
            err,
        })?;

        let event = match parse_event_line(&line, line_number) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(error) => {
                warn!("skipping event: {}", DisplayErrorChain::new(&error));
                continue;
            }
        };
        event_count += 1;

        match reporter.report_event(&event) {
            Ok(()) => {}
            Err(error) if !error.is_fatal() => {}
            Err(error) => return Err(ExpectedError::from_report_event_error(error)),
        }
    }

    debug!(event_count, "input exhausted");
    reporter
        .finish()
        .map_err(ExpectedError::from_report_event_error)
}
