// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testdeck.

use crate::{
    events::ActionKind,
    tracker::{ModuleOutcome, TestState},
};
use camino::{FromPathBufError, Utf8PathBuf};
use std::{error::Error as StdError, fmt};
use thiserror::Error;

/// An event was rejected by the [`Tracker`](crate::tracker::Tracker) because it does not fit
/// the current lifecycle of the module or test it refers to.
///
/// Rejections leave the tracker's state untouched: processing of later events continues
/// normally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackerError {
    /// A terminal event referred to a test that was never seen.
    #[error("test `{test}` in module `{module}` has not been started")]
    UnknownTest {
        /// The module name.
        module: String,

        /// The test name.
        test: String,
    },

    /// A terminal event referred to a test that is not currently running.
    #[error(
        "test `{test}` in module `{module}` is not running (current state: {})",
        DisplayOptionalState(*state)
    )]
    TestNotRunning {
        /// The module name.
        module: String,

        /// The test name.
        test: String,

        /// The state the test is in, or `None` if only output was recorded for it.
        state: Option<TestState>,
    },

    /// A test was started while another test was still running.
    #[error(
        "cannot start test `{test}` in module `{module}`: \
         test `{running_test}` in module `{running_module}` is still running"
    )]
    AnotherTestRunning {
        /// The module of the test that was about to start.
        module: String,

        /// The test that was about to start.
        test: String,

        /// The module of the test that is currently running.
        running_module: String,

        /// The test that is currently running.
        running_test: String,
    },

    /// A module-level event referred to a module that was never seen.
    #[error("module `{module}` is not known")]
    UnknownModule {
        /// The module name.
        module: String,
    },

    /// A module was reported as passed, but none of its tests passed or were skipped.
    #[error("module `{module}` cannot pass: none of its tests passed or were skipped")]
    ModulePassWithoutSuccess {
        /// The module name.
        module: String,
    },

    /// A module was reported as failed, but none of its tests failed.
    #[error("module `{module}` cannot fail: none of its tests failed")]
    ModuleFailWithoutFailure {
        /// The module name.
        module: String,
    },

    /// A module that already finished was reported with a different outcome.
    #[error("module `{module}` already finished as {outcome}")]
    ModuleAlreadyFinished {
        /// The module name.
        module: String,

        /// The outcome the module finished with.
        outcome: ModuleOutcome,
    },

    /// A "no tests found" correction arrived for a module that has tests.
    #[error("module `{module}` was reported as having no tests, but {test_count} were seen")]
    ModuleHasTests {
        /// The module name.
        module: String,

        /// The number of tests recorded for the module.
        test_count: usize,
    },
}

struct DisplayOptionalState(Option<TestState>);

impl fmt::Display for DisplayOptionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(state) => write!(f, "{state}"),
            None => write!(f, "output only"),
        }
    }
}

/// An error that occurred while parsing a line of the wire event stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EventParseError {
    /// The line was not a valid JSON event object.
    #[error("line {line_number}: invalid event")]
    Json {
        /// The 1-based line number.
        line_number: usize,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// A field required by the event's action was missing.
    #[error("line {line_number}: `{action}` event is missing the `{field}` field")]
    MissingField {
        /// The 1-based line number.
        line_number: usize,

        /// The action of the event.
        action: ActionKind,

        /// The name of the missing field.
        field: &'static str,
    },

    /// The `elapsed` field could not be converted to a duration.
    #[error("line {line_number}: invalid elapsed value {elapsed}")]
    InvalidElapsed {
        /// The 1-based line number.
        line_number: usize,

        /// The value that was provided.
        elapsed: f64,
    },
}

/// An error that occurred while reporting an event.
#[derive(Debug, Error)]
pub enum ReportEventError {
    /// The tracker rejected the event. The error indicator has been rendered.
    #[error("event rejected")]
    Rejected(#[from] TrackerError),

    /// A test that the tracker just accepted an event for could not be found again.
    ///
    /// This indicates a bug in the tracker.
    #[error("tracker lost test `{test}` in module `{module}`")]
    Inconsistent {
        /// The module name.
        module: String,

        /// The test name.
        test: String,
    },

    /// An error occurred while writing to the terminal.
    #[error("error writing to terminal")]
    Io(#[source] std::io::Error),
}

impl ReportEventError {
    /// Returns true if processing of further events must stop.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Rejected(_) => false,
            Self::Inconsistent { .. } | Self::Io(_) => true,
        }
    }
}

/// Error returned while parsing a
/// [`ViewportHeightSetting`](crate::user_config::ViewportHeightSetting) value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for viewport height: {input}\n\
     (expected `unbounded`, `auto`, or a positive number of lines)"
)]
pub struct ViewportHeightParseError {
    input: String,
}

impl ViewportHeightParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while loading user configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserConfigError {
    /// The user config file specified explicitly does not exist.
    #[error("user config file not found at {path}")]
    FileNotFound {
        /// The path that was checked.
        path: Utf8PathBuf,
    },

    /// The user config file could not be read.
    #[error("failed to read user config at {path}")]
    Read {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The user config file could not be parsed.
    #[error("failed to parse user config at {path}")]
    Parse {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying TOML parse error.
        #[source]
        error: toml::de::Error,
    },

    /// The config directory path is not valid UTF-8.
    #[error("user config path contains non-UTF-8 characters")]
    NonUtf8Path {
        /// The underlying error.
        #[source]
        error: FromPathBufError,
    },
}

/// Displays an error along with the chain of errors that caused it.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: StdError> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: StdError> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, "\n  caused by: {error}")?;
            source = error.source();
        }
        Ok(())
    }
}
