// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{exit_codes::TestdeckExitCode, output::StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::error::Error;
use testdeck_runner::errors::{ReportEventError, UserConfigError};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected error that ends a testdeck invocation.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("user config error")]
    UserConfigError {
        #[source]
        err: Box<UserConfigError>,
    },
    #[error("failed to open input")]
    InputOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read input")]
    InputReadError {
        input: String,
        line_number: usize,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to write to terminal")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
    #[error("internal error")]
    InternalError {
        #[source]
        err: ReportEventError,
    },
    #[error("test run failed")]
    TestRunFailed,
}

impl ExpectedError {
    pub(crate) fn user_config_error(err: UserConfigError) -> Self {
        Self::UserConfigError { err: Box::new(err) }
    }

    pub(crate) fn test_run_failed() -> Self {
        Self::TestRunFailed
    }

    /// Converts a fatal reporter error into an expected error.
    pub(crate) fn from_report_event_error(err: ReportEventError) -> Self {
        match err {
            ReportEventError::Io(err) => Self::WriteOutputError { err },
            other => Self::InternalError { err: other },
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::UserConfigError { .. }
            | Self::InputOpenError { .. }
            | Self::InputReadError { .. } => TestdeckExitCode::SETUP_ERROR,
            Self::WriteOutputError { .. } => TestdeckExitCode::WRITE_OUTPUT_ERROR,
            Self::InternalError { .. } => TestdeckExitCode::INTERNAL_ERROR,
            Self::TestRunFailed => TestdeckExitCode::TEST_RUN_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::UserConfigError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputOpenError { path, err } => {
                error!("failed to open input file `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::InputReadError {
                input,
                line_number,
                err,
            } => {
                error!(
                    "failed to read line {line_number} of `{}`",
                    input.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { err } => {
                error!("failed to write to the terminal");
                Some(err as &dyn Error)
            }
            Self::InternalError { err } => {
                error!("internal error: {err}");
                error!(
                    target: crate::output::NO_HEADING_TARGET,
                    "(this is a bug in testdeck, please report it)"
                );
                err.source()
            }
            Self::TestRunFailed => {
                error!("test run failed");
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: crate::output::NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
