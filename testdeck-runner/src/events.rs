// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed test lifecycle events, and the newline-delimited JSON format they arrive in.
//!
//! Each line of the wire stream is a JSON object:
//!
//! ```json
//! {"time":"2024-05-01T10:00:00Z","action":"test-run","module":"pkg/api","test":"TestLogin"}
//! ```
//!
//! Use [`parse_event_line`] to convert a line into a [`TestEvent`].

use crate::{
    errors::EventParseError,
    tracker::{ModuleOutcome, TestOutcome},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

/// A test lifecycle event.
#[derive(Clone, Debug, PartialEq)]
pub struct TestEvent {
    /// The time at which the event was generated, including the offset from UTC.
    pub timestamp: DateTime<FixedOffset>,

    /// The kind of event this is.
    pub kind: TestEventKind,
}

/// The kind of test event this is.
///
/// Forms part of [`TestEvent`].
#[derive(Clone, Debug, PartialEq)]
pub enum TestEventKind {
    /// The test run started.
    RunStarted,

    /// The test run finished.
    RunFinished {
        /// The total run time, if the source reported one.
        elapsed: Option<Duration>,
    },

    /// A module started. Nothing is displayed until its first test runs.
    ModuleStarted {
        /// The module name.
        module: String,
    },

    /// A module finished.
    ModuleFinished {
        /// The module name.
        module: String,

        /// Whether the module passed or failed.
        outcome: ModuleOutcome,

        /// The time the module took, if reported.
        elapsed: Option<Duration>,
    },

    /// A module turned out to have no tests at all.
    ModuleNoTests {
        /// The module name.
        module: String,
    },

    /// A test started running.
    TestStarted {
        /// The module name.
        module: String,

        /// The test name, possibly containing sentinel tokens.
        test: String,
    },

    /// A test finished running, or was skipped.
    TestFinished {
        /// The module name.
        module: String,

        /// The test name, possibly containing sentinel tokens.
        test: String,

        /// The outcome of the test.
        outcome: TestOutcome,

        /// The time the test took, if reported.
        elapsed: Option<Duration>,
    },

    /// A fragment of raw output was produced while a test ran.
    TestOutput {
        /// The module name.
        module: String,

        /// The test name, possibly containing sentinel tokens.
        test: String,

        /// The raw output fragment.
        output: String,
    },
}

/// The `action` tag of a wire event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// `run-start`
    RunStart,
    /// `run-finish`
    RunFinish,
    /// `module-start`
    ModuleStart,
    /// `module-pass`
    ModulePass,
    /// `module-fail`
    ModuleFail,
    /// `module-skip`: the module has no tests.
    ModuleSkip,
    /// `test-run`
    TestRun,
    /// `test-pass`
    TestPass,
    /// `test-fail`
    TestFail,
    /// `test-skip`
    TestSkip,
    /// `test-output`
    TestOutput,
}

impl ActionKind {
    /// Returns the wire representation of this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunStart => "run-start",
            Self::RunFinish => "run-finish",
            Self::ModuleStart => "module-start",
            Self::ModulePass => "module-pass",
            Self::ModuleFail => "module-fail",
            Self::ModuleSkip => "module-skip",
            Self::TestRun => "test-run",
            Self::TestPass => "test-pass",
            Self::TestFail => "test-fail",
            Self::TestSkip => "test-skip",
            Self::TestOutput => "test-output",
        }
    }

    fn scope(self) -> ActionScope {
        match self {
            Self::RunStart | Self::RunFinish => ActionScope::Run,
            Self::ModuleStart | Self::ModulePass | Self::ModuleFail | Self::ModuleSkip => {
                ActionScope::Module
            }
            Self::TestRun | Self::TestPass | Self::TestFail | Self::TestSkip | Self::TestOutput => {
                ActionScope::Test
            }
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ActionScope {
    Run,
    Module,
    Test,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    time: DateTime<FixedOffset>,
    action: ActionKind,
    #[serde(default)]
    module: String,
    #[serde(default)]
    test: Option<String>,
    #[serde(default)]
    elapsed: Option<f64>,
    #[serde(default)]
    output: Option<String>,
}

/// Parses a single line of the wire stream.
///
/// `line_number` is 1-based and only used for error reporting. Returns `Ok(None)` for blank
/// lines.
pub fn parse_event_line(line: &str, line_number: usize) -> Result<Option<TestEvent>, EventParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let wire: WireEvent = serde_json::from_str(line)
        .map_err(|error| EventParseError::Json { line_number, error })?;
    let action = wire.action;

    let elapsed = wire
        .elapsed
        .map(|elapsed| {
            Duration::try_from_secs_f64(elapsed).map_err(|_| EventParseError::InvalidElapsed {
                line_number,
                elapsed,
            })
        })
        .transpose()?;

    let missing = |field| EventParseError::MissingField {
        line_number,
        action,
        field,
    };

    let module = match action.scope() {
        ActionScope::Run => wire.module,
        ActionScope::Module | ActionScope::Test => {
            if wire.module.is_empty() {
                return Err(missing("module"));
            }
            wire.module
        }
    };
    let test = match action.scope() {
        ActionScope::Test => wire.test.ok_or_else(|| missing("test"))?,
        ActionScope::Run | ActionScope::Module => String::new(),
    };

    let kind = match action {
        ActionKind::RunStart => TestEventKind::RunStarted,
        ActionKind::RunFinish => TestEventKind::RunFinished { elapsed },
        ActionKind::ModuleStart => TestEventKind::ModuleStarted { module },
        ActionKind::ModulePass => TestEventKind::ModuleFinished {
            module,
            outcome: ModuleOutcome::Passed,
            elapsed,
        },
        ActionKind::ModuleFail => TestEventKind::ModuleFinished {
            module,
            outcome: ModuleOutcome::Failed,
            elapsed,
        },
        ActionKind::ModuleSkip => TestEventKind::ModuleNoTests { module },
        ActionKind::TestRun => TestEventKind::TestStarted { module, test },
        ActionKind::TestPass => TestEventKind::TestFinished {
            module,
            test,
            outcome: TestOutcome::Passed,
            elapsed,
        },
        ActionKind::TestFail => TestEventKind::TestFinished {
            module,
            test,
            outcome: TestOutcome::Failed,
            elapsed,
        },
        ActionKind::TestSkip => TestEventKind::TestFinished {
            module,
            test,
            outcome: TestOutcome::Skipped,
            elapsed,
        },
        ActionKind::TestOutput => TestEventKind::TestOutput {
            module,
            test,
            output: wire.output.ok_or_else(|| missing("output"))?,
        },
    };

    Ok(Some(TestEvent {
        timestamp: wire.time,
        kind,
    }))
}
