// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A live terminal dashboard for streams of test lifecycle events.
//!
//! `testdeck` reads newline-delimited JSON events from a file or standard input and draws
//! the progress of every test module as the events arrive, followed by a summary.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use exit_codes::TestdeckExitCode;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
