// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for testdeck: a terminal dashboard for streams of test lifecycle events.
//!
//! The basic flow is one-way. Typed [`events`] are handed to a [`reporter::Reporter`], which
//! applies them to a [`tracker::Tracker`] and then asks the active display strategy to
//! redraw the affected parts of a [`terminal::Terminal`].

pub mod errors;
pub mod events;
mod helpers;
pub mod reporter;
pub mod sentinel;
pub mod terminal;
pub mod test_output;
pub mod tracker;
pub mod user_config;
