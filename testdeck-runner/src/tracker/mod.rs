// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical in-memory model of modules and tests.
//!
//! The main structure in this module is [`Tracker`]. It is mutated by every incoming event
//! and enforces the test and module lifecycles; renderers only ever read from it.

mod imp;
mod summary;

pub use imp::*;
pub use summary::*;
