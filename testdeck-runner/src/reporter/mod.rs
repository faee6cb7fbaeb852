// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report test events on a live terminal dashboard.
//!
//! The main type here is [`Reporter`], which is constructed via a [`ReporterBuilder`].

mod displayer;
mod helpers;
mod imp;

pub use imp::*;
