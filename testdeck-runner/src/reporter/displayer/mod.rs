// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The displayer for the live terminal dashboard.

mod bounded;
mod formatters;
mod imp;
mod unbounded;

pub(crate) use imp::*;
