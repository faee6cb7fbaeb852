// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-specific configuration for testdeck.
//!
//! ## Config file location
//!
//! The user config file is searched for at `$XDG_CONFIG_HOME/testdeck/config.toml`, or
//! `~/.config/testdeck/config.toml` if `XDG_CONFIG_HOME` is unset.
//!
//! ## Configuration hierarchy
//!
//! Settings are resolved in the following order (highest priority first):
//!
//! 1. CLI arguments (e.g., `--viewport-height=auto`)
//! 2. User config (`[ui]` section)
//! 3. Built-in defaults

mod discovery;
mod elements;
mod imp;

pub use discovery::*;
pub use elements::*;
pub use imp::*;
