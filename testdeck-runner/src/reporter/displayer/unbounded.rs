// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering for terminals that are effectively infinitely tall.
//!
//! Every test gets one line, and its glyph is swapped in place when it finishes. Module
//! completion redraws the whole screen, since earlier module lines can't be addressed.

use crate::{
    reporter::helpers::{GLYPH_WIDTH, HOURGLASS, module_glyph, test_glyph},
    sentinel::decode_sentinels,
    terminal::Terminal,
    tracker::{ModuleStatus, TestState, Tracker},
};
use std::io;
use swrite::{SWrite, swrite};

pub(super) fn write_test_started<T: Terminal>(
    terminal: &mut T,
    module_header: Option<&str>,
    name: &str,
) -> io::Result<()> {
    if let Some(module) = module_header {
        terminal.print(&format!("\n{module}"))?;
    }
    terminal.print(&format!("\n   • {name}    {HOURGLASS}"))
}

pub(super) fn write_test_finished<T: Terminal>(
    terminal: &mut T,
    state: TestState,
    failure_output: Option<&str>,
) -> io::Result<()> {
    terminal.move_left(GLYPH_WIDTH)?;
    terminal.print(&format!("{}\n", test_glyph(state)))?;
    if let Some(output) = failure_output {
        terminal.print(output)?;
    }
    Ok(())
}

pub(super) fn write_all_modules<T: Terminal>(terminal: &mut T, tracker: &Tracker) -> io::Result<()> {
    terminal.erase_screen()?;

    let mut out = String::new();
    // Modules without a started test were never shown.
    for module in tracker
        .modules()
        .filter(|module| module.started_test_count() > 0)
    {
        swrite!(out, "\n{}", module.name());
        if let ModuleStatus::Finished(outcome) = module.status() {
            swrite!(out, " {}", module_glyph(outcome));
        }
        for test in module.tests() {
            if let Some(state) = test.state() {
                swrite!(
                    out,
                    "\n   • {}    {}",
                    decode_sentinels(test.name()),
                    test_glyph(state)
                );
            }
        }
    }
    terminal.print(&out)
}
