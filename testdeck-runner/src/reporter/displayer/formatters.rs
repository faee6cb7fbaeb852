// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    reporter::helpers::Styles,
    tracker::{OutcomeCounts, RunSummary},
};
use owo_colors::OwoColorize;
use std::{fmt, time::Duration};
use swrite::{SWrite, swrite};

pub(super) const CLOSING_LINE: &str = "Ran all test modules.";

pub(super) struct DisplaySeconds(pub(super) Duration);

impl fmt::Display for DisplaySeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // .3 means print three digits after the decimal point.
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

/// Formats the summary block printed at the end of a run, without the closing line.
pub(super) fn format_summary(summary: &RunSummary, styles: &Styles) -> String {
    let mut out = String::new();
    write_counts_line(&mut out, "Packages", &summary.modules, styles);
    out.push('\n');
    write_counts_line(&mut out, "Tests", &summary.tests, styles);
    swrite!(
        out,
        "\n{}: {}",
        "Time".style(styles.label),
        DisplaySeconds(summary.duration)
    );
    out
}

fn write_counts_line(out: &mut String, label: &str, counts: &OutcomeCounts, styles: &Styles) {
    swrite!(out, "{}: ", label.style(styles.label));
    for (count, outcome, style) in [
        (counts.failed, "failed", styles.fail),
        (counts.skipped, "skipped", styles.skip),
        (counts.passed, "passed", styles.pass),
    ] {
        if count > 0 {
            swrite!(out, "{}, ", format!("{count} {outcome}").style(style));
        }
    }
    swrite!(out, "{} total", counts.total);
}
