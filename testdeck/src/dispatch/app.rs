// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::imp::run_events;
use crate::{
    errors::{ExpectedError, Result},
    exit_codes::TestdeckExitCode,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
};
use testdeck_runner::{
    reporter::ReporterBuilder,
    terminal::AnsiTerminal,
    user_config::{UiConfig, UserConfig, UserConfigLocation, ViewportHeightSetting},
};
use tracing::debug;

/// Path value that reads events from standard input.
const STDIN_INPUT: &str = "-";

/// Draws a live dashboard from a stream of test events.
///
/// Events are read as newline-delimited JSON, one event per line.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = clap_styles::style(),
    max_term_width = 100,
    after_help = "Set TESTDECK_LOG to control diagnostics printed to standard error."
)]
pub struct TestdeckApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    ui: UiOpts,

    /// User config file [default: ~/.config/testdeck/config.toml, or "none" to skip]
    #[arg(long, value_name = "PATH", env = "TESTDECK_USER_CONFIG_FILE")]
    user_config_file: Option<String>,

    /// File to read events from, or `-` for standard input
    #[arg(value_name = "INPUT", default_value = STDIN_INPUT)]
    input: Utf8PathBuf,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Display options")]
struct UiOpts {
    /// Usable terminal height: unbounded, auto, or a number of lines
    #[arg(long, value_name = "HEIGHT", env = "TESTDECK_VIEWPORT_HEIGHT")]
    viewport_height: Option<ViewportHeightSetting>,

    /// Do not print the output of failed tests
    #[arg(long)]
    no_failure_output: bool,
}

impl UiOpts {
    fn apply_to(&self, ui: &mut UiConfig) {
        if let Some(viewport_height) = self.viewport_height {
            ui.viewport_height = viewport_height;
        }
        if self.no_failure_output {
            ui.show_failure_output = false;
        }
    }
}

impl TestdeckApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let location = UserConfigLocation::from_cli_or_env(self.user_config_file.as_deref());
        let mut user_config =
            UserConfig::load(location).map_err(ExpectedError::user_config_error)?;
        self.ui.apply_to(&mut user_config.ui);

        let height = user_config.ui.viewport_height.resolve();
        debug!(%height, "resolved viewport height");

        let reader = self.open_input()?;

        let mut builder = ReporterBuilder::default();
        builder
            .set_colorize(output.should_colorize_stdout())
            .set_show_failure_output(user_config.ui.show_failure_output);
        let mut reporter = builder.build(AnsiTerminal::new(output_writer.stdout_writer(), height));

        let summary = run_events(reader, self.input.as_str(), &mut reporter)?;
        if summary.has_failures() {
            Err(ExpectedError::test_run_failed())
        } else {
            Ok(TestdeckExitCode::OK)
        }
    }

    fn open_input(&self) -> Result<Box<dyn BufRead>> {
        if self.input == STDIN_INPUT {
            return Ok(Box::new(io::stdin().lock()));
        }

        let file = File::open(&self.input).map_err(|err| ExpectedError::InputOpenError {
            path: self.input.clone(),
            err,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}
