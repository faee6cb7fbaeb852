// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Color selection, diagnostics on stderr, and the destination of the dashboard.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    io::{self, BufWriter, Write},
    sync::Once,
};
use supports_color::Stream;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log events with this target are printed without a level heading.
pub(crate) const NO_HEADING_TARGET: &str = "testdeck::no_heading";

/// Environment variable holding the diagnostics filter.
const LOG_ENV: &str = "TESTDECK_LOG";

pub(crate) mod clap_styles {
    use clap::builder::{
        Styles,
        styling::{AnsiColor, Effects},
    };

    pub(crate) const fn style() -> Styles {
        let bold_green = AnsiColor::Green.on_default().effects(Effects::BOLD);
        let bold_cyan = AnsiColor::Cyan.on_default().effects(Effects::BOLD);
        Styles::styled()
            .header(bold_green)
            .usage(bold_green)
            .literal(bold_cyan)
            .placeholder(AnsiColor::Cyan.on_default())
            .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
            .valid(bold_cyan)
            .invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    }
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        value_name = "WHEN",
        env = "TESTDECK_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Installs the stderr logger and returns the resulting context.
    pub(crate) fn init(self) -> OutputContext {
        init_logger(self.color.should_colorize(Stream::Stderr));
        OutputContext { color: self.color }
    }
}

/// The output settings for a testdeck invocation.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    color: Color,
}

impl OutputContext {
    /// Returns styles for messages printed to standard error.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.color.should_colorize(Stream::Stderr) {
            StderrStyles::colorized()
        } else {
            StderrStyles::default()
        }
    }

    /// Returns true if the dashboard on standard output should be colorized.
    pub(crate) fn should_colorize_stdout(&self) -> bool {
        self.color.should_colorize(Stream::Stdout)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: Stream) -> bool {
        match self {
            Self::Auto => supports_color::on_cached(stream).is_some(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Parses a `TESTDECK_LOG` value, falling back to `info` for everything.
///
/// Returns the rejected value alongside the fallback if it couldn't be parsed.
fn parse_log_filter(value: &str) -> (Targets, Option<&str>) {
    let fallback = || Targets::new().with_default(LevelFilter::INFO);
    if value.is_empty() {
        return (fallback(), None);
    }
    match value.parse::<Targets>() {
        Ok(targets) => (targets, None),
        Err(_) => (fallback(), Some(value)),
    }
}

fn init_logger(colorize: bool) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let (targets, rejected) = parse_log_filter(&value);

        let formatter = HeadingFormatter {
            styles: if colorize {
                LevelStyles::colorized()
            } else {
                LevelStyles::default()
            },
        };
        let layer = tracing_subscriber::fmt::layer()
            .event_format(formatter)
            .with_writer(io::stderr)
            .with_filter(targets);
        tracing_subscriber::registry().with(layer).init();

        if let Some(rejected) = rejected {
            tracing::warn!("ignoring invalid {LOG_ENV} value `{rejected}`");
        }
    });
}

/// Prints each event as `<level>: <message>`, or just the message for
/// [`NO_HEADING_TARGET`].
struct HeadingFormatter {
    styles: LevelStyles,
}

impl HeadingFormatter {
    fn heading(&self, level: Level) -> (&'static str, Style) {
        match level {
            Level::ERROR => ("error", self.styles.error),
            Level::WARN => ("warning", self.styles.warning),
            Level::INFO => ("info", self.styles.info),
            Level::DEBUG => ("debug", self.styles.debug),
            Level::TRACE => ("trace", self.styles.trace),
        }
    }
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, style) = self.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(style))?;
        }

        let mut visitor = MessageWriter {
            writer: &mut writer,
            result: Ok(()),
        };
        event.record(&mut visitor);
        visitor.result?;

        writeln!(writer)
    }
}

/// Writes only the `message` field of an event.
struct MessageWriter<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    result: fmt::Result,
}

impl Visit for MessageWriter<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" && self.result.is_ok() {
            self.result = write!(self.writer, "{value:?}");
        }
    }
}

#[derive(Debug, Default)]
struct LevelStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
    trace: Style,
}

impl LevelStyles {
    fn colorized() -> Self {
        Self {
            error: style().red().bold(),
            warning: style().yellow().bold(),
            info: style().bold(),
            debug: style().bold(),
            trace: style().dimmed(),
        }
    }
}

/// Styles for messages printed to standard error.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

impl StderrStyles {
    fn colorized() -> Self {
        Self {
            bold: style().bold(),
        }
    }
}

/// Where the dashboard is drawn.
///
/// The captured variant only exists in tests.
#[derive(Default)]
pub enum OutputWriter {
    /// Standard output.
    #[default]
    Stdout,
    /// An in-memory buffer.
    #[cfg(test)]
    Captured(Vec<u8>),
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Stdout => Box::new(BufWriter::new(io::stdout())),
            #[cfg(test)]
            Self::Captured(buf) => Box::new(buf),
        }
    }
}
