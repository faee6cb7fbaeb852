// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::ViewportHeightParseError, terminal::ViewportHeight};
use serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected},
};
use std::{fmt, num::NonZeroUsize, str::FromStr};

/// The `ui.viewport-height` setting.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ViewportHeightSetting {
    /// Treat the terminal as infinitely tall.
    Unbounded,

    /// Use the height of the terminal attached to standard output.
    Auto,

    /// Use a fixed number of lines.
    Lines(NonZeroUsize),
}

impl ViewportHeightSetting {
    /// Resolves this setting to a concrete height, querying the terminal for
    /// [`ViewportHeightSetting::Auto`].
    pub fn resolve(self) -> ViewportHeight {
        match self {
            Self::Unbounded => ViewportHeight::Unbounded,
            Self::Auto => ViewportHeight::detect(),
            Self::Lines(lines) => ViewportHeight::Bounded(lines),
        }
    }
}

impl FromStr for ViewportHeightSetting {
    type Err = ViewportHeightParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbounded" => Ok(Self::Unbounded),
            "auto" => Ok(Self::Auto),
            other => other
                .parse::<NonZeroUsize>()
                .map(Self::Lines)
                .map_err(|_| ViewportHeightParseError::new(other)),
        }
    }
}

impl fmt::Display for ViewportHeightSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Auto => write!(f, "auto"),
            Self::Lines(lines) => write!(f, "{lines}"),
        }
    }
}

impl<'de> Deserialize<'de> for ViewportHeightSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ViewportHeightVisitor)
    }
}

/// Visitor for deserializing viewport-height (string or integer).
struct ViewportHeightVisitor;

impl<'de> de::Visitor<'de> for ViewportHeightVisitor {
    type Value = ViewportHeightSetting;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer, \"unbounded\", or \"auto\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        usize::try_from(v)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(ViewportHeightSetting::Lines)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// The `[ui]` section of a user config file. Every setting is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::user_config) struct DeserializedUiConfig {
    #[serde(default)]
    pub(in crate::user_config) viewport_height: Option<ViewportHeightSetting>,
    #[serde(default)]
    pub(in crate::user_config) show_failure_output: Option<bool>,
}

/// The `[ui]` section of the embedded default config. Every setting is required.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::user_config) struct DefaultUiConfig {
    pub(in crate::user_config) viewport_height: ViewportHeightSetting,
    pub(in crate::user_config) show_failure_output: bool,
}

/// Resolved UI configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UiConfig {
    /// The usable height of the terminal.
    pub viewport_height: ViewportHeightSetting,

    /// Whether to print the genuine output of failed tests.
    pub show_failure_output: bool,
}

impl UiConfig {
    /// Resolves UI configuration from the user config (if any) and the defaults.
    pub(in crate::user_config) fn resolve(
        default_config: &DefaultUiConfig,
        user_config: Option<&DeserializedUiConfig>,
    ) -> Self {
        Self {
            viewport_height: user_config
                .and_then(|c| c.viewport_height)
                .unwrap_or(default_config.viewport_height),
            show_failure_output: user_config
                .and_then(|c| c.show_failure_output)
                .unwrap_or(default_config.show_failure_output),
        }
    }
}
