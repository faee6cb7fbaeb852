// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    discovery::user_config_path,
    elements::{DefaultUiConfig, DeserializedUiConfig, UiConfig},
};
use crate::errors::UserConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeSet, io};
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// Passing this as the user config file skips loading user config.
pub const USER_CONFIG_NONE: &str = "none";

const DEFAULT_USER_CONFIG: &str = include_str!("../../default-user-config.toml");

/// Where user configuration is read from.
#[derive(Clone, Copy, Debug)]
pub enum UserConfigLocation<'a> {
    /// The discovered location, if a file exists there.
    Default,

    /// Nowhere: only the built-in defaults are used.
    Isolated,

    /// A file that must exist.
    Explicit(&'a Utf8Path),
}

impl<'a> UserConfigLocation<'a> {
    /// Interprets the value of `--user-config-file` or `TESTDECK_USER_CONFIG_FILE`.
    pub fn from_cli_or_env(value: Option<&'a str>) -> Self {
        match value {
            None => Self::Default,
            Some(USER_CONFIG_NONE) => Self::Isolated,
            Some(path) => Self::Explicit(Utf8Path::new(path)),
        }
    }
}

/// User configuration with defaults filled in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserConfig {
    /// Display settings.
    pub ui: UiConfig,
}

impl UserConfig {
    /// Reads user configuration from `location` and fills in defaults.
    ///
    /// Unknown keys are logged as warnings.
    pub fn load(location: UserConfigLocation<'_>) -> Result<Self, UserConfigError> {
        let file = match location {
            UserConfigLocation::Isolated => {
                debug!("user config: isolated, using defaults");
                None
            }
            UserConfigLocation::Explicit(path) => Some(UserConfigFile::read(path)?.ok_or_else(
                || UserConfigError::FileNotFound {
                    path: path.to_owned(),
                },
            )?),
            UserConfigLocation::Default => match user_config_path()? {
                Some(path) => UserConfigFile::read(&path)?,
                None => {
                    debug!("user config: no home directory, using defaults");
                    None
                }
            },
        };

        if let Some(file) = &file {
            file.warn_unknown_keys();
        }
        Ok(Self::resolve(file.as_ref().map(|file| &file.config)))
    }

    fn resolve(user_config: Option<&DeserializedUserConfig>) -> Self {
        let defaults = DefaultUserConfig::embedded();
        Self {
            ui: UiConfig::resolve(&defaults.ui, user_config.map(|config| &config.ui)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedUserConfig {
    #[serde(default)]
    ui: DeserializedUiConfig,
}

/// The embedded defaults. Unlike the user's file, every setting must be present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultUserConfig {
    ui: DefaultUiConfig,
}

impl DefaultUserConfig {
    fn embedded() -> Self {
        let (config, unknown) = parse_toml::<Self>(DEFAULT_USER_CONFIG)
            .expect("embedded default user config is valid");
        assert!(
            unknown.is_empty(),
            "embedded default user config has unknown keys: {unknown:?}"
        );
        config
    }
}

/// A user config file that was found and parsed.
#[derive(Debug)]
struct UserConfigFile {
    path: Utf8PathBuf,
    config: DeserializedUserConfig,
    unknown_keys: BTreeSet<String>,
}

impl UserConfigFile {
    /// Returns `Ok(None)` if there's no file at `path`.
    fn read(path: &Utf8Path) -> Result<Option<Self>, UserConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(%path, "user config: no file");
                return Ok(None);
            }
            Err(error) => {
                return Err(UserConfigError::Read {
                    path: path.to_owned(),
                    error,
                });
            }
        };

        let (config, unknown_keys) =
            parse_toml(&contents).map_err(|error| UserConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;
        debug!(%path, "user config: loaded");

        Ok(Some(Self {
            path: path.to_owned(),
            config,
            unknown_keys,
        }))
    }

    fn warn_unknown_keys(&self) {
        let mut keys = self.unknown_keys.iter();
        match (keys.next(), keys.next()) {
            (None, _) => {}
            (Some(key), None) => {
                warn!("ignoring unknown key in user config {}: {key}", self.path);
            }
            (Some(_), Some(_)) => {
                let mut list = String::new();
                for key in &self.unknown_keys {
                    swrite!(list, "\n  - {key}");
                }
                warn!("ignoring unknown keys in user config {}:{list}", self.path);
            }
        }
    }
}

/// Deserializes `contents`, collecting the paths of keys that weren't recognized.
fn parse_toml<'de, T: Deserialize<'de>>(
    contents: &'de str,
) -> Result<(T, BTreeSet<String>), toml::de::Error> {
    let deserializer = toml::Deserializer::parse(contents)?;
    let mut unknown = BTreeSet::new();
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.insert(path.to_string());
    })?;
    Ok((value, unknown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_config::ViewportHeightSetting;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroUsize;

    fn write_config(dir: &Utf8TempDir, contents: &str) -> Utf8PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn embedded_defaults() {
        assert_eq!(
            UserConfig::resolve(None).ui,
            UiConfig {
                viewport_height: ViewportHeightSetting::Unbounded,
                show_failure_output: true,
            }
        );
    }

    #[test]
    fn unknown_keys_are_collected() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(
            &dir,
            indoc! {r#"
                theme = "dark"

                [ui]
                viewport-height = 3
                spinner = true
            "#},
        );

        let file = UserConfigFile::read(&path)
            .unwrap()
            .expect("file exists");
        assert_eq!(
            file.unknown_keys,
            BTreeSet::from(["theme".to_owned(), "ui.spinner".to_owned()])
        );
        assert_eq!(
            UserConfig::resolve(Some(&file.config)).ui,
            UiConfig {
                viewport_height: ViewportHeightSetting::Lines(NonZeroUsize::new(3).unwrap()),
                show_failure_output: true,
            }
        );
    }

    #[test]
    fn string_settings() {
        let (config, unknown) = parse_toml::<DeserializedUserConfig>(indoc! {r#"
            [ui]
            viewport-height = "auto"
            show-failure-output = false
        "#})
        .unwrap();

        assert!(unknown.is_empty());
        assert_eq!(config.ui.viewport_height, Some(ViewportHeightSetting::Auto));
        assert_eq!(config.ui.show_failure_output, Some(false));
    }

    #[test]
    fn zero_height_is_a_parse_error() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(&dir, "[ui]\nviewport-height = 0\n");

        let err = UserConfig::load(UserConfigLocation::Explicit(&path))
            .expect_err("zero is not a valid height");
        assert!(
            matches!(&err, UserConfigError::Parse { path: err_path, .. } if *err_path == path),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = UserConfig::load(UserConfigLocation::Explicit(&path))
            .expect_err("file does not exist");
        assert!(matches!(err, UserConfigError::FileNotFound { .. }));
        assert!(UserConfigFile::read(&path).unwrap().is_none());
    }

    #[test]
    fn location_from_cli() {
        assert!(matches!(
            UserConfigLocation::from_cli_or_env(None),
            UserConfigLocation::Default
        ));
        assert!(matches!(
            UserConfigLocation::from_cli_or_env(Some("none")),
            UserConfigLocation::Isolated
        ));
        assert!(matches!(
            UserConfigLocation::from_cli_or_env(Some("cfg.toml")),
            UserConfigLocation::Explicit(path) if path.as_str() == "cfg.toml"
        ));
    }
}
