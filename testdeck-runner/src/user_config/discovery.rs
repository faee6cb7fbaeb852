// Copyright (c) The testdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::UserConfigError;
use camino::Utf8PathBuf;
use etcetera::{BaseStrategy, base_strategy::Xdg};

/// Returns `$XDG_CONFIG_HOME/testdeck/config.toml` (`~/.config/testdeck/config.toml` when
/// unset) on every platform, or `None` if the home directory is unknown.
pub fn user_config_path() -> Result<Option<Utf8PathBuf>, UserConfigError> {
    let Ok(xdg) = Xdg::new() else {
        return Ok(None);
    };

    let path = xdg.config_dir().join("testdeck").join("config.toml");
    match Utf8PathBuf::try_from(path) {
        Ok(path) => Ok(Some(path)),
        Err(error) => Err(UserConfigError::NonUtf8Path { error }),
    }
}
