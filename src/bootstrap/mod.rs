// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{Config, ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::path::Path;

pub mod config;
pub mod paths;
pub mod users;

#[derive(Debug)]
pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub created_config: bool,
    pub created_users: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let root_path = paths::normalize_root(root)?;

    let created_config = config::ensure_config(&root_path)?;

    let validated_config = Config::load_and_validate(&root_path).map_err(BootstrapError::Config)?;

    let created_users = users::ensure_users(&root_path)?;

    let runtime_paths = paths::ensure_paths(&root_path)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        created_config,
        created_users,
    })
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}
