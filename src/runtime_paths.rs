// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const USERS_FILE_NAME: &str = "users.yaml";
pub const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub users_file: PathBuf,
    pub data_dir: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let config_file = root_canonical.join(CONFIG_FILE_NAME);
        ensure_file_writable(&config_file, "Config file must be writable")?;

        let users_file = root_canonical.join(USERS_FILE_NAME);
        ensure_file_writable(&users_file, "Users file must be writable")?;

        let data_dir = root_canonical.join(DATA_DIR_NAME);
        ensure_dir_exists(&data_dir)?;
        let data_dir = data_dir.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize data directory '{}': {}",
                data_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            root: root_canonical,
            config_file,
            users_file,
            data_dir,
        })
    }
}

fn ensure_dir_exists(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "Expected a directory at '{}'",
                path.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| {
        ConfigError::ValidationError(format!(
            "Failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Checks the file (or, when absent, its directory) accepts writes by creating
/// and removing a probe file next to it.
fn ensure_file_writable(path: &Path, message: &str) -> Result<(), ConfigError> {
    if path.exists() {
        let metadata = fs::metadata(path).map_err(|e| {
            ConfigError::ValidationError(format!("{} ('{}'): {}", message, path.display(), e))
        })?;
        if metadata.permissions().readonly() {
            return Err(ConfigError::ValidationError(format!(
                "{} ('{}' is read-only)",
                message,
                path.display()
            )));
        }
        return Ok(());
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let probe = parent.join(format!(".write-probe-{}", Uuid::new_v4().simple()));
    fs::write(&probe, b"").map_err(|e| {
        ConfigError::ValidationError(format!("{} ('{}'): {}", message, parent.display(), e))
    })?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
