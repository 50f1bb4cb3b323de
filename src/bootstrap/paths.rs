// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::runtime_paths::{DATA_DIR_NAME, RuntimePaths};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

pub fn ensure_paths(root: &Path) -> Result<RuntimePaths, BootstrapError> {
    let data_dir = root.join(DATA_DIR_NAME);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
        log_action(format!("created document directory {}", data_dir.display()));
    }
    RuntimePaths::from_root(root).map_err(BootstrapError::Config)
}
