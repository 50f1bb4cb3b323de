// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::runtime_paths::CONFIG_FILE_NAME;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_PORT: u16 = 4567;
const DEFAULT_WORKERS: u16 = 2;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Ok(false);
    }

    let session_secret = generate_session_secret()?;
    let contents = default_config_yaml(&session_secret);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created {} listening on 127.0.0.1:{}",
        CONFIG_FILE_NAME, DEFAULT_PORT
    ));

    Ok(true)
}

fn generate_session_secret() -> Result<String, BootstrapError> {
    let mut bytes = [0u8; 32];
    OsRng.try_fill_bytes(&mut bytes).map_err(|err| {
        BootstrapError::Io(io::Error::other(format!(
            "Failed to generate session secret: {}",
            err
        )))
    })?;
    Ok(hex::encode(bytes))
}

fn default_config_yaml(session_secret: &str) -> String {
    format!(
        "app:\n  name: \"Flatdocs\"\n\nserver:\n  host: \"127.0.0.1\"\n  port: {port}\n  workers: {workers}\n\nsession:\n  secret: \"{session_secret}\"\n  cookie_name: \"flatdocs_session\"\n  expiration_hours: 12\n  secure_cookie: false\n\npassword:\n  memory_kib: 19456\n  iterations: 2\n  parallelism: 1\n\nupload:\n  max_file_size_mb: 10\n\nlogging:\n  level: \"info\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        session_secret = session_secret,
    )
}
