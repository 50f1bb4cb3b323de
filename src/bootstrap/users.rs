// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::runtime_paths::USERS_FILE_NAME;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Writes an empty credential mapping when `users.yaml` is missing.
/// Accounts are created through the sign-up page.
pub fn ensure_users(root: &Path) -> Result<bool, BootstrapError> {
    let users_path = root.join(USERS_FILE_NAME);
    if users_path.exists() {
        return Ok(false);
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&users_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(b"{}\n")?;
    file.sync_all()?;

    log_action(format!(
        "created empty {}; use /sign_up to add the first account",
        USERS_FILE_NAME
    ));
    Ok(true)
}
