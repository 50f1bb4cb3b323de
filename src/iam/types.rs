// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::BTreeMap;

// The users.yaml file structure: username -> argon2 PHC string
pub type Credentials = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IamError {
    UsernameTaken(String),
    InvalidField(String),
    FileError(String),
    ParseError(String),
    HashError(String),
}

impl std::fmt::Display for IamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IamError::UsernameTaken(_) => write!(f, "Username taken"),
            IamError::InvalidField(msg) => write!(f, "{}", msg),
            IamError::FileError(msg) => write!(f, "File error: {}", msg),
            IamError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IamError::HashError(msg) => write!(f, "Password hashing error: {}", msg),
        }
    }
}

impl std::error::Error for IamError {}
