// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::password::{hash_password, verify_password};
use super::store::CredentialStore;
use super::types::IamError;
use crate::config::Argon2Params;
use crate::content::filename_policy::{NameUse, validate};
use std::sync::{Arc, Mutex};

const NO_NAMES: [&str; 0] = [];

/// Sign-up and sign-in on top of a credential store.
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    params: Argon2Params,
    // Serializes load-modify-save in `create`.
    write_lock: Mutex<()>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>, params: Argon2Params) -> Self {
        Self {
            store,
            params,
            write_lock: Mutex::new(()),
        }
    }

    /// True only for a known user whose password matches the stored hash.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if validate_fields(username, password).is_err() {
            return false;
        }
        let credentials = match self.store.load() {
            Ok(credentials) => credentials,
            Err(err) => {
                log::error!("Failed to load credentials: {}", err);
                return false;
            }
        };
        let Some(stored_hash) = credentials.get(username) else {
            return false;
        };
        match verify_password(password, stored_hash) {
            Ok(valid) => valid,
            Err(err) => {
                log::error!("Stored hash for '{}' is unusable: {}", username, err);
                false
            }
        }
    }

    pub fn create(&self, username: &str, password: &str) -> Result<(), IamError> {
        validate_fields(username, password)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| IamError::FileError("credential lock poisoned".to_string()))?;

        let mut credentials = self.store.load()?;
        if credentials.contains_key(username) {
            return Err(IamError::UsernameTaken(username.to_string()));
        }
        let stored_hash = hash_password(password, &self.params)?;
        credentials.insert(username.to_string(), stored_hash);
        self.store.save(&credentials)
    }
}

fn validate_fields(username: &str, password: &str) -> Result<(), IamError> {
    validate(username, NameUse::Field("username"), &NO_NAMES)
        .and_then(|_| validate(password, NameUse::Field("password"), &NO_NAMES))
        .map_err(|err| IamError::InvalidField(err.to_string()))
}
