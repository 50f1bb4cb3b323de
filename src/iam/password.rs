// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::IamError;
use crate::config::Argon2Params;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Hashes `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str, params: &Argon2Params) -> Result<String, IamError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = build_argon2(params)?;
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| IamError::HashError(err.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string. The parameters embedded in
/// the stored hash are used, so hashes survive parameter changes in config.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, IamError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| IamError::HashError(err.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

fn build_argon2(params: &Argon2Params) -> Result<Argon2<'static>, IamError> {
    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        None,
    )
    .map_err(|err| IamError::HashError(err.to_string()))?;
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        argon2_params,
    ))
}

/// Parameters are accepted by argon2 (used during config validation).
pub fn check_params(params: &Argon2Params) -> Result<(), IamError> {
    build_argon2(params).map(|_| ())
}
