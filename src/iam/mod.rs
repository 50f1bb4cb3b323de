// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod password;
mod service;
mod store;
pub(crate) mod types;

pub use password::{check_params, hash_password, verify_password};
pub use service::CredentialService;
#[cfg(test)]
pub use store::MemoryCredentialStore;
pub use store::{CredentialStore, FileCredentialStore};
pub use types::{Credentials, IamError};
