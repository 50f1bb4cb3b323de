// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{Credentials, IamError};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(test)]
use std::sync::RwLock;

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Credentials, IamError>;
    fn save(&self, credentials: &Credentials) -> Result<(), IamError>;
}

/// users.yaml backed store. A missing file reads as an empty mapping.
pub struct FileCredentialStore {
    users_file: PathBuf,
}

impl FileCredentialStore {
    pub fn new(users_file: PathBuf) -> Result<Self, IamError> {
        if users_file.as_os_str().is_empty() {
            return Err(IamError::FileError("Users file path is empty".to_string()));
        }

        Ok(Self { users_file })
    }

    pub fn path(&self) -> &Path {
        &self.users_file
    }

    fn parse_credentials(content: &str) -> Result<Credentials, IamError> {
        if content.trim().is_empty() {
            return Ok(Credentials::new());
        }
        let parsed: Option<Credentials> = serde_yaml::from_str(content)
            .map_err(|e| IamError::ParseError(format!("Failed to parse users file: {}", e)))?;
        Ok(parsed.unwrap_or_default())
    }

    fn write_users_file(&self, content: &str) -> Result<(), IamError> {
        let parent = self.users_file.parent().ok_or_else(|| {
            IamError::FileError("Users file path has no parent directory".to_string())
        })?;
        let file_name = self
            .users_file
            .file_name()
            .ok_or_else(|| IamError::FileError("Users file path has no file name".to_string()))?;
        let (mut file, temp_path) = create_temp_file(parent, file_name)?;

        #[cfg(unix)]
        {
            if let Ok(metadata) = std::fs::metadata(&self.users_file)
                && let Err(err) = std::fs::set_permissions(&temp_path, metadata.permissions())
            {
                let _ = std::fs::remove_file(&temp_path);
                return Err(IamError::FileError(format!(
                    "Failed to set temp users file permissions: {}",
                    err
                )));
            }
        }

        if let Err(err) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IamError::FileError(format!(
                "Failed to write users temp file: {}",
                err
            )));
        }

        if let Err(err) = std::fs::rename(&temp_path, &self.users_file) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IamError::FileError(format!(
                "Failed to replace users file: {}",
                err
            )));
        }

        #[cfg(unix)]
        {
            if let Err(err) = sync_parent_dir(parent) {
                log::warn!("Users directory sync failed: {}", err);
            }
        }

        Ok(())
    }
}

fn create_temp_file(
    dir: &Path,
    file_name: &std::ffi::OsStr,
) -> Result<(std::fs::File, PathBuf), IamError> {
    use std::fs::OpenOptions;
    const MAX_ATTEMPTS: u32 = 100;
    let base = file_name.to_string_lossy();
    for attempt in 0..MAX_ATTEMPTS {
        let candidate = dir.join(format!(".{}.tmp.{}.{}", base, std::process::id(), attempt));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, candidate)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(IamError::FileError(format!(
                    "Failed to create temp users file: {}",
                    err
                )));
            }
        }
    }
    Err(IamError::FileError(
        "Failed to create temp users file after repeated attempts".to_string(),
    ))
}

#[cfg(unix)]
fn sync_parent_dir(parent: &Path) -> Result<(), IamError> {
    let dir = std::fs::File::open(parent).map_err(|err| {
        IamError::FileError(format!("Failed to open users directory for sync: {}", err))
    })?;
    dir.sync_all()
        .map_err(|err| IamError::FileError(format!("Failed to sync users directory: {}", err)))
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, IamError> {
        match std::fs::read_to_string(&self.users_file) {
            Ok(content) => Self::parse_credentials(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Credentials::new()),
            Err(err) => Err(IamError::FileError(format!(
                "Failed to read users file: {}",
                err
            ))),
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<(), IamError> {
        let content = serde_yaml::to_string(credentials)
            .map_err(|e| IamError::ParseError(format!("Failed to serialize users: {}", e)))?;
        self.write_users_file(&content)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<Credentials>,
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials, IamError> {
        self.credentials
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| IamError::FileError("lock poisoned".to_string()))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), IamError> {
        let mut guard = self
            .credentials
            .write()
            .map_err(|_| IamError::FileError("lock poisoned".to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }
}
