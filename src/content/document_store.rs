// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::filename_policy::{basename, downcase_ext, name_in_use, next_free_name};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Conflict(String),
    InvalidName(String),
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(name) => write!(f, "\"{}\" does not exist.", name),
            StoreError::Conflict(name) => write!(f, "\"{}\" already exists", name),
            StoreError::InvalidName(name) => write!(f, "\"{}\" is not a valid file name", name),
            StoreError::Io(err) => write!(f, "document I/O failed: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Flat directory of documents. Writes go straight to the target file, so two
/// overlapping writes to one name resolve as last-write-wins.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regular, non-hidden files in the directory, sorted by name.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                log::warn!(
                    "Skipping non UTF-8 file name in {}: {:?}",
                    self.root.display(),
                    entry.file_name()
                );
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(name_in_use(name, &self.list()?))
    }

    /// Maps a requested name onto the stored file name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<String, StoreError> {
        if !is_plain_name(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let names = self.list()?;
        if let Some(exact) = names.iter().find(|entry| entry.as_str() == name) {
            return Ok(exact.clone());
        }
        names
            .into_iter()
            .find(|entry| entry.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let stored = self.resolve(name)?;
        Ok(fs::read(self.root.join(stored))?)
    }

    /// Overwrites the whole document.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Creates an empty document, lowercasing the extension. Returns the stored name.
    pub fn create(&self, name: &str) -> Result<String, StoreError> {
        let normalized = downcase_ext(name);
        if self.exists(&normalized)? {
            return Err(StoreError::Conflict(normalized));
        }
        self.write(&normalized, b"")?;
        Ok(normalized)
    }

    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let stored = self.resolve(name)?;
        fs::remove_file(self.root.join(stored))?;
        Ok(())
    }

    pub fn rename(&self, old: &str, new: &str) -> Result<(), StoreError> {
        let stored = self.resolve(old)?;
        let target = self.path_for(new)?;
        if self.exists(new)? {
            return Err(StoreError::Conflict(new.to_string()));
        }
        fs::rename(self.root.join(stored), target)?;
        Ok(())
    }

    /// Copies `name` to `<basename>_copy<ext>`. Fails on collision instead of
    /// picking another suffix.
    pub fn duplicate(&self, name: &str) -> Result<String, StoreError> {
        let stored = self.resolve(name)?;
        let copy_name = copy_name_for(&stored);
        if self.exists(&copy_name)? {
            return Err(StoreError::Conflict(copy_name));
        }
        let content = fs::read(self.root.join(&stored))?;
        self.write(&copy_name, &content)?;
        Ok(copy_name)
    }

    /// Stores uploaded bytes under the first free numbered variant of `name`.
    pub fn upload(&self, name: &str, content: &[u8]) -> Result<String, StoreError> {
        let normalized = downcase_ext(name);
        let stored = next_free_name(&normalized, &self.list()?);
        self.write(&stored, content)?;
        Ok(stored)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_plain_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

fn copy_name_for(name: &str) -> String {
    let base = basename(name);
    format!("{}_copy{}", base, &name[base.len()..])
}

/// A single path component that cannot escape the store directory.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
