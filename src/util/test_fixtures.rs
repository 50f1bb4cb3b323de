// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::runtime_paths::{CONFIG_FILE_NAME, DATA_DIR_NAME, RuntimePaths, USERS_FILE_NAME};

/// Throwaway runtime root under `target/test-fixtures`, removed on drop.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join(DATA_DIR_NAME)
    }

    pub fn init_runtime_layout(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.data_dir())
    }

    /// Writes a document straight into the data directory.
    pub fn seed_document(&self, name: &str, content: &[u8]) -> std::io::Result<()> {
        self.init_runtime_layout()?;
        fs::write(self.data_dir().join(name), content)
    }

    pub fn runtime_paths(&self) -> std::io::Result<RuntimePaths> {
        self.init_runtime_layout()?;
        let root = self.path.canonicalize()?;
        let data_dir = self.data_dir().canonicalize()?;

        Ok(RuntimePaths {
            config_file: root.join(CONFIG_FILE_NAME),
            users_file: root.join(USERS_FILE_NAME),
            root,
            data_dir,
        })
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("test-fixtures")
}
