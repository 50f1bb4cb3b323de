// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Rewrites the level of records whose target starts with `target_prefix`.
#[derive(Debug, Clone)]
pub struct LevelRemap {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRemap {
    pub fn new(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }
}

struct LevelRemapLogger {
    inner: Logger,
    remaps: Vec<LevelRemap>,
}

impl LevelRemapLogger {
    fn effective_level(&self, target: &str, level: Level) -> Level {
        self.remaps
            .iter()
            .find(|remap| remap.from == level && target.starts_with(&remap.target_prefix))
            .map(|remap| remap.to)
            .unwrap_or(level)
    }
}

impl Log for LevelRemapLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let remapped = Metadata::builder()
            .level(self.effective_level(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&remapped)
    }

    fn log(&self, record: &Record) {
        let level = self.effective_level(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs `logger` as the global logger with the given level remaps applied.
pub fn init_logger(remaps: Vec<LevelRemap>, logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(LevelRemapLogger {
        inner: logger,
        remaps,
    }))?;
    log::set_max_level(max_level);
    Ok(())
}
