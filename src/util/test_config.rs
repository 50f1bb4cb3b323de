// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, Argon2Params, LoggingConfig, ServerConfig, SessionConfig, UploadConfig,
    ValidatedConfig,
};

pub const TEST_SESSION_SECRET: &str = "test-session-secret-0123456789abcdef";

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                app: AppConfig {
                    name: "Test Docs".to_string(),
                },
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                session: SessionConfig {
                    secret: TEST_SESSION_SECRET.to_string(),
                    cookie_name: "flatdocs_session".to_string(),
                    expiration_hours: 1,
                    secure_cookie: false,
                },
                // Cheap enough to keep sign-up tests fast.
                password: Argon2Params {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
                upload: UploadConfig {
                    max_file_size_mb: 1,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
            },
        }
    }

    pub fn with_max_upload_mb(mut self, max_file_size_mb: u64) -> Self {
        self.config.upload.max_file_size_mb = max_file_size_mb;
        self
    }

    pub fn with_session_secret(mut self, secret: &str) -> Self {
        self.config.session.secret = secret.to_string();
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
