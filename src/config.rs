// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MIN_SESSION_SECRET_CHARS: usize = 32;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "Flatdocs".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4567
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub secret: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u64,
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_cookie_name() -> String {
    "flatdocs_session".to_string()
}

fn default_expiration_hours() -> u64 {
    12
}

/// argon2id cost parameters for newly created password hashes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

pub const DEFAULT_ARGON2_PARAMS: Argon2Params = Argon2Params {
    memory_kib: 19456,
    iterations: 2,
    parallelism: 1,
};

impl Default for Argon2Params {
    fn default() -> Self {
        DEFAULT_ARGON2_PARAMS
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64, // 0 means unlimited
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

impl UploadConfig {
    pub fn max_bytes(&self) -> Option<usize> {
        if self.max_file_size_mb == 0 {
            return None;
        }
        Some((self.max_file_size_mb as usize).saturating_mul(1024 * 1024))
    }

    /// Body limit for urlencoded forms. Saved documents may be as large as an
    /// upload, and percent-encoding can triple their size on the wire.
    pub fn form_limit(&self) -> usize {
        self.max_bytes()
            .map_or(usize::MAX, |bytes| bytes.saturating_mul(3))
            .max(MIN_FORM_LIMIT)
    }
}

const MIN_FORM_LIMIT: usize = 64 * 1024;

fn default_max_file_size_mb() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: Argon2Params,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub password: Argon2Params,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.session.secret.chars().count() < MIN_SESSION_SECRET_CHARS {
            return Err(ConfigError::ValidationError(format!(
                "session.secret must be at least {} characters",
                MIN_SESSION_SECRET_CHARS
            )));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if self.session.expiration_hours < 1 {
            return Err(ConfigError::ValidationError(format!(
                "session.expiration_hours must be at least 1, got: {}",
                self.session.expiration_hours
            )));
        }
        if self.server.workers < 1 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        crate::iam::check_params(&self.password).map_err(|e| {
            ConfigError::ValidationError(format!("password parameters rejected: {}", e))
        })?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        Ok(ValidatedConfig {
            app: self.app,
            server: self.server,
            session: self.session,
            password: self.password,
            upload: self.upload,
            logging: LoggingConfig { level },
        })
    }
}

impl ValidatedConfig {
    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
