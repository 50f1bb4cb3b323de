// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;
use config::ValidatedConfig;

pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod content;
pub mod documents;
pub mod iam;
pub mod login;
pub mod public;
pub mod runtime_paths;
pub mod templates;
pub mod util;

/// Registers the form limit and every route. Session routes go first: the
/// document routes end with `/{file}` patterns that would otherwise capture them.
pub fn configure_app(cfg: &mut web::ServiceConfig, config: &ValidatedConfig) {
    cfg.app_data(web::FormConfig::default().limit(config.upload.form_limit()));
    login::configure(cfg);
    documents::configure(cfg);
}
