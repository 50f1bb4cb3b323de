// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::login::Flash;
use minijinja::{Value, context};

/// Values every page layout needs: app name, signed-in user and flash.
#[derive(Debug, Clone)]
pub struct PageContext {
    app_name: String,
    username: Option<String>,
    flash: Flash,
}

impl PageContext {
    pub fn new(app_name: &str, username: Option<&str>, flash: Flash) -> Self {
        Self {
            app_name: app_name.to_string(),
            username: username.map(str::to_string),
            flash,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            username => &self.username,
            flash_success => &self.flash.success,
            flash_error => &self.flash.error
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    app_name: String,
}

impl ErrorPageContext {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            page => context! { app_name => &self.app_name }
        }
    }
}
