// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

mod handlers;
mod session;
mod token;

pub use session::{Flash, SIGNED_OUT_MESSAGE, SessionContext};
pub use token::{SessionClaims, SessionError, SessionState, SessionTokenService};

/// Landing page, sign in, sign up and sign out.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::landing))
        .route("/sign_out", web::post().to(handlers::sign_out))
        .route("/sign_in_form", web::get().to(handlers::sign_in_form))
        .route("/sign_in_form", web::post().to(handlers::sign_in))
        .route("/sign_up", web::get().to(handlers::sign_up_form))
        .route("/sign_up", web::post().to(handlers::sign_up));
}
