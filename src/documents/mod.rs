// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

mod handlers;
mod upload;

pub use upload::UPLOAD_FIELD;

/// Document routes. Fixed paths come first so `/{file}` cannot shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/index", web::get().to(handlers::index))
        .route("/new", web::get().to(handlers::new_form))
        .route("/create", web::post().to(handlers::create))
        .route("/upload", web::get().to(upload::upload_form))
        .route("/upload", web::post().to(upload::upload))
        .route("/{file}/duplicate", web::get().to(handlers::duplicate))
        .route("/{file}/edit", web::get().to(handlers::edit_form))
        .route("/{file}/delete", web::post().to(handlers::delete))
        .route("/{file}/rename", web::get().to(handlers::rename_form))
        .route("/{file}/rename", web::post().to(handlers::rename))
        .route("/{file}", web::post().to(handlers::update))
        .route("/{file}", web::get().to(handlers::view));
}
