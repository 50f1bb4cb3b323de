// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::{AppError, serve_500};
use crate::app_state::AppState;
use crate::login::SessionContext;
use crate::templates::{PageContext, render_minijinja_template};
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::CACHE_CONTROL;
use minijinja::Value;

/// What a handler produced, before the session cookie is attached.
#[derive(Debug)]
pub enum Outcome {
    Redirect(String),
    Page { status: StatusCode, html: String },
    Raw { content_type: String, body: Vec<u8> },
}

impl Outcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        Outcome::Redirect(location.into())
    }

    pub fn page(html: String) -> Self {
        Outcome::Page {
            status: StatusCode::OK,
            html,
        }
    }

    pub fn unprocessable(html: String) -> Self {
        Outcome::Page {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            html,
        }
    }
}

/// Layout values for the next page. Takes the pending flash out of the session.
pub fn page_context(state: &AppState, session: &mut SessionContext) -> Value {
    let flash = session.take_flash();
    PageContext::new(state.app_name(), session.username(), flash).to_value()
}

pub fn render_page(state: &AppState, template: &str, context: Value) -> Result<String, AppError> {
    Ok(render_minijinja_template(
        state.templates.as_ref(),
        template,
        context,
    )?)
}

/// Turns a handler result into the HTTP response, writing the session back.
pub fn finish(
    state: &AppState,
    mut session: SessionContext,
    result: Result<Outcome, AppError>,
) -> HttpResponse {
    match result {
        Ok(Outcome::Redirect(location)) => session.redirect(&state.tokens, &location),
        Ok(Outcome::Page { status, html }) => session.render(&state.tokens, status, html),
        Ok(Outcome::Raw { content_type, body }) => {
            let mut builder = HttpResponse::Ok();
            builder
                .content_type(content_type)
                .insert_header((CACHE_CONTROL, "no-store"));
            session.respond(&state.tokens, builder, body)
        }
        Err(AppError::NotFound(message)) => {
            session.flash_error(message);
            session.redirect(&state.tokens, "/index")
        }
        Err(AppError::Conflict { message, location }) => {
            session.flash_error(message);
            session.redirect(&state.tokens, &location)
        }
        Err(AppError::Internal(message)) => {
            log::error!("Request failed: {}", message);
            serve_500(state.app_name(), Some(state.templates.as_ref()))
        }
    }
}
