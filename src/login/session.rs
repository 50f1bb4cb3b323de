// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::token::{SessionState, SessionTokenService};
use crate::app_state::AppState;
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use sha2::{Digest, Sha256};
use std::future::{Ready, ready};

pub const SIGNED_OUT_MESSAGE: &str = "You must be signed in to do that";

/// Flash messages waiting to be shown once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Per-request view of the client's session cookie. Handlers mutate it and
/// finish with [`SessionContext::redirect`] or [`SessionContext::render`],
/// which write the re-signed cookie back.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: SessionState,
}

impl SessionContext {
    pub fn from_state(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn username(&self) -> Option<&str> {
        self.state.user.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.user.is_some()
    }

    pub fn sign_in(&mut self, username: &str) {
        self.state.user = Some(username.to_string());
    }

    pub fn sign_out(&mut self) {
        self.state.user = None;
        self.state.snapshot = None;
        self.state.rename_ext = None;
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.state.success = Some(message.into());
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.state.error = Some(message.into());
    }

    /// Returns and clears the pending flash messages.
    pub fn take_flash(&mut self) -> Flash {
        Flash {
            success: self.state.success.take(),
            error: self.state.error.take(),
        }
    }

    pub fn remember_snapshot(&mut self, content: &[u8]) {
        self.state.snapshot = Some(content_digest(content));
    }

    /// True when `content` matches the snapshot taken by the edit form.
    /// Consumes the snapshot.
    pub fn take_snapshot_matches(&mut self, content: &[u8]) -> bool {
        self.state
            .snapshot
            .take()
            .is_some_and(|digest| digest == content_digest(content))
    }

    pub fn set_rename_ext(&mut self, ext: &str) {
        self.state.rename_ext = Some(ext.to_string());
    }

    pub fn take_rename_ext(&mut self) -> Option<String> {
        self.state.rename_ext.take()
    }

    pub fn redirect(self, tokens: &SessionTokenService, location: &str) -> HttpResponse {
        let mut builder = HttpResponse::Found();
        builder.insert_header((LOCATION, location.to_string()));
        self.finish(tokens, builder)
    }

    pub fn render(
        self,
        tokens: &SessionTokenService,
        status: StatusCode,
        html: String,
    ) -> HttpResponse {
        let mut builder = HttpResponse::build(status);
        builder
            .content_type("text/html; charset=utf-8")
            .insert_header((CACHE_CONTROL, "no-store"));
        self.finish_with_body(tokens, builder, html)
    }

    /// Attaches the cookie to an arbitrary response, e.g. a raw document.
    pub fn respond(
        self,
        tokens: &SessionTokenService,
        builder: actix_web::HttpResponseBuilder,
        body: impl actix_web::body::MessageBody + 'static,
    ) -> HttpResponse {
        self.finish_with_body(tokens, builder, body)
    }

    /// Redirects signed-out clients to the landing page with an error flash.
    pub fn require_signed_in(&mut self, tokens: &SessionTokenService) -> Option<HttpResponse> {
        if self.is_signed_in() {
            return None;
        }
        self.flash_error(SIGNED_OUT_MESSAGE);
        Some(self.clone().redirect(tokens, "/"))
    }

    fn finish(
        self,
        tokens: &SessionTokenService,
        builder: actix_web::HttpResponseBuilder,
    ) -> HttpResponse {
        self.finish_with_body(tokens, builder, ())
    }

    fn finish_with_body(
        self,
        tokens: &SessionTokenService,
        mut builder: actix_web::HttpResponseBuilder,
        body: impl actix_web::body::MessageBody + 'static,
    ) -> HttpResponse {
        match tokens.create_token(&self.state) {
            Ok(token) => {
                builder.cookie(tokens.session_cookie(&token));
            }
            Err(e) => {
                log::error!("Failed to sign session cookie: {}", e);
            }
        }
        builder.body(body)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_state(read_session_state(req))))
    }
}

fn read_session_state(req: &HttpRequest) -> SessionState {
    let Some(app_state) = req.app_data::<Data<AppState>>() else {
        log::error!("Session requested without application state");
        return SessionState::default();
    };
    let Some(cookie) = req.cookie(app_state.tokens.cookie_name()) else {
        return SessionState::default();
    };
    match app_state.tokens.verify_token(cookie.value()) {
        Ok(claims) => claims.state,
        Err(e) => {
            log::debug!("Ignoring unusable session cookie: {}", e);
            SessionState::default()
        }
    }
}

fn content_digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
