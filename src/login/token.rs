// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ValidatedConfig;
use actix_web::cookie::{Cookie, SameSite, time::OffsetDateTime};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const SESSION_ISSUER: &str = "flatdocs";

/// Everything the server remembers about a client between requests.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>, // SHA-256 hex of the content shown in the edit form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename_ext: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub state: SessionState,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub enum SessionError {
    TokenCreation(String),
    TokenVerification(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::TokenCreation(msg) => write!(f, "Session token creation error: {}", msg),
            SessionError::TokenVerification(msg) => {
                write!(f, "Session token verification error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Signs and verifies the session cookie.
#[derive(Clone)]
pub struct SessionTokenService {
    secret: String,
    cookie_name: String,
    expiration_hours: u64,
    secure_cookie: bool,
}

impl SessionTokenService {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            secret: config.session.secret.clone(),
            cookie_name: config.session.cookie_name.clone(),
            expiration_hours: config.session.expiration_hours,
            secure_cookie: config.session.secure_cookie,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn create_token(&self, state: &SessionState) -> Result<String, SessionError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours as i64);

        let claims = SessionClaims {
            state: state.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: SESSION_ISSUER.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| SessionError::TokenCreation(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| SessionError::TokenVerification(e.to_string()))?;

        Ok(token_data.claims)
    }

    pub fn session_cookie<'a>(&self, token: &str) -> Cookie<'a> {
        let expiration = Utc::now() + Duration::hours(self.expiration_hours as i64);
        let expires = match OffsetDateTime::from_unix_timestamp(expiration.timestamp()) {
            Ok(val) => val,
            Err(e) => {
                log::error!(
                    "Failed to convert expiration timestamp for session cookie: {}",
                    e
                );
                OffsetDateTime::UNIX_EPOCH
            }
        };

        Cookie::build(self.cookie_name.clone(), token.to_string())
            .path("/")
            .secure(self.secure_cookie)
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(expires)
            .finish()
    }
}
