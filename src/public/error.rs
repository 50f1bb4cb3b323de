// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::StoreError;
use crate::iam::IamError;
use crate::templates::{ErrorPageContext, TemplateEngine, render_minijinja_template};
use actix_web::HttpResponse;
use std::fmt;

/// Failures that escape a handler. Validation problems never get here: the
/// handler re-renders its form with status 422 instead.
#[derive(Debug)]
pub enum AppError {
    /// Flash the message and send the client back to the listing.
    NotFound(String),
    /// Flash the message and redirect to `location`.
    Conflict { message: String, location: String },
    Internal(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>, location: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Conflict { message, .. } => write!(f, "{}", message),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::InvalidName(name) => {
                AppError::NotFound(StoreError::NotFound(name).to_string())
            }
            StoreError::Conflict(_) => AppError::conflict(err.to_string(), "/index"),
            StoreError::Io(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<IamError> for AppError {
    fn from(err: IamError) -> Self {
        match err {
            IamError::UsernameTaken(_) => AppError::conflict(err.to_string(), "/sign_up"),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Internal(format!("template rendering failed: {}", err))
    }
}

pub fn serve_500(app_name: &str, template_engine: Option<&dyn TemplateEngine>) -> HttpResponse {
    let context = ErrorPageContext::new(app_name).to_value();

    let html = match template_engine {
        Some(engine) => match render_minijinja_template(engine, "error_500.html", context) {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to render 500 error template: {}", e);
                fallback_500_html(app_name)
            }
        },
        None => fallback_500_html(app_name),
    };

    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-store"))
        .body(html)
}

fn fallback_500_html(app_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>500 - Internal Server Error | {}</title></head>
<body><h1>500 - Internal Server Error</h1></body></html>"#,
        app_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::MiniJinjaEngine;
    use actix_web::http::StatusCode;

    #[test]
    fn store_errors_map_to_user_messages() {
        let not_found = AppError::from(StoreError::NotFound("a.txt".to_string()));
        assert_eq!(not_found.to_string(), "\"a.txt\" does not exist.");

        let invalid = AppError::from(StoreError::InvalidName("../x".to_string()));
        assert!(matches!(invalid, AppError::NotFound(_)));

        let conflict = AppError::from(StoreError::Conflict("a_copy.txt".to_string()));
        assert!(matches!(
            conflict,
            AppError::Conflict { ref location, .. } if location == "/index"
        ));

        let io = AppError::from(StoreError::Io(std::io::Error::other("disk")));
        assert!(matches!(io, AppError::Internal(_)));
    }

    #[test]
    fn taken_username_redirects_to_sign_up() {
        let err = AppError::from(IamError::UsernameTaken("bob".to_string()));
        assert_eq!(err.to_string(), "Username taken");
        assert!(matches!(
            err,
            AppError::Conflict { ref location, .. } if location == "/sign_up"
        ));
    }

    #[test]
    fn serve_500_renders_template_and_fallback() {
        let engine = MiniJinjaEngine::new();
        let response = serve_500("Docs", Some(&engine));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = fallback_500_html("Docs");
        assert!(html.contains("500 - Internal Server Error | Docs"));
        assert_eq!(serve_500("Docs", None).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
