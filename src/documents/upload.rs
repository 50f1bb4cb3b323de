// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::content::filename_policy::{self, NameUse};
use crate::login::SessionContext;
use crate::public::{AppError, Outcome, finish, page_context, render_page};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use minijinja::context;
use std::fmt;

pub const UPLOAD_FIELD: &str = "myfile";
const NO_NAMES: [&str; 0] = [];

#[derive(Debug)]
enum UploadError {
    MissingFile,
    TooLarge(u64),
    Malformed(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::MissingFile => write!(f, "Choose a file to upload"),
            UploadError::TooLarge(mb) => write!(f, "Uploaded files may not exceed {} MB", mb),
            UploadError::Malformed(_) => write!(f, "The upload could not be read"),
        }
    }
}

struct ReceivedFile {
    filename: String,
    content: Vec<u8>,
}

pub async fn upload_form(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    if let Some(response) = session.require_signed_in(&state.tokens) {
        return response;
    }
    let page = page_context(&state, &mut session);
    let result = render_page(&state, "upload.html", context! { page => page }).map(Outcome::page);
    finish(&state, session, result)
}

pub async fn upload(
    state: web::Data<AppState>,
    mut session: SessionContext,
    mut payload: Multipart,
) -> HttpResponse {
    if let Some(response) = session.require_signed_in(&state.tokens) {
        return response;
    }

    let limit = state.config.upload.max_bytes();
    let received = read_upload(&mut payload, limit, state.config.upload.max_file_size_mb).await;
    let result = match received {
        Ok(file) => store_upload(&state, &mut session, file),
        Err(err) => {
            if let UploadError::Malformed(detail) = &err {
                log::warn!("Rejected malformed upload: {}", detail);
            }
            rejected(&state, &mut session, err.to_string())
        }
    };
    finish(&state, session, result)
}

fn store_upload(
    state: &AppState,
    session: &mut SessionContext,
    file: ReceivedFile,
) -> Result<Outcome, AppError> {
    if let Err(reason) = filename_policy::validate(&file.filename, NameUse::Upload, &NO_NAMES) {
        return rejected(state, session, reason.to_string());
    }
    let stored = state.documents.upload(&file.filename, &file.content)?;
    log::info!(
        "Uploaded '{}' as '{}' ({} bytes)",
        file.filename,
        stored,
        file.content.len()
    );
    session.flash_success("Your file has been uploaded successfully!");
    Ok(Outcome::redirect("/index"))
}

fn rejected(
    state: &AppState,
    session: &mut SessionContext,
    error: String,
) -> Result<Outcome, AppError> {
    let page = page_context(state, session);
    let html = render_page(state, "upload.html", context! { page => page, error => error })?;
    Ok(Outcome::unprocessable(html))
}

/// Reads the `myfile` part, skipping any other form fields.
async fn read_upload(
    payload: &mut Multipart,
    limit: Option<usize>,
    limit_mb: u64,
) -> Result<ReceivedFile, UploadError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Malformed(e.to_string()))?;
        if field.name() != Some(UPLOAD_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .unwrap_or_default();
        if filename.is_empty() {
            return Err(UploadError::MissingFile);
        }

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
            if let Some(limit) = limit
                && content.len() + chunk.len() > limit
            {
                return Err(UploadError::TooLarge(limit_mb));
            }
            content.extend_from_slice(&chunk);
        }
        return Ok(ReceivedFile { filename, content });
    }
    Err(UploadError::MissingFile)
}
