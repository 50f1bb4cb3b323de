// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::content::filename_policy::{self, DocumentKind, NameError, NameUse};
use crate::login::SessionContext;
use crate::public::{AppError, Outcome, finish, page_context, render_page};
use actix_web::{HttpResponse, web};
use minijinja::context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
struct ListedDocument {
    name: String,
    editable: bool,
}

macro_rules! signed_in_or_return {
    ($state:expr, $session:expr) => {
        if let Some(response) = $session.require_signed_in(&$state.tokens) {
            return response;
        }
    };
}

/// Forms are parsed after the sign-in gate so signed-out posts always redirect.
macro_rules! form_or_return {
    ($form:expr) => {
        match $form {
            Ok(form) => form.into_inner(),
            Err(err) => {
                log::warn!("Rejected form submission: {}", err);
                return HttpResponse::from_error(err);
            }
        }
    };
}

pub async fn index(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = list_page(&state, &mut session);
    finish(&state, session, result)
}

fn list_page(state: &AppState, session: &mut SessionContext) -> Result<Outcome, AppError> {
    let documents: Vec<ListedDocument> = state
        .documents
        .list()?
        .into_iter()
        .map(|name| ListedDocument {
            editable: DocumentKind::from_filename(&name).is_some_and(DocumentKind::is_editable),
            name,
        })
        .collect();
    let page = page_context(state, session);
    let html = render_page(
        state,
        "index.html",
        context! { page => page, documents => documents },
    )?;
    Ok(Outcome::page(html))
}

pub async fn new_form(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    signed_in_or_return!(state, session);
    let page = page_context(&state, &mut session);
    let result = render_page(&state, "new.html", context! { page => page, filename => "" })
        .map(Outcome::page);
    finish(&state, session, result)
}

pub async fn create(
    state: web::Data<AppState>,
    mut session: SessionContext,
    form: Result<web::Form<CreateForm>, actix_web::Error>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let filename = form_or_return!(form).filename;
    let result = create_document(&state, &mut session, &filename);
    finish(&state, session, result)
}

fn create_document(
    state: &AppState,
    session: &mut SessionContext,
    filename: &str,
) -> Result<Outcome, AppError> {
    let existing = state.documents.list()?;
    if let Err(reason) = filename_policy::validate(filename, NameUse::Create, &existing) {
        let page = page_context(state, session);
        let html = render_page(
            state,
            "new.html",
            context! { page => page, filename => filename, error => reason.to_string() },
        )?;
        return Ok(Outcome::unprocessable(html));
    }

    let stored = state.documents.create(filename)?;
    log::info!("Created document '{}'", stored);
    session.flash_success(format!("\"{}\" has been created!", stored));
    Ok(Outcome::redirect("/index"))
}

pub async fn duplicate(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = state.documents.duplicate(&path).map_err(AppError::from).map(|copy| {
        log::info!("Duplicated '{}' as '{}'", path.as_str(), copy);
        session.flash_success(format!("\"{}\" has been created!", copy));
        Outcome::redirect("/index")
    });
    finish(&state, session, result)
}

pub async fn edit_form(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = edit_page(&state, &mut session, &path);
    finish(&state, session, result)
}

fn edit_page(
    state: &AppState,
    session: &mut SessionContext,
    file: &str,
) -> Result<Outcome, AppError> {
    ensure_editable(file)?;
    let stored = state.documents.resolve(file)?;
    let bytes = state.documents.read(&stored)?;
    let content = normalize_newlines(&String::from_utf8_lossy(&bytes));
    session.remember_snapshot(content.as_bytes());

    let page = page_context(state, session);
    let html = render_page(
        state,
        "edit.html",
        context! { page => page, filename => stored, content => content },
    )?;
    Ok(Outcome::page(html))
}

pub async fn update(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
    form: Result<web::Form<ContentForm>, actix_web::Error>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let form = form_or_return!(form);
    let result = update_document(&state, &mut session, &path, &form.content);
    finish(&state, session, result)
}

fn update_document(
    state: &AppState,
    session: &mut SessionContext,
    file: &str,
    content: &str,
) -> Result<Outcome, AppError> {
    ensure_editable(file)?;
    let stored = state.documents.resolve(file)?;
    let unchanged = session.take_snapshot_matches(normalize_newlines(content).as_bytes());
    state.documents.write(&stored, content.as_bytes())?;

    if unchanged {
        session.flash_success(format!("\"{}\" was unchanged", stored));
    } else {
        log::info!("Updated document '{}'", stored);
        session.flash_success(format!("\"{}\" has been updated", stored));
    }
    Ok(Outcome::redirect("/index"))
}

pub async fn view(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = view_document(&state, &mut session, &path);
    finish(&state, session, result)
}

fn view_document(
    state: &AppState,
    session: &mut SessionContext,
    file: &str,
) -> Result<Outcome, AppError> {
    let stored = state.documents.resolve(file)?;
    let bytes = state.documents.read(&stored)?;

    match DocumentKind::from_filename(&stored) {
        Some(DocumentKind::Markdown) => {
            let body = state.markdown.render(&String::from_utf8_lossy(&bytes));
            let page = page_context(state, session);
            let html = render_page(
                state,
                "document.html",
                context! { page => page, filename => stored, body => body },
            )?;
            Ok(Outcome::page(html))
        }
        Some(kind) => Ok(Outcome::Raw {
            content_type: kind.content_type(&stored),
            body: bytes,
        }),
        None => Ok(Outcome::Raw {
            content_type: "application/octet-stream".to_string(),
            body: bytes,
        }),
    }
}

pub async fn delete(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = state
        .documents
        .resolve(&path)
        .and_then(|stored| state.documents.delete(&stored).map(|_| stored))
        .map_err(AppError::from)
        .map(|stored| {
            log::info!("Deleted document '{}'", stored);
            session.flash_success(format!("\"{}\" has been deleted", stored));
            Outcome::redirect("/index")
        });
    finish(&state, session, result)
}

pub async fn rename_form(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let result = state
        .documents
        .resolve(&path)
        .map_err(AppError::from)
        .and_then(|stored| {
            let normalized = filename_policy::downcase_ext(&stored);
            let ext = filename_policy::extension(&normalized);
            let base = filename_policy::basename(&normalized).to_string();
            rename_page(&state, &mut session, &base, &ext, &base, None)
                .map(Outcome::page)
        });
    finish(&state, session, result)
}

fn rename_page(
    state: &AppState,
    session: &mut SessionContext,
    base: &str,
    ext: &str,
    title: &str,
    error: Option<String>,
) -> Result<String, AppError> {
    session.set_rename_ext(ext);
    let page = page_context(state, session);
    render_page(
        state,
        "rename.html",
        context! {
            page => page,
            basename => base,
            extension => ext,
            title => title,
            error => error
        },
    )
}

pub async fn rename(
    state: web::Data<AppState>,
    mut session: SessionContext,
    path: web::Path<String>,
    form: Result<web::Form<RenameForm>, actix_web::Error>,
) -> HttpResponse {
    signed_in_or_return!(state, session);
    let form = form_or_return!(form);
    let result = rename_document(&state, &mut session, &path, &form.title);
    finish(&state, session, result)
}

fn rename_document(
    state: &AppState,
    session: &mut SessionContext,
    param: &str,
    title: &str,
) -> Result<Outcome, AppError> {
    // The form posts the basename; the extension waits in the session.
    let ext = session.take_rename_ext().unwrap_or_default();
    let old_name = format!("{}{}", param, ext);
    let new_name = format!("{}{}", title, ext);

    let stored = state.documents.resolve(&old_name)?;
    let Some(kind) = DocumentKind::from_filename(&stored) else {
        return Err(AppError::conflict(
            format!("\"{}\" can't be renamed", stored),
            "/index",
        ));
    };

    let existing = state.documents.list()?;
    let checked = filename_policy::validate(title, NameUse::Field("name"), &existing)
        .and_then(|_| filename_policy::validate(&new_name, NameUse::Rename(kind), &existing));
    match checked {
        Ok(()) => {}
        Err(NameError::InUse) => {
            return Err(AppError::conflict(
                NameError::InUse.to_string(),
                rename_location(&stored),
            ));
        }
        Err(reason) => {
            let html = rename_page(
                state,
                session,
                param,
                &ext,
                title,
                Some(reason.to_string()),
            )?;
            return Ok(Outcome::unprocessable(html));
        }
    }

    state.documents.rename(&stored, &new_name).map_err(|err| match err {
        crate::content::StoreError::Conflict(_) => {
            AppError::conflict(NameError::InUse.to_string(), rename_location(&stored))
        }
        other => AppError::from(other),
    })?;
    log::info!("Renamed '{}' to '{}'", stored, new_name);
    session.flash_success(format!("\"{}\" is renamed to \"{}\"", stored, new_name));
    Ok(Outcome::redirect("/index"))
}

fn rename_location(name: &str) -> String {
    format!("/{}/rename", urlencoding::encode(name))
}

fn ensure_editable(file: &str) -> Result<(), AppError> {
    if DocumentKind::from_filename(file).is_some_and(DocumentKind::is_editable) {
        return Ok(());
    }
    let ext = filename_policy::extension(file);
    let message = if ext.is_empty() {
        "Files without an extension can't be edited".to_string()
    } else {
        format!("{} files can't be edited", ext)
    };
    Err(AppError::conflict(message, "/index"))
}

/// Browsers submit textarea content with CRLF line endings.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
