// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::session::SessionContext;
use crate::app_state::AppState;
use crate::iam::IamError;
use crate::public::{AppError, Outcome, finish, page_context, render_page};
use actix_web::{HttpResponse, web};
use minijinja::context;
use serde::Deserialize;

pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn landing(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    if session.is_signed_in() {
        return finish(&state, session, Ok(Outcome::redirect("/index")));
    }
    let page = page_context(&state, &mut session);
    let result = render_page(&state, "sign_in.html", context! { page => page }).map(Outcome::page);
    finish(&state, session, result)
}

pub async fn sign_out(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    if let Some(username) = session.username() {
        log::info!("User '{}' signed out", username);
    }
    session.sign_out();
    session.flash_success("You have been signed out");
    finish(&state, session, Ok(Outcome::redirect("/")))
}

pub async fn sign_in_form(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    let page = page_context(&state, &mut session);
    let result = render_page(
        &state,
        "sign_in_form.html",
        context! { page => page, username => "" },
    )
    .map(Outcome::page);
    finish(&state, session, result)
}

pub async fn sign_in(
    state: web::Data<AppState>,
    mut session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    let CredentialsForm { username, password } = form.into_inner();
    let credentials = state.credentials.clone();
    let candidate = username.clone();
    let valid = match web::block(move || credentials.verify(&candidate, &password)).await {
        Ok(valid) => valid,
        Err(e) => {
            return finish(
                &state,
                session,
                Err(AppError::Internal(format!("credential check failed: {}", e))),
            );
        }
    };

    if valid {
        log::info!("User '{}' signed in", username);
        session.sign_in(&username);
        session.flash_success("Welcome!");
        return finish(&state, session, Ok(Outcome::redirect("/index")));
    }

    log::warn!("Failed sign-in attempt for '{}'", username);
    let page = page_context(&state, &mut session);
    let result = render_page(
        &state,
        "sign_in_form.html",
        context! { page => page, username => username, error => INVALID_CREDENTIALS },
    )
    .map(Outcome::unprocessable);
    finish(&state, session, result)
}

pub async fn sign_up_form(state: web::Data<AppState>, mut session: SessionContext) -> HttpResponse {
    let page = page_context(&state, &mut session);
    let result = render_page(&state, "sign_up.html", context! { page => page, username => "" })
        .map(Outcome::page);
    finish(&state, session, result)
}

pub async fn sign_up(
    state: web::Data<AppState>,
    mut session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    let CredentialsForm { username, password } = form.into_inner();
    let credentials = state.credentials.clone();
    let candidate = username.clone();
    let created = match web::block(move || credentials.create(&candidate, &password)).await {
        Ok(created) => created,
        Err(e) => Err(IamError::FileError(format!("sign-up task failed: {}", e))),
    };

    let result = match created {
        Ok(()) => {
            log::info!("Registered user '{}'", username);
            session.flash_success(format!(
                "Thanks for signing up {}! Now you can sign in!",
                username
            ));
            Ok(Outcome::redirect("/sign_in_form"))
        }
        Err(IamError::InvalidField(reason)) => {
            let page = page_context(&state, &mut session);
            render_page(
                &state,
                "sign_up.html",
                context! { page => page, username => username, error => reason },
            )
            .map(Outcome::unprocessable)
        }
        Err(err) => Err(AppError::from(err)),
    };
    finish(&state, session, result)
}
