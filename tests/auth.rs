// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::cookie::Cookie;
use actix_web::{http::StatusCode, test};
use common::{TESTER, TESTER_PASSWORD, TestHarness, body_text, location};
use flatdocs::iam::{CredentialStore, FileCredentialStore};
use flatdocs::login::SessionState;

#[actix_web::test]
async fn landing_page_offers_sign_in_when_signed_out() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-store");
    let html = body_text(resp).await;
    assert!(html.contains("Sign In"));
    assert!(!html.contains("Signed in as"));
}

#[actix_web::test]
async fn landing_page_redirects_signed_in_users() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(harness.signed_in())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/index");
}

#[actix_web::test]
async fn sign_in_form_renders() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get().uri("/sign_in_form").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("\"username\">Username:</label>"));
}

#[actix_web::test]
async fn valid_credentials_sign_in() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::post()
        .uri("/sign_in_form")
        .set_form([("username", TESTER), ("password", TESTER_PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/index");

    let session = harness.session_after(&resp);
    assert_eq!(session.user.as_deref(), Some(TESTER));
    assert_eq!(session.success.as_deref(), Some("Welcome!"));

    let req = test::TestRequest::get()
        .uri("/index")
        .cookie(harness.next_cookie(&resp))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Welcome!"));
    assert!(html.contains("Signed in as tester"));
}

#[actix_web::test]
async fn invalid_credentials_rerender_the_form() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    for (username, password) in [
        (TESTER, "wrong"),
        ("nobody", TESTER_PASSWORD),
        ("", ""),
        ("bad/name", TESTER_PASSWORD),
    ] {
        let req = test::TestRequest::post()
            .uri("/sign_in_form")
            .set_form([("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(harness.session_after(&resp).user.is_none());
        let html = body_text(resp).await;
        assert!(html.contains("Invalid Credentials"));
        assert!(html.contains("\"username\">Username:</label>"));
    }
}

#[actix_web::test]
async fn sign_out_clears_the_user() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::post()
        .uri("/sign_out")
        .cookie(harness.signed_in())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let session = harness.session_after(&resp);
    assert!(session.user.is_none());
    assert_eq!(session.success.as_deref(), Some("You have been signed out"));

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(harness.next_cookie(&resp))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("You have been signed out"));
}

#[actix_web::test]
async fn sign_up_creates_an_account() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get().uri("/sign_up").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/sign_up")
        .set_form([("username", "newbie"), ("password", "hunter2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/sign_in_form");
    assert_eq!(
        harness.session_after(&resp).success.as_deref(),
        Some("Thanks for signing up newbie! Now you can sign in!")
    );

    let store = FileCredentialStore::new(harness.app_state.runtime_paths.users_file.clone())
        .expect("credential store");
    let credentials = store.load().expect("load users");
    let stored = credentials.get("newbie").expect("newbie stored");
    assert!(stored.starts_with("$argon2id$"));
    assert_ne!(stored, "hunter2");

    let req = test::TestRequest::post()
        .uri("/sign_in_form")
        .set_form([("username", "newbie"), ("password", "hunter2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(harness.session_after(&resp).user.as_deref(), Some("newbie"));
}

#[actix_web::test]
async fn sign_up_with_taken_username_redirects_back() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::post()
        .uri("/sign_up")
        .set_form([("username", TESTER), ("password", "another")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/sign_up");
    assert_eq!(
        harness.session_after(&resp).error.as_deref(),
        Some("Username taken")
    );
    assert!(harness.app_state.credentials.verify(TESTER, TESTER_PASSWORD));
}

#[actix_web::test]
async fn sign_up_with_invalid_fields_is_unprocessable() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    for (username, password, message) in [
        ("", "pw", "A username is required"),
        ("bad*name", "pw", "The username may not include special characters."),
        ("gooduser", "", "A password is required"),
    ] {
        let req = test::TestRequest::post()
            .uri("/sign_up")
            .set_form([("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(resp).await;
        assert!(html.contains(message), "{}", message);
    }
    let store = FileCredentialStore::new(harness.app_state.runtime_paths.users_file.clone())
        .expect("credential store");
    assert!(!store.load().expect("load users").contains_key("gooduser"));
}

#[actix_web::test]
async fn tampered_cookie_counts_as_signed_out() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let cookie_name = harness.app_state.tokens.cookie_name().to_string();
    let req = test::TestRequest::get()
        .uri("/index")
        .cookie(Cookie::new(cookie_name, "forged.token.value"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(
        harness.session_after(&resp).error.as_deref(),
        Some("You must be signed in to do that")
    );
}

#[actix_web::test]
async fn flash_is_shown_once() {
    let harness = TestHarness::new();
    let app = test::init_service(harness.app()).await;

    let cookie = harness.cookie_for(&SessionState {
        user: Some(TESTER.to_string()),
        success: Some("One time only".to_string()),
        ..SessionState::default()
    });
    let req = test::TestRequest::get()
        .uri("/index")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let next = harness.next_cookie(&resp);
    assert!(harness.session_after(&resp).success.is_none());
    assert!(body_text(resp).await.contains("One time only"));

    let req = test::TestRequest::get().uri("/index").cookie(next).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(!body_text(resp).await.contains("One time only"));
}
