// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use flatdocs::app_state::AppState;
use flatdocs::config::ValidatedConfig;
use flatdocs::login::SessionState;
use flatdocs::util::test_config::test_config;
use flatdocs::util::test_fixtures::TestFixtureRoot;
use std::fs;

pub const TESTER: &str = "tester";
pub const TESTER_PASSWORD: &str = "secret";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub app_state: web::Data<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ValidatedConfig) -> Self {
        let fixture = TestFixtureRoot::new_unique("http-suite").expect("fixture root");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");
        let app_state = AppState::new(config, runtime_paths).expect("app state");
        app_state
            .credentials
            .create(TESTER, TESTER_PASSWORD)
            .expect("seed tester account");

        Self {
            fixture,
            app_state: web::Data::new(app_state),
        }
    }

    pub fn seed(&self, name: &str, content: &[u8]) {
        self.fixture
            .seed_document(name, content)
            .expect("seed document");
    }

    pub fn document(&self, name: &str) -> Option<Vec<u8>> {
        fs::read(self.fixture.data_dir().join(name)).ok()
    }

    pub fn document_names(&self) -> Vec<String> {
        self.app_state.documents.list().expect("list documents")
    }

    pub fn cookie_for(&self, state: &SessionState) -> Cookie<'static> {
        let token = self
            .app_state
            .tokens
            .create_token(state)
            .expect("session token");
        self.app_state.tokens.session_cookie(&token)
    }

    /// Session of a client that signed in as the seeded tester.
    pub fn signed_in(&self) -> Cookie<'static> {
        self.cookie_for(&SessionState {
            user: Some(TESTER.to_string()),
            ..SessionState::default()
        })
    }

    /// Session state the response hands back to the client.
    pub fn session_after(&self, resp: &ServiceResponse) -> SessionState {
        let cookie_name = self.app_state.tokens.cookie_name().to_string();
        let cookie = resp
            .response()
            .cookies()
            .find(|cookie| cookie.name() == cookie_name)
            .expect("session cookie");
        self.app_state
            .tokens
            .verify_token(cookie.value())
            .expect("valid session token")
            .state
    }

    /// The cookie from `resp`, ready to send with the next request.
    pub fn next_cookie(&self, resp: &ServiceResponse) -> Cookie<'static> {
        self.cookie_for(&self.session_after(resp))
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        build_test_app(self.app_state.clone())
    }
}

pub fn build_test_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state.clone())
        .configure(|cfg| flatdocs::configure_app(cfg, &app_state.config))
}

pub fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get("Location")
        .expect("location header")
        .to_str()
        .expect("location string")
        .to_string()
}

pub async fn body_text(resp: ServiceResponse) -> String {
    let body = actix_web::test::read_body(resp).await;
    String::from_utf8_lossy(&body).to_string()
}

/// multipart/form-data body with one file part; returns (content type, body).
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----flatdocs-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (
        format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}
