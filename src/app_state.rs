// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::content::DocumentStore;
use crate::iam::{CredentialService, CredentialStore, FileCredentialStore, IamError};
use crate::login::SessionTokenService;
use crate::public::markdown::MarkdownRenderer;
use crate::runtime_paths::RuntimePaths;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

pub struct AppState {
    pub config: ValidatedConfig,
    pub templates: Arc<dyn TemplateEngine>,
    pub documents: DocumentStore,
    pub credentials: Arc<CredentialService>,
    pub markdown: MarkdownRenderer,
    pub tokens: SessionTokenService,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    pub fn new(config: ValidatedConfig, runtime_paths: RuntimePaths) -> Result<Self, IamError> {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(runtime_paths.users_file.clone())?);
        Ok(Self::with_credential_store(config, runtime_paths, store))
    }

    pub fn with_credential_store(
        config: ValidatedConfig,
        runtime_paths: RuntimePaths,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            templates: Arc::new(MiniJinjaEngine::new()),
            documents: DocumentStore::new(runtime_paths.data_dir.clone()),
            credentials: Arc::new(CredentialService::new(store, config.password.clone())),
            markdown: MarkdownRenderer::new(),
            tokens: SessionTokenService::new(&config),
            runtime_paths,
            config,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.config.app.name
    }
}
