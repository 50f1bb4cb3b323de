// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Environment, Value, default_auto_escape_callback};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        env.add_filter("urlencode", urlencode_filter);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Percent-encodes a document name for use as one path segment.
fn urlencode_filter(value: String) -> String {
    urlencoding::encode(&value).into_owned()
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "layout.html" => Some(include_str!("html/layout.html")),
        "error_500.html" => Some(include_str!("html/error_500.html")),

        // Session pages
        "sign_in.html" => Some(include_str!("html/sign_in.html")),
        "sign_in_form.html" => Some(include_str!("html/sign_in_form.html")),
        "sign_up.html" => Some(include_str!("html/sign_up.html")),

        // Document pages
        "index.html" => Some(include_str!("html/index.html")),
        "new.html" => Some(include_str!("html/new.html")),
        "edit.html" => Some(include_str!("html/edit.html")),
        "upload.html" => Some(include_str!("html/upload.html")),
        "rename.html" => Some(include_str!("html/rename.html")),
        "document.html" => Some(include_str!("html/document.html")),

        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn page(username: Option<&str>, success: Option<&str>) -> Value {
        context! {
            app_name => "Docs",
            username => username,
            flash_success => success,
            flash_error => Option::<&str>::None
        }
    }

    #[test]
    fn every_embedded_template_parses() {
        let engine = MiniJinjaEngine::new();
        for name in [
            "layout.html",
            "error_500.html",
            "sign_in.html",
            "sign_in_form.html",
            "sign_up.html",
            "index.html",
            "new.html",
            "edit.html",
            "upload.html",
            "rename.html",
            "document.html",
        ] {
            assert!(engine.env.get_template(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn layout_shows_user_and_flash() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "index.html",
                context! {
                    page => page(Some("tester"), Some("Welcome!")),
                    documents => Vec::<Value>::new()
                },
            )
            .unwrap();
        assert!(html.contains("Signed in as tester"));
        assert!(html.contains("Welcome!"));
        assert!(html.contains("action=\"/sign_out\""));
    }

    #[test]
    fn index_links_each_document() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "index.html",
                context! {
                    page => page(Some("tester"), None),
                    documents => vec![
                        context! { name => "about.md", editable => true },
                        context! { name => "my notes.txt", editable => true },
                        context! { name => "photo.png", editable => false },
                    ]
                },
            )
            .unwrap();
        assert!(html.contains("href=\"/about.md\""));
        assert!(html.contains("href=\"/about.md/edit\""));
        assert!(html.contains("href=\"/my%20notes.txt/edit\""));
        assert!(html.contains("action=\"/photo.png/delete\""));
        assert!(!html.contains("/photo.png/edit"));
    }

    #[test]
    fn edit_form_posts_back_to_document() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "edit.html",
                context! {
                    page => page(Some("tester"), None),
                    filename => "my notes.txt",
                    content => "a < b"
                },
            )
            .unwrap();
        assert!(html.contains("action=\"/my%20notes.txt\""));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn rename_form_posts_basename() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "rename.html",
                context! {
                    page => page(Some("tester"), None),
                    basename => "draft one",
                    extension => ".md",
                    title => "draft one",
                    error => Option::<String>::None
                },
            )
            .unwrap();
        assert!(html.contains("action=\"/draft%20one/rename\""));
        assert!(html.contains("name=\"title\""));
    }

    #[test]
    fn flash_is_escaped() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "sign_in.html",
                context! { page => page(None, Some("<script>x</script>")) },
            )
            .unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(!html.contains("Signed in as"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert!(
            MiniJinjaEngine::new()
                .render("missing.html", Value::UNDEFINED)
                .is_err()
        );
    }
}
