// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::sanitizer::HtmlSanitizer;
use pulldown_cmark::{Options, Parser, html};

/// Markdown to sanitized HTML. Holds no state besides the sanitizer rules.
pub struct MarkdownRenderer {
    sanitizer: HtmlSanitizer,
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        Self {
            sanitizer: HtmlSanitizer::new(),
            options,
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        self.sanitizer.clean(&html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_renders_h1() {
        let html = MarkdownRenderer::new().render("# Heading");
        assert!(html.contains("<h1>Heading</h1>"), "{}", html);
    }

    #[test]
    fn renders_emphasis_and_lists() {
        let html = MarkdownRenderer::new().render("Some *soft* text\n\n- one\n- two\n");
        assert!(html.contains("<em>soft</em>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let html = MarkdownRenderer::new().render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn task_lists_render_disabled_checkboxes() {
        let html = MarkdownRenderer::new().render("- [x] write docs\n- [ ] review\n");
        assert_eq!(html.matches(r#"type="checkbox""#).count(), 2, "{}", html);
        assert_eq!(html.matches("checked").count(), 1);
        assert!(html.contains("write docs"));
    }

    #[test]
    fn raw_script_is_removed() {
        let html = MarkdownRenderer::new().render("hello\n\n<script>alert('x')</script>\n");
        assert!(!html.contains("<script"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(MarkdownRenderer::new().render(""), "");
    }
}
