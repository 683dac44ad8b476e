//! HTML post-processing

use minify_html::Cfg;

use crate::error::{Error, Result};

/// Markup compaction applied before a page is written
pub trait Minifier: Send + Sync {
    fn minify(&self, html: &str) -> Result<String>;
}

/// `minify-html` backed minifier.
///
/// Keeps the doctype, closing tags and the `<html>`/`<head>` opening tags
/// so the output stays a complete, valid document. Inline `<script>` and
/// `<style>` bodies are left byte-for-byte: only markup and text
/// whitespace are compacted.
pub struct HtmlMinifier {
    cfg: Cfg,
}

impl HtmlMinifier {
    pub fn new() -> Self {
        Self {
            cfg: Cfg {
                minify_css: false,
                minify_js: false,
                do_not_minify_doctype: true,
                keep_closing_tags: true,
                keep_html_and_head_opening_tags: true,
                ..Cfg::default()
            },
        }
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Minifier for HtmlMinifier {
    fn minify(&self, html: &str) -> Result<String> {
        let out = minify_html::minify(html.as_bytes(), &self.cfg);
        String::from_utf8(out)
            .map_err(|_| Error::materialization("", "minification produced invalid UTF-8"))
    }
}

/// Passes markup through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Minifier for Passthrough {
    fn minify(&self, html: &str) -> Result<String> {
        Ok(html.to_string())
    }
}
