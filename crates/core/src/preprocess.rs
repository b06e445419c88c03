//! Boilerplate stripping for documentation pages.
//!
//! Documentation themes wrap every page in navigation bars, sidebars, version
//! switchers and footers. Their text looks like content to the highlight
//! heuristics, so it is removed before the page is parsed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static HIDDEN_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("valid regex"));

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to remove script, style and noscript tags
    pub remove_scripts: bool,
    /// Whether to remove nav, header, footer and aside landmarks
    pub remove_navigation: bool,
    /// Whether to remove forms (search boxes, version switchers)
    pub remove_forms: bool,
    /// Whether to remove svg and canvas tags
    pub remove_graphics: bool,
    /// Whether to remove elements hidden with inline styles
    pub remove_hidden: bool,
    /// Whether to remove comments
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            remove_scripts: true,
            remove_navigation: true,
            remove_forms: true,
            remove_graphics: true,
            remove_hidden: true,
            remove_comments: true,
        }
    }
}

impl PreprocessConfig {
    fn removed_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.remove_scripts {
            tags.extend(["script", "style", "noscript"]);
        }
        if self.remove_navigation {
            tags.extend(["nav", "header", "footer", "aside"]);
        }
        if self.remove_forms {
            tags.push("form");
        }
        if self.remove_graphics {
            tags.extend(["svg", "canvas"]);
        }
        tags
    }
}

/// Strip boilerplate from a page before parsing it.
///
/// Every removal runs in one rewriting pass. Rewriting failures are not
/// fatal: the original markup is returned and the extraction heuristics deal
/// with the extra noise.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let removed = config.removed_tags();
    let mut element_handlers = Vec::new();

    if !removed.is_empty() {
        let selector = removed.join(", ");
        element_handlers.push(lol_html::element!(selector, |el| {
            el.remove();
            Ok(())
        }));
    }

    if config.remove_hidden {
        element_handlers.push(lol_html::element!("[style]", |el| {
            if let Some(style) = el.get_attribute("style")
                && HIDDEN_STYLE.is_match(&style)
            {
                el.remove();
            }
            Ok(())
        }));
    }

    let mut document_handlers = Vec::new();
    if config.remove_comments {
        document_handlers.push(lol_html::doc_comments!(|c| {
            c.remove();
            Ok(())
        }));
    }

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: element_handlers,
            document_content_handlers: document_handlers,
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if let Err(e) = rewriter.write(html.as_bytes()) {
        debug!(error = %e, "preprocessing failed, keeping original markup");
        return html.to_string();
    }

    if let Err(e) = rewriter.end() {
        debug!(error = %e, "preprocessing failed, keeping original markup");
        return html.to_string();
    }

    output
}
