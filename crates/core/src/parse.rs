//! HTML parsing and the text helpers every extractor shares.
//!
//! # Example
//!
//! ```rust
//! use herald_core::parse::{Document, clean_heading};
//! use herald_core::DomTree;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h2>Version 1.7.0<a class="headerlink">#</a></h2>
//!             <ul><li>Fix a crash</li></ul>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let tree = DomTree::build(&doc);
//! assert_eq!(tree.headings()[0].text, "Version 1.7.0");
//! assert_eq!(clean_heading("Legend ¶"), "Legend");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::Result;
use crate::preprocess::{PreprocessConfig, preprocess_html};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    ///
    /// Release notes are parsed this way: their legend and section structure
    /// must stay intact.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Parses HTML after stripping navigation, scripts and other page chrome.
    ///
    /// Release highlights pages are parsed this way, so theme boilerplate does
    /// not turn into highlight candidates.
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Result<Self> {
        let cleaned = preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// All text of the page with whitespace collapsed
    pub fn text_content(&self) -> String {
        collapse_whitespace(&self.html.root_element().text().collect::<Vec<_>>().join(" "))
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Normalize heading text as rendered by Sphinx-style themes.
///
/// Headings carry a permalink anchor whose text is `#` or `¶`; it is dropped.
pub fn clean_heading(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    collapsed.trim_end_matches(['#', '¶', ' ']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_is_collapsed() {
        let doc = Document::parse("<body><h1>Version\n 1.7</h1><p>Fix   a crash</p></body>").unwrap();
        assert_eq!(doc.text_content(), "Version 1.7 Fix a crash");
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let doc = Document::parse("<ul><li>Unclosed <b>bold<li>Second</ul></div>").unwrap();
        assert!(doc.text_content().contains("Second"));
    }

    #[test]
    fn test_parse_with_preprocessing_drops_navigation() {
        let html = "<body><nav>Choose version</nav><p>Body text</p></body>";
        let doc = Document::parse_with_preprocessing(html, &PreprocessConfig::default()).unwrap();

        let text = doc.text_content();
        assert!(!text.contains("Choose version"));
        assert!(text.contains("Body text"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Alice,\n   Bob\t "), "Alice, Bob");
    }

    #[test]
    fn test_clean_heading_drops_permalink() {
        assert_eq!(clean_heading("Version 1.7.0#"), "Version 1.7.0");
        assert_eq!(clean_heading("\n  Legend for changelogs ¶\n"), "Legend for changelogs");
    }
}
