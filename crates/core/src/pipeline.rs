//! Release analysis: from two HTML pages to a [`ReleaseReport`].
//!
//! # Example
//!
//! ```rust
//! use herald_core::{Herald, ReleasePages, Version};
//!
//! let notes = r#"
//!     <h2>Version 1.7.0</h2>
//!     <ul><li><span class="badge">Fix</span> A crash in the tree builder.</li></ul>
//!     <h3>Code and documentation contributors</h3>
//!     <p>Alice Smith, Bob Jones</p>
//! "#;
//! let pages = ReleasePages { notes: Some(notes.to_string()), highlights: None };
//!
//! let herald = Herald::new();
//! let report = herald.analyze(&Version::parse("1.7").unwrap(), &pages).unwrap();
//!
//! assert_eq!(report.summary.fixes, 1);
//! assert_eq!(report.contributors, 2);
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::changelog::{ReleaseSection, TagCounts, TagSummary, count_tags};
use crate::config::ProjectConfig;
use crate::contributors::count_contributors;
use crate::dom_tree::DomTree;
#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, PageSources, fetch_release_pages};
use crate::fetch::ReleasePages;
use crate::formatters::post::compose_post;
use crate::highlights::{HighlightConfig, HighlightSources, extract_highlights};
use crate::parse::Document;
use crate::preprocess::PreprocessConfig;
use crate::release::{ReleaseUrls, Version};
use crate::Result;

/// Where the figures of a report came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Whether the release notes page was available
    pub notes_page: bool,
    /// Whether the release highlights page was available
    pub highlights_page: bool,
    /// Strategy that produced the tag counts
    pub tag_strategy: Option<&'static str>,
    /// Strategy that produced the highlights
    pub highlight_strategy: Option<&'static str>,
}

/// Everything extracted for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
    pub version: Version,
    pub urls: ReleaseUrls,
    pub tags: TagCounts,
    pub summary: TagSummary,
    pub highlights: Vec<String>,
    pub contributors: usize,
    pub contributor_names: Vec<String>,
    pub provenance: Provenance,
}

impl ReleaseReport {
    /// Build a report from already extracted figures
    pub fn new(version: Version, urls: ReleaseUrls, tags: TagCounts, highlights: Vec<String>, contributors: usize) -> Self {
        Self {
            version,
            urls,
            summary: tags.summary(),
            tags,
            highlights,
            contributors,
            contributor_names: Vec::new(),
            provenance: Provenance::default(),
        }
    }
}

/// Main entry point for release analysis.
///
/// Holds the project profile and the extraction knobs; every method is a
/// pure function of its inputs apart from [`Herald::generate`], which fetches.
#[derive(Debug, Clone, Default)]
pub struct Herald {
    project: ProjectConfig,
    highlights: HighlightConfig,
    preprocess: PreprocessConfig,
    #[cfg(feature = "fetch")]
    fetch: FetchConfig,
}

impl Herald {
    /// Creates an analyzer for the default (scikit-learn) profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer for a project profile.
    pub fn with_project(project: ProjectConfig) -> Self {
        Self { project, ..Self::default() }
    }

    /// Replaces the highlight limits.
    pub fn highlight_config(mut self, config: HighlightConfig) -> Self {
        self.highlights = config;
        self
    }

    /// Replaces the HTTP settings.
    #[cfg(feature = "fetch")]
    pub fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch = config;
        self
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    /// The two page URLs for a version under the profile's documentation root.
    pub fn urls(&self, version: &Version) -> Result<ReleaseUrls> {
        ReleaseUrls::new(&self.project.docs_url, version)
    }

    /// Extract counts, highlights and contributors from retrieved pages.
    ///
    /// Missing pages and unrecognised markup lead to zero counts and empty
    /// lists, never to an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HeraldError::InvalidUrl`] if the profile's documentation
    /// root is not an http(s) URL.
    pub fn analyze(&self, version: &Version, pages: &ReleasePages) -> Result<ReleaseReport> {
        let urls = self.urls(version)?;

        let notes_doc = pages.notes.as_deref().map(Document::parse).transpose()?;
        let page_doc = pages
            .highlights
            .as_deref()
            .map(|html| Document::parse_with_preprocessing(html, &self.preprocess))
            .transpose()?;

        let notes_tree = notes_doc.as_ref().map(DomTree::build);
        let page_tree = page_doc.as_ref().map(DomTree::build);
        let section = notes_tree.as_ref().map(|tree| ReleaseSection::locate(tree, Some(version)));

        if section.is_none() {
            info!("release notes unavailable, counts will be zero");
        }

        let tags = section.as_ref().map(count_tags).unwrap_or_default();
        let contributors = section.as_ref().map(count_contributors).unwrap_or_default();
        let highlights = extract_highlights(&HighlightSources {
            page: page_tree.as_ref(),
            notes: section.as_ref(),
            config: &self.highlights,
        });

        debug!(
            total_tags = tags.counts.total(),
            highlights = highlights.highlights.len(),
            contributors = contributors.count(),
            "release analyzed"
        );

        let mut report =
            ReleaseReport::new(version.clone(), urls, tags.counts, highlights.highlights, contributors.count());
        report.contributor_names = contributors.names().to_vec();
        report.provenance = Provenance {
            notes_page: pages.notes.is_some(),
            highlights_page: pages.highlights.is_some(),
            tag_strategy: tags.strategy,
            highlight_strategy: highlights.strategy,
        };

        Ok(report)
    }

    /// Retrieve both pages and analyze them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HeraldError::NoPages`] when neither page can be
    /// retrieved.
    #[cfg(feature = "fetch")]
    pub async fn generate(&self, version: &Version, sources: &PageSources) -> Result<ReleaseReport> {
        let urls = self.urls(version)?;
        let pages = fetch_release_pages(&urls, sources, &self.fetch).await?;
        self.analyze(version, &pages)
    }

    /// Render the announcement post for a report.
    pub fn compose(&self, report: &ReleaseReport) -> String {
        compose_post(report, &self.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = r#"
        <html><body>
            <p class="rubric">Legend for changelogs</p>
            <ul>
                <li><span class="badge">Major Feature</span> something big.</li>
                <li><span class="badge">Feature</span> something new.</li>
                <li><span class="badge">Efficiency</span> something faster.</li>
                <li><span class="badge">Enhancement</span> something better.</li>
                <li><span class="badge">API Change</span> you will need to change your code.</li>
                <li><span class="badge">Fix</span> something that was broken.</li>
            </ul>
            <h1>Version 1.7</h1>
            <h2>Version 1.7.0</h2>
            <h3>Changes impacting many modules</h3>
            <p>Estimators expose a richer HTML display. It lists parameters.</p>
            <h3>sklearn.ensemble</h3>
            <ul>
                <li><span class="badge">Feature</span> New parameter for gradient boosting.</li>
                <li><span class="badge">Feature</span> Early stopping with a validation set.</li>
                <li><span class="badge">Feature</span> Monotonic constraints in more places.</li>
                <li><span class="badge">Fix</span> Correct sample weights handling.</li>
                <li><span class="badge">Fix</span> Stable ordering of features.</li>
            </ul>
            <h3>Code and documentation contributors</h3>
            <p>Thanks to everyone who has contributed since version 1.6, including:</p>
            <p>Alice Smith, Bob Jones, Carol White</p>
        </body></html>
    "#;

    fn version() -> Version {
        Version::parse("1.7").unwrap()
    }

    #[test]
    fn test_analyze_notes_only() {
        let pages = ReleasePages { notes: Some(NOTES.to_string()), highlights: None };
        let report = Herald::new().analyze(&version(), &pages).unwrap();

        assert_eq!(report.summary.new_features, 3);
        assert_eq!(report.summary.fixes, 2);
        assert_eq!(report.summary.api_changes, 0);
        assert_eq!(report.summary.efficiency_enhancements, 0);
        assert_eq!(report.contributors, 3);
        assert_eq!(report.provenance.tag_strategy, Some("badge"));
        assert_eq!(report.provenance.highlight_strategy, Some("notes-headings"));
        assert_eq!(
            report.highlights,
            ["Changes impacting many modules: Estimators expose a richer HTML display."]
        );
        assert!(!report.provenance.highlights_page);
    }

    #[test]
    fn test_analyze_prefers_highlights_page() {
        let page = "<article><h2>Array API support in more estimators</h2></article>";
        let pages = ReleasePages { notes: Some(NOTES.to_string()), highlights: Some(page.to_string()) };
        let report = Herald::new().analyze(&version(), &pages).unwrap();

        assert_eq!(report.highlights, ["Array API support in more estimators"]);
        assert_eq!(report.provenance.highlight_strategy, Some("highlights-page"));
    }

    #[test]
    fn test_analyze_without_notes() {
        let page = "<article><h2>Array API support in more estimators</h2></article>";
        let pages = ReleasePages { notes: None, highlights: Some(page.to_string()) };
        let report = Herald::new().analyze(&version(), &pages).unwrap();

        assert_eq!(report.tags, TagCounts::default());
        assert_eq!(report.contributors, 0);
        assert_eq!(report.highlights.len(), 1);
    }

    #[test]
    fn test_invalid_docs_root() {
        let project = ProjectConfig::builder().docs_url("not a url").build();
        let pages = ReleasePages { notes: Some(NOTES.to_string()), highlights: None };

        assert!(Herald::with_project(project).analyze(&version(), &pages).is_err());
    }

    #[test]
    fn test_compose_uses_profile() {
        let pages = ReleasePages { notes: Some(NOTES.to_string()), highlights: None };
        let herald = Herald::new();
        let report = herald.analyze(&version(), &pages).unwrap();

        let post = herald.compose(&report);
        assert!(post.starts_with("🚀 scikit-learn 1.7 is out 🚀"));
        assert!(post.contains("🟢 3 new features"));
        assert!(post.contains("🔴 2 fixes"));
        assert!(post.contains("👥 3 contributors (thank you all!)"));
    }
}
