//! Release identifiers and the documentation URLs built from them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::{HeraldError, Result};

/// A release version such as `1.7`, used verbatim as a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Validate a version argument.
    ///
    /// Only what would break URL construction is rejected. A well-formed but
    /// unknown version simply produces pages that fail to load.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HeraldError::InvalidVersion(raw.to_string()));
        }

        if trimmed.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '%')) {
            return Err(HeraldError::InvalidVersion(raw.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `1.7` as `1-7`, the form used in changelog anchors
    pub fn dashed(&self) -> String {
        self.0.replace('.', "-")
    }

    /// `1.7` as `1_7`, the form used in gallery file names
    pub fn underscored(&self) -> String {
        self.0.replace('.', "_")
    }

    /// Heading titles that open this release's changelog section, most
    /// specific first.
    pub fn section_titles(&self) -> [String; 2] {
        [format!("Version {}.0", self.0), format!("Version {}", self.0)]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Version {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The two documentation pages describing a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseUrls {
    /// Changelog ("what's new") page, anchored at the release section
    pub notes: String,
    /// Release highlights gallery example
    pub highlights: String,
}

impl ReleaseUrls {
    /// Build both URLs below a documentation root such as
    /// `https://scikit-learn.org/stable`.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::InvalidUrl`] if the root is not an absolute
    /// http(s) URL.
    pub fn new(docs_url: &str, version: &Version) -> Result<Self> {
        let root = docs_url.trim().trim_end_matches('/');
        let parsed = Url::parse(root).map_err(|e| HeraldError::InvalidUrl(format!("{}: {}", root, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HeraldError::InvalidUrl(format!(
                "{}: documentation root must use http or https",
                root
            )));
        }

        let notes = format!(
            "{}/whats_new/v{}.html#release-notes-{}",
            root,
            version.as_str(),
            version.dashed()
        );
        let highlights = format!(
            "{}/auto_examples/release_highlights/plot_release_highlights_{}_0.html",
            root,
            version.underscored()
        );

        Ok(Self { notes, highlights })
    }
}
