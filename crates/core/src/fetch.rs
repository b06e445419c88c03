//! Page retrieval over HTTP and from local files.
//!
//! A release is described by two pages. Either one may be missing; the run
//! only fails when neither can be retrieved.

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::{debug, warn};
#[cfg(feature = "fetch")]
use url::Url;

#[cfg(feature = "fetch")]
use crate::release::ReleaseUrls;
use crate::{HeraldError, Result};

/// HTTP client configuration for fetching release pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("herald/{} (release announcement generator)", env!("CARGO_PKG_VERSION")) }
    }
}

/// Contents of the two release pages; `None` marks a page that could not be retrieved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePages {
    pub notes: Option<String>,
    pub highlights: Option<String>,
}

/// Local files that replace the corresponding network fetch
#[derive(Debug, Clone, Default)]
pub struct PageSources {
    pub notes_file: Option<PathBuf>,
    pub highlights_file: Option<PathBuf>,
}

/// Builds the HTTP client shared by both requests.
#[cfg(feature = "fetch")]
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(HeraldError::HttpError)
}

/// Fetches HTML content from a URL.
///
/// Follows redirects and respects the configured timeout. A non-success
/// status is an error rather than an error page.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    fetch_with_client(&client, url, config).await
}

#[cfg(feature = "fetch")]
async fn fetch_with_client(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| HeraldError::InvalidUrl(format!("{}: {}", url, e)))?;

    debug!(%url, "fetching");

    let response = client
        .get(parsed_url)
        .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| map_transport_error(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HeraldError::HttpStatus { url: url.to_string(), status: status.as_u16() });
    }

    response.text().await.map_err(|e| map_transport_error(e, config))
}

#[cfg(feature = "fetch")]
fn map_transport_error(error: reqwest::Error, config: &FetchConfig) -> HeraldError {
    if error.is_timeout() { HeraldError::Timeout { timeout: config.timeout } } else { HeraldError::HttpError(error) }
}

/// Reads HTML content from a local file.
pub fn fetch_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        Err(HeraldError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(HeraldError::from)
    }
}

/// Retrieves both release pages concurrently.
///
/// A page given in `sources` is read from disk instead of the network. A page
/// that fails is logged and left out.
///
/// # Errors
///
/// Returns [`HeraldError::NoPages`] when neither page could be retrieved.
#[cfg(feature = "fetch")]
pub async fn fetch_release_pages(
    urls: &ReleaseUrls, sources: &PageSources, config: &FetchConfig,
) -> Result<ReleasePages> {
    let client = build_client(config)?;

    let (notes, highlights) = tokio::join!(
        retrieve(&client, &urls.notes, sources.notes_file.as_deref(), config),
        retrieve(&client, &urls.highlights, sources.highlights_file.as_deref(), config),
    );

    match (notes, highlights) {
        (Err(notes), Err(highlights)) => {
            Err(HeraldError::NoPages { notes: notes.to_string(), highlights: highlights.to_string() })
        }
        (notes, highlights) => Ok(ReleasePages {
            notes: keep_page("release notes", notes),
            highlights: keep_page("release highlights", highlights),
        }),
    }
}

#[cfg(feature = "fetch")]
async fn retrieve(client: &Client, url: &str, file: Option<&Path>, config: &FetchConfig) -> Result<String> {
    match file {
        Some(path) => fetch_file(path),
        None => fetch_with_client(client, url, config).await,
    }
}

#[cfg(feature = "fetch")]
fn keep_page(name: &str, page: Result<String>) -> Option<String> {
    match page {
        Ok(html) => Some(html),
        Err(e) => {
            warn!(page = name, error = %e, "page unavailable, continuing without it");
            None
        }
    }
}

/// Reads both release pages from local files only.
///
/// # Errors
///
/// Returns [`HeraldError::NoPages`] when neither file could be read.
pub fn read_release_pages(sources: &PageSources) -> Result<ReleasePages> {
    let read = |file: &Option<PathBuf>| match file {
        Some(path) => fetch_file(path),
        None => Err(HeraldError::ConfigError("no file given".to_string())),
    };

    match (read(&sources.notes_file), read(&sources.highlights_file)) {
        (Err(notes), Err(highlights)) => {
            Err(HeraldError::NoPages { notes: notes.to_string(), highlights: highlights.to_string() })
        }
        (notes, highlights) => Ok(ReleasePages { notes: notes.ok(), highlights: highlights.ok() }),
    }
}
