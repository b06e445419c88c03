pub mod changelog;
pub mod config;
pub mod contributors;
pub mod dom_tree;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod highlights;
pub mod parse;
pub mod pipeline;
pub mod preprocess;
pub mod release;
pub mod strategy;

pub use changelog::{ReleaseSection, TagCounts, TagKind, TagReport, TagSummary, count_tags, find_legend};
pub use config::{ConfigLoader, ConfigLoaderBuilder, ConfigParser, Directive, ProjectConfig, ProjectConfigBuilder};
pub use contributors::{Contributors, count_contributors, parse_contributor_list};
#[doc(hidden)]
pub use dom_tree::{DomNode, DomTree, Heading, Regions};
pub use error::{HeraldError, Result};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_release_pages, fetch_url};
pub use fetch::{FetchConfig, PageSources, ReleasePages, fetch_file, read_release_pages};
pub use formatters::{JsonConfig, JsonFormatter, PostConfig, PostFormatter, compose_post, report_to_json};
pub use highlights::{HighlightConfig, HighlightReport, HighlightSources, extract_highlights};
pub use parse::Document;
pub use pipeline::{Herald, Provenance, ReleaseReport};
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use release::{ReleaseUrls, Version};
