//! Release highlight extraction.
//!
//! The highlights gallery page is the preferred source. When it is missing or
//! yields nothing usable, the release notes are mined instead: first their
//! top-level section headings, then the entries tagged "Major Feature".

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Element;
use serde::Serialize;
use tracing::warn;

use crate::changelog::{CONTRIBUTORS_HEADING, ReleaseSection, is_version_heading};
use crate::dom_tree::{DomTree, Heading};
use crate::parse::{clean_heading, collapse_whitespace};
use crate::strategy::{Strategy, first_success};

const ITEM_MIN_CHARS: usize = 20;
const PARAGRAPH_MIN_CHARS: usize = 30;

/// Candidates that are nothing but page chrome
const EXACT_BOILERPLATE: &[&str] = &[
    "contents",
    "navigation",
    "related",
    "examples",
    "download",
    "source code",
    "gallery",
    "previous",
    "next",
    "on this page",
    "menu",
    "note",
    "see also",
    "references",
];

static CONTAINED_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(skip to|back to top|choose version|related projects|github|copyright|license|download (python|jupyter|all)|gallery generated by|on this page|launch binder|jupyterlite)\b|©",
    )
    .expect("valid regex")
});

static NOTE_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^note\b").expect("valid regex"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•·\-\*►▶️]+\s*|\d+[.)]\s+)").expect("valid regex"));

static CATEGORY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:feature|enhancement|fix|improvement)\s*:\s*").expect("valid regex"));

static MODULE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?[A-Za-z_]\w*(\.\w+)+:?$").expect("valid regex"));

static MAJOR_FEATURE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmajor\s+feature\b\s*[:\-–]?\s*(.+)$").expect("valid regex"));

static FIRST_SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?[.!?])(?:\s|$)").expect("valid regex"));

/// Limits applied to every highlight
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Maximum number of highlights kept
    pub max_highlights: usize,
    /// Shorter candidates are dropped
    pub min_chars: usize,
    /// Longer candidates are truncated at a word boundary
    pub max_chars: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { max_highlights: 6, min_chars: 10, max_chars: 200 }
    }
}

/// Documents available to the extractor
pub struct HighlightSources<'s> {
    /// The preprocessed highlights page
    pub page: Option<&'s DomTree<'s>>,
    /// The release's section of the release notes
    pub notes: Option<&'s ReleaseSection<'s, 's>>,
    pub config: &'s HighlightConfig,
}

/// Highlights together with the strategy that produced them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    pub highlights: Vec<String>,
    /// `None` when every strategy came up empty
    pub strategy: Option<&'static str>,
}

/// Extract up to `max_highlights` highlights from the available documents.
///
/// The first strategy producing at least one highlight wins. An empty report
/// is a degraded result; the post then renders a placeholder line.
pub fn extract_highlights(sources: &HighlightSources<'_>) -> HighlightReport {
    let strategies = [
        Strategy::new("highlights-page", page_strategy),
        Strategy::new("notes-headings", notes_heading_strategy),
        Strategy::new("major-features", major_feature_strategy),
    ];

    match first_success(&strategies, sources) {
        Some((strategy, highlights)) => HighlightReport { highlights, strategy: Some(strategy) },
        None => {
            warn!("no highlights found on any page");
            HighlightReport::default()
        }
    }
}

/// Ordered, case-insensitively unique, capped list of highlights
struct Collector<'c> {
    config: &'c HighlightConfig,
    seen: HashSet<String>,
    items: Vec<String>,
}

impl<'c> Collector<'c> {
    fn new(config: &'c HighlightConfig) -> Self {
        Self { config, seen: HashSet::new(), items: Vec::new() }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.config.max_highlights
    }

    /// Offer a candidate already normalized; returns whether it was kept.
    fn offer(&mut self, candidate: &str, min_chars: usize) -> bool {
        if self.is_full() || candidate.chars().count() < min_chars.max(self.config.min_chars) {
            return false;
        }
        if is_boilerplate(candidate) {
            return false;
        }

        let highlight = truncate(candidate, self.config.max_chars);
        if !self.seen.insert(highlight.to_lowercase()) {
            return false;
        }

        self.items.push(highlight);
        true
    }

    fn finish(self) -> Option<Vec<String>> {
        if self.items.is_empty() { None } else { Some(self.items) }
    }
}

/// Headings, then list items, then paragraphs of the page's main content.
fn page_strategy(sources: &HighlightSources<'_>) -> Option<Vec<String>> {
    let tree = sources.page?;
    let content = main_content(tree);
    let mut collector = Collector::new(sources.config);

    for heading in tree.headings_in(content.clone()) {
        if (2..=4).contains(&heading.level) {
            collector.offer(&normalize_candidate(&heading.text), 0);
        }
    }

    for (_, item) in tree.elements_named(content.clone(), &["li"]) {
        collector.offer(&normalize_candidate(&item.text().collect::<String>()), ITEM_MIN_CHARS);
    }

    for (_, paragraph) in tree.elements_named(content, &["p"]) {
        collector.offer(&normalize_candidate(&paragraph.text().collect::<String>()), PARAGRAPH_MIN_CHARS);
    }

    collector.finish()
}

/// Range of the main content container, falling back to the whole page.
fn main_content(tree: &DomTree<'_>) -> Range<usize> {
    find_container(tree, |el| el.name() == "article")
        .or_else(|| find_container(tree, |el| el.name() == "main"))
        .or_else(|| find_container(tree, |el| el.name() == "div" && el.attr("role") == Some("main")))
        .or_else(|| {
            find_container(tree, |el| {
                el.name() == "div"
                    && el.classes().any(|class| matches!(class, "document" | "body" | "content" | "section"))
            })
        })
        .or_else(|| find_container(tree, |el| el.name() == "body"))
        .unwrap_or(0..tree.len())
}

fn find_container(tree: &DomTree<'_>, matches: impl Fn(&Element) -> bool) -> Option<Range<usize>> {
    tree.elements()
        .find(|(_, element)| matches(element.value()))
        .map(|(position, _)| tree.span(position))
}

/// Top-level headings of the release section with their first sentence.
fn notes_heading_strategy(sources: &HighlightSources<'_>) -> Option<Vec<String>> {
    let section = sources.notes?;
    let tree = section.tree();
    let opening = section.heading().map(|heading| heading.position);

    let candidates: Vec<_> = tree
        .headings_in(section.span())
        .filter(|heading| Some(heading.position) != opening)
        .filter(|heading| !section.in_legend(heading.position))
        .filter(|heading| !is_structural_heading(&heading.text))
        .collect();

    let top_level = top_level(tree, &candidates)?;
    let mut collector = Collector::new(sources.config);

    for heading in candidates.iter().filter(|heading| heading.level == top_level) {
        let body = heading.position + 1..tree.section_end(heading);
        let sentence = tree
            .elements_named(body, &["p"])
            .find(|(position, _)| !section.in_legend(*position) && !tree.has_ancestor(*position, "li"))
            .map(|(_, paragraph)| first_sentence(&collapse_whitespace(&paragraph.text().collect::<String>())))
            .filter(|sentence| !sentence.is_empty());

        let title = normalize_candidate(&heading.text);
        let candidate = match sentence {
            Some(sentence) => format!("{}: {}", title.trim_end_matches(':'), sentence),
            None => title,
        };
        collector.offer(&candidate, 0);
    }

    collector.finish()
}

/// Shallowest candidate level, skipping a lone title that wraps the real sections
fn top_level(tree: &DomTree<'_>, candidates: &[&Heading]) -> Option<u8> {
    let shallowest = candidates.iter().map(|heading| heading.level).min()?;
    let mut at_level = candidates.iter().filter(|heading| heading.level == shallowest);

    if let (Some(title), None) = (at_level.next(), at_level.next()) {
        let body = title.position + 1..tree.section_end(title);
        let nested = candidates.iter().filter(|heading| body.contains(&heading.position)).map(|heading| heading.level);
        if let Some(level) = nested.min() {
            return Some(level);
        }
    }

    Some(shallowest)
}

/// Headings that organise the changelog rather than describe a change
fn is_structural_heading(text: &str) -> bool {
    let lower = text.to_lowercase();
    is_version_heading(text)
        || CONTRIBUTORS_HEADING.is_match(text)
        || lower.contains("changelog")
        || lower.contains("contributor")
        || lower.contains("legend")
        || MODULE_PATH.is_match(text.trim())
}

/// First sentence of every "Major Feature" entry.
fn major_feature_strategy(sources: &HighlightSources<'_>) -> Option<Vec<String>> {
    let section = sources.notes?;
    let mut collector = Collector::new(sources.config);

    for (_, item) in section.elements_named(&["li"]) {
        let text = collapse_whitespace(&item.text().collect::<String>());
        if let Some(description) = MAJOR_FEATURE_ENTRY.captures(&text).and_then(|caps| caps.get(1)) {
            collector.offer(&normalize_candidate(&first_sentence(description.as_str())), 0);
        }
    }

    collector.finish()
}

/// Whitespace-normalize and strip bullets, permalinks and category prefixes.
pub fn normalize_candidate(text: &str) -> String {
    let text = clean_heading(text);
    let text = BULLET.replace(&text, "");
    let text = CATEGORY_PREFIX.replace(&text, "");
    text.trim().to_string()
}

/// Whether a candidate is navigation, licensing or other page chrome.
pub fn is_boilerplate(text: &str) -> bool {
    let lower = text.trim().trim_end_matches(':').to_lowercase();

    if EXACT_BOILERPLATE.contains(&lower.as_str()) {
        return true;
    }

    if CONTAINED_BOILERPLATE.is_match(text) || NOTE_PREFIX.is_match(text) {
        return true;
    }

    is_all_caps(text)
}

fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

/// The first sentence of a text, or the whole text when it has no terminator.
pub fn first_sentence(text: &str) -> String {
    let text = text.trim();
    match FIRST_SENTENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(sentence) => sentence.as_str().to_string(),
        None => text.to_string(),
    }
}

/// Cut at a word boundary and append an ellipsis when longer than `max_chars`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(boundary) if boundary > cut.len() / 2 => &cut[..boundary],
        _ => cut.as_str(),
    };

    format!("{}…", cut.trim_end_matches([',', ';', ':', '.', ' ']))
}
