//! Changelog tag counting.
//!
//! Release notes classify each entry with a badge such as `Feature` or `Fix`.
//! Near the top of the page a legend shows one example of every badge; those
//! examples are not changes and must never be counted.
//!
//! Counting happens inside a [`ReleaseSection`]: the part of the page that
//! belongs to the release (its `Version X.Y.0` section when present), minus
//! every legend region.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dom_tree::{DomTree, Heading, Regions};
use crate::parse::collapse_whitespace;
use crate::release::Version;
use crate::strategy::{Strategy, first_success};

static LEGEND_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\blegend\b").expect("valid regex"));

static LEGEND_RUBRIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^legend\s+for\s+changelog").expect("valid regex"));

const MAX_RUBRIC_LEN: usize = 40;

static VERSION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^version\s+\d+(\.\d+)*").expect("valid regex"));

/// Heading that closes the changelog proper
pub(crate) static CONTRIBUTORS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)code\s+and\s+documentation\s+contributor").expect("valid regex"));

/// A label at the start of a line, or right after a leading dotted module path
static ITEM_PATTERNS: LazyLock<Vec<(TagKind, Regex)>> = LazyLock::new(|| {
    TagKind::BY_SPECIFICITY
        .iter()
        .map(|kind| {
            let label = kind.label().replace(' ', r"\s+");
            let pattern = format!(r"(?im)^\s*(?:[A-Za-z_]\w*(?:\.\w+)+\s*[:\-–]?\s*)?\b{label}\b");
            (*kind, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

/// Any label as a whole word, longest alternatives first
static RAW_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(major\s+feature|api\s+change|feature|efficiency|enhancement|fix)\b").expect("valid regex")
});

/// Changelog entry category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    MajorFeature,
    Feature,
    Efficiency,
    Enhancement,
    ApiChange,
    Fix,
}

impl TagKind {
    pub const ALL: [TagKind; 6] = [
        TagKind::MajorFeature,
        TagKind::Feature,
        TagKind::Efficiency,
        TagKind::Enhancement,
        TagKind::ApiChange,
        TagKind::Fix,
    ];

    /// Order in which labels are tried against free text, so that
    /// "Major Feature" wins over "Feature".
    pub const BY_SPECIFICITY: [TagKind; 6] = [
        TagKind::MajorFeature,
        TagKind::ApiChange,
        TagKind::Feature,
        TagKind::Efficiency,
        TagKind::Enhancement,
        TagKind::Fix,
    ];

    /// Badge text as printed in the release notes
    pub fn label(self) -> &'static str {
        match self {
            TagKind::MajorFeature => "Major Feature",
            TagKind::Feature => "Feature",
            TagKind::Efficiency => "Efficiency",
            TagKind::Enhancement => "Enhancement",
            TagKind::ApiChange => "API Change",
            TagKind::Fix => "Fix",
        }
    }

    /// Match badge text exactly, ignoring case and spacing.
    pub fn from_label(text: &str) -> Option<Self> {
        match collapse_whitespace(text).to_lowercase().as_str() {
            "major feature" => Some(TagKind::MajorFeature),
            "feature" => Some(TagKind::Feature),
            "efficiency" => Some(TagKind::Efficiency),
            "enhancement" => Some(TagKind::Enhancement),
            "api change" => Some(TagKind::ApiChange),
            "fix" => Some(TagKind::Fix),
            _ => None,
        }
    }

    /// Match a class token such as `fix`, `api-change` or `tag-major-feature`.
    pub fn from_class(token: &str) -> Option<Self> {
        let token = token.to_lowercase();
        let token = token.strip_prefix("tag-").unwrap_or(&token);
        match token {
            "major-feature" | "majorfeature" => Some(TagKind::MajorFeature),
            "feature" => Some(TagKind::Feature),
            "efficiency" => Some(TagKind::Efficiency),
            "enhancement" => Some(TagKind::Enhancement),
            "api-change" | "apichange" => Some(TagKind::ApiChange),
            "fix" => Some(TagKind::Fix),
            _ => None,
        }
    }
}

/// Number of changelog entries per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    pub major_feature: usize,
    pub feature: usize,
    pub efficiency: usize,
    pub enhancement: usize,
    pub api_change: usize,
    pub fix: usize,
}

impl TagCounts {
    pub fn get(&self, kind: TagKind) -> usize {
        match kind {
            TagKind::MajorFeature => self.major_feature,
            TagKind::Feature => self.feature,
            TagKind::Efficiency => self.efficiency,
            TagKind::Enhancement => self.enhancement,
            TagKind::ApiChange => self.api_change,
            TagKind::Fix => self.fix,
        }
    }

    pub fn increment(&mut self, kind: TagKind) {
        match kind {
            TagKind::MajorFeature => self.major_feature += 1,
            TagKind::Feature => self.feature += 1,
            TagKind::Efficiency => self.efficiency += 1,
            TagKind::Enhancement => self.enhancement += 1,
            TagKind::ApiChange => self.api_change += 1,
            TagKind::Fix => self.fix += 1,
        }
    }

    pub fn total(&self) -> usize {
        TagKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Major features plus features
    pub fn new_features(&self) -> usize {
        self.major_feature + self.feature
    }

    /// Efficiency improvements plus enhancements
    pub fn efficiency_enhancements(&self) -> usize {
        self.efficiency + self.enhancement
    }

    pub fn api_changes(&self) -> usize {
        self.api_change
    }

    pub fn fixes(&self) -> usize {
        self.fix
    }

    /// The four figures shown in the announcement
    pub fn summary(&self) -> TagSummary {
        TagSummary {
            new_features: self.new_features(),
            efficiency_enhancements: self.efficiency_enhancements(),
            api_changes: self.api_changes(),
            fixes: self.fixes(),
        }
    }

    fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// Derived categories shown in the announcement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub new_features: usize,
    pub efficiency_enhancements: usize,
    pub api_changes: usize,
    pub fixes: usize,
}

/// Counts together with the strategy that produced them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
    pub counts: TagCounts,
    /// `None` when every strategy came up empty
    pub strategy: Option<&'static str>,
}

/// The part of the release notes that belongs to one release
#[derive(Debug, Clone)]
pub struct ReleaseSection<'t, 'a> {
    tree: &'t DomTree<'a>,
    span: Range<usize>,
    heading: Option<Heading>,
    legend: Regions,
}

impl<'t, 'a> ReleaseSection<'t, 'a> {
    /// Locate the release's section and the legend regions.
    ///
    /// Without a version, or when no matching heading exists, the whole
    /// document is in scope.
    pub fn locate(tree: &'t DomTree<'a>, version: Option<&Version>) -> Self {
        let legend = find_legend(tree);
        let heading = version.and_then(|version| find_version_heading(tree, version));

        let span = match &heading {
            Some(heading) => {
                let end = tree.section_end(heading);
                let contributors = tree
                    .headings_in(heading.position + 1..end)
                    .find(|h| CONTRIBUTORS_HEADING.is_match(&h.text))
                    .map(|h| h.position);
                heading.position..contributors.unwrap_or(end)
            }
            None => {
                if version.is_some() {
                    debug!("no version heading found, counting the whole document");
                }
                0..tree.len()
            }
        };

        Self { tree, span, heading, legend }
    }

    /// Scope covering the whole document, legend still excluded
    pub fn whole_document(tree: &'t DomTree<'a>) -> Self {
        Self::locate(tree, None)
    }

    pub fn tree(&self) -> &'t DomTree<'a> {
        self.tree
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The version heading opening the section, if one was found
    pub fn heading(&self) -> Option<&Heading> {
        self.heading.as_ref()
    }

    pub fn legend(&self) -> &Regions {
        &self.legend
    }

    pub fn in_legend(&self, position: usize) -> bool {
        self.legend.contains(position)
    }

    /// Elements with the given names inside the section and outside the legend
    pub fn elements_named<'s>(
        &'s self, names: &'s [&'s str],
    ) -> impl Iterator<Item = (usize, ElementRef<'a>)> + 's {
        self.tree
            .elements_named(self.span(), names)
            .filter(move |(position, _)| !self.in_legend(*position))
    }

    /// Text of the section outside the legend
    pub fn text(&self) -> String {
        self.tree.text_in(self.span(), &self.legend)
    }
}

/// Find every legend region in the document.
///
/// A legend is introduced by a heading mentioning "Legend", a container whose
/// class mentions `legend`, or a non-heading block such as a rubric paragraph
/// reading "Legend for changelogs".
pub fn find_legend(tree: &DomTree<'_>) -> Regions {
    let mut regions = Regions::new();

    for heading in tree.headings() {
        if LEGEND_HEADING.is_match(&heading.text) {
            regions.add(heading.position..tree.section_end(heading));
        }
    }

    for (position, element) in tree.elements_named(0..tree.len(), &["div", "section", "aside", "dl"]) {
        if let Some(class) = element.value().attr("class")
            && class.to_lowercase().contains("legend")
        {
            regions.add(tree.span(position));
        }
    }

    for (position, element) in tree.elements_named(0..tree.len(), &["p", "div", "span", "strong", "dt"]) {
        let text = collapse_whitespace(&element.text().collect::<String>());
        if text.len() > MAX_RUBRIC_LEN || !LEGEND_RUBRIC.is_match(&text) || regions.contains(position) {
            continue;
        }

        // The rubric owns the list that follows it, or everything up to the next heading.
        let limit = tree.next_heading_after(position);
        let end = tree
            .elements_named(tree.span(position).end..limit, &["ul", "ol", "dl"])
            .next()
            .map_or(limit, |(list, _)| tree.span(list).end);
        regions.add(position..end);
    }

    if regions.is_empty() {
        debug!("no legend found");
    }

    regions
}

fn find_version_heading(tree: &DomTree<'_>, version: &Version) -> Option<Heading> {
    version.section_titles().iter().find_map(|title| {
        tree.headings()
            .iter()
            .find(|heading| heading.text.eq_ignore_ascii_case(title))
            .cloned()
    })
}

/// Count tagged changelog entries in a release section.
///
/// Strategies run from most to least precise; the first with a non-zero
/// total wins. All-zero counts are a degraded result, not an error.
pub fn count_tags(section: &ReleaseSection<'_, '_>) -> TagReport {
    let strategies = [
        Strategy::new("badge", badge_scan),
        Strategy::new("list-item", list_item_scan),
        Strategy::new("raw-text", raw_text_scan),
    ];

    match first_success(&strategies, section) {
        Some((strategy, counts)) => TagReport { counts, strategy: Some(strategy) },
        None => {
            warn!("no changelog tags found in release notes");
            TagReport::default()
        }
    }
}

/// Inline badge markers inside list items.
fn badge_scan(section: &ReleaseSection<'_, '_>) -> Option<TagCounts> {
    let mut counts = TagCounts::default();
    let mut counted_until = 0;

    for (position, element) in section.elements_named(&["span", "a", "abbr", "em", "strong", "div"]) {
        if position < counted_until {
            continue;
        }

        let Some(kind) = badge_kind(element) else {
            continue;
        };

        if section.tree().has_ancestor(position, "li") {
            counts.increment(kind);
            counted_until = section.tree().span(position).end;
        }
    }

    counts.non_empty()
}

fn badge_kind(element: ElementRef<'_>) -> Option<TagKind> {
    let class = element.value().attr("class")?;

    if class.to_lowercase().contains("badge") {
        return TagKind::from_label(&element.text().collect::<String>());
    }

    class.split_whitespace().find_map(TagKind::from_class)
}

/// Labels at the start of list item text, one category per item.
fn list_item_scan(section: &ReleaseSection<'_, '_>) -> Option<TagCounts> {
    let mut counts = TagCounts::default();

    for (_, item) in section.elements_named(&["li"]) {
        let text: String = item.text().collect();
        if let Some((kind, _)) = ITEM_PATTERNS.iter().find(|(_, pattern)| pattern.is_match(&text)) {
            counts.increment(*kind);
        }
    }

    counts.non_empty()
}

/// Whole-word label occurrences anywhere in the section text.
fn raw_text_scan(section: &ReleaseSection<'_, '_>) -> Option<TagCounts> {
    let text = section.text();
    let mut counts = TagCounts::default();

    for capture in RAW_LABEL.captures_iter(&text) {
        if let Some(kind) = capture.get(1).and_then(|m| TagKind::from_label(m.as_str())) {
            counts.increment(kind);
        }
    }

    counts.non_empty()
}

/// Whether a heading names a release (`Version 1.7.0`)
pub(crate) fn is_version_heading(text: &str) -> bool {
    VERSION_HEADING.is_match(text)
}
