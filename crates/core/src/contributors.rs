//! Contributor counting.
//!
//! Release notes close each release with a "Code and documentation
//! contributors" section: a sentence of thanks followed by one long
//! comma-separated list of names.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::changelog::ReleaseSection;
use crate::dom_tree::{DomTree, Heading};
use crate::parse::collapse_whitespace;

/// Section heading patterns, most specific first
static SECTION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)code.*documentation.*contributor").expect("valid regex"),
        Regex::new(r"(?i)contributor").expect("valid regex"),
        Regex::new(r"(?i)thanks.*contributor").expect("valid regex"),
    ]
});

static LEAD_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^.*?(?:contributors?|including|thanks\s+to)\s*:\s*").expect("valid regex")
});

static THANKS_TO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^thanks\s+to\s+").expect("valid regex"));

static WHO_CLAUSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+who\s+.*$").expect("valid regex"));

static JOINER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+(?:and|&)\s+").expect("valid regex"));

/// Tokens that are never a name
const STOPLIST: &[&str] = &[
    "the",
    "and",
    "or",
    "by",
    "to",
    "of",
    "in",
    "on",
    "at",
    "for",
    "with",
    "from",
    "including",
    "thanks",
    "everyone",
    "who",
    "has",
    "have",
    "contributed",
    "maintenance",
    "improvement",
    "since",
    "version",
    "project",
    "et al",
    "others",
];

const SKIPPED_PREFIXES: &[&str] = &["including", "thanks", "the "];

/// Fewer names than this in one block reads as prose, not a list
const MIN_LISTED_NAMES: usize = 2;

/// Longest text treated as a section marker rather than a content block
const MAX_MARKER_LEN: usize = 120;

/// Distinct contributor names in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contributors {
    names: Vec<String>,
}

impl Contributors {
    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for Contributors {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let names = iter.into_iter().filter(|name| seen.insert(name.clone())).collect();
        Self { names }
    }
}

/// Count the contributors listed for the release.
///
/// The contributors section of the release's own scope is preferred; other
/// releases on the same page have their own lists. Zero is a degraded
/// result, never an error.
pub fn count_contributors(section: &ReleaseSection<'_, '_>) -> Contributors {
    let tree = section.tree();
    let after_scope = section.span().start..tree.len();

    let region = find_section(tree, after_scope).or_else(|| find_section(tree, 0..tree.len()));

    let Some(region) = region else {
        warn!("no contributors section found");
        return Contributors::default();
    };

    let contributors = match pick_name_block(tree, region) {
        NameBlock::Text(text) => parse_contributor_list(&text),
        NameBlock::Items(items) => items.iter().filter_map(|item| clean_name(item)).collect(),
        NameBlock::Missing => Contributors::default(),
    };

    if contributors.is_empty() {
        warn!("contributors section has no names");
    } else {
        debug!(count = contributors.count(), "contributors counted");
    }

    contributors
}

/// Locate the contributors region that starts inside `range`.
fn find_section(tree: &DomTree<'_>, range: Range<usize>) -> Option<Range<usize>> {
    for pattern in SECTION_PATTERNS.iter() {
        let heading = tree
            .headings_in(range.clone())
            .find(|heading| (2..=5).contains(&heading.level) && pattern.is_match(&heading.text));

        if let Some(heading) = heading {
            return Some(heading_region(tree, heading));
        }
    }

    let marker = tree.elements_named(range, &["p", "div"]).find(|(_, element)| {
        let text = collapse_whitespace(&element.text().collect::<String>());
        text.len() <= MAX_MARKER_LEN && SECTION_PATTERNS[0].is_match(&text)
    });

    marker.map(|(position, _)| tree.span(position).end..tree.next_heading_after(position))
}

fn heading_region(tree: &DomTree<'_>, heading: &Heading) -> Range<usize> {
    heading.position + 1..tree.section_end(heading)
}

enum NameBlock {
    Text(String),
    Items(Vec<String>),
    Missing,
}

/// The block naming the most people, else the first list, else the first paragraph.
///
/// Blocks are ranked by parsed names rather than commas: a lead-in sentence
/// often carries a comma while a short list is joined only by "and".
fn pick_name_block(tree: &DomTree<'_>, region: Range<usize>) -> NameBlock {
    let richest = tree
        .elements_named(region.clone(), &["p", "div", "dd", "blockquote"])
        .map(|(_, element)| element.text().collect::<String>())
        .map(|text| (parse_contributor_list(&text), text))
        .filter(|(names, _)| names.count() >= MIN_LISTED_NAMES)
        // max_by_key keeps the last maximum, the innermost of nested blocks
        .max_by_key(|(names, _)| names.count());

    if let Some((_, text)) = richest {
        return NameBlock::Text(text);
    }

    if let Some((list, _)) = tree.elements_named(region.clone(), &["ul", "ol"]).next() {
        let items = tree
            .elements_named(tree.span(list), &["li"])
            .map(|(_, item)| item.text().collect())
            .collect();
        return NameBlock::Items(items);
    }

    match tree.elements_named(region, &["p"]).next() {
        Some((_, paragraph)) => NameBlock::Text(paragraph.text().collect()),
        None => NameBlock::Missing,
    }
}

/// Parse a free-text contributor list into distinct names.
///
/// # Example
///
/// ```rust
/// use herald_core::contributors::parse_contributor_list;
///
/// let contributors = parse_contributor_list("Jane Doe, John Smith and Jane Doe");
/// assert_eq!(contributors.count(), 2);
/// ```
pub fn parse_contributor_list(text: &str) -> Contributors {
    let text = collapse_whitespace(text);
    let text = LEAD_IN.replace(&text, "");
    let text = THANKS_TO.replace(&text, "");
    let text = WHO_CLAUSE.replace(&text, "");
    let text = JOINER.replace_all(&text, ", ");

    split_outside_brackets(&text).into_iter().filter_map(clean_name).collect()
}

/// Split on commas that are not inside brackets.
fn split_outside_brackets(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
}

/// Normalize one token, or reject it as noise.
fn clean_name(token: &str) -> Option<String> {
    let name = collapse_whitespace(token);
    let name = name.trim_end_matches(['.', ',', ';', ':']).trim();

    if name.chars().count() < 2 {
        return None;
    }

    let lower = name.to_lowercase();
    if STOPLIST.contains(&lower.as_str()) || SKIPPED_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return None;
    }

    let without_bot = name.replace("[bot]", "");
    if without_bot.chars().any(|c| c.is_ascii_digit() || "<>{}[]()".contains(c)) {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use crate::release::Version;
    use rstest::rstest;

    fn count_in(html: &str, version: Option<&str>) -> Contributors {
        let doc = Document::parse(html).unwrap();
        let tree = DomTree::build(&doc);
        let version = version.map(|v| Version::parse(v).unwrap());
        let section = ReleaseSection::locate(&tree, version.as_ref());
        count_contributors(&section)
    }

    #[rstest]
    #[case("Alice, Bob, Carol", 3)]
    #[case("Alice,Bob,Carol ", 3)]
    #[case("Jane Doe, John Smith and Jane Doe", 2)]
    #[case("Jane   Doe, Jane Doe", 1)]
    #[case("Alice & Bob", 2)]
    #[case("", 0)]
    fn test_parse_contributor_list(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(parse_contributor_list(text).count(), expected);
    }

    #[test]
    fn test_parse_strips_lead_in_and_noise() {
        let text = "Thanks to everyone who has contributed to the maintenance and improvement of the project \
                    since version 1.6, including: Adam Li, dependabot[bot], Olivier Grisel, 42, <div>, \
                    et al., Thomas J. Fan.";

        let contributors = parse_contributor_list(text);
        assert_eq!(contributors.names(), ["Adam Li", "dependabot[bot]", "Olivier Grisel", "Thomas J. Fan"]);
    }

    #[test]
    fn test_parse_keeps_bracketed_commas_together() {
        let contributors = parse_contributor_list("Alice (Team A, Team B), Bob");
        assert_eq!(contributors.count(), 1);
        assert_eq!(contributors.names(), ["Bob"]);
    }

    #[test]
    fn test_section_under_heading() {
        let html = r#"
            <h2>Version 1.7.0</h2>
            <ul><li>Fix something.</li></ul>
            <h3>Code and documentation contributors</h3>
            <p>Thanks to everyone who has contributed to the maintenance and improvement of
            the project since version 1.6, including:</p>
            <p>Alice Smith, Bob Jones, Carol White, Dan Brown</p>
            <h2>Version 1.6.1</h2>
            <h3>Code and documentation contributors</h3>
            <p>Someone Else, Another Person</p>
        "#;

        let contributors = count_in(html, Some("1.7"));
        assert_eq!(contributors.count(), 4);
        assert_eq!(contributors.names()[0], "Alice Smith");
    }

    #[rstest]
    #[case("Alice Smith and Bob Jones", 2)]
    #[case("Alice Smith &amp; Bob Jones", 2)]
    #[case("Alice Smith, Bob Jones and Carol White", 3)]
    fn test_names_joined_without_commas(#[case] names: &str, #[case] expected: usize) {
        let html = format!(
            r#"
            <h2>Version 1.7.0</h2>
            <h3>Code and documentation contributors</h3>
            <p>Thanks to everyone who has contributed to the maintenance and improvement of
            the project since version 1.6, including:</p>
            <p>{names}</p>
            "#
        );

        assert_eq!(count_in(&html, Some("1.7")).count(), expected);
    }

    #[test]
    fn test_prose_lead_in_does_not_hide_list() {
        let html = r#"
            <h2>Contributors</h2>
            <p>We thank the following people</p>
            <ul><li>Alice Smith</li><li>Bob Jones</li></ul>
        "#;

        assert_eq!(count_in(html, None).count(), 2);
    }

    #[test]
    fn test_names_as_list_items() {
        let html = r#"
            <h2>Contributors</h2>
            <ul><li>Alice Smith</li><li>Bob Jones</li><li>2</li></ul>
        "#;

        assert_eq!(count_in(html, None).count(), 2);
    }

    #[test]
    fn test_marker_paragraph_without_heading() {
        let html = r#"
            <p>Code and documentation contributors</p>
            <p>Alice, Bob, Carol</p>
        "#;

        assert_eq!(count_in(html, None).count(), 3);
    }

    #[test]
    fn test_missing_section_counts_zero() {
        let html = "<h2>Version 1.7.0</h2><p>No thanks here.</p>";
        assert_eq!(count_in(html, Some("1.7")), Contributors::default());
    }

    #[rstest]
    #[case("  Alice  ", Some("Alice"))]
    #[case("Bob.", Some("Bob"))]
    #[case("X", None)]
    #[case("the", None)]
    #[case("the team", None)]
    #[case("user123", None)]
    #[case("renovate[bot]", Some("renovate[bot]"))]
    fn test_clean_name(#[case] token: &str, #[case] expected: Option<&str>) {
        assert_eq!(clean_name(token).as_deref(), expected);
    }
}
