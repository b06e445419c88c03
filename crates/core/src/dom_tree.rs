//! Document-order index over a parsed page.
//!
//! Release notes are "flat" documents: a section is not a container element but
//! everything between one heading and the next heading of the same or higher
//! level. [`DomTree`] numbers every node in document order and records where
//! each node's subtree ends, so sections, legends and scopes all become plain
//! position ranges.

use std::ops::Range;

use scraper::ElementRef;

use crate::parse::{Document, clean_heading};

/// What a position in the tree holds
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    Other,
}

/// A node and the end of its subtree
#[derive(Debug, Clone, Copy)]
pub struct DomNode<'a> {
    pub kind: NodeKind<'a>,
    /// Position just past the last descendant
    pub end: usize,
}

/// A heading element with its level and cleaned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub position: usize,
    pub level: u8,
    pub text: String,
}

/// A set of excluded position ranges
#[derive(Debug, Clone, Default)]
pub struct Regions {
    spans: Vec<Range<usize>>,
}

impl Regions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, span: Range<usize>) {
        if !span.is_empty() {
            self.spans.push(span);
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.spans.iter().any(|span| span.contains(&position))
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Every node of a document in pre-order
#[derive(Debug, Clone)]
pub struct DomTree<'a> {
    nodes: Vec<DomNode<'a>>,
    headings: Vec<Heading>,
}

impl<'a> DomTree<'a> {
    /// Index a parsed document
    pub fn build(doc: &'a Document) -> Self {
        let mut nodes = Vec::new();
        let mut headings = Vec::new();

        for node in doc.html().root_element().descendants() {
            let position = nodes.len();
            let end = position + node.descendants().count();

            let kind = if let Some(element) = ElementRef::wrap(node) {
                if let Some(level) = heading_level(element.value().name()) {
                    let text = clean_heading(&element.text().collect::<String>());
                    headings.push(Heading { position, level, text });
                }
                NodeKind::Element(element)
            } else if let Some(text) = node.value().as_text() {
                NodeKind::Text(&**text)
            } else {
                NodeKind::Other
            };

            nodes.push(DomNode { kind, end });
        }

        Self { nodes, headings }
    }

    /// Get a node by position
    pub fn get_node(&self, position: usize) -> Option<&DomNode<'a>> {
        self.nodes.get(position)
    }

    /// Get the element at a position, if that node is an element
    pub fn element(&self, position: usize) -> Option<ElementRef<'a>> {
        match self.nodes.get(position)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The position range covered by a node and its descendants
    pub fn span(&self, position: usize) -> Range<usize> {
        match self.nodes.get(position) {
            Some(node) => position..node.end,
            None => position..position,
        }
    }

    /// Elements inside `range` in document order
    pub fn elements_in(&self, range: Range<usize>) -> impl Iterator<Item = (usize, ElementRef<'a>)> + '_ {
        let end = range.end.min(self.nodes.len());
        let start = range.start.min(end);
        self.nodes[start..end]
            .iter()
            .enumerate()
            .filter_map(move |(offset, node)| match node.kind {
                NodeKind::Element(element) => Some((start + offset, element)),
                _ => None,
            })
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = (usize, ElementRef<'a>)> + '_ {
        self.elements_in(0..self.nodes.len())
    }

    /// Elements with one of the given tag names inside `range`
    pub fn elements_named<'s>(
        &'s self, range: Range<usize>, names: &'s [&'s str],
    ) -> impl Iterator<Item = (usize, ElementRef<'a>)> + 's {
        self.elements_in(range).filter(move |(_, element)| names.contains(&element.value().name()))
    }

    /// Text nodes inside `range` that are not excluded, joined with spaces
    pub fn text_in(&self, range: Range<usize>, excluded: &Regions) -> String {
        let end = range.end.min(self.nodes.len());
        let start = range.start.min(end);
        let mut parts = Vec::new();

        for (offset, node) in self.nodes[start..end].iter().enumerate() {
            if let NodeKind::Text(text) = node.kind
                && !excluded.contains(start + offset)
            {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
        }

        parts.join(" ")
    }

    /// All headings in document order
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Headings whose position lies inside `range`
    pub fn headings_in(&self, range: Range<usize>) -> impl Iterator<Item = &Heading> + '_ {
        self.headings.iter().filter(move |heading| range.contains(&heading.position))
    }

    /// Position of the next heading with a level at or above `level`, or the
    /// end of the document
    pub fn section_end(&self, heading: &Heading) -> usize {
        self.headings
            .iter()
            .find(|next| next.position > heading.position && next.level <= heading.level)
            .map_or(self.nodes.len(), |next| next.position)
    }

    /// Position of the first heading of any level after `position`, or the end
    /// of the document
    pub fn next_heading_after(&self, position: usize) -> usize {
        self.headings
            .iter()
            .find(|next| next.position > position)
            .map_or(self.nodes.len(), |next| next.position)
    }

    /// Whether the node at `position` sits inside an element named `tag`
    pub fn has_ancestor(&self, position: usize, tag: &str) -> bool {
        let Some(element) = self.element(position) else {
            return false;
        };
        element
            .ancestors()
            .any(|node| node.value().as_element().is_some_and(|el| el.name() == tag))
    }

    /// Get the total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Heading level for `h1`..`h6`
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
