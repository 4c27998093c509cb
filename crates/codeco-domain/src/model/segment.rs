//! EDIFACT segment model
//!
//! A message is an ordered list of segments. Each segment renders as
//! `TAG+elem1+elem2...'`; composite elements are plain strings joined with
//! `:` by the caller. Empty elements keep their position on the wire.

use std::fmt;

/// Segment terminator (`'`)
pub const SEGMENT_TERMINATOR: char = '\'';
/// Data element separator (`+`)
pub const ELEMENT_SEPARATOR: char = '+';
/// Component separator inside a composite element (`:`)
pub const COMPONENT_SEPARATOR: char = ':';

/// Join components into one composite element
pub fn composite(components: &[&str]) -> String {
    components.join(":")
}

/// One tagged segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: String,
    pub elements: Vec<String>,
}

impl Segment {
    pub fn new<I, S>(tag: &str, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.to_string(),
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Element at `index`, or "" when absent
    pub fn element(&self, index: usize) -> &str {
        self.elements.get(index).map(String::as_str).unwrap_or("")
    }

    /// Component `component` of element `element`, or "" when absent
    pub fn component(&self, element: usize, component: usize) -> &str {
        self.element(element)
            .split(COMPONENT_SEPARATOR)
            .nth(component)
            .unwrap_or("")
    }

    /// Element at `index` when present and non-empty
    pub fn non_empty_element(&self, index: usize) -> Option<&str> {
        Some(self.element(index)).filter(|e| !e.is_empty())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for element in &self.elements {
            write!(f, "{}{}", ELEMENT_SEPARATOR, element)?;
        }
        write!(f, "{}", SEGMENT_TERMINATOR)
    }
}

/// Ordered segments of one interchange under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentModel {
    segments: Vec<Segment>,
}

impl SegmentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one segment. No arity or tag checks.
    pub fn append<I, S>(&mut self, tag: &str, elements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.push(Segment::new(tag, elements));
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment carrying `tag`
    pub fn find(&self, tag: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.tag == tag)
    }

    /// Wire form: segments concatenated with no separator between them
    pub fn serialize(&self) -> String {
        self.segments.iter().map(Segment::to_string).collect()
    }
}

impl From<Vec<Segment>> for SegmentModel {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}
