//! Public AST types for message templates.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A parsed template string.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// True if the template contains no variable references.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Iterate over the variable references in source order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable(reference) => Some(reference),
            Segment::Literal(_) => None,
        })
    }
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, copied to the output unchanged.
    Literal(String),
    /// A variable reference between delimiters.
    Variable(Reference),
}

/// What a variable reference points at in the template data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The data value itself: `{{.}}`
    Current,
    /// A named value, possibly nested: `{{name}}`, `{{.user.name}}`
    Field(Vec<String>),
    /// A positional value: `{{0}}`, `{{index . 0}}`
    Index(usize),
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Reference::Current => f.write_str("."),
            Reference::Field(path) => f.write_str(&path.join(".")),
            Reference::Index(index) => write!(f, "{index}"),
        }
    }
}
