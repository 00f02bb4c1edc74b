use core::fmt;

use rdfcursor_core::{StatementPart, StatementTemplate, UnsupportedPart};
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// A triple whose parts may be unbound.
///
/// Fully bound statements are stream elements; partially bound ones serve as
/// templates for [`stream_from_node_iterator`](rdfcursor_core::stream_from_node_iterator)
/// and as patterns for [`Statement::matches`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Node>,
}

impl Statement {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self { subject: Some(subject), predicate: Some(predicate), object: Some(object) }
    }

    /// Statement with subject and predicate set and the object left open.
    pub fn template(subject: Node, predicate: Node) -> Self {
        Self { subject: Some(subject), predicate: Some(predicate), object: None }
    }

    pub fn is_complete(&self) -> bool {
        self.subject.is_some() && self.predicate.is_some() && self.object.is_some()
    }

    /// Whether every bound part of `partial` equals the same part of `self`.
    /// Unbound parts of `partial` match anything.
    pub fn matches(&self, partial: &Statement) -> bool {
        fn part_matches(wanted: Option<&Node>, actual: Option<&Node>) -> bool {
            wanted.is_none_or(|wanted| actual == Some(wanted))
        }

        part_matches(partial.subject.as_ref(), self.subject.as_ref())
            && part_matches(partial.predicate.as_ref(), self.predicate.as_ref())
            && part_matches(partial.object.as_ref(), self.object.as_ref())
    }

    fn slot_mut(&mut self, part: StatementPart) -> Result<&mut Option<Node>, UnsupportedPart> {
        match part {
            StatementPart::Subject => Ok(&mut self.subject),
            StatementPart::Predicate => Ok(&mut self.predicate),
            StatementPart::Object => Ok(&mut self.object),
            StatementPart::All => Err(UnsupportedPart(part)),
        }
    }
}

impl StatementTemplate for Statement {
    type Node = Node;

    fn set_part(&mut self, part: StatementPart, node: Option<Node>) -> Result<(), UnsupportedPart> {
        *self.slot_mut(part)? = node;
        Ok(())
    }

    fn part(&self, part: StatementPart) -> Option<&Node> {
        match part {
            StatementPart::Subject => self.subject.as_ref(),
            StatementPart::Predicate => self.predicate.as_ref(),
            StatementPart::Object => self.object.as_ref(),
            StatementPart::All => None,
        }
    }
}

struct Slot<'a>(Option<&'a Node>);

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => fmt::Display::fmt(node, f),
            None => f.write_str("NULL"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}}}",
            Slot(self.subject.as_ref()),
            Slot(self.predicate.as_ref()),
            Slot(self.object.as_ref())
        )
    }
}
