//! Projection of a node cursor into a statement stream.

use tracing::{debug, error};

use crate::cursor::PullCursor;
use crate::source::Source;
use crate::statement::{StatementPart, StatementTemplate};

/// Source that writes every node of a wrapped cursor into one part of a
/// private template statement.
///
/// The template is a copy taken at construction and is mutated in place on
/// every step; the statement handed to the consuming cursor is a clone of it
/// and shares its nodes. Context queries are forwarded to the wrapped cursor.
///
/// With [`StatementPart::All`] every fetch logs an error and yields nothing, so
/// the stream ends on first use.
pub struct NodeStatementSource<I, T>
where
    I: Source<Item = T::Node>,
    T: StatementTemplate,
{
    nodes: Option<PullCursor<I>>,
    template: T,
    part: StatementPart,
}

impl<I, T> NodeStatementSource<I, T>
where
    I: Source<Item = T::Node>,
    T: StatementTemplate,
{
    /// Takes ownership of `nodes` and copies `template`; the caller's template
    /// may be dropped right after.
    pub fn new(nodes: PullCursor<I>, template: &T, part: StatementPart) -> Self {
        Self { nodes: Some(nodes), template: template.clone(), part }
    }

    pub fn part(&self) -> StatementPart {
        self.part
    }

    /// The private template in its current state.
    pub fn template(&self) -> &T {
        &self.template
    }
}

impl<I, T> Source for NodeStatementSource<I, T>
where
    I: Source<Item = T::Node>,
    I::Context: Clone,
    T: StatementTemplate,
{
    type Item = T;
    type Context = I::Context;
    type Key = T;
    type Value = T;

    fn is_end(&mut self) -> bool {
        self.nodes.as_mut().is_none_or(|nodes| nodes.is_end())
    }

    fn advance(&mut self) -> bool {
        self.nodes.as_mut().is_none_or(|nodes| nodes.advance())
    }

    fn fetch(&mut self) -> Option<T> {
        let node = self.nodes.as_mut()?.current()?.clone();
        if let Err(err) = self.template.set_part(self.part, Some(node)) {
            error!(%err, "cannot build statement from node iterator");
            return None;
        }
        Some(self.template.clone())
    }

    fn fetch_context(&mut self) -> Option<I::Context> {
        self.nodes.as_mut()?.current_context().cloned()
    }
}

impl<I, T> Drop for NodeStatementSource<I, T>
where
    I: Source<Item = T::Node>,
    T: StatementTemplate,
{
    fn drop(&mut self) {
        drop(self.nodes.take());
        // The written node belongs to the released iterator; detach it before
        // the template goes away.
        if let Err(err) = self.template.set_part(self.part, None) {
            error!(%err, "cannot clear statement part on teardown");
        }
    }
}

/// Builds a statement stream from a cursor of nodes.
///
/// Each step yields `template` with `part` replaced by the next node. The
/// returned cursor owns `nodes` and a copy of `template`.
pub fn stream_from_node_iterator<I, T>(
    nodes: PullCursor<I>,
    template: &T,
    part: StatementPart,
) -> PullCursor<NodeStatementSource<I, T>>
where
    I: Source<Item = T::Node>,
    I::Context: Clone,
    T: StatementTemplate,
{
    debug!(%part, "creating statement stream from node iterator");
    PullCursor::new(NodeStatementSource::new(nodes, template, part))
}
