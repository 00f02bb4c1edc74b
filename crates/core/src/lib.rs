//! Lazy, pull-based traversal of RDF query results.
//!
//! A [`PullCursor`] wraps an opaque [`Source`] and resolves "the next accepted
//! element" on demand, running every candidate through an ordered chain of
//! transform/filter functions registered with [`PullCursor::add_map`]. The same
//! engine serves plain element iterators (nodes, keys, values) and statement
//! streams; [`stream_from_node_iterator`] composes the two by writing each node
//! of an iterator into one part of a template statement.
//!
//! Values handed out by a cursor are borrowed from it and stay valid only until
//! the next [`PullCursor::advance`]; clone them to keep them longer.

mod cursor;
mod debug;
mod error;
mod map_chain;
mod node_stream;
pub mod source;
mod statement;
pub mod testkit;

pub use cursor::{Owned, PullCursor, ResolveState};
pub use error::CursorError;
pub use node_stream::{NodeStatementSource, stream_from_node_iterator};
pub use source::{BoxedSource, FetchSelector, Source, VecSource};
pub use statement::{StatementPart, StatementTemplate, UnsupportedPart};

/// Cursor over a type-erased source, usable wherever the concrete source type
/// should not leak into a signature.
pub type DynCursor<T, C = T, K = T, V = T> = PullCursor<BoxedSource<T, C, K, V>>;
