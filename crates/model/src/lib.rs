//! RDF node and statement values that plug into `rdfcursor-core` streams.
//!
//! [`Statement`] implements [`StatementTemplate`](rdfcursor_core::StatementTemplate),
//! so a cursor of [`Node`]s can be projected into a statement stream with
//! [`stream_from_node_iterator`](rdfcursor_core::stream_from_node_iterator).

mod error;
mod find;
mod node;
mod statement;

pub use error::ModelError;
pub use find::find_map;
pub use node::{Literal, LiteralTag, Node};
pub use statement::Statement;

/// Type-erased statement stream whose contexts are graph nodes.
pub type StatementStream = rdfcursor_core::DynCursor<Statement, Node>;
