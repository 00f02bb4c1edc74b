use core::fmt;

use thiserror::Error;

/// Selects one node position of a statement.
///
/// `All` stands for the statement as a whole and is rejected wherever a
/// single position is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementPart {
    Subject,
    Predicate,
    Object,
    All,
}

impl StatementPart {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementPart::Subject => "subject",
            StatementPart::Predicate => "predicate",
            StatementPart::Object => "object",
            StatementPart::All => "all",
        }
    }
}

impl fmt::Display for StatementPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal statement part `{0}`")]
pub struct UnsupportedPart(pub StatementPart);

/// What the node-to-statement adapter needs from a statement type.
///
/// `Clone` is the construct-from-template copy: the copy must not be affected
/// by later changes to, or the destruction of, the original.
///
/// The node-to-statement adapter also clones its template once per step to
/// hand out an owned statement, so `Clone` should be cheap, ideally only
/// reference-count bumps on shared node payloads. Types that deep-copy on
/// clone pay that cost for every element of the stream.
pub trait StatementTemplate: Clone {
    type Node: Clone;

    /// Writes `node` into `part`, or clears the part when `node` is `None`.
    fn set_part(&mut self, part: StatementPart, node: Option<Self::Node>) -> Result<(), UnsupportedPart>;

    /// The node currently stored in `part`.
    fn part(&self, part: StatementPart) -> Option<&Self::Node>;
}
