use rdfcursor_core::{PullCursor, Source};

use crate::statement::Statement;

/// Map that keeps only statements matching `partial`.
///
/// Unbound parts of `partial` match anything; `None` lets every statement
/// through. Rejected statements are skipped by the cursor.
pub fn find_map<S>(partial: Option<Statement>) -> impl FnMut(&mut PullCursor<S>, Statement) -> Option<Statement> + 'static
where
    S: Source<Item = Statement>,
{
    move |_: &mut PullCursor<S>, statement: Statement| match &partial {
        Some(partial) if !statement.matches(partial) => None,
        _ => Some(statement),
    }
}
