//! Ordered, append-only list of transform/filter functions.

use smallvec::SmallVec;
use tracing::trace;

use crate::cursor::PullCursor;
use crate::error::CursorError;
use crate::source::Source;

type MapFn<S> = dyn FnMut(&mut PullCursor<S>, <S as Source>::Item) -> Option<<S as Source>::Item>;

/// One registered map. Whatever the function captures is its context; dropping
/// the entry drops that context exactly once.
struct MapEntry<S: Source> {
    func: Box<MapFn<S>>,
}

/// The map chain of a cursor.
///
/// Every fresh resolution feeds the candidate through the entries front to
/// back. An entry returning `None` rejects the candidate and the remaining
/// entries are not invoked. Entries are never reordered or removed; dropping
/// the chain drops them in registration order.
pub(crate) struct MapChain<S: Source> {
    entries: SmallVec<[MapEntry<S>; 2]>,
}

impl<S: Source> MapChain<S> {
    pub fn new() -> Self {
        Self { entries: SmallVec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a map. If storage cannot be reserved the map (and its context)
    /// is dropped before the error is returned and the chain is unchanged.
    pub(crate) fn append<F>(&mut self, func: F) -> Result<(), CursorError>
    where
        F: FnMut(&mut PullCursor<S>, S::Item) -> Option<S::Item> + 'static,
    {
        if self.entries.try_reserve(1).is_err() {
            drop(func);
            return Err(CursorError::Allocation);
        }
        self.entries.push(MapEntry { func: Box::new(func) });
        Ok(())
    }

    /// Moves all entries of `other` behind the entries of `self`.
    pub(crate) fn extend_from(&mut self, other: MapChain<S>) {
        self.entries.extend(other.entries);
    }

    /// Runs `candidate` through every entry in order.
    pub(crate) fn apply(&mut self, cursor: &mut PullCursor<S>, candidate: S::Item) -> Option<S::Item> {
        let mut item = candidate;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            match (entry.func)(cursor, item) {
                Some(next) => item = next,
                None => {
                    trace!(map = index, "map rejected candidate");
                    return None;
                }
            }
        }
        Some(item)
    }
}

impl<S: Source> Default for MapChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Source> core::fmt::Debug for MapChain<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MapChain").field("len", &self.entries.len()).finish()
    }
}
