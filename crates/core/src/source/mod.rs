//! The capability set a cursor consumes from the component producing raw
//! elements (index scans, hash tables, parsers, other cursors).

mod vec;

pub use vec::VecSource;

use core::fmt;

/// Names the four fetch modes of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSelector {
    Object,
    Context,
    Key,
    Value,
}

impl FetchSelector {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchSelector::Object => "object",
            FetchSelector::Context => "context",
            FetchSelector::Key => "key",
            FetchSelector::Value => "value",
        }
    }
}

impl fmt::Display for FetchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Producer of raw candidates for a [`PullCursor`](crate::PullCursor).
///
/// A cursor built with [`PullCursor::new`](crate::PullCursor::new) takes the
/// source by value and owns it: the source is disposed (dropped) exactly once,
/// when the cursor is dropped. To only lend a source, pass `&mut source`; the
/// caller then keeps ownership and disposes it itself.
///
/// The source keeps its own position. `fetch*` reads at that position without
/// moving it; only [`Source::advance`] moves it.
pub trait Source {
    type Item;
    type Context;
    /// Key type of an associative source; usually `Item` for plain sources.
    type Key;
    type Value;

    /// Reports whether the source has no element at its current position.
    fn is_end(&mut self) -> bool;

    /// Moves to the next position. Returns `true` when the source could not
    /// move because it is exhausted or failed.
    fn advance(&mut self) -> bool;

    /// Returns the element at the current position.
    fn fetch(&mut self) -> Option<Self::Item>;

    /// Returns the context value (e.g. the graph a statement came from) of the
    /// element at the current position.
    fn fetch_context(&mut self) -> Option<Self::Context> {
        None
    }

    /// Key of the current element, for associative sources.
    fn fetch_key(&mut self) -> Option<Self::Key> {
        None
    }

    /// Value of the current element, for associative sources.
    fn fetch_value(&mut self) -> Option<Self::Value> {
        None
    }
}

/// A heap-allocated, type-erased source.
pub type BoxedSource<T, C = T, K = T, V = T> = Box<dyn Source<Item = T, Context = C, Key = K, Value = V>>;

impl<S: Source + ?Sized> Source for Box<S> {
    type Item = S::Item;
    type Context = S::Context;
    type Key = S::Key;
    type Value = S::Value;

    fn is_end(&mut self) -> bool {
        (**self).is_end()
    }

    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn fetch(&mut self) -> Option<Self::Item> {
        (**self).fetch()
    }

    fn fetch_context(&mut self) -> Option<Self::Context> {
        (**self).fetch_context()
    }

    fn fetch_key(&mut self) -> Option<Self::Key> {
        (**self).fetch_key()
    }

    fn fetch_value(&mut self) -> Option<Self::Value> {
        (**self).fetch_value()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    type Item = S::Item;
    type Context = S::Context;
    type Key = S::Key;
    type Value = S::Value;

    fn is_end(&mut self) -> bool {
        (**self).is_end()
    }

    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn fetch(&mut self) -> Option<Self::Item> {
        (**self).fetch()
    }

    fn fetch_context(&mut self) -> Option<Self::Context> {
        (**self).fetch_context()
    }

    fn fetch_key(&mut self) -> Option<Self::Key> {
        (**self).fetch_key()
    }

    fn fetch_value(&mut self) -> Option<Self::Value> {
        (**self).fetch_value()
    }
}
