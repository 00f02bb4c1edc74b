//! The lazy resolution engine shared by element iterators and statement
//! streams.

use core::fmt;
use core::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::error::CursorError;
use crate::map_chain::MapChain;
use crate::source::Source;

/// Whether a cursor is inside its resolution algorithm.
///
/// Map functions run while the cursor is `Resolving`. Context, key and value
/// queries made from a map function in that state go straight to the source
/// and describe the in-flight candidate instead of starting a nested
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveState {
    #[default]
    Idle,
    Resolving,
}

/// Lazy pull cursor over a [`Source`] with an optional chain of maps.
///
/// The cursor caches "the next accepted element": the first candidate of the
/// source that every map lets through, possibly transformed. [`is_end`],
/// [`current`] and the context accessors resolve that element on first use and
/// are idempotent until [`advance`] moves on. `advance` resolves the following
/// element right away, so the accessors stay O(1) after it.
///
/// Once the cursor reports its end it stays finished. Candidates rejected by
/// the map chain are skipped internally and never end the cursor on their own.
///
/// References returned by the accessors borrow the cursor and are therefore
/// only usable until the next `advance`. Clone them (or use [`owned`]) to keep
/// elements around.
///
/// [`is_end`]: PullCursor::is_end
/// [`current`]: PullCursor::current
/// [`advance`]: PullCursor::advance
/// [`owned`]: PullCursor::owned
pub struct PullCursor<S: Source> {
    // Field order is drop order: the source is disposed before the map contexts.
    source: Option<S>,
    maps: MapChain<S>,
    current: Option<S::Item>,
    context: Option<S::Context>,
    context_fetched: bool,
    finished: bool,
    resolved: bool,
    state: ResolveState,
    // Length of the chain while it is moved out to run.
    detached_maps: usize,
}

impl<S: Source> PullCursor<S> {
    /// Creates a cursor that owns `source`. Nothing is pulled from the source
    /// until the cursor is first queried.
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            maps: MapChain::new(),
            current: None,
            context: None,
            context_fetched: false,
            finished: false,
            resolved: false,
            state: ResolveState::Idle,
            detached_maps: 0,
        }
    }

    /// Creates a cursor with no source that is finished from the start.
    pub fn empty() -> Self {
        Self {
            source: None,
            maps: MapChain::new(),
            current: None,
            context: None,
            context_fetched: false,
            finished: true,
            resolved: true,
            state: ResolveState::Idle,
            detached_maps: 0,
        }
    }

    /// The finished flag as it stands, without resolving anything.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn resolve_state(&self) -> ResolveState {
        self.state
    }

    /// Number of registered maps, including the chain currently running and
    /// maps appended from inside it.
    pub fn map_count(&self) -> usize {
        self.detached_maps + self.maps.len()
    }

    /// Returns `true` when no further element is available.
    ///
    /// Resolves the current position if needed; repeated calls without an
    /// `advance` in between neither change state nor consume elements. Called
    /// from a map function it reports the finished flag only.
    pub fn is_end(&mut self) -> bool {
        if self.finished {
            return true;
        }
        if self.state == ResolveState::Resolving {
            return false;
        }
        self.resolve();
        self.finished
    }

    /// Moves to the next accepted element and returns `true` if the cursor is
    /// now finished.
    ///
    /// A no-op once finished. Calls made from a map function are refused: the
    /// source must not move under the candidate being resolved.
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return true;
        }
        if self.state == ResolveState::Resolving {
            warn!("advance requested from inside a map function; ignored");
            return false;
        }

        let exhausted = self.source.as_mut().is_none_or(|source| source.advance());
        if exhausted {
            self.finish();
            return true;
        }

        self.resolved = false;
        self.current = None;
        self.forget_context();
        self.resolve();
        self.finished
    }

    /// The current element, or `None` once the cursor is finished.
    ///
    /// Never moves the source by itself (rejected candidates aside). Returns
    /// `None` when called from a map function: the candidate is passed to the
    /// map directly.
    pub fn current(&mut self) -> Option<&S::Item> {
        if self.state == ResolveState::Resolving {
            return None;
        }
        self.resolve();
        self.current.as_ref()
    }

    /// The context value of the current element.
    ///
    /// From a map function this describes the candidate being resolved.
    pub fn current_context(&mut self) -> Option<&S::Context> {
        self.load_context();
        if self.finished { None } else { self.context.as_ref() }
    }

    /// The current element together with its context, resolved once.
    pub fn entry(&mut self) -> Option<(&S::Item, Option<&S::Context>)> {
        if self.state == ResolveState::Resolving {
            return None;
        }
        self.load_context();
        let item = self.current.as_ref()?;
        Some((item, self.context.as_ref()))
    }

    /// Key of the current element, fetched fresh from an associative source.
    pub fn current_key(&mut self) -> Option<S::Key> {
        self.fetch_aux(S::fetch_key)
    }

    /// Value of the current element, fetched fresh from an associative source.
    pub fn current_value(&mut self) -> Option<S::Value> {
        self.fetch_aux(S::fetch_value)
    }

    /// Appends a map to the chain.
    ///
    /// The map receives the cursor and a candidate and returns the element to
    /// continue with, or `None` to reject the candidate. Whatever the closure
    /// captures is its context and is dropped exactly once, when the cursor is
    /// dropped or immediately if appending fails.
    ///
    /// An element already resolved is not affected; the map applies from the
    /// next resolution on.
    pub fn add_map<F>(&mut self, map: F) -> Result<(), CursorError>
    where
        F: FnMut(&mut PullCursor<S>, S::Item) -> Option<S::Item> + 'static,
    {
        self.maps.append(map)?;
        debug!(maps = self.map_count(), "map appended to cursor");
        Ok(())
    }

    /// Appends a map whose context is passed explicitly on every call.
    pub fn add_map_with_context<C, F>(&mut self, context: C, mut map: F) -> Result<(), CursorError>
    where
        C: 'static,
        F: FnMut(&mut PullCursor<S>, &mut C, S::Item) -> Option<S::Item> + 'static,
    {
        let mut context = context;
        self.add_map(move |cursor, item| map(cursor, &mut context, item))
    }

    /// Iterates over clones of the remaining elements, advancing the cursor.
    pub fn owned(&mut self) -> Owned<'_, S>
    where
        S::Item: Clone,
    {
        Owned { cursor: self }
    }

    pub(crate) fn finish(&mut self) {
        if !self.finished {
            debug!("cursor finished");
        }
        self.finished = true;
        self.resolved = true;
        self.current = None;
        self.forget_context();
    }

    fn forget_context(&mut self) {
        self.context = None;
        self.context_fetched = false;
    }

    fn load_context(&mut self) {
        if self.finished {
            return;
        }
        if self.state == ResolveState::Idle {
            self.resolve();
            if self.current.is_none() || self.context_fetched {
                return;
            }
        }
        if let Some(source) = self.source.as_mut() {
            self.context = source.fetch_context();
            self.context_fetched = true;
        }
    }

    fn fetch_aux<R>(&mut self, fetch: fn(&mut S) -> Option<R>) -> Option<R> {
        if self.finished {
            return None;
        }
        if self.state == ResolveState::Idle {
            self.resolve();
            self.current.as_ref()?;
        }
        fetch(self.source.as_mut()?)
    }

    fn resolve(&mut self) {
        if self.resolved || self.finished {
            return;
        }

        self.state = ResolveState::Resolving;
        self.forget_context();
        let accepted = self.next_accepted();
        self.forget_context();
        self.state = ResolveState::Idle;
        self.resolved = true;

        match accepted {
            Some(item) => {
                trace!("resolved current element");
                self.current = Some(item);
            }
            None => self.finish(),
        }
    }

    fn next_accepted(&mut self) -> Option<S::Item> {
        loop {
            let source = self.source.as_mut()?;
            if source.is_end() {
                return None;
            }
            let candidate = source.fetch()?;
            if self.maps.is_empty() {
                return Some(candidate);
            }

            // The chain is moved out while it runs so its functions can borrow
            // the cursor; maps appended meanwhile land behind the original ones.
            let mut maps = core::mem::take(&mut self.maps);
            self.detached_maps = maps.len();
            let outcome = maps.apply(self, candidate);
            self.detached_maps = 0;
            let appended = core::mem::replace(&mut self.maps, maps);
            self.maps.extend_from(appended);

            if outcome.is_some() {
                return outcome;
            }
            self.forget_context();
            if self.source.as_mut()?.advance() {
                trace!("source exhausted while skipping rejected candidates");
                return None;
            }
        }
    }
}

impl<S: Source> fmt::Debug for PullCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullCursor")
            .field("has_source", &self.source.is_some())
            .field("maps", &self.map_count())
            .field("finished", &self.finished)
            .field("resolved", &self.resolved)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Iterator over clones of a cursor's remaining elements, see
/// [`PullCursor::owned`].
pub struct Owned<'c, S: Source> {
    cursor: &'c mut PullCursor<S>,
}

impl<S> Iterator for Owned<'_, S>
where
    S: Source,
    S::Item: Clone,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        let item = self.cursor.current()?.clone();
        self.cursor.advance();
        Some(item)
    }
}

impl<S> FusedIterator for Owned<'_, S>
where
    S: Source,
    S::Item: Clone,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchSelector, VecSource};
    use crate::testkit::{CallLog, CountingSource, SourceCall};
    use rstest::rstest;
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn counted(items: &[i32], log: &CallLog) -> PullCursor<CountingSource<i32>> {
        PullCursor::new(CountingSource::new(items.iter().copied(), log))
    }

    fn ints(items: &[i32]) -> PullCursor<VecSource<i32>> {
        PullCursor::new(VecSource::new(items.iter().copied()))
    }

    #[rstest]
    fn nothing_is_pulled_before_first_query() {
        let log = CallLog::default();
        let cursor = counted(&[1, 2, 3], &log);
        assert!(log.is_empty());
        drop(cursor);
        assert_eq!(log.calls(), vec![SourceCall::Dispose]);
    }

    #[rstest]
    fn advance_resolves_eagerly() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut cursor = ints(&[1, 2, 3]);
        cursor
            .add_map(move |_, item| {
                seen.set(seen.get() + 1);
                Some(item)
            })
            .unwrap();

        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(calls.get(), 1);

        assert!(!cursor.advance());
        assert_eq!(calls.get(), 2, "map runs inside advance, not on the next query");
        assert_eq!(cursor.current(), Some(&2));
        assert!(!cursor.is_end());
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn map_queries_context_of_in_flight_candidate() {
        let source = VecSource::with_contexts([(1, Some("g1")), (2, Some("g2")), (3, Some("g1"))]);
        let mut cursor = PullCursor::new(source);
        cursor
            .add_map(|cursor, item| {
                assert_eq!(cursor.resolve_state(), ResolveState::Resolving);
                (cursor.current_context() == Some(&"g1")).then_some(item)
            })
            .unwrap();

        let mut seen = Vec::new();
        while !cursor.is_end() {
            let (item, context) = cursor.entry().unwrap();
            seen.push((*item, context.copied()));
            cursor.advance();
        }
        assert_eq!(seen, vec![(1, Some("g1")), (3, Some("g1"))]);
        assert_eq!(cursor.resolve_state(), ResolveState::Idle);
    }

    #[rstest]
    fn reentrant_queries_do_not_resolve_or_advance() {
        let log = CallLog::default();
        let mut cursor = counted(&[1, 2], &log);
        cursor
            .add_map(|cursor, item| {
                assert!(cursor.current().is_none());
                assert!(cursor.entry().is_none());
                assert!(!cursor.is_end());
                assert!(!cursor.advance());
                Some(item)
            })
            .unwrap();

        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(log.count(SourceCall::Advance), 0);
        assert_eq!(log.count(SourceCall::Fetch(FetchSelector::Object)), 1);
    }

    #[rstest]
    fn added_map_is_not_retroactive() {
        let mut cursor = ints(&[1, 2, 3, 4]);
        assert_eq!(cursor.current(), Some(&1));

        cursor.add_map(|_, item| (item % 2 == 0).then_some(item * 100)).unwrap();
        assert_eq!(cursor.current(), Some(&1));

        cursor.advance();
        assert_eq!(cursor.current(), Some(&200));
        cursor.advance();
        assert_eq!(cursor.current(), Some(&400));
        assert!(cursor.advance());
    }

    #[rstest]
    fn map_appended_from_callback_applies_next_time() {
        let installed = Rc::new(Cell::new(false));
        let flag = installed.clone();
        let mut cursor = ints(&[1, 2, 3]);
        cursor
            .add_map(move |cursor, item| {
                if !flag.replace(true) {
                    assert_eq!(cursor.map_count(), 1, "running chain is counted");
                    cursor.add_map(|_, item| Some(-item)).unwrap();
                    assert_eq!(cursor.map_count(), 2);
                }
                Some(item)
            })
            .unwrap();

        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.map_count(), 2);
        cursor.advance();
        assert_eq!(cursor.current(), Some(&-2));
    }

    #[rstest]
    fn context_map_receives_its_context() {
        let mut cursor = ints(&[5, 6, 7]);
        cursor
            .add_map_with_context(0usize, |_, seen: &mut usize, item| {
                *seen += 1;
                Some(item * i32::try_from(*seen).unwrap())
            })
            .unwrap();

        let values: Vec<_> = cursor.owned().collect();
        assert_eq!(values, vec![5, 12, 21]);
        assert!(cursor.is_end());
    }

    #[rstest]
    fn context_is_fetched_once_per_position() {
        let log = CallLog::default();
        let mut cursor = PullCursor::new(CountingSource::with_contexts([(1, Some(10)), (2, None)], &log));

        assert_eq!(cursor.current_context(), Some(&10));
        assert_eq!(cursor.current_context(), Some(&10));
        assert_eq!(log.count(SourceCall::Fetch(FetchSelector::Context)), 1);

        cursor.advance();
        assert_eq!(cursor.current_context(), None);
        assert_eq!(cursor.entry(), Some((&2, None)));
        assert_eq!(log.count(SourceCall::Fetch(FetchSelector::Context)), 2);

        cursor.advance();
        assert_eq!(cursor.current_context(), None);
        assert_eq!(cursor.entry(), None);
    }

    struct Table {
        rows: Vec<(String, u32)>,
        position: usize,
    }

    impl Source for Table {
        type Item = String;
        type Context = ();
        type Key = String;
        type Value = u32;

        fn is_end(&mut self) -> bool {
            self.position >= self.rows.len()
        }

        fn advance(&mut self) -> bool {
            self.position += 1;
            self.is_end()
        }

        fn fetch(&mut self) -> Option<String> {
            self.rows.get(self.position).map(|(key, value)| format!("{key}={value}"))
        }

        fn fetch_key(&mut self) -> Option<String> {
            self.rows.get(self.position).map(|(key, _)| key.clone())
        }

        fn fetch_value(&mut self) -> Option<u32> {
            self.rows.get(self.position).map(|(_, value)| *value)
        }
    }

    #[rstest]
    fn key_and_value_follow_current_element() {
        let rows: BTreeMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        let table = Table {
            rows: rows.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
            position: 0,
        };
        let mut cursor = PullCursor::new(table);
        cursor.add_map(|_, item| (!item.starts_with('a')).then_some(item)).unwrap();

        assert_eq!(cursor.current_key().as_deref(), Some("b"));
        assert_eq!(cursor.current_value(), Some(2));
        assert_eq!(cursor.current().map(String::as_str), Some("b=2"));

        assert!(cursor.advance());
        assert_eq!(cursor.current_key(), None);
        assert_eq!(cursor.current_value(), None);
    }

    #[rstest]
    fn rejected_tail_finishes_without_extra_advance_from_caller() {
        let log = CallLog::default();
        let mut cursor = counted(&[1, 3, 5], &log);
        cursor.add_map(|_, item| (item > 4).then_some(item)).unwrap();

        assert_eq!(cursor.current(), Some(&5));
        assert_eq!(log.count(SourceCall::Advance), 2);
        assert!(cursor.advance());
        assert!(cursor.is_end());
        assert_eq!(cursor.current(), None);
    }

    #[rstest]
    fn borrowed_source_is_left_to_caller() {
        let log = CallLog::default();
        let mut source = CountingSource::new([1, 2], &log);
        {
            let mut cursor = PullCursor::new(&mut source);
            assert_eq!(cursor.owned().collect::<Vec<_>>(), vec![1, 2]);
        }
        assert_eq!(log.count(SourceCall::Dispose), 0);
        drop(source);
        assert_eq!(log.count(SourceCall::Dispose), 1);
    }

    #[rstest]
    fn debug_output_names_state() {
        let cursor: PullCursor<VecSource<i32>> = PullCursor::empty();
        let rendered = format!("{cursor:?}");
        assert!(rendered.contains("finished: true"));
        assert!(rendered.contains("has_source: false"));
    }
}
