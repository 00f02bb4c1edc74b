//! Instrumented sources and drop probes for exercising cursors in tests.
//!
//! Everything here is single-threaded and records into shared logs, so a test
//! can hand a source to a cursor and still inspect what the cursor did with it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::source::{FetchSelector, Source, VecSource};

/// One call a cursor made on a [`CountingSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCall {
    IsEnd,
    Advance,
    Fetch(FetchSelector),
    Dispose,
}

/// Shared, ordered record of [`SourceCall`]s.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<SourceCall>>>);

impl CallLog {
    pub fn record(&self, call: SourceCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: SourceCall) -> usize {
        self.0.borrow().iter().filter(|recorded| **recorded == call).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// [`VecSource`] that records every call, including its own disposal.
#[derive(Debug)]
pub struct CountingSource<T, C = T> {
    inner: VecSource<T, C>,
    log: CallLog,
}

impl<T> CountingSource<T> {
    pub fn new(items: impl IntoIterator<Item = T>, log: &CallLog) -> Self {
        Self { inner: VecSource::new(items), log: log.clone() }
    }
}

impl<T, C> CountingSource<T, C> {
    pub fn with_contexts(entries: impl IntoIterator<Item = (T, Option<C>)>, log: &CallLog) -> Self {
        Self { inner: VecSource::with_contexts(entries), log: log.clone() }
    }
}

impl<T: Clone, C: Clone> Source for CountingSource<T, C> {
    type Item = T;
    type Context = C;
    type Key = T;
    type Value = T;

    fn is_end(&mut self) -> bool {
        self.log.record(SourceCall::IsEnd);
        self.inner.is_end()
    }

    fn advance(&mut self) -> bool {
        self.log.record(SourceCall::Advance);
        self.inner.advance()
    }

    fn fetch(&mut self) -> Option<T> {
        self.log.record(SourceCall::Fetch(FetchSelector::Object));
        self.inner.fetch()
    }

    fn fetch_context(&mut self) -> Option<C> {
        self.log.record(SourceCall::Fetch(FetchSelector::Context));
        self.inner.fetch_context()
    }

    fn fetch_key(&mut self) -> Option<T> {
        self.log.record(SourceCall::Fetch(FetchSelector::Key));
        self.inner.fetch_key()
    }

    fn fetch_value(&mut self) -> Option<T> {
        self.log.record(SourceCall::Fetch(FetchSelector::Value));
        self.inner.fetch_value()
    }
}

impl<T, C> Drop for CountingSource<T, C> {
    fn drop(&mut self) {
        self.log.record(SourceCall::Dispose);
    }
}

/// Shared record of dropped [`DropProbe`] labels, in drop order.
#[derive(Debug, Clone, Default)]
pub struct DropLog(Rc<RefCell<Vec<&'static str>>>);

impl DropLog {
    pub fn dropped(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        self.0.borrow().iter().filter(|dropped| **dropped == label).count()
    }
}

/// Value that notes its label in a [`DropLog`] when dropped. Capture one in a
/// map closure to observe when the map's context is destroyed.
#[derive(Debug)]
pub struct DropProbe {
    label: &'static str,
    log: DropLog,
}

impl DropProbe {
    pub fn new(label: &'static str, log: &DropLog) -> Self {
        Self { label, log: log.clone() }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.log.0.borrow_mut().push(self.label);
    }
}
