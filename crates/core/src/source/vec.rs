use super::Source;

/// Static in-memory source over a fixed list of elements, each optionally
/// paired with a context value.
#[derive(Debug, Clone)]
pub struct VecSource<T, C = T> {
    entries: Vec<(T, Option<C>)>,
    position: usize,
}

impl<T> VecSource<T> {
    /// Source over `items` without contexts.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T, C> VecSource<T, C> {
    pub fn with_contexts(entries: impl IntoIterator<Item = (T, Option<C>)>) -> Self {
        Self { entries: entries.into_iter().collect(), position: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of positions not yet moved past.
    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.position)
    }
}

impl<T, C> Default for VecSource<T, C> {
    fn default() -> Self {
        Self { entries: Vec::new(), position: 0 }
    }
}

impl<T, C> FromIterator<T> for VecSource<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|item| (item, None)).collect(), position: 0 }
    }
}

impl<T: Clone, C: Clone> Source for VecSource<T, C> {
    type Item = T;
    type Context = C;
    type Key = T;
    type Value = T;

    fn is_end(&mut self) -> bool {
        self.position >= self.entries.len()
    }

    fn advance(&mut self) -> bool {
        if self.position < self.entries.len() {
            self.position += 1;
        }
        self.position >= self.entries.len()
    }

    fn fetch(&mut self) -> Option<T> {
        self.entries.get(self.position).map(|(item, _)| item.clone())
    }

    fn fetch_context(&mut self) -> Option<C> {
        self.entries.get(self.position).and_then(|(_, context)| context.clone())
    }
}
