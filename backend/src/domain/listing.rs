//! Slice of a larger ordered collection.

/// One window of results plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Number of items across the whole collection.
    pub total: u64,
    /// Items in this window, in collection order.
    pub items: Vec<T>,
}

impl<T> Paged<T> {
    /// An empty collection.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }

    /// Transform every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
