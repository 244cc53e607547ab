use std::fmt;

use crate::{DisposePolicy, PooledList, Result, SharedCapacityStrategy, TableCapacityStrategy};

/// Builder for creating an instance of [`PooledList`].
///
/// All settings are optional. Without any configuration the list starts with a capacity of one,
/// grows through the [`TableCapacityStrategy`] and does nothing to its items on disposal beyond
/// dropping them.
///
/// # Examples
///
/// ```
/// use fast_list::{DisposePolicy, PooledList, TableCapacityStrategy};
///
/// let list = PooledList::<Vec<u8>>::builder()
///     .capacity(8)
///     .strategy(TableCapacityStrategy::shared())
///     .dispose_policy(DisposePolicy::custom(Vec::clear))
///     .build()
///     .unwrap();
///
/// assert_eq!(list.capacity(), 8);
/// assert!(list.is_empty());
/// ```
#[must_use]
pub struct PooledListBuilder<T> {
    capacity: usize,
    strategy: Option<SharedCapacityStrategy>,
    dispose_policy: DisposePolicy<T>,
}

impl<T: 'static> PooledListBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 1,
            strategy: None,
            dispose_policy: DisposePolicy::none(),
        }
    }

    /// Sets the initial capacity of the list. Defaults to 1.
    ///
    /// The value is validated by [`build()`](Self::build).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the strategy the list consults when it is full.
    ///
    /// Defaults to the [`TableCapacityStrategy`].
    pub fn strategy(mut self, strategy: SharedCapacityStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the [dispose policy][DisposePolicy] applied to each item when the list is disposed.
    pub fn dispose_policy(mut self, policy: DisposePolicy<T>) -> Self {
        self.dispose_policy = policy;
        self
    }

    /// Builds the list, renting its initial buffer from the shared pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`][crate::Error::ArgumentOutOfRange] if the capacity is
    /// zero or greater than [`MAX_INITIAL_CAPACITY`][crate::MAX_INITIAL_CAPACITY].
    pub fn build(self) -> Result<PooledList<T>> {
        let strategy = self.strategy.unwrap_or_else(TableCapacityStrategy::shared);

        PooledList::new_inner(self.capacity, strategy, self.dispose_policy)
    }
}

impl<T> fmt::Debug for PooledListBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledListBuilder")
            .field("capacity", &self.capacity)
            .field("has_strategy", &self.strategy.is_some())
            .field("dispose_policy", &self.dispose_policy)
            .finish()
    }
}
