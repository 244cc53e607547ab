use std::fmt;
use std::mem;
use std::ops::Range;
use std::slice;

use tracing::debug;

use crate::{
    BufferPool, Dispose, DisposePolicy, Error, PooledListBuilder, Result, SharedCapacityStrategy,
    TableCapacityStrategy,
};

/// The largest initial capacity a [`PooledList`] accepts.
pub const MAX_INITIAL_CAPACITY: usize = 2_147_483_647;

/// A dynamic array whose storage is rented from the shared [`BufferPool`] and grows through a
/// [`CapacityStrategy`][crate::CapacityStrategy].
///
/// The list starts with exactly the capacity it was created with. When an item is added to a full
/// list, the strategy picks the next capacity, a buffer of that size is rented, the items move
/// over and the old buffer goes back to the pool. With the default [`TableCapacityStrategy`]
/// every capacity after the first is an entry of [`CAPACITY_TABLE`][crate::CAPACITY_TABLE].
///
/// # Removal does not preserve order
///
/// [`remove_at()`](Self::remove_at) moves the last item into the vacated slot, which makes
/// removal O(1) at the cost of item order.
///
/// # Lifecycle
///
/// A list is live until [`dispose()`](Self::dispose) is called, which applies the
/// [`DisposePolicy`] to every item, gives the storage back to the pool and leaves the list with
/// zero length and zero capacity. Every item operation on a disposed list fails with
/// [`Error::Disposed`]. Dropping a live list disposes it.
///
/// # Example
///
/// ```
/// use fast_list::PooledList;
///
/// let mut list = PooledList::new(4).unwrap();
///
/// for value in [10, 20, 30, 40, 50] {
///     list.add(value).unwrap();
/// }
///
/// assert_eq!(list.len(), 5);
/// assert_eq!(list.capacity(), 7);
///
/// // The last item takes the place of the removed one.
/// assert!(list.remove_at(1).unwrap());
/// assert_eq!(list.as_slice(), &[10, 50, 30, 40]);
///
/// list.dispose();
/// assert_eq!(list.capacity(), 0);
/// ```
///
/// # Thread safety
///
/// The list is thread-mobile ([`Send`]) when `T` is, but carries no internal synchronization.
pub struct PooledList<T: 'static> {
    /// The rented buffer. Its length is the logical length of the list.
    items: Vec<T>,

    /// The logical capacity, which is also the size class the buffer was rented under. The
    /// buffer itself may have more room than this.
    capacity: usize,

    strategy: SharedCapacityStrategy,

    dispose_policy: DisposePolicy<T>,

    disposed: bool,
}

impl<T: 'static> PooledList<T> {
    /// Creates a builder for configuring and constructing a [`PooledList`].
    ///
    /// # Example
    ///
    /// ```
    /// use fast_list::{PooledList, TableCapacityStrategy};
    ///
    /// let list = PooledList::<String>::builder()
    ///     .capacity(16)
    ///     .strategy(TableCapacityStrategy::shared())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(list.capacity(), 16);
    /// ```
    pub fn builder() -> PooledListBuilder<T> {
        PooledListBuilder::new()
    }

    /// Creates a list with the given initial capacity that grows through the
    /// [`TableCapacityStrategy`].
    ///
    /// The initial buffer is only reused by later lists if `capacity` is an entry of
    /// [`CAPACITY_TABLE`][crate::CAPACITY_TABLE]. If no idle buffer is available and allocating
    /// one fails, the process aborts as it would for [`Vec::with_capacity`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`] if `capacity` is zero or greater than
    /// [`MAX_INITIAL_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_strategy(capacity, TableCapacityStrategy::shared())
    }

    /// Creates a list with the given initial capacity that grows through `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`] if `capacity` is zero or greater than
    /// [`MAX_INITIAL_CAPACITY`].
    pub fn with_strategy(capacity: usize, strategy: SharedCapacityStrategy) -> Result<Self> {
        Self::new_inner(capacity, strategy, DisposePolicy::none())
    }

    pub(crate) fn new_inner(
        capacity: usize,
        strategy: SharedCapacityStrategy,
        dispose_policy: DisposePolicy<T>,
    ) -> Result<Self> {
        let valid = valid_initial_capacities();
        if !valid.contains(&capacity) {
            return Err(Error::ArgumentOutOfRange {
                argument: "capacity",
                value: capacity,
                valid,
            });
        }

        Ok(Self {
            items: BufferPool::rent(capacity),
            capacity,
            strategy,
            dispose_policy,
            disposed: false,
        })
    }

    /// The number of items in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The number of items the list can hold before it has to rent a larger buffer.
    ///
    /// This is zero after the list has been disposed.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether [`dispose()`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The policy applied to each item when the list is disposed.
    #[must_use]
    pub fn dispose_policy(&self) -> DisposePolicy<T> {
        self.dispose_policy
    }

    /// Appends an item to the end of the list, growing the storage if the list is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the list has been disposed, or the error of the capacity
    /// strategy if the list is full and cannot grow. The list is unchanged on error.
    pub fn add(&mut self, item: T) -> Result<()> {
        self.ensure_live()?;

        if self.items.len() == self.capacity {
            self.grow()?;
        }

        debug_assert!(self.items.len() < self.capacity);
        self.items.push(item);
        Ok(())
    }

    /// Removes the item at `index` by moving the last item into its place.
    ///
    /// The removed item is dropped. Returns `false` without changing anything if `index` is not
    /// less than [`len()`](Self::len).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the list has been disposed.
    pub fn remove_at(&mut self, index: usize) -> Result<bool> {
        self.ensure_live()?;

        if index >= self.items.len() {
            return Ok(false);
        }

        drop(self.items.swap_remove(index));
        Ok(true)
    }

    /// Returns a reference to the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`] if `index` is not less than [`len()`](Self::len),
    /// or [`Error::Disposed`] if the list has been disposed.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.ensure_live()?;

        let len = self.items.len();
        self.items.get(index).ok_or(Error::ArgumentOutOfRange {
            argument: "index",
            value: index,
            valid: 0..len,
        })
    }

    /// Returns an exclusive reference to the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`] if `index` is not less than [`len()`](Self::len),
    /// or [`Error::Disposed`] if the list has been disposed.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.ensure_live()?;

        let len = self.items.len();
        self.items.get_mut(index).ok_or(Error::ArgumentOutOfRange {
            argument: "index",
            value: index,
            valid: 0..len,
        })
    }

    /// Replaces the item at `index`, dropping the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentOutOfRange`] if `index` is not less than [`len()`](Self::len),
    /// or [`Error::Disposed`] if the list has been disposed.
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        *self.get_mut(index)? = item;
        Ok(())
    }

    /// Drops every item. The capacity is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the list has been disposed.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;

        self.items.clear();
        Ok(())
    }

    /// The items in index order. Empty after the list has been disposed.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates over the items in index order.
    ///
    /// The iterator can be cloned to restart from any point. A disposed list yields nothing.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Applies the [`DisposePolicy`] to every item, gives the storage back to the shared pool and
    /// leaves the list permanently empty with zero capacity.
    ///
    /// Calling this on a list that is already disposed does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        // Marked first so that a panicking dispose policy cannot lead to a second pass from Drop.
        self.disposed = true;

        let count = self.items.len();
        for item in &mut self.items {
            self.dispose_policy.apply(item);
        }

        BufferPool::give_back(mem::take(&mut self.items), self.capacity);

        debug!(count, capacity = self.capacity, "disposed pooled list");
        self.capacity = 0;
    }

    fn grow(&mut self) -> Result<()> {
        let required = self.items.len().saturating_add(1);
        let new_capacity = self.strategy.calculate_capacity(self.capacity, required)?;

        if new_capacity < required {
            return Err(Error::CapacityTooLarge {
                current_capacity: self.capacity,
                required_size: required,
            });
        }

        let mut buffer = BufferPool::rent(new_capacity);
        buffer.append(&mut self.items);

        let old_buffer = mem::replace(&mut self.items, buffer);
        BufferPool::give_back(old_buffer, self.capacity);

        debug!(
            old_capacity = self.capacity,
            new_capacity, "grew pooled list"
        );
        self.capacity = new_capacity;
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::disposed::<Self>());
        }

        Ok(())
    }
}

fn valid_initial_capacities() -> Range<usize> {
    1..MAX_INITIAL_CAPACITY.saturating_add(1)
}

impl<T: 'static> Dispose for PooledList<T> {
    fn dispose(&mut self) {
        Self::dispose(self);
    }
}

impl<T: 'static> Drop for PooledList<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<'a, T: 'static> IntoIterator for &'a PooledList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: 'static> fmt::Debug for PooledList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledList")
            .field("len", &self.items.len())
            .field("capacity", &self.capacity)
            .field("dispose_policy", &self.dispose_policy)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
