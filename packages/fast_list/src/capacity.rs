use std::sync::Arc;

use crate::{Error, Result};

/// Number of entries in [`CAPACITY_TABLE`].
const TABLE_LEN: usize = 19;

/// The admissible capacities of a growing collection, in ascending order.
///
/// Each entry is `2^k - 1` for `k` in `2..=20`. Using a fixed table instead of arithmetic doubling
/// makes independently growing collections converge on the same size classes, so buffers
/// returned to the shared pool by one collection fit the next growth step of another.
pub const CAPACITY_TABLE: [usize; TABLE_LEN] = build_table();

/// The largest capacity any collection can grow to.
pub const MAX_CAPACITY: usize = (1 << 20) - 1;

const fn build_table() -> [usize; TABLE_LEN] {
    let mut table = [0; TABLE_LEN];
    let mut index = 0;

    while index < TABLE_LEN {
        // Entries start at 2^2 - 1 = 3.
        table[index] = (1 << (index + 2)) - 1;
        index += 1;
    }

    table
}

/// Decides how large the backing storage of a collection must become to hold a number of items.
///
/// This is the seam through which collections in this crate make growth decisions. The default
/// implementation is [`TableCapacityStrategy`].
#[cfg_attr(test, mockall::automock)]
pub trait CapacityStrategy {
    /// Calculates the capacity required to hold `required_size` items when the collection
    /// currently has room for `current_capacity` items.
    ///
    /// Returns `current_capacity` unchanged if it is already sufficient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityTooLarge`] if the strategy cannot provide a capacity large enough.
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize>;
}

/// A capacity strategy that can be shared between any number of collections.
pub type SharedCapacityStrategy = Arc<dyn CapacityStrategy + Send + Sync>;

/// Picks capacities from [`CAPACITY_TABLE`].
///
/// # Example
///
/// ```
/// use fast_list::{CapacityStrategy, TableCapacityStrategy};
///
/// let strategy = TableCapacityStrategy;
///
/// // Enough room already, nothing changes.
/// assert_eq!(strategy.calculate_capacity(100, 50).unwrap(), 100);
///
/// // Otherwise the smallest table entry that fits is chosen.
/// assert_eq!(strategy.calculate_capacity(10, 20).unwrap(), 31);
/// assert_eq!(strategy.calculate_capacity(0, 1).unwrap(), 3);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TableCapacityStrategy;

impl TableCapacityStrategy {
    /// Returns the table strategy wrapped for sharing between collections.
    #[must_use]
    pub fn shared() -> SharedCapacityStrategy {
        Arc::new(Self)
    }
}

impl CapacityStrategy for TableCapacityStrategy {
    fn calculate_capacity(&self, current_capacity: usize, required_size: usize) -> Result<usize> {
        if required_size <= current_capacity {
            return Ok(current_capacity);
        }

        let index = CAPACITY_TABLE.partition_point(|&capacity| capacity < required_size);

        CAPACITY_TABLE
            .get(index)
            .copied()
            .ok_or(Error::CapacityTooLarge {
                current_capacity,
                required_size,
            })
    }
}
