#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A dynamic array that rents its storage from a shared, size-classed buffer pool and grows
//! through a fixed table of capacities instead of arithmetic doubling.
//!
//! This crate provides [`PooledList`], the [`CapacityStrategy`] that governs its growth and the
//! [`BufferPool`] it borrows storage from.
//!
//! # Key Features
//!
//! - **Predictable growth**: After the initial capacity, every capacity is an entry of
//!   [`CAPACITY_TABLE`] (`3, 7, 15, ..., 1_048_575`), so collections that grow independently end
//!   up with buffers of the same sizes.
//! - **Buffer reuse**: Growth and disposal give buffers back to the [`BufferPool`], from where the
//!   next collection of the same element type and size rents them again.
//! - **O(1) removal**: [`PooledList::remove_at()`] moves the last item into the vacated slot.
//! - **Deterministic teardown**: [`PooledList::dispose()`] applies a [`DisposePolicy`] to every
//!   item and returns the storage immediately.
//! - **Pluggable growth**: Any [`CapacityStrategy`] can be injected via the builder.
//!
//! # Example
//!
//! ```rust
//! use fast_list::{BufferPool, PooledList};
//!
//! let mut list = PooledList::new(3).unwrap();
//!
//! for value in 0..5 {
//!     list.add(value).unwrap();
//! }
//!
//! // The fourth item did not fit, so the list grew to the next table entry.
//! assert_eq!(list.capacity(), 7);
//! assert_eq!(list.iter().sum::<i32>(), 10);
//!
//! // The initial buffer went back to the pool when the list grew.
//! assert_eq!(BufferPool::retained::<i32>(3), 1);
//!
//! list.dispose();
//! assert_eq!(BufferPool::retained::<i32>(7), 1);
//! ```
//!
//! # Errors
//!
//! All operations validate their preconditions before changing anything and report violations
//! as an [`Error`]. See [`ErrorKind`] for the categories.

mod buffer_pool;
mod builder;
mod capacity;
mod dispose;
mod error;
mod pooled_list;

pub use buffer_pool::*;
pub use builder::*;
pub use capacity::*;
pub use dispose::*;
pub use error::*;
pub use pooled_list::*;
