#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`Binder`], a map from keys to ordered collections of values that are
//! created on first use and disposed deterministically.
//!
//! Each key owns a [`Binding`], which stores its values in a [`PooledList`][fast_list::PooledList]
//! that grows through a shared [`CapacityStrategy`] and rents its storage from the buffer pool
//! of the `fast_list` package.
//!
//! # Features
//!
//! - **Get-or-create binding**: [`Binder::bind()`] returns the existing binding for a key or
//!   creates one through the binder's factory.
//! - **Stable identity**: Repeated binds of the same key return the same binding.
//! - **Chained value registration**: [`Binding::to()`] returns the binding, so values can be
//!   added fluently.
//! - **Pluggable construction**: A custom factory can produce any [`KeyBinding`] implementation.
//! - **Deterministic teardown**: Unbinding disposes the removed binding and disposing the binder
//!   disposes all of them, applying a [`DisposePolicy`] to every value.
//!
//! # Example
//!
//! ```rust
//! use binder::{Binder, ErrorKind, TableCapacityStrategy};
//!
//! let mut binder = Binder::<&str, u32>::new(TableCapacityStrategy::shared(), 10).unwrap();
//!
//! binder.bind("primes").unwrap().to(2).unwrap().to(3).unwrap().to(5).unwrap();
//! binder.bind("primes").unwrap().to(7).unwrap();
//!
//! let primes = binder.get_binding("primes").unwrap().unwrap();
//! assert_eq!(primes.values(), &[2, 3, 5, 7]);
//!
//! binder.dispose();
//!
//! let error = binder.bind("primes").unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::ObjectDisposed);
//! ```

mod binder;
mod binding;
mod builder;
mod capabilities;

pub use binder::*;
pub use binding::*;
pub use builder::*;
pub use capabilities::*;
// Re-export the shared vocabulary of fast_list so that users of the binder need only one import.
pub use fast_list::{
    CapacityStrategy, Dispose, DisposePolicy, Error, ErrorKind, Result, SharedCapacityStrategy,
    TableCapacityStrategy,
};
