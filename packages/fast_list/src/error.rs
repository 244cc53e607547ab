use std::ops::Range;

use thiserror::Error;

/// Errors that can occur when operating on pooled collections.
///
/// Every error is a contract violation detected before any state was changed. Callers are
/// expected to fix the calling code rather than retry the operation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A required argument was never provided to a builder.
    #[error("required argument '{argument}' was not provided")]
    ArgumentNull {
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// An index or an initial capacity was outside its valid domain.
    #[error("argument '{argument}' is out of range: {value} is not in {valid:?}")]
    ArgumentOutOfRange {
        /// Name of the offending argument.
        argument: &'static str,

        /// The value that was provided.
        value: usize,

        /// The half-open range of values that would have been accepted.
        valid: Range<usize>,
    },

    /// Growth was requested beyond the largest entry of the capacity table.
    #[error(
        "Required capacity is too large. CurrentCapacity = {current_capacity}, RequiredSize = {required_size}"
    )]
    CapacityTooLarge {
        /// Capacity of the collection when growth was requested.
        current_capacity: usize,

        /// Number of slots the collection needed.
        required_size: usize,
    },

    /// An operation was invoked on a component that has already been disposed.
    #[error("cannot access a disposed {object}")]
    Disposed {
        /// Type name of the disposed component.
        object: &'static str,
    },
}

/// The category of an [`Error`], independent of the data attached to it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required argument is absent.
    ArgumentNull,

    /// An index or capacity falls outside its valid domain.
    ArgumentOutOfRange,

    /// The requested operation cannot be performed in the current configuration.
    InvalidOperation,

    /// The component has been torn down.
    ObjectDisposed,
}

impl Error {
    /// Returns the category of this error.
    ///
    /// # Example
    ///
    /// ```
    /// use fast_list::{CapacityStrategy, ErrorKind, TableCapacityStrategy};
    ///
    /// let error = TableCapacityStrategy
    ///     .calculate_capacity(1_000_000, 2_000_000)
    ///     .unwrap_err();
    ///
    /// assert_eq!(error.kind(), ErrorKind::InvalidOperation);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentNull { .. } => ErrorKind::ArgumentNull,
            Self::ArgumentOutOfRange { .. } => ErrorKind::ArgumentOutOfRange,
            Self::CapacityTooLarge { .. } => ErrorKind::InvalidOperation,
            Self::Disposed { .. } => ErrorKind::ObjectDisposed,
        }
    }

    pub(crate) fn disposed<T: ?Sized>() -> Self {
        Self::Disposed {
            object: short_type_name::<T>(),
        }
    }
}

/// Strips the module path and any generic arguments from a type name.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// A specialized `Result` type for pooled collection operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug, Clone);
    assert_impl_all!(ErrorKind: Send, Sync, Debug, Copy);

    #[test]
    fn capacity_too_large_message_carries_data() {
        let error = Error::CapacityTooLarge {
            current_capacity: 1_000_000,
            required_size: 2_000_000,
        };

        let message = error.to_string();
        assert!(message.contains("Required capacity is too large."));
        assert!(message.contains("CurrentCapacity = 1000000"));
        assert!(message.contains("RequiredSize = 2000000"));
    }

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            Error::ArgumentNull { argument: "strategy" }.kind(),
            ErrorKind::ArgumentNull
        );
        assert_eq!(
            Error::ArgumentOutOfRange {
                argument: "index",
                value: 3,
                valid: 0..2,
            }
            .kind(),
            ErrorKind::ArgumentOutOfRange
        );
        assert_eq!(
            Error::Disposed { object: "Binder" }.kind(),
            ErrorKind::ObjectDisposed
        );
    }

    #[test]
    fn disposed_uses_short_type_name() {
        struct Widget<T>(T);

        let error = Error::disposed::<Widget<Vec<String>>>();
        assert_eq!(error, Error::Disposed { object: "Widget" });
        assert_eq!(error.to_string(), "cannot access a disposed Widget");
    }

    #[test]
    fn out_of_range_message_names_argument() {
        let error = Error::ArgumentOutOfRange {
            argument: "capacity",
            value: 0,
            valid: 1..10,
        };

        assert_eq!(
            error.to_string(),
            "argument 'capacity' is out of range: 0 is not in 1..10"
        );
    }
}
