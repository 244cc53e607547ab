use std::fmt;

/// A component that holds resources it can be asked to release at a deterministic point.
///
/// Disposal is a one-way transition. After `dispose()` the component is inert: its element
/// operations fail with [`Error::Disposed`][crate::Error::Disposed]. Calling `dispose()` again
/// has no effect.
///
/// Collections in this family implement the trait themselves, so a collection of collections
/// can tear down its contents with [`DisposePolicy::dispose_items()`].
pub trait Dispose {
    /// Releases the resources held by the component.
    fn dispose(&mut self);
}

/// Determines what a collection does with each of its items when the collection is disposed.
///
/// Whatever the policy, the items are dropped afterwards when the storage is returned to the
/// shared buffer pool. The policy only decides whether something else happens first.
///
/// By default, the collection does nothing extra.
///
/// # Examples
///
/// ```
/// use fast_list::{Dispose, DisposePolicy, PooledList};
///
/// struct Connection {
///     open: bool,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&mut self) {
///         self.open = false;
///     }
/// }
///
/// let mut list = PooledList::builder()
///     .capacity(4)
///     .dispose_policy(DisposePolicy::dispose_items())
///     .build()
///     .unwrap();
///
/// list.add(Connection { open: true }).unwrap();
/// list.dispose();
/// ```
pub struct DisposePolicy<T> {
    dispose_fn: Option<fn(&mut T)>,
}

impl<T> DisposePolicy<T> {
    /// Items are left alone; they are only dropped. This is the default.
    #[must_use]
    pub const fn none() -> Self {
        Self { dispose_fn: None }
    }

    /// Each item is handed to `dispose_fn` before it is dropped.
    #[must_use]
    pub const fn custom(dispose_fn: fn(&mut T)) -> Self {
        Self {
            dispose_fn: Some(dispose_fn),
        }
    }

    /// Whether this policy does anything to items.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.dispose_fn.is_none()
    }

    pub(crate) fn apply(&self, item: &mut T) {
        if let Some(dispose_fn) = self.dispose_fn {
            dispose_fn(item);
        }
    }
}

impl<T: Dispose> DisposePolicy<T> {
    /// Each item is disposed via its own [`Dispose`] implementation before it is dropped.
    #[must_use]
    pub const fn dispose_items() -> Self {
        Self::custom(T::dispose)
    }
}

impl<T> Default for DisposePolicy<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> Clone for DisposePolicy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DisposePolicy<T> {}

impl<T> fmt::Debug for DisposePolicy<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposePolicy")
            .field("disposes_items", &self.dispose_fn.is_some())
            .finish()
    }
}
