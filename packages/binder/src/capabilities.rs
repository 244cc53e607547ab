use fast_list::{Dispose, Result};

/// The capabilities of one key's ordered collection of values.
///
/// Code that only needs to add, clear or read values should depend on this trait rather than on
/// [`Binding`][crate::Binding], so that bindings produced by a custom factory fit in as well.
pub trait KeyBinding<K, V>: Dispose {
    /// The key the values are bound to.
    fn key(&self) -> &K;

    /// Appends a value and returns the binding to allow chaining.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`][fast_list::Error::Disposed] if the binding has been disposed.
    fn to(&mut self, value: V) -> Result<&mut Self>;

    /// Removes every value without disposing the binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`][fast_list::Error::Disposed] if the binding has been disposed.
    fn clear_values(&mut self) -> Result<()>;

    /// The number of bound values.
    fn len(&self) -> usize;

    /// Whether no values are bound.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bound values in the order they were added (as long as none were removed).
    fn values(&self) -> &[V];
}

/// The capabilities of a map from keys to [`KeyBinding`]s.
pub trait KeyBinder<K, V> {
    /// The type of binding this binder hands out.
    type Binding: KeyBinding<K, V>;

    /// Returns the binding for `key`, creating and registering it first if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`][fast_list::Error::Disposed] if the binder has been disposed,
    /// or the error of the binding factory if a new binding could not be created.
    fn bind(&mut self, key: K) -> Result<&mut Self::Binding>;

    /// Removes and disposes the binding for `key`. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`][fast_list::Error::Disposed] if the binder has been disposed.
    fn unbind(&mut self, key: &K) -> Result<bool>;

    /// Returns the binding for `key` without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`][fast_list::Error::Disposed] if the binder has been disposed.
    fn get_binding(&self, key: &K) -> Result<Option<&Self::Binding>>;
}
