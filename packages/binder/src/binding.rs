use std::fmt;
use std::sync::Arc;

use fast_list::{Dispose, DisposePolicy, Error, PooledList, Result, SharedCapacityStrategy};

use crate::KeyBinding;

/// The ordered values bound to one key.
///
/// The values live in a [`PooledList`] that starts with a capacity of one and grows through the
/// capacity strategy the binding was created with. Disposing the binding disposes the list, which
/// applies the binding's [`DisposePolicy`] to every value.
///
/// # Example
///
/// ```
/// use binder::Binding;
/// use fast_list::TableCapacityStrategy;
///
/// let mut binding = Binding::new(TableCapacityStrategy::shared(), "colors").unwrap();
///
/// binding.to("red").unwrap().to("green").unwrap();
///
/// assert_eq!(binding.key(), &"colors");
/// assert_eq!(binding.values(), &["red", "green"]);
/// ```
pub struct Binding<K, V: 'static> {
    key: K,
    values: PooledList<V>,
}

impl<K, V: 'static> Binding<K, V> {
    /// Creates an empty binding for `key` whose values are only dropped on disposal.
    ///
    /// # Errors
    ///
    /// Does not fail in practice, because a single-slot initial capacity is always valid. The
    /// `Result` lets binding factories forward it with `?`.
    pub fn new(strategy: SharedCapacityStrategy, key: K) -> Result<Self> {
        Self::with_policy(strategy, key, DisposePolicy::none())
    }

    /// Creates an empty binding for `key` that applies `policy` to its values on disposal.
    ///
    /// # Errors
    ///
    /// Does not fail in practice, because a single-slot initial capacity is always valid. The
    /// `Result` lets binding factories forward it with `?`.
    pub fn with_policy(
        strategy: SharedCapacityStrategy,
        key: K,
        policy: DisposePolicy<V>,
    ) -> Result<Self> {
        let values = PooledList::builder()
            .capacity(1)
            .strategy(strategy)
            .dispose_policy(policy)
            .build()?;

        Ok(Self { key, values })
    }

    /// The key the values are bound to.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The number of bound values. Zero after disposal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The bound values in the order they were added. Empty after disposal.
    #[must_use]
    pub fn values(&self) -> &[V] {
        self.values.as_slice()
    }

    /// Whether [`dispose()`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.values.is_disposed()
    }

    /// Appends a value and returns the binding to allow chaining.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binding has been disposed, or
    /// [`Error::CapacityTooLarge`] if the binding already holds the maximum number of values.
    pub fn to(&mut self, value: V) -> Result<&mut Self> {
        self.ensure_live()?;

        self.values.add(value)?;
        Ok(self)
    }

    /// Drops every value while keeping the binding usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binding has been disposed.
    pub fn clear_values(&mut self) -> Result<()> {
        self.ensure_live()?;

        self.values.clear()
    }

    /// Disposes the values according to the binding's policy and returns their storage to the
    /// shared pool. Calling this again does nothing.
    pub fn dispose(&mut self) {
        self.values.dispose();
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed { object: "Binding" });
        }

        Ok(())
    }
}

impl<K, V: 'static> Dispose for Binding<K, V> {
    fn dispose(&mut self) {
        Self::dispose(self);
    }
}

impl<K, V: 'static> KeyBinding<K, V> for Binding<K, V> {
    fn key(&self) -> &K {
        Self::key(self)
    }

    fn to(&mut self, value: V) -> Result<&mut Self> {
        Self::to(self, value)
    }

    fn clear_values(&mut self) -> Result<()> {
        Self::clear_values(self)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn values(&self) -> &[V] {
        Self::values(self)
    }
}

impl<K: fmt::Debug, V: 'static> fmt::Debug for Binding<K, V> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("values", &self.values)
            .finish()
    }
}

/// Creates bindings the way [`Binder`][crate::Binder] does when no factory is injected.
pub(crate) fn default_factory<K: 'static, V: 'static>(
    policy: DisposePolicy<V>,
) -> impl Fn(&SharedCapacityStrategy, K) -> Result<Binding<K, V>> + Send + 'static {
    move |strategy: &SharedCapacityStrategy, key: K| {
        Binding::with_policy(Arc::clone(strategy), key, policy)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use fast_list::{ErrorKind, TableCapacityStrategy};
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Binding<String, String>: Send, Sync, fmt::Debug);

    struct Resource {
        disposed: Rc<Cell<bool>>,
    }

    impl Resource {
        fn new() -> (Self, Rc<Cell<bool>>) {
            let disposed = Rc::new(Cell::new(false));
            (
                Self {
                    disposed: Rc::clone(&disposed),
                },
                disposed,
            )
        }
    }

    impl Dispose for Resource {
        fn dispose(&mut self) {
            self.disposed.set(true);
        }
    }

    fn binding() -> Binding<&'static str, &'static str> {
        Binding::new(TableCapacityStrategy::shared(), "TestKey").unwrap()
    }

    #[test]
    fn new_binding_is_empty() {
        let binding = binding();

        assert_eq!(binding.key(), &"TestKey");
        assert_eq!(binding.len(), 0);
        assert!(binding.is_empty());
        assert!(binding.values().is_empty());
        assert!(!binding.is_disposed());
    }

    #[test]
    fn to_adds_value() {
        let mut binding = binding();

        binding.to("TestValue").unwrap();

        assert_eq!(binding.len(), 1);
        assert!(binding.values().contains(&"TestValue"));
    }

    #[test]
    fn to_chains_and_preserves_order() {
        let mut binding = binding();

        binding
            .to("Value1")
            .unwrap()
            .to("Value2")
            .unwrap()
            .to("Value3")
            .unwrap();

        assert_eq!(binding.len(), 3);
        assert_eq!(binding.values(), &["Value1", "Value2", "Value3"]);
    }

    #[test]
    fn values_grow_through_capacity_table() {
        let mut binding = Binding::new(TableCapacityStrategy::shared(), 1_u32).unwrap();

        for value in 0..100_u32 {
            binding.to(value).unwrap();
        }

        assert_eq!(binding.len(), 100);
        assert_eq!(binding.values().first(), Some(&0));
        assert_eq!(binding.values().last(), Some(&99));
    }

    #[test]
    fn clear_values_empties_binding() {
        let mut binding = binding();
        binding.to("Value1").unwrap().to("Value2").unwrap();

        binding.clear_values().unwrap();

        assert_eq!(binding.len(), 0);
        assert!(binding.values().is_empty());
        assert!(!binding.is_disposed());

        binding.to("Value3").unwrap();
        assert_eq!(binding.values(), &["Value3"]);
    }

    #[test]
    fn dispose_releases_values() {
        let (resource, disposed) = Resource::new();
        let mut binding = Binding::with_policy(
            TableCapacityStrategy::shared(),
            "TestKey",
            DisposePolicy::dispose_items(),
        )
        .unwrap();
        binding.to(resource).unwrap();

        binding.dispose();

        assert!(disposed.get());
        assert_eq!(binding.len(), 0);
        assert!(binding.is_disposed());
    }

    #[test]
    fn use_after_dispose_fails() {
        let mut binding = binding();
        binding.dispose();

        let error = binding.to("Value").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ObjectDisposed);
        assert_eq!(error, Error::Disposed { object: "Binding" });

        assert_eq!(
            binding.clear_values(),
            Err(Error::Disposed { object: "Binding" })
        );
    }

    #[test]
    fn dispose_twice_is_harmless() {
        let (resource, disposed) = Resource::new();
        let mut binding = Binding::with_policy(
            TableCapacityStrategy::shared(),
            "TestKey",
            DisposePolicy::dispose_items(),
        )
        .unwrap();
        binding.to(resource).unwrap();

        binding.dispose();
        disposed.set(false);
        binding.dispose();

        assert!(!disposed.get());
    }

    #[test]
    fn works_through_capability_trait() {
        fn fill<B: KeyBinding<&'static str, &'static str>>(binding: &mut B) {
            binding.to("a").unwrap().to("b").unwrap();
        }

        let mut binding = binding();
        fill(&mut binding);

        assert_eq!(KeyBinding::len(&binding), 2);
        assert!(!KeyBinding::is_empty(&binding));
        assert_eq!(KeyBinding::values(&binding), &["a", "b"]);
        assert_eq!(KeyBinding::key(&binding), &"TestKey");
    }

    #[test]
    fn default_factory_applies_policy() {
        let (resource, disposed) = Resource::new();
        let factory = default_factory::<&str, Resource>(DisposePolicy::dispose_items());

        let mut binding = factory(&TableCapacityStrategy::shared(), "TestKey").unwrap();
        binding.to(resource).unwrap();
        drop(binding);

        assert!(disposed.get());
    }
}
