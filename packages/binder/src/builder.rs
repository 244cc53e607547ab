use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use fast_list::{DisposePolicy, Error, Result, SharedCapacityStrategy};

use crate::{Binder, KeyBinding, default_factory};

/// Builder for creating an instance of [`Binder`].
///
/// A capacity strategy is required. The initial capacity defaults to zero, in which case the
/// strategy decides the smallest capacity it hands out.
///
/// # Examples
///
/// ```
/// use binder::{Binder, Binding};
/// use fast_list::TableCapacityStrategy;
///
/// // Bindings created by a custom factory start out with a marker value.
/// let mut binder = Binder::<&str, &str>::builder()
///     .strategy(TableCapacityStrategy::shared())
///     .build_with_factory(|strategy, key| {
///         let mut binding = Binding::new(strategy.clone(), key)?;
///         binding.to("created")?;
///         Ok(binding)
///     })
///     .unwrap();
///
/// binder.bind("a").unwrap().to("v1").unwrap();
///
/// assert_eq!(
///     binder.get_binding("a").unwrap().unwrap().values(),
///     &["created", "v1"]
/// );
/// ```
#[must_use]
pub struct BinderBuilder<K, V: 'static> {
    strategy: Option<SharedCapacityStrategy>,
    capacity: usize,
    dispose_policy: DisposePolicy<V>,
    _keys: PhantomData<fn() -> K>,
}

impl<K, V: 'static> BinderBuilder<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            strategy: None,
            capacity: 0,
            dispose_policy: DisposePolicy::none(),
            _keys: PhantomData,
        }
    }

    /// Sets the strategy that sizes the binder and every binding it creates. Required.
    pub fn strategy(mut self, strategy: SharedCapacityStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the number of keys the binder should hold without reallocating. Defaults to 0.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [dispose policy][DisposePolicy] the default factory gives every binding it
    /// creates. Ignored by [`build_with_factory()`](Self::build_with_factory).
    pub fn dispose_policy(mut self, policy: DisposePolicy<V>) -> Self {
        self.dispose_policy = policy;
        self
    }

    /// Builds a binder that creates a [`Binding`][crate::Binding] for each new key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentNull`] if no strategy was set, or the error of the strategy if
    /// it cannot provide a capacity for the requested number of keys.
    pub fn build(self) -> Result<Binder<K, V>>
    where
        K: Eq + Hash + Clone + 'static,
    {
        let policy = self.dispose_policy;

        self.build_with_factory(default_factory(policy))
    }

    /// Builds a binder that calls `factory` to create the binding for each new key.
    ///
    /// The factory receives the binder's strategy and the key being bound. If it fails, the
    /// error is returned from [`Binder::bind()`] and nothing is registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentNull`] if no strategy was set, or the error of the strategy if
    /// it cannot provide a capacity for the requested number of keys.
    pub fn build_with_factory<B, F>(self, factory: F) -> Result<Binder<K, V, B>>
    where
        K: Eq + Hash + Clone,
        B: KeyBinding<K, V>,
        F: Fn(&SharedCapacityStrategy, K) -> Result<B> + Send + 'static,
    {
        let strategy = self.strategy.ok_or(Error::ArgumentNull {
            argument: "strategy",
        })?;

        Binder::new_inner(strategy, self.capacity, Box::new(factory))
    }
}

impl<K, V: 'static> fmt::Debug for BinderBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderBuilder")
            .field("has_strategy", &self.strategy.is_some())
            .field("capacity", &self.capacity)
            .field("dispose_policy", &self.dispose_policy)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use fast_list::{Dispose, ErrorKind, TableCapacityStrategy};
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(BinderBuilder<String, String>: Send, Sync, fmt::Debug);

    /// A binding that counts how often it has been disposed.
    #[derive(Debug)]
    struct CountingBinding {
        key: u32,
        values: Vec<u32>,
        disposals: Arc<AtomicU32>,
    }

    impl Dispose for CountingBinding {
        fn dispose(&mut self) {
            self.disposals.fetch_add(1, Ordering::Relaxed);
            self.values.clear();
        }
    }

    impl KeyBinding<u32, u32> for CountingBinding {
        fn key(&self) -> &u32 {
            &self.key
        }

        fn to(&mut self, value: u32) -> Result<&mut Self> {
            self.values.push(value);
            Ok(self)
        }

        fn clear_values(&mut self) -> Result<()> {
            self.values.clear();
            Ok(())
        }

        fn len(&self) -> usize {
            self.values.len()
        }

        fn values(&self) -> &[u32] {
            &self.values
        }
    }

    #[test]
    fn missing_strategy_fails() {
        let error = BinderBuilder::<u32, u32>::new().build().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ArgumentNull);
        assert_eq!(
            error,
            Error::ArgumentNull {
                argument: "strategy"
            }
        );
    }

    #[test]
    fn missing_strategy_fails_with_factory() {
        let error = BinderBuilder::<u32, u32>::new()
            .build_with_factory(|_, key| {
                Ok(CountingBinding {
                    key,
                    values: Vec::new(),
                    disposals: Arc::new(AtomicU32::new(0)),
                })
            })
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ArgumentNull);
    }

    #[test]
    fn build_with_strategy_succeeds() {
        let binder = BinderBuilder::<u32, u32>::new()
            .strategy(TableCapacityStrategy::shared())
            .capacity(100)
            .build()
            .unwrap();

        assert!(binder.is_empty());
    }

    #[test]
    fn factory_creates_bindings() {
        let disposals = Arc::new(AtomicU32::new(0));
        let factory_disposals = Arc::clone(&disposals);

        let mut binder = BinderBuilder::<u32, u32>::new()
            .strategy(TableCapacityStrategy::shared())
            .build_with_factory(move |_, key| {
                Ok(CountingBinding {
                    key,
                    values: vec![0],
                    disposals: Arc::clone(&factory_disposals),
                })
            })
            .unwrap();

        binder.bind(7).unwrap().to(1).unwrap();

        let binding = binder.get_binding(&7_u32).unwrap().unwrap();
        assert_eq!(binding.key(), &7);
        assert_eq!(binding.values(), &[0, 1]);

        assert_eq!(binder.unbind(&7_u32), Ok(true));
        assert_eq!(disposals.load(Ordering::Relaxed), 1);

        binder.bind(8).unwrap();
        drop(binder);
        assert_eq!(disposals.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn failing_factory_registers_nothing() {
        let mut binder = BinderBuilder::<u32, u32>::new()
            .strategy(TableCapacityStrategy::shared())
            .build_with_factory(|_, _| -> Result<CountingBinding> {
                Err(Error::ArgumentNull { argument: "key" })
            })
            .unwrap();

        let error = binder.bind(1).unwrap_err();

        assert_eq!(error, Error::ArgumentNull { argument: "key" });
        assert!(binder.is_empty());
    }

    #[test]
    fn debug_output_names_builder() {
        let output = format!("{:?}", BinderBuilder::<u32, u32>::new().capacity(3));

        assert!(output.contains("BinderBuilder"));
        assert!(output.contains("capacity: 3"));
        assert!(output.contains("has_strategy: false"));
    }
}
