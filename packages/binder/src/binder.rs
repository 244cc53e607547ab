use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use fast_list::{Dispose, DisposePolicy, Error, Result, SharedCapacityStrategy};
use foldhash::{HashMap, HashMapExt};
use tracing::{debug, trace};

use crate::{BinderBuilder, Binding, KeyBinder, KeyBinding, default_factory};

/// Creates the binding for a key the first time that key is bound.
///
/// The factory receives the capacity strategy of the binder so that the bindings it creates can
/// grow the same way the binder's own storage was sized.
pub type BindingFactory<K, B> = Box<dyn Fn(&SharedCapacityStrategy, K) -> Result<B> + Send>;

/// A map from keys to [`KeyBinding`]s with get-or-create access and explicit teardown.
///
/// Each key owns one binding, which in turn owns the values bound to that key. Bindings are
/// created on first use by [`bind()`](Self::bind) through the binder's [`BindingFactory`]; by
/// default that creates a [`Binding`] backed by a pooled list.
///
/// # Identity
///
/// Bindings are boxed, so the binding returned for a key stays at the same address until it is
/// unbound or the binder is disposed, no matter how many other keys are bound in between.
///
/// # Lifecycle
///
/// [`unbind()`](Self::unbind) disposes the removed binding. [`dispose()`](Self::dispose)
/// disposes every binding, empties the map and makes every further operation fail with
/// [`Error::Disposed`]. Dropping a live binder disposes it.
///
/// # Example
///
/// ```
/// use binder::Binder;
/// use fast_list::TableCapacityStrategy;
///
/// let mut binder = Binder::<&str, &str>::new(TableCapacityStrategy::shared(), 10).unwrap();
///
/// binder.bind("a").unwrap().to("v1").unwrap().to("v2").unwrap();
///
/// let binding = binder.get_binding("a").unwrap().unwrap();
/// assert_eq!(binding.values(), &["v1", "v2"]);
///
/// assert!(binder.unbind("a").unwrap());
/// assert!(binder.get_binding("a").unwrap().is_none());
/// ```
///
/// # Thread safety
///
/// The binder is thread-mobile ([`Send`]) when its keys and bindings are, but not thread-safe
/// ([`Sync`]). Binding a key takes `&mut self`, so get-or-create cannot race within safe code.
pub struct Binder<K, V: 'static, B: Dispose = Binding<K, V>> {
    bindings: HashMap<K, Box<B>>,

    /// Handed to the factory for every binding it creates.
    strategy: SharedCapacityStrategy,

    factory: BindingFactory<K, B>,

    disposed: bool,

    _values: PhantomData<fn() -> V>,
}

impl<K, V> Binder<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    /// Creates a binder whose map is sized by `strategy` for `capacity` keys and whose bindings
    /// only drop their values on disposal.
    ///
    /// # Errors
    ///
    /// Returns the error of the capacity strategy if it cannot provide a capacity for `capacity`
    /// keys.
    pub fn new(strategy: SharedCapacityStrategy, capacity: usize) -> Result<Self> {
        Self::new_inner(
            strategy,
            capacity,
            Box::new(default_factory(DisposePolicy::none())),
        )
    }

    /// Creates a builder for configuring and constructing a [`Binder`].
    ///
    /// # Example
    ///
    /// ```
    /// use binder::Binder;
    /// use fast_list::{DisposePolicy, TableCapacityStrategy};
    ///
    /// let binder = Binder::<String, Vec<u8>>::builder()
    ///     .strategy(TableCapacityStrategy::shared())
    ///     .capacity(64)
    ///     .dispose_policy(DisposePolicy::custom(Vec::clear))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(binder.is_empty());
    /// ```
    pub fn builder() -> BinderBuilder<K, V> {
        BinderBuilder::new()
    }
}

impl<K, V, B> Binder<K, V, B>
where
    K: Eq + Hash + Clone,
    V: 'static,
    B: KeyBinding<K, V>,
{
    pub(crate) fn new_inner(
        strategy: SharedCapacityStrategy,
        capacity: usize,
        factory: BindingFactory<K, B>,
    ) -> Result<Self> {
        let map_capacity = strategy.calculate_capacity(0, capacity)?;

        Ok(Self {
            bindings: HashMap::with_capacity(map_capacity),
            strategy,
            factory,
            disposed: false,
            _values: PhantomData,
        })
    }

    /// Returns the binding for `key`, creating and registering it first if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binder has been disposed, or the error of the binding
    /// factory if a new binding could not be created. Nothing is registered on error.
    pub fn bind(&mut self, key: K) -> Result<&mut B> {
        self.ensure_live()?;

        let existing = self.bindings.len();

        match self.bindings.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_mut()),
            Entry::Vacant(entry) => {
                let binding = (self.factory)(&self.strategy, entry.key().clone())?;

                trace!(existing_bindings = existing, "created binding");
                Ok(entry.insert(Box::new(binding)).as_mut())
            }
        }
    }

    /// Removes and disposes the binding for `key`. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binder has been disposed.
    pub fn unbind<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ensure_live()?;

        let Some(mut binding) = self.bindings.remove(key) else {
            return Ok(false);
        };

        binding.dispose();
        trace!(bindings = self.bindings.len(), "unbound binding");
        Ok(true)
    }

    /// Returns the binding for `key` without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binder has been disposed.
    pub fn get_binding<Q>(&self, key: &Q) -> Result<Option<&B>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ensure_live()?;

        Ok(self.bindings.get(key).map(AsRef::as_ref))
    }

    /// Returns an exclusive reference to the binding for `key` without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binder has been disposed.
    pub fn get_binding_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut B>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ensure_live()?;

        Ok(self.bindings.get_mut(key).map(AsMut::as_mut))
    }

    /// Whether a binding is registered for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] if the binder has been disposed.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ensure_live()?;

        Ok(self.bindings.contains_key(key))
    }
}

impl<K, V: 'static, B: Dispose> Binder<K, V, B> {
    /// The number of registered bindings. Zero after disposal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether [`dispose()`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Disposes every registered binding and empties the map. Calling this again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.disposed = true;

        let count = self.bindings.len();
        for (_, mut binding) in self.bindings.drain() {
            binding.dispose();
        }

        debug!(bindings = count, "disposed binder");
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::Disposed { object: "Binder" });
        }

        Ok(())
    }
}

impl<K, V: 'static, B: Dispose> Dispose for Binder<K, V, B> {
    fn dispose(&mut self) {
        Self::dispose(self);
    }
}

impl<K, V: 'static, B: Dispose> Drop for Binder<K, V, B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K, V, B> KeyBinder<K, V> for Binder<K, V, B>
where
    K: Eq + Hash + Clone,
    V: 'static,
    B: KeyBinding<K, V>,
{
    type Binding = B;

    fn bind(&mut self, key: K) -> Result<&mut B> {
        Self::bind(self, key)
    }

    fn unbind(&mut self, key: &K) -> Result<bool> {
        Self::unbind(self, key)
    }

    fn get_binding(&self, key: &K) -> Result<Option<&B>> {
        Self::get_binding(self, key)
    }
}

impl<K, V: 'static, B: Dispose> fmt::Debug for Binder<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("len", &self.bindings.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
