use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;

use foldhash::{HashMap, HashMapExt};
use tracing::trace;

use crate::CAPACITY_TABLE;

/// Upper bound on the number of idle buffers kept for any one element type and size class.
/// Buffers given back beyond this are freed immediately.
pub const MAX_RETAINED_PER_CLASS: usize = 32;

thread_local! {
    static SHARED: RefCell<PoolState> = RefCell::new(PoolState::new());
}

/// The shared pool of backing buffers that pooled collections rent their storage from.
///
/// Buffers are kept in size classes, one set of classes per element type. Only the entries of
/// [`CAPACITY_TABLE`] are size classes; buffers of any other size are freed when given back.
///
/// A buffer is rented when
/// a collection is created or grows and given back when the collection grows again or is
/// disposed. Because collections grow through the same capacity table, a buffer given back by one
/// collection is likely to be the exact size another collection asks for next.
///
/// # Thread safety
///
/// Each thread has its own pool, so renting and returning never takes a lock. A buffer rented on
/// one thread and given back on another simply moves to the pool of the second thread.
///
/// # Example
///
/// ```
/// use fast_list::BufferPool;
///
/// let buffer = BufferPool::rent::<u64>(7);
/// assert!(buffer.capacity() >= 7);
///
/// BufferPool::give_back(buffer, 7);
/// assert_eq!(BufferPool::retained::<u64>(7), 1);
///
/// // The next rent of the same class reuses it.
/// let _buffer = BufferPool::rent::<u64>(7);
/// assert_eq!(BufferPool::retained::<u64>(7), 0);
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct BufferPool;

impl BufferPool {
    /// Rents an empty buffer with room for at least `size_class` items.
    ///
    /// A fresh buffer is allocated if no idle one is available. As with [`Vec::with_capacity`],
    /// the process aborts if that allocation fails.
    #[must_use]
    pub fn rent<T: 'static>(size_class: usize) -> Vec<T> {
        let reused = SHARED
            .try_with(|state| state.borrow_mut().take::<T>(size_class))
            .ok()
            .flatten();

        if let Some(buffer) = reused {
            trace!(
                item_type = type_name::<T>(),
                size_class, "reusing pooled buffer"
            );
            return buffer;
        }

        trace!(
            item_type = type_name::<T>(),
            size_class, "allocating new buffer"
        );
        Vec::with_capacity(size_class)
    }

    /// Gives a buffer back to the pool so that it can satisfy a later rent of the same class.
    ///
    /// Any items still in the buffer are dropped first. Buffers whose `size_class` is not an
    /// entry of [`CAPACITY_TABLE`] are freed instead of retained.
    pub fn give_back<T: 'static>(mut buffer: Vec<T>, size_class: usize) {
        // Item destructors may themselves give buffers back, so they must run before we
        // borrow the pool state.
        buffer.clear();

        if CAPACITY_TABLE.binary_search(&size_class).is_err() {
            trace!(
                item_type = type_name::<T>(),
                size_class, "freeing buffer outside the capacity table"
            );
            return;
        }

        if buffer.capacity() < size_class {
            // Not a buffer this pool handed out for that class; it cannot satisfy a rent.
            return;
        }

        let retained = SHARED
            .try_with(|state| state.borrow_mut().put(buffer, size_class))
            .unwrap_or(false);

        trace!(
            item_type = type_name::<T>(),
            size_class, retained, "buffer given back"
        );
    }

    /// Returns the number of idle buffers held for items of type `T` in the given size class.
    #[must_use]
    pub fn retained<T: 'static>(size_class: usize) -> usize {
        SHARED
            .try_with(|state| state.borrow().idle::<T>(size_class))
            .unwrap_or(0)
    }

    /// Frees every idle buffer held by the pool of the current thread.
    pub fn trim() {
        // The state is swapped out so that freeing happens outside the borrow.
        let released = SHARED.try_with(|state| state.replace(PoolState::new()));

        drop(released);
    }
}

#[derive(Debug)]
struct PoolState {
    /// Size classes for each element type, type-erased as `SizeClasses<T>`.
    by_type: HashMap<TypeId, Box<dyn Any>>,
}

impl PoolState {
    fn new() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    fn take<T: 'static>(&mut self, size_class: usize) -> Option<Vec<T>> {
        self.by_type
            .get_mut(&TypeId::of::<T>())?
            .downcast_mut::<SizeClasses<T>>()?
            .take(size_class)
    }

    fn put<T: 'static>(&mut self, buffer: Vec<T>, size_class: usize) -> bool {
        let classes = self
            .by_type
            .entry(TypeId::of::<T>())
            .or_insert_with(SizeClasses::<T>::boxed);

        classes
            .downcast_mut::<SizeClasses<T>>()
            .is_some_and(|classes| classes.put(buffer, size_class))
    }

    fn idle<T: 'static>(&self, size_class: usize) -> usize {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|classes| classes.downcast_ref::<SizeClasses<T>>())
            .map_or(0, |classes| classes.idle(size_class))
    }
}

struct SizeClasses<T> {
    classes: HashMap<usize, Vec<Vec<T>>>,
}

impl<T: 'static> SizeClasses<T> {
    fn boxed() -> Box<dyn Any> {
        Box::new(Self {
            classes: HashMap::new(),
        })
    }

    fn take(&mut self, size_class: usize) -> Option<Vec<T>> {
        let buffer = self.classes.get_mut(&size_class)?.pop()?;

        debug_assert!(buffer.is_empty());
        debug_assert!(buffer.capacity() >= size_class);

        Some(buffer)
    }

    fn put(&mut self, buffer: Vec<T>, size_class: usize) -> bool {
        let idle = self.classes.entry(size_class).or_default();

        if idle.len() >= MAX_RETAINED_PER_CLASS {
            return false;
        }

        idle.push(buffer);
        true
    }

    fn idle(&self, size_class: usize) -> usize {
        self.classes.get(&size_class).map_or(0, Vec::len)
    }
}
