//! The shared-ownership control block every container is built on.
//!
//! Every `vessel` container (`VString`, `VList`, `VMap`, `VSet`, `VBuffer`) is a
//! cheap-to-clone handle around a heap-allocated control block: a reference count
//! plus a reader/writer lock around the payload. Reads take a shared lock for the
//! duration of the read closure; mutations take an exclusive lock. A poisoned lock
//! (another handle's writer panicked mid-mutation) recovers the last-written state
//! rather than propagating a panic or an error, consistent with this crate never
//! exposing a data-operation error channel.

use std::sync::{Arc, RwLock};

pub(crate) struct Handle<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Handle<T> {
    pub(crate) fn new(value: T) -> Self {
        Handle {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Acquire shared access for the duration of `f`.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Acquire exclusive access for the duration of `f`.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Clone the payload out from under the lock. Used at every deep-copy boundary.
    pub(crate) fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.read(|inner| inner.clone())
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|inner| f.debug_tuple("Handle").field(inner).finish())
    }
}

use std::fmt;
