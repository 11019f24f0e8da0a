//! Shared document handle for hosts that keep the document behind a lock.
//!
//! Observers only ever see `&Document`, so they cannot edit through the
//! notification itself. A host that hands observers a [`WeakDocument`] could
//! still try to edit from inside a notification; [`SharedDocument`] detects
//! that and fails with [`Error::Reentrancy`] instead of deadlocking.

use crate::error::{Error, Result};
use crate::text::Document;
use crate::text::history::HistoryStatus;
use std::ops::{Deref, DerefMut, Range};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

struct Shared {
    doc: Mutex<Document>,
    owner: Mutex<Option<ThreadId>>,
}

/// Cloneable, thread-safe handle to a [`Document`].
#[derive(Clone)]
pub struct SharedDocument {
    inner: Arc<Shared>,
}

/// Non-owning handle, for observers that need to reach back to the document.
#[derive(Clone)]
pub struct WeakDocument {
    inner: Weak<Shared>,
}

/// Exclusive access to the document. Dropping it releases the lock.
pub struct DocumentGuard<'a> {
    doc: MutexGuard<'a, Document>,
    owner: &'a Mutex<Option<ThreadId>>,
}

impl SharedDocument {
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            inner: Arc::new(Shared {
                doc: Mutex::new(doc),
                owner: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Lock the document.
    ///
    /// Blocks while another thread holds it. Fails with
    /// [`Error::Reentrancy`] if the calling thread already holds it, which
    /// is the case inside an observer callback.
    pub fn lock(&self) -> Result<DocumentGuard<'_>> {
        let me = thread::current().id();
        if *lock_ignoring_poison(&self.inner.owner) == Some(me) {
            tracing::warn!("document accessed from inside its own notification");
            return Err(Error::Reentrancy);
        }
        let doc = self
            .inner
            .doc
            .lock()
            .map_err(|_| Error::Integrity("document lock poisoned".to_string()))?;
        *lock_ignoring_poison(&self.inner.owner) = Some(me);
        Ok(DocumentGuard {
            doc,
            owner: &self.inner.owner,
        })
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Result<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn replace(&self, range: Range<usize>, text: &str) -> Result<()> {
        self.lock()?.replace(range, text)
    }

    pub fn undo(&self) -> Result<HistoryStatus> {
        self.lock()?.undo()
    }

    pub fn redo(&self) -> Result<HistoryStatus> {
        self.lock()?.redo()
    }

    pub fn text(&self) -> Result<String> {
        self.read(Document::text)
    }
}

impl WeakDocument {
    /// `None` once every [`SharedDocument`] is gone.
    #[must_use]
    pub fn upgrade(&self) -> Option<SharedDocument> {
        self.inner.upgrade().map(|inner| SharedDocument { inner })
    }
}

impl Deref for DocumentGuard<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl DerefMut for DocumentGuard<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.doc
    }
}

impl Drop for DocumentGuard<'_> {
    fn drop(&mut self) {
        // Runs before `doc` is unlocked, so the next owner cannot be cleared.
        *lock_ignoring_poison(self.owner) = None;
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDocument")
            .field("strong", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakDocument").finish_non_exhaustive()
    }
}
