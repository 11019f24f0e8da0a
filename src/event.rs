//! Edit notifications.
//!
//! Each [`Document`] owns its observers; there is no process-wide registry.
//! Observers run after the document is fully updated and receive it
//! read-only, so they cannot edit it from inside a notification.

use crate::text::Document;

/// What produced an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOrigin {
    /// A direct `replace` call.
    Edit,
    Undo,
    Redo,
}

/// A change of `old_len` characters at `offset` into `new_len` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditEvent {
    pub offset: usize,
    pub old_len: usize,
    pub new_len: usize,
    pub origin: EditOrigin,
}

impl EditEvent {
    /// End of the changed region after the edit.
    #[must_use]
    pub fn new_end(&self) -> usize {
        self.offset + self.new_len
    }
}

/// Handle returned by [`Document::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Document, &EditEvent) + Send>;

/// Registered observers in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    entries: Vec<(ObserverId, Observer)>,
    next_id: u64,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Observer) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify(&mut self, doc: &Document, event: &EditEvent) {
        for (_, observer) in &mut self.entries {
            observer(doc, event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
