//! Single-slot mailboxes polled by the Unreal client.

use parking_lot::{Mutex, RwLock};

/// Holds at most one pending value. Writes overwrite, reads take.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning any unconsumed value it replaced.
    pub fn put(&self, value: T) -> Option<T> {
        self.slot.lock().replace(value)
    }

    /// Atomically retrieve and clear the pending value.
    pub fn take(&self) -> Option<T> {
        self.slot.lock().take()
    }
}

/// Append-only history. Never truncated.
#[derive(Debug)]
pub struct AppendLog<T> {
    entries: RwLock<Vec<T>>,
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> AppendLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: T) {
        self.entries.write().push(entry);
    }

    /// Copy of every entry in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.read().clone()
    }
}
