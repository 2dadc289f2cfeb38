//! In-process interaction log: append-only, insertion-ordered, process lifetime.
//!
//! The log is the only shared mutable state in the system. A single coarse
//! mutex makes appends and snapshots atomic; records are immutable once
//! constructed. Nothing is persisted — a restart starts empty (accepted
//! limitation, see DESIGN.md).

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// One logged question/story exchange. Identity is insertion order; there is no id field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub question: String,
    pub story: String,
    pub learning_point: String,
    pub badge: String,
    pub badge_icon: String,
}

/// Process-wide story log. Share as `Arc<StoryLog>`; the inner container is
/// never exposed, only the append/snapshot/len contract.
#[derive(Debug, Default)]
pub struct StoryLog {
    entries: Mutex<Vec<Interaction>>,
}

impl StoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one interaction. Atomic with respect to concurrent appends and snapshots.
    pub fn append(&self, interaction: Interaction) {
        self.lock().push(interaction);
    }

    /// Ordered copy of the log, oldest first.
    pub fn snapshot(&self) -> Vec<Interaction> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Interaction>> {
        // A poisoned guard only means some holder panicked; the append-only Vec
        // is still valid, so recover it instead of propagating the panic.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
