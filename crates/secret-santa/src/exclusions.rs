//! Exclusion constraints and batch validation.
//!
//! Validation is applied to a finished batch only; the generator never sees
//! the exclusions.

use std::collections::{HashMap, HashSet};

use crate::participant::{Assignment, AssignmentBatch, Participant};

/// Per-santa sets of recipients that santa must not draw.
///
/// # Example
///
/// ```
/// use secret_santa::{ExclusionSet, Participant};
///
/// let alice = Participant::new("Alice", None);
/// let bob = Participant::new("Bob", None);
///
/// let mut exclusions = ExclusionSet::new();
/// exclusions.forbid(alice.clone(), bob.clone());
///
/// assert!(exclusions.is_forbidden(&alice, &bob));
/// assert!(!exclusions.is_forbidden(&bob, &alice));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    forbidden: HashMap<Participant, HashSet<Participant>>,
}

impl ExclusionSet {
    /// Creates an empty exclusion set that permits every batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbids `santa` from drawing `recipient`.
    pub fn forbid(&mut self, santa: Participant, recipient: Participant) {
        self.forbidden.entry(santa).or_default().insert(recipient);
    }

    /// Returns `true` when `santa` must not draw `recipient`.
    #[must_use]
    pub fn is_forbidden(&self, santa: &Participant, recipient: &Participant) -> bool {
        self.forbidden
            .get(santa)
            .is_some_and(|recipients| recipients.contains(recipient))
    }

    /// Returns the recipients forbidden for `santa`.
    pub fn forbidden_for(&self, santa: &Participant) -> impl Iterator<Item = &Participant> {
        self.forbidden.get(santa).into_iter().flatten()
    }

    /// Returns `true` when no santa has any exclusions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forbidden.values().all(HashSet::is_empty)
    }

    /// Returns `true` when no pair in `batch` is forbidden.
    ///
    /// This is a pure check: neither the batch nor the set is modified.
    #[must_use]
    pub fn permits(&self, batch: &AssignmentBatch) -> bool {
        batch.iter().all(|assignment| self.permits_pair(assignment))
    }

    fn permits_pair(&self, assignment: &Assignment) -> bool {
        !self.is_forbidden(assignment.santa(), assignment.recipient())
    }
}
