//! Participant, assignment, and batch value types.
//!
//! Participants are compared structurally on their name and address, so two
//! entries describe the same person only when both fields match.

use std::collections::HashSet;
use std::fmt;

use crate::error::DrawError;

/// A member of the gift exchange.
///
/// # Example
///
/// ```
/// use secret_santa::Participant;
///
/// let alice = Participant::new("Alice", Some("alice@example.com".to_owned()));
/// assert_eq!(alice.name(), "Alice");
/// assert_eq!(alice.address(), Some("alice@example.com"));
/// assert_eq!(alice, Participant::new("Alice", Some("alice@example.com".to_owned())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Participant {
    name: String,
    address: Option<String>,
}

impl Participant {
    /// Creates a participant with an optional contact address.
    #[must_use]
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    /// Returns the participant's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the participant's contact address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{} <{address}>", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A single santa to recipient pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    santa: Participant,
    recipient: Participant,
}

impl Assignment {
    /// Pairs a santa with a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::SelfAssignment`] when both sides are the same
    /// participant.
    pub fn new(santa: Participant, recipient: Participant) -> Result<Self, DrawError> {
        if santa == recipient {
            return Err(DrawError::SelfAssignment { name: santa.name });
        }
        Ok(Self { santa, recipient })
    }

    /// Returns the gift-giver.
    #[must_use]
    pub const fn santa(&self) -> &Participant {
        &self.santa
    }

    /// Returns the gift-receiver.
    #[must_use]
    pub const fn recipient(&self) -> &Participant {
        &self.recipient
    }
}

/// The complete, ordered list of pairings for one run.
///
/// Batches produced by [`crate::derange`] and [`crate::draw`] are always
/// derangements: every participant gives once, receives once, and never to
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentBatch {
    assignments: Vec<Assignment>,
}

impl AssignmentBatch {
    /// Wraps an ordered list of assignments.
    #[must_use]
    pub const fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Iterates over the assignments.
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    /// Returns the number of pairings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` when the batch holds no pairings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finds the recipient drawn for the named santa.
    #[must_use]
    pub fn recipient_of(&self, santa_name: &str) -> Option<&Participant> {
        self.assignments
            .iter()
            .find(|assignment| assignment.santa.name() == santa_name)
            .map(Assignment::recipient)
    }
}

impl<'a> IntoIterator for &'a AssignmentBatch {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Collapses duplicate participants, keeping the first occurrence of each.
///
/// # Example
///
/// ```
/// use secret_santa::{Participant, dedup_participants};
///
/// let alice = Participant::new("Alice", None);
/// let bob = Participant::new("Bob", None);
/// let unique = dedup_participants(&[alice.clone(), bob.clone(), alice.clone()]);
/// assert_eq!(unique, vec![alice, bob]);
/// ```
#[must_use]
pub fn dedup_participants(participants: &[Participant]) -> Vec<Participant> {
    let mut seen = HashSet::with_capacity(participants.len());
    participants
        .iter()
        .filter(|participant| seen.insert(*participant))
        .cloned()
        .collect()
}
