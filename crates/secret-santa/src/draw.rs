//! Bounded retry loop combining generation and exclusion checks.
//!
//! Each attempt shuffles and generates afresh; nothing carries over between
//! attempts. The loop stops at the first batch the exclusions permit. There is
//! no feasibility proof: impossible constraints are only discovered by running
//! out of attempts.

use std::num::NonZeroUsize;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::derangement::{MIN_PARTICIPANTS, derange};
use crate::error::DrawError;
use crate::exclusions::ExclusionSet;
use crate::participant::{AssignmentBatch, Participant, dedup_participants};

/// Number of attempts made before a draw is declared infeasible.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Retry policy for [`draw`].
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use secret_santa::{DEFAULT_MAX_ATTEMPTS, DrawPolicy};
///
/// assert_eq!(DrawPolicy::default().max_attempts(), DEFAULT_MAX_ATTEMPTS);
///
/// let five = NonZeroUsize::new(5).expect("non-zero");
/// assert_eq!(DrawPolicy::new(five).max_attempts(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPolicy {
    max_attempts: usize,
}

impl DrawPolicy {
    /// Creates a policy allowing `max_attempts` attempts.
    #[must_use]
    pub const fn new(max_attempts: NonZeroUsize) -> Self {
        Self {
            max_attempts: max_attempts.get(),
        }
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// An accepted draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    batch: AssignmentBatch,
    attempts: usize,
}

impl Draw {
    /// Returns the accepted batch.
    #[must_use]
    pub const fn batch(&self) -> &AssignmentBatch {
        &self.batch
    }

    /// Consumes the draw and returns the accepted batch.
    #[must_use]
    pub fn into_batch(self) -> AssignmentBatch {
        self.batch
    }

    /// Returns how many attempts were made, including the accepted one.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }
}

/// Draws assignments for `participants` that satisfy `exclusions`.
///
/// Duplicate participants are collapsed first, so the batch holds one pair per
/// unique participant.
///
/// # Errors
///
/// Returns [`DrawError::TooFewParticipants`] before any attempt when fewer
/// than two unique participants remain, and
/// [`DrawError::NoValidCombination`] when every attempt in the policy's budget
/// is rejected.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use secret_santa::{DrawPolicy, ExclusionSet, Participant, draw};
///
/// let alice = Participant::new("Alice", None);
/// let bob = Participant::new("Bob", None);
/// let carol = Participant::new("Carol", None);
///
/// let mut exclusions = ExclusionSet::new();
/// exclusions.forbid(alice.clone(), bob.clone());
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let draw = draw(
///     &[alice.clone(), bob, carol.clone()],
///     &exclusions,
///     DrawPolicy::default(),
///     &mut rng,
/// )
/// .expect("a valid draw exists");
///
/// assert_eq!(draw.batch().recipient_of("Alice"), Some(&carol));
/// ```
pub fn draw<R>(
    participants: &[Participant],
    exclusions: &ExclusionSet,
    policy: DrawPolicy,
    rng: &mut R,
) -> Result<Draw, DrawError>
where
    R: Rng + ?Sized,
{
    let unique = dedup_participants(participants);
    if unique.len() < MIN_PARTICIPANTS {
        return Err(DrawError::TooFewParticipants {
            count: unique.len(),
        });
    }
    if unique.len() < participants.len() {
        debug!(
            supplied = participants.len(),
            unique = unique.len(),
            "collapsed duplicate participants"
        );
    }

    retry(policy, exclusions, || derange(&unique, rng))
}

/// Runs `generate` until `exclusions` permits a batch or the budget runs out.
fn retry<G>(
    policy: DrawPolicy,
    exclusions: &ExclusionSet,
    mut generate: G,
) -> Result<Draw, DrawError>
where
    G: FnMut() -> Result<AssignmentBatch, DrawError>,
{
    for attempt in 1..=policy.max_attempts() {
        let batch = generate()?;
        if exclusions.permits(&batch) {
            info!(attempts = attempt, pairs = batch.len(), "draw accepted");
            return Ok(Draw {
                batch,
                attempts: attempt,
            });
        }
        debug!(attempt, "draw rejected by exclusions");
    }

    warn!(
        attempts = policy.max_attempts(),
        "no draw satisfied the exclusions"
    );
    Err(DrawError::NoValidCombination {
        attempts: policy.max_attempts(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::participant::Assignment;

    struct Trio {
        alice: Participant,
        bob: Participant,
        carol: Participant,
    }

    #[fixture]
    fn trio() -> Trio {
        Trio {
            alice: Participant::new("Alice", Some("a@x".to_owned())),
            bob: Participant::new("Bob", Some("b@x".to_owned())),
            carol: Participant::new("Carol", Some("c@x".to_owned())),
        }
    }

    fn cycle(order: [&Participant; 3]) -> AssignmentBatch {
        let [first, second, third] = order;
        AssignmentBatch::new(vec![
            Assignment::new(first.clone(), second.clone()).expect("distinct"),
            Assignment::new(second.clone(), third.clone()).expect("distinct"),
            Assignment::new(third.clone(), first.clone()).expect("distinct"),
        ])
    }

    fn policy(max_attempts: usize) -> DrawPolicy {
        DrawPolicy::new(NonZeroUsize::new(max_attempts).expect("non-zero budget"))
    }

    #[rstest]
    fn retry_stops_at_first_accepted_batch(trio: Trio) {
        let rejected = cycle([&trio.alice, &trio.bob, &trio.carol]);
        let accepted = cycle([&trio.alice, &trio.carol, &trio.bob]);
        let mut queue = VecDeque::from(vec![
            rejected.clone(),
            rejected,
            accepted.clone(),
            cycle([&trio.alice, &trio.carol, &trio.bob]),
        ]);
        let calls = Cell::new(0_usize);

        let mut exclusions = ExclusionSet::new();
        exclusions.forbid(trio.alice.clone(), trio.bob.clone());

        let result = retry(policy(10), &exclusions, || {
            calls.set(calls.get() + 1);
            Ok(queue.pop_front().expect("scripted batch available"))
        })
        .expect("third batch is accepted");

        assert_eq!(result.batch(), &accepted);
        assert_eq!(result.attempts(), 3);
        assert_eq!(calls.get(), 3, "no attempts after acceptance");
    }

    #[rstest]
    fn retry_exhausts_budget_when_every_batch_is_rejected(trio: Trio) {
        let rejected = cycle([&trio.alice, &trio.bob, &trio.carol]);
        let calls = Cell::new(0_usize);
        let mut exclusions = ExclusionSet::new();
        exclusions.forbid(trio.bob.clone(), trio.carol.clone());

        let result = retry(policy(7), &exclusions, || {
            calls.set(calls.get() + 1);
            Ok(rejected.clone())
        });

        assert_eq!(result, Err(DrawError::NoValidCombination { attempts: 7 }));
        assert_eq!(calls.get(), 7);
    }

    #[rstest]
    fn retry_propagates_generation_errors() {
        let result = retry(policy(3), &ExclusionSet::new(), || {
            Err(DrawError::TooFewParticipants { count: 1 })
        });
        assert_eq!(result, Err(DrawError::TooFewParticipants { count: 1 }));
    }

    #[rstest]
    fn reports_infeasibility_for_excluded_pair() {
        let alice = Participant::new("Alice", None);
        let bob = Participant::new("Bob", None);
        let mut exclusions = ExclusionSet::new();
        exclusions.forbid(alice.clone(), bob.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let result = draw(&[alice, bob], &exclusions, DrawPolicy::default(), &mut rng);

        assert_eq!(
            result,
            Err(DrawError::NoValidCombination {
                attempts: DEFAULT_MAX_ATTEMPTS
            })
        );
    }

    #[rstest]
    fn collapses_duplicates_before_drawing(trio: Trio) {
        let participants = vec![
            trio.alice.clone(),
            trio.bob.clone(),
            trio.alice.clone(),
            trio.carol.clone(),
            trio.bob.clone(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let result = draw(
            &participants,
            &ExclusionSet::new(),
            DrawPolicy::default(),
            &mut rng,
        )
        .expect("three unique participants");

        assert_eq!(result.batch().len(), 3);
        assert_eq!(result.attempts(), 1);
    }

    #[rstest]
    fn duplicates_of_one_person_are_too_few(trio: Trio) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let result = draw(
            &[trio.alice.clone(), trio.alice],
            &ExclusionSet::new(),
            DrawPolicy::default(),
            &mut rng,
        );
        assert_eq!(result, Err(DrawError::TooFewParticipants { count: 1 }));
    }

    #[rstest]
    fn accepted_draw_respects_exclusions(trio: Trio) {
        let mut exclusions = ExclusionSet::new();
        exclusions.forbid(trio.alice.clone(), trio.bob.clone());
        let participants = vec![trio.alice.clone(), trio.bob.clone(), trio.carol.clone()];

        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = draw(&participants, &exclusions, DrawPolicy::default(), &mut rng)
                .expect("feasible exclusions");
            assert!(exclusions.permits(result.batch()));
            assert_eq!(result.batch().recipient_of("Alice"), Some(&trio.carol));
        }
    }
}
