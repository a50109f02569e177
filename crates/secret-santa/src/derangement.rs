//! Random derangement generation.
//!
//! A derangement is a permutation with no fixed points. The generator shuffles
//! the participants, then walks the shuffled order handing each santa a random
//! recipient from those still unassigned, never themselves.
//!
//! # Forced final pairing
//!
//! When two santas remain and the last participant in shuffled order has not
//! yet been drawn, the second-to-last santa is given that last participant.
//! Without this step the final santa could be left holding only themselves.
//!
//! Every earlier step sees at least three unassigned recipients, so at least
//! two remain once the santa is removed. At the second-to-last step either the
//! last participant is still free (and is forced, leaving the final santa a
//! recipient other than themselves) or it was already drawn, in which case the
//! second-to-last santa takes whichever of the two remaining recipients is not
//! themselves and the final santa gets the other. The final step therefore
//! always has a legal choice.
//!
//! The forced step makes the result slightly non-uniform over derangements
//! for a fixed shuffle order. Uniform sampling would need enumeration of all
//! permutations; the up-front shuffle restores most of the symmetry and the
//! approximation is accepted.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::DrawError;
use crate::participant::{Assignment, AssignmentBatch, Participant};

/// Smallest group for which a derangement exists.
pub const MIN_PARTICIPANTS: usize = 2;

/// Generates one random derangement of `participants`.
///
/// The input must already be free of duplicates; [`crate::draw`] takes care of
/// that before calling here. Pairs are returned in santa processing order.
///
/// # Errors
///
/// Returns [`DrawError::TooFewParticipants`] when fewer than
/// [`MIN_PARTICIPANTS`] are supplied.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use secret_santa::{Participant, derange};
///
/// let people = vec![
///     Participant::new("Alice", None),
///     Participant::new("Bob", None),
///     Participant::new("Carol", None),
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let batch = derange(&people, &mut rng).expect("three people can be deranged");
///
/// assert_eq!(batch.len(), 3);
/// assert!(batch.iter().all(|pair| pair.santa() != pair.recipient()));
/// ```
pub fn derange<R>(participants: &[Participant], rng: &mut R) -> Result<AssignmentBatch, DrawError>
where
    R: Rng + ?Sized,
{
    let count = participants.len();
    if count < MIN_PARTICIPANTS {
        return Err(DrawError::TooFewParticipants { count });
    }

    let mut order = participants.to_vec();
    order.shuffle(rng);

    // Positions into `order` that nobody has drawn yet.
    let mut unassigned: Vec<usize> = (0..count).collect();
    let mut assignments = Vec::with_capacity(count);

    for (santa_position, santa) in order.iter().enumerate() {
        let no_candidate = || DrawError::NoCandidate {
            santa: santa.name().to_owned(),
        };
        let recipient_position = take_recipient(&mut unassigned, santa_position, count, rng)
            .ok_or_else(no_candidate)?;
        let recipient = order.get(recipient_position).ok_or_else(no_candidate)?;
        assignments.push(Assignment::new(santa.clone(), recipient.clone())?);
    }

    Ok(AssignmentBatch::new(assignments))
}

/// Removes and returns the recipient position for the santa at
/// `santa_position`.
fn take_recipient<R>(
    unassigned: &mut Vec<usize>,
    santa_position: usize,
    count: usize,
    rng: &mut R,
) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let last_position = count.checked_sub(1)?;
    let forced = if santa_position.checked_add(2) == Some(count) {
        unassigned
            .iter()
            .position(|&candidate| candidate == last_position)
    } else {
        None
    };

    let slot = match forced {
        Some(position) => position,
        None => {
            let candidates: Vec<usize> = unassigned
                .iter()
                .enumerate()
                .filter(|&(_, &candidate)| candidate != santa_position)
                .map(|(slot, _)| slot)
                .collect();
            *candidates.choose(rng)?
        }
    };

    Some(unassigned.swap_remove(slot))
}
