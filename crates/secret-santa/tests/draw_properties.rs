//! Property checks for the draw across many seeds and group sizes.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;
use secret_santa::{
    Assignment, AssignmentBatch, DrawError, DrawPolicy, ExclusionSet, Participant, derange, draw,
};

fn group(size: usize) -> Vec<Participant> {
    (0..size)
        .map(|index| Participant::new(format!("elf-{index}"), Some(format!("elf-{index}@pole"))))
        .collect()
}

fn is_derangement(participants: &[Participant], batch: &AssignmentBatch) -> bool {
    let expected: HashSet<&Participant> = participants.iter().collect();
    let santas: HashSet<&Participant> = batch.iter().map(Assignment::santa).collect();
    let recipients: HashSet<&Participant> = batch.iter().map(Assignment::recipient).collect();

    batch.len() == participants.len()
        && santas == expected
        && recipients == expected
        && batch.iter().all(|pair| pair.santa() != pair.recipient())
}

#[test]
fn every_generated_batch_is_a_derangement() {
    for size in 2..=40 {
        let participants = group(size);
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed * 1_000 + size as u64);
            let batch = derange(&participants, &mut rng).expect("derangement exists");
            assert!(
                is_derangement(&participants, &batch),
                "size {size}, seed {seed}: {batch:?}"
            );
        }
    }
}

#[test]
fn unseeded_generation_is_a_derangement() {
    let participants = group(12);
    let mut rng = rand::rng();
    for _ in 0..200 {
        let batch = derange(&participants, &mut rng).expect("derangement exists");
        assert!(is_derangement(&participants, &batch));
    }
}

#[test]
fn three_named_people_form_a_single_cycle() {
    let alice = Participant::new("Alice", Some("a@x".to_owned()));
    let bob = Participant::new("Bob", Some("b@x".to_owned()));
    let carol = Participant::new("Carol", Some("c@x".to_owned()));
    let participants = vec![alice, bob, carol];

    for seed in 0..100 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let accepted = draw(
            &participants,
            &ExclusionSet::new(),
            DrawPolicy::default(),
            &mut rng,
        )
        .expect("draw succeeds");
        assert_eq!(accepted.attempts(), 1, "no exclusions accept the first batch");
        assert!(is_derangement(&participants, accepted.batch()));
    }
}

#[rstest]
#[case(4)]
#[case(9)]
#[case(30)]
fn accepted_draws_never_contain_forbidden_pairs(#[case] size: usize) {
    let participants = group(size);
    let mut exclusions = ExclusionSet::new();
    // Forbid each person from drawing their neighbour in input order.
    for pair in participants.windows(2) {
        if let [santa, recipient] = pair {
            exclusions.forbid(santa.clone(), recipient.clone());
        }
    }

    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let accepted = draw(&participants, &exclusions, DrawPolicy::default(), &mut rng)
            .expect("sparse exclusions are feasible");
        assert!(exclusions.permits(accepted.batch()));
        assert!(is_derangement(&participants, accepted.batch()));
    }
}

#[test]
fn fully_excluded_santa_exhausts_the_budget() {
    let participants = group(4);
    let mut exclusions = ExclusionSet::new();
    let santa = participants.first().expect("first participant").clone();
    for recipient in participants.iter().skip(1) {
        exclusions.forbid(santa.clone(), recipient.clone());
    }
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let result = draw(&participants, &exclusions, DrawPolicy::default(), &mut rng);

    assert_eq!(
        result,
        Err(DrawError::NoValidCombination { attempts: 1000 })
    );
}
