use super::models::Question;
use crate::storage::Stored;
use rand::seq::SliceRandom;
use rand::Rng;

/// Candidates from `pool` that have not been asked yet.
pub fn remaining<'a>(pool: &'a [Stored<Question>], previous: &[i64]) -> Vec<&'a Stored<Question>> {
    pool.iter().filter(|q| !previous.contains(&q.id)).collect()
}

/// Uniformly pick the next quiz question, or `None` when the pool is exhausted.
pub fn draw<R: Rng + ?Sized>(
    pool: &[Stored<Question>],
    previous: &[i64],
    rng: &mut R,
) -> Option<Stored<Question>> {
    remaining(pool, previous).choose(rng).map(|q| (*q).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(ids: &[i64]) -> Vec<Stored<Question>> {
        ids.iter()
            .map(|&id| Stored {
                id,
                record: Question {
                    question: format!("q{id}"),
                    answer: "a".into(),
                    category: 3,
                    difficulty: 2,
                },
            })
            .collect()
    }

    #[test]
    fn never_repeats_previous_questions() {
        let pool = pool(&[13, 14, 15, 16]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let q = draw(&pool, &[13, 14, 15], &mut rng).unwrap();
            assert_eq!(q.id, 16);
        }
    }

    #[test]
    fn exhausted_pool_yields_none() {
        let pool = pool(&[13, 14, 15]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw(&pool, &[13, 14, 15, 40, 50], &mut rng).is_none());
        assert!(draw(&[], &[], &mut rng).is_none());
    }

    #[test]
    fn every_remaining_question_is_reachable() {
        let pool = pool(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(draw(&pool, &[2], &mut rng).unwrap().id);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }
}
