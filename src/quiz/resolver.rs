use rand::Rng;

use super::{CategoryId, ScoreState};

/// Categories sharing the highest score, in catalog order.
pub fn leaders(scores: &ScoreState) -> Vec<CategoryId> {
    let max_score = match scores.max() {
        Some(max_score) => max_score,
        None => return Vec::new(),
    };

    scores
        .iter()
        .filter(|&(_, score)| score == max_score)
        .map(|(category, _)| category)
        .collect()
}

/// Picks the winning category. Ties are broken by a uniform draw over the
/// leaders; a single leader is returned without touching `rng`.
pub fn resolve<R: Rng + ?Sized>(scores: &ScoreState, rng: &mut R) -> Option<CategoryId> {
    let leaders = leaders(scores);

    match leaders.len() {
        0 => None,
        1 => Some(leaders[0]),
        n => Some(leaders[rng.gen_range(0..n)]),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::quiz::fixtures::answer;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::collections::HashMap;

    /// Fails the test if the code under test asks for randomness.
    pub struct NoRandomness;

    impl RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("random source must not be used")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("random source must not be used")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("random source must not be used")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            panic!("random source must not be used")
        }
    }

    fn scores(points: &[(CategoryId, u32)]) -> ScoreState {
        ScoreState::zeroed(CategoryId::ALL).apply_answer(&answer("", points))
    }

    #[test]
    fn single_leader_wins_without_randomness() {
        let scores = scores(&[(CategoryId::Ravenclaw, 3), (CategoryId::Hufflepuff, 1)]);

        assert_eq!(leaders(&scores), vec![CategoryId::Ravenclaw]);
        assert_eq!(
            resolve(&scores, &mut NoRandomness),
            Some(CategoryId::Ravenclaw)
        );
    }

    #[test]
    fn all_zero_scores_make_everyone_a_leader() {
        let scores = ScoreState::zeroed(CategoryId::ALL);
        assert_eq!(leaders(&scores), CategoryId::ALL.to_vec());

        let mut rng = StdRng::seed_from_u64(1);
        assert!(resolve(&scores, &mut rng).is_some());
    }

    #[test]
    fn empty_scores_have_no_winner() {
        assert!(leaders(&ScoreState::default()).is_empty());
        assert_eq!(resolve(&ScoreState::default(), &mut NoRandomness), None);
    }

    #[test]
    fn tie_only_picks_among_leaders_uniformly() {
        let scores = scores(&[(CategoryId::Gryffindor, 5), (CategoryId::Slytherin, 5)]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<CategoryId, u32> = HashMap::new();

        for _ in 0..10_000 {
            let winner = resolve(&scores, &mut rng).unwrap();
            *counts.entry(winner).or_default() += 1;
        }

        assert_eq!(counts.len(), 2);
        for id in [CategoryId::Gryffindor, CategoryId::Slytherin] {
            let share = counts[&id] as f64 / 10_000.0;
            assert!((share - 0.5).abs() < 0.03, "{} won {:.3} of draws", id, share);
        }
    }

    #[test]
    fn three_way_tie_is_uniform() {
        let scores = scores(&[
            (CategoryId::Hufflepuff, 2),
            (CategoryId::Ravenclaw, 2),
            (CategoryId::Promptevrin, 2),
            (CategoryId::Gryffindor, 1),
        ]);
        assert_eq!(
            leaders(&scores),
            vec![
                CategoryId::Hufflepuff,
                CategoryId::Ravenclaw,
                CategoryId::Promptevrin
            ]
        );

        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<CategoryId, u32> = HashMap::new();
        for _ in 0..9_000 {
            *counts.entry(resolve(&scores, &mut rng).unwrap()).or_default() += 1;
        }

        assert!(!counts.contains_key(&CategoryId::Gryffindor));
        for (id, count) in counts {
            let share = count as f64 / 9_000.0;
            assert!((share - 1.0 / 3.0).abs() < 0.03, "{} won {:.3} of draws", id, share);
        }
    }

    #[test]
    fn same_seed_gives_same_winner() {
        let scores = ScoreState::zeroed(CategoryId::ALL);
        let first = resolve(&scores, &mut StdRng::seed_from_u64(9));
        let second = resolve(&scores, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
