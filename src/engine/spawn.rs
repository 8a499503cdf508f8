use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::IteratorRandom;
use rand::RngCore;

use super::grid::{Card, Grid, Idx};

/// Cards the spawner and the search adversary may place on an empty slot.
pub const NEW_CARD_CHOICES: [Card; 2] = [2, 4];
const NEW_CARD_WEIGHTS: [u8; 2] = [1, 1];

/// Spawner places new cards on real boards. Search never uses it: the adversary ply
/// enumerates every placement instead of sampling one.
pub struct Spawner {
    rng: Box<dyn RngCore>,
    new_card_weighted_index: WeightedIndex<u8>,
}

impl Spawner {
    pub fn new(rng: impl RngCore + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            new_card_weighted_index: WeightedIndex::new(NEW_CARD_WEIGHTS)
                .expect("NEW_CARD_WEIGHTS should never be empty"),
        }
    }

    /// Picks an empty slot uniformly at random and fills it with a 2 or a 4 with equal
    /// probability. Returns the slot and card, or None when the grid is full.
    pub fn spawn(&mut self, grid: &mut Grid) -> Option<(Idx, Card)> {
        let idx = grid.empty_slots().into_iter().choose(&mut self.rng)?;
        let card = NEW_CARD_CHOICES[self.new_card_weighted_index.sample(&mut self.rng)];
        grid.set(&idx, card);
        log::trace!("spawned {} at {}", card, idx);
        Some((idx, card))
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn spawn_fills_one_empty_slot() {
        let mut spawner = Spawner::new(SmallRng::seed_from_u64(42));
        let mut grid = Grid::default();
        let (idx, card) = spawner.spawn(&mut grid).expect("grid has room");
        assert!(NEW_CARD_CHOICES.contains(&card));
        assert_eq!(grid.get(&idx), card);
        assert_eq!(grid.empty_slots().len(), 15);
    }

    #[test]
    fn spawn_on_full_grid() {
        let mut spawner = Spawner::new(SmallRng::seed_from_u64(42));
        let mut grid = Grid::from([[2; 4]; 4]);
        assert_eq!(spawner.spawn(&mut grid), None);
        assert_eq!(grid, Grid::from([[2; 4]; 4]));
    }

    #[test]
    fn spawn_only_targets_empty_slots() {
        let mut spawner = Spawner::new(SmallRng::seed_from_u64(3));
        let initial = Grid::from([[8, 8, 8, 8], [8, 0, 8, 8], [8, 8, 8, 8], [8, 8, 8, 8]]);
        for _ in 0..20 {
            let mut grid = initial;
            let (idx, _) = spawner.spawn(&mut grid).expect("one slot is empty");
            assert_eq!(idx, Idx(1, 1));
        }
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let mut a = Spawner::new(SmallRng::seed_from_u64(9));
        let mut b = Spawner::new(SmallRng::seed_from_u64(9));
        let (mut ga, mut gb) = (Grid::default(), Grid::default());
        for _ in 0..10 {
            assert_eq!(a.spawn(&mut ga), b.spawn(&mut gb));
        }
        assert_eq!(ga, gb);
    }

    #[test]
    fn spawn_draws_both_cards() {
        let mut spawner = Spawner::new(SmallRng::seed_from_u64(1));
        let cards = (0..64)
            .filter_map(|_| spawner.spawn(&mut Grid::default()).map(|(_, c)| c))
            .collect::<Vec<_>>();
        assert!(cards.contains(&2));
        assert!(cards.contains(&4));
    }
}
