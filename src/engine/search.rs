use super::grid::{Direction, Grid};
use super::spawn::NEW_CARD_CHOICES;
use crate::error::{Error, Result};

/// Search depth used when nothing else is configured.
pub const DEFAULT_DEPTH: usize = 7;

/// Strategy selects how the game tree is explored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum Strategy {
    /// Plain minimax over every branch.
    Minimax,
    /// Minimax with alpha-beta pruning below the root.
    AlphaBeta,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimax => write!(f, "minimax"),
            Self::AlphaBeta => write!(f, "alpha-beta"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchConfig {
    /// `depth` counts the root ply, so it must be at least 1.
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::InvalidDepth(depth));
        }
        Ok(Self { depth })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Decision is the outcome of a root search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Grids visited below the root.
    pub nodes: u64,
}

enum Node {
    Player,
    Adversary,
}

#[derive(Clone, Copy)]
struct Window {
    alpha: f64,
    beta: f64,
}

impl Window {
    fn full() -> Self {
        Self {
            alpha: f64::NEG_INFINITY,
            beta: f64::INFINITY,
        }
    }

    fn closed(&self) -> bool {
        self.alpha >= self.beta
    }
}

/// Search is a depth-first adversarial search over simulated grids. The player picks a
/// direction, the adversary places a 2 or a 4 on any empty slot. Both strategies share this
/// code; alpha-beta only differs in threading a window and cutting off when it closes.
pub struct Search {
    strategy: Strategy,
    config: SearchConfig,
    stats: SearchStats,
}

impl Search {
    pub fn new(strategy: Strategy, config: SearchConfig) -> Self {
        Self {
            strategy,
            config,
            stats: SearchStats::default(),
        }
    }

    /// Statistics collected by the last call to [`Search::decide`].
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Picks the direction with the highest backed-up value. Directions are tried in
    /// [`Direction::SEARCH_ORDER`] and only a strictly better value replaces the current
    /// choice. Returns None when no direction changes the grid.
    ///
    /// The root always scans all four directions: alpha rises as values come in, but beta
    /// stays unbounded so the root itself never cuts off.
    pub fn decide(&mut self, grid: &Grid) -> Option<Decision> {
        self.stats = SearchStats::default();
        let below = self.config.depth.saturating_sub(1);
        let mut window = Window::full();
        let mut best: Option<Decision> = None;

        for direction in Direction::SEARCH_ORDER {
            let (child, changed) = grid.simulate(direction);
            if !changed {
                continue;
            }
            let value = self.value(&child, below, Node::Adversary, window);
            if best.map_or(true, |b| value > b.value) {
                best = Some(Decision { direction, value });
            }
            window.alpha = window.alpha.max(value);
        }

        match &best {
            Some(d) => log::debug!(
                "{} chose {} (value {}, {} nodes, depth {})",
                self.strategy,
                d.direction,
                d.value,
                self.stats.nodes,
                self.config.depth
            ),
            None => log::debug!("{} found no legal move", self.strategy),
        }
        best
    }
}

// private methods
impl Search {
    fn pruning(&self) -> bool {
        self.strategy == Strategy::AlphaBeta
    }

    fn value(&mut self, grid: &Grid, depth: usize, node: Node, window: Window) -> f64 {
        self.stats.nodes += 1;
        if depth == 0 || grid.is_terminal() {
            return grid.evaluate();
        }
        match node {
            Node::Player => self.player(grid, depth, window),
            Node::Adversary => self.adversary(grid, depth, window),
        }
    }

    fn player(&mut self, grid: &Grid, depth: usize, mut window: Window) -> f64 {
        let mut best: Option<f64> = None;
        for direction in Direction::SEARCH_ORDER {
            let (child, changed) = grid.simulate(direction);
            if !changed {
                continue;
            }
            let value = self.value(&child, depth - 1, Node::Adversary, window);
            let running = best.map_or(value, |b| b.max(value));
            best = Some(running);
            if self.pruning() {
                window.alpha = window.alpha.max(running);
                if window.closed() {
                    break;
                }
            }
        }
        // stuck in every direction: score the grid as it stands
        best.unwrap_or_else(|| grid.evaluate())
    }

    fn adversary(&mut self, grid: &Grid, depth: usize, mut window: Window) -> f64 {
        let empty = grid.empty_slots();
        if empty.is_empty() {
            return grid.evaluate();
        }
        let mut worst = f64::INFINITY;
        for idx in empty {
            for card in NEW_CARD_CHOICES {
                let mut child = *grid;
                child.set(&idx, card);
                let value = self.value(&child, depth - 1, Node::Player, window);
                worst = worst.min(value);
                if self.pruning() {
                    window.beta = window.beta.min(worst);
                    if window.closed() {
                        return worst;
                    }
                }
            }
        }
        worst
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    use super::*;
    use crate::engine::grid::Idx;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn search(strategy: Strategy, depth: usize) -> Search {
        Search::new(
            strategy,
            SearchConfig::new(depth).expect("depth is positive"),
        )
    }

    fn random_grid(rng: &mut SmallRng, fill: f64) -> Grid {
        let mut g = Grid::default();
        for y in 0..4 {
            for x in 0..4 {
                if rng.gen_bool(fill) {
                    g.set(&Idx(x, y), 2u32.pow(rng.gen_range(1..6)));
                }
            }
        }
        g
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(matches!(SearchConfig::new(0), Err(Error::InvalidDepth(0))));
        assert_eq!(SearchConfig::default().depth(), DEFAULT_DEPTH);
    }

    #[rstest]
    #[case::minimax(Strategy::Minimax)]
    #[case::alpha_beta(Strategy::AlphaBeta)]
    fn terminal_grid_has_no_decision(#[case] strategy: Strategy) {
        init_logger();
        let g = Grid::from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(search(strategy, 3).decide(&g), None);
    }

    #[rstest]
    #[case::minimax(Strategy::Minimax)]
    #[case::alpha_beta(Strategy::AlphaBeta)]
    fn depth_one_prefers_first_direction_on_ties(#[case] strategy: Strategy) {
        init_logger();
        // every legal move keeps the sum, so the first legal direction in search order wins
        let g = Grid::from([[0, 0, 0, 0], [0, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]]);
        let decision = search(strategy, 1).decide(&g).expect("moves are available");
        assert_eq!(decision.direction, Direction::Up);
        assert_eq!(decision.value, 6.0);
    }

    #[rstest]
    #[case::minimax(Strategy::Minimax)]
    #[case::alpha_beta(Strategy::AlphaBeta)]
    fn skips_directions_that_do_not_move(#[case] strategy: Strategy) {
        init_logger();
        // only Right and Down change this grid
        let g = Grid::from([[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let decision = search(strategy, 1).decide(&g).expect("moves are available");
        assert_eq!(decision.direction, Direction::Right);
    }

    #[test]
    fn adversary_takes_worst_placement() {
        // after the root move the adversary has one slot left; a 2 is worse than a 4
        let g = Grid::from([[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [0, 32, 64, 128]]);
        let decision = search(Strategy::Minimax, 2)
            .decide(&g)
            .expect("Left changes the grid");
        assert_eq!(decision.direction, Direction::Left);
        assert_eq!(decision.value, g.evaluate() + 2.0);
    }

    #[test]
    fn terminal_placements_are_scored_directly() {
        // Left leaves one slot whose every placement ends the game, while Down keeps merges
        // available, so Down backs up a better value at depth 4
        let g = Grid::from([[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [0, 32, 64, 128]]);
        for strategy in [Strategy::Minimax, Strategy::AlphaBeta] {
            let decision = search(strategy, 4).decide(&g).expect("Left and Down move");
            assert_eq!(decision.direction, Direction::Down, "{}", strategy);
            assert_eq!(decision.value, g.evaluate() + 4.0, "{}", strategy);
        }
    }

    #[test]
    fn alpha_beta_matches_minimax() {
        init_logger();
        let mut rng = SmallRng::seed_from_u64(42);
        for depth in 1..=4 {
            for n in 0..12 {
                let fill = if depth == 4 { 0.75 } else { 0.5 };
                let g = random_grid(&mut rng, fill);
                let mut minimax = search(Strategy::Minimax, depth);
                let mut alpha_beta = search(Strategy::AlphaBeta, depth);
                let expected = minimax.decide(&g);
                let actual = alpha_beta.decide(&g);
                assert_eq!(actual, expected, "grid {} at depth {}\n{}", n, depth, g);
                assert!(
                    alpha_beta.last_stats().nodes <= minimax.last_stats().nodes,
                    "pruning visited more nodes at depth {}",
                    depth
                );
            }
        }
    }

    #[test]
    fn alpha_beta_prunes_something() {
        let g = Grid::from([[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 2, 0], [4, 0, 0, 0]]);
        let mut minimax = search(Strategy::Minimax, 3);
        let mut alpha_beta = search(Strategy::AlphaBeta, 3);
        assert_eq!(minimax.decide(&g), alpha_beta.decide(&g));
        assert!(alpha_beta.last_stats().nodes < minimax.last_stats().nodes);
    }
}
