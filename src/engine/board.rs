use std::time::{Duration, Instant};

use rand::RngCore;

use super::grid::{Card, Direction, Grid, Idx, SIZE};
use super::search::{Search, SearchConfig, SearchStats, Strategy};
use super::spawn::Spawner;

/// Timings accumulates the wall-clock time spent deciding and applying moves per strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timings {
    pub minimax_total: Duration,
    pub alpha_beta_total: Duration,
    pub minimax_last: Option<Duration>,
    pub alpha_beta_last: Option<Duration>,
}

impl Timings {
    fn record(&mut self, strategy: Strategy, elapsed: Duration) {
        match strategy {
            Strategy::Minimax => {
                self.minimax_total += elapsed;
                self.minimax_last = Some(elapsed);
            }
            Strategy::AlphaBeta => {
                self.alpha_beta_total += elapsed;
                self.alpha_beta_last = Some(elapsed);
            }
        }
    }

    pub fn total(&self, strategy: Strategy) -> Duration {
        match strategy {
            Strategy::Minimax => self.minimax_total,
            Strategy::AlphaBeta => self.alpha_beta_total,
        }
    }
}

/// Board represents a live 2048 game: the grid the player sees, the spawner that drops new
/// cards after every real move, and the search used to pick moves automatically.
pub struct Board {
    grid: Grid,
    spawner: Spawner,
    config: SearchConfig,
    timings: Timings,
    last_stats: SearchStats,
}

impl Board {
    /// Initialize a new game using the given random number generator.
    pub fn new(rng: impl RngCore + 'static, config: SearchConfig) -> Self {
        let mut board = Self::from_grid(Grid::default(), rng, config);
        board.new_game();
        board
    }

    /// Resume play from an existing grid; no cards are spawned.
    pub fn from_grid(grid: Grid, rng: impl RngCore + 'static, config: SearchConfig) -> Self {
        Self {
            grid,
            spawner: Spawner::new(rng),
            config,
            timings: Timings::default(),
            last_stats: SearchStats::default(),
        }
    }

    /// Clears the grid, spawns two cards and resets the timings.
    pub fn new_game(&mut self) {
        self.grid = Grid::default();
        self.timings = Timings::default();
        self.spawner.spawn(&mut self.grid);
        self.spawner.spawn(&mut self.grid);
        log::info!("new game\n{}", self.grid);
    }

    /// shift moves the live grid in the given direction. When anything changes a new card is
    /// spawned and true is returned.
    pub fn shift(&mut self, direction: Direction) -> bool {
        let changed = self.grid.shift(direction);
        if changed {
            self.spawner
                .spawn(&mut self.grid)
                .expect("a changed grid always has an empty slot");
        }
        changed
    }

    /// Searches for the best direction with `strategy`, applies it and returns it. Returns None
    /// and leaves the grid alone when no move is possible.
    pub fn choose_and_apply(&mut self, strategy: Strategy) -> Option<Direction> {
        let start = Instant::now();
        let direction = self.decide_and_apply(strategy);
        self.timings.record(strategy, start.elapsed());
        direction
    }

    pub fn choose_and_apply_minimax(&mut self) -> Option<Direction> {
        self.choose_and_apply(Strategy::Minimax)
    }

    pub fn choose_and_apply_alpha_beta(&mut self) -> Option<Direction> {
        self.choose_and_apply(Strategy::AlphaBeta)
    }

    /// Runs `n` decide-and-apply cycles of `strategy` and returns the elapsed time. The batch
    /// ends early once no move is left.
    pub fn time_batch(&mut self, strategy: Strategy, n: usize) -> Duration {
        let start = Instant::now();
        let mut played = 0;
        for _ in 0..n {
            if self.decide_and_apply(strategy).is_none() {
                break;
            }
            played += 1;
        }
        let elapsed = start.elapsed();
        self.timings.record(strategy, elapsed);
        log::debug!("{} played {} of {} moves in {:?}", strategy, played, n, elapsed);
        elapsed
    }

    /// Value of the slot at `row`, `col`.
    pub fn cell_value(&self, row: usize, col: usize) -> Card {
        self.grid.get(&Idx(col, row))
    }

    pub fn is_terminal(&self) -> bool {
        self.grid.is_terminal()
    }

    pub fn highest_tile(&self) -> Card {
        self.grid.highest()
    }

    /// The score shown to players: the sum of every card on the grid.
    pub fn score(&self) -> Card {
        self.grid.rows().iter().flatten().sum()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// The search configuration used by `choose_and_apply` and `time_batch`.
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Statistics of the most recent search run on this board.
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }
}

// private methods
impl Board {
    fn decide_and_apply(&mut self, strategy: Strategy) -> Option<Direction> {
        let mut search = Search::new(strategy, self.config);
        let decision = search.decide(&self.grid);
        self.last_stats = search.last_stats();
        let direction = decision?.direction;
        let changed = self.shift(direction);
        debug_assert!(changed, "search only returns directions that move");
        Some(direction)
    }
}
