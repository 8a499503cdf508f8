pub mod board;
pub mod grid;
pub mod search;
pub mod spawn;

pub use board::{Board, Timings};
pub use grid::{Card, Direction, Grid, Idx};
pub use search::{Decision, Search, SearchConfig, SearchStats, Strategy};
