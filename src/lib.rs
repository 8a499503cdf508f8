//! Plays 2048 and picks moves with minimax or alpha-beta search.
//!
//! [`engine::Board`] is the entry point for callers: it owns the live grid, spawns cards
//! after real moves and runs either search strategy on demand.

pub mod engine;
pub mod error;
