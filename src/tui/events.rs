use minimax48::engine::{Direction, Strategy};
use minimax48::error::Result;

pub(crate) trait EventSource {
    fn next_event(&mut self) -> Result<Event>;
}

pub(crate) enum Event {
    UserInput(UserInput),
    Resize,
}

pub(crate) enum UserInput {
    Direction(Direction),
    /// Let the given strategy pick and play one move.
    Search(Strategy),
    /// Let the given strategy play a batch of moves.
    Batch(Strategy),
    NewGame,
    Quit,
}
