use minimax48::engine::{Board, Direction, Strategy};
use minimax48::error::Result;

use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::renderer::Renderer;

/// Number of moves played by a single batch request.
pub(crate) const BATCH_MOVES: usize = 10;

pub(crate) struct Tui48<R: Renderer, E: EventSource> {
    renderer: R,
    event_source: E,
    board: Board,
}

impl<R: Renderer, E: EventSource> Tui48<R, E> {
    pub(crate) fn new(board: Board, renderer: R, event_source: E) -> Self {
        Self {
            renderer,
            event_source,
            board,
        }
    }

    /// Run consumes the Tui48 instance and drives the game until the player quits.
    pub(crate) fn run(mut self) -> Result<Board> {
        let mut message = String::from("new game");
        loop {
            self.renderer.render(&self.board, &message)?;

            message = match self.event_source.next_event()? {
                Event::UserInput(UserInput::Direction(d)) => self.shift(d),
                Event::UserInput(UserInput::Search(s)) => self.search(s),
                Event::UserInput(UserInput::Batch(s)) => self.batch(s),
                Event::UserInput(UserInput::NewGame) => {
                    self.board.new_game();
                    String::from("new game")
                }
                Event::UserInput(UserInput::Quit) => break,
                Event::Resize => message,
            };

            if self.board.is_terminal() {
                message = format!(
                    "game over! final score {}, highest tile {}",
                    self.board.score(),
                    self.board.highest_tile()
                );
                log::info!("{}", message);
            }
        }
        Ok(self.board)
    }
}

impl<R: Renderer, E: EventSource> Tui48<R, E> {
    fn shift(&mut self, direction: Direction) -> String {
        if self.board.shift(direction) {
            format!("moved {}", direction)
        } else {
            format!("{} does not move anything", direction)
        }
    }

    fn search(&mut self, strategy: Strategy) -> String {
        match self.board.choose_and_apply(strategy) {
            Some(d) => format!(
                "{} moved {} ({} nodes)",
                strategy,
                d,
                self.board.last_stats().nodes
            ),
            None => format!("{} found no move", strategy),
        }
    }

    fn batch(&mut self, strategy: Strategy) -> String {
        let elapsed = self.board.time_batch(strategy, BATCH_MOVES);
        format!(
            "{} played {} moves in {} ms",
            strategy,
            BATCH_MOVES,
            elapsed.as_millis()
        )
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use minimax48::engine::{Card, Grid, SearchConfig};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    struct Script(VecDeque<Event>);

    impl EventSource for Script {
        fn next_event(&mut self) -> Result<Event> {
            Ok(self
                .0
                .pop_front()
                .unwrap_or(Event::UserInput(UserInput::Quit)))
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Renderer for &mut Recorder {
        fn render(&mut self, _board: &Board, message: &str) -> Result<()> {
            self.0.push(message.to_string());
            Ok(())
        }
    }

    fn board(slots: [[Card; 4]; 4]) -> Board {
        Board::from_grid(
            Grid::from(slots),
            SmallRng::seed_from_u64(42),
            SearchConfig::new(2).expect("depth is positive"),
        )
    }

    #[test]
    fn scripted_session() {
        let events = VecDeque::from(vec![
            Event::UserInput(UserInput::Direction(Direction::Up)),
            Event::UserInput(UserInput::Direction(Direction::Down)),
            Event::UserInput(UserInput::Search(Strategy::AlphaBeta)),
            Event::Resize,
            Event::UserInput(UserInput::Batch(Strategy::Minimax)),
        ]);
        let mut recorder = Recorder::default();
        let board = board([[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let board = Tui48::new(board, &mut recorder, Script(events))
            .run()
            .expect("scripted session runs");

        assert_eq!(recorder.0[0], "new game");
        assert_eq!(recorder.0[1], "up does not move anything");
        assert_eq!(recorder.0[2], "moved down");
        assert!(recorder.0[3].starts_with("alpha-beta moved"));
        assert_eq!(recorder.0[4], recorder.0[3]);
        assert!(recorder.0[5].starts_with("minimax played 10 moves"));
        assert!(board.timings().minimax_last.is_some());
        assert!(board.timings().alpha_beta_last.is_some());
    }

    #[test]
    fn reports_game_over() {
        // Left leaves a single gap; whether the spawned card ends the game depends on its value
        let board = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [0, 8, 16, 32]]);
        let events = VecDeque::from(vec![Event::UserInput(UserInput::Direction(
            Direction::Left,
        ))]);
        let mut recorder = Recorder::default();
        let board = Tui48::new(board, &mut recorder, Script(events))
            .run()
            .expect("scripted session runs");
        if board.is_terminal() {
            assert!(recorder.0[1].starts_with("game over!"));
        } else {
            assert_eq!(recorder.0[1], "moved left");
        }
    }
}
