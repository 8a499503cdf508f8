use std::io::Write;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrossTermEvent, KeyCode, KeyEvent, KeyEventKind},
    style, terminal, ExecutableCommand, QueueableCommand,
};

use minimax48::engine::{Board, Direction, Idx, Strategy};
use minimax48::error::Result;

use super::events::{Event, EventSource, UserInput};
use super::renderer::Renderer;

const TILE_WIDTH: usize = 7;

const HELP: &str =
    "arrows/hjkl/wasd move | m minimax | b alpha-beta | M/B ten moves | n new game | q quit";

pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(cursor::Hide)?;
        Ok(Self { w })
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        self.w.execute(cursor::Show).expect("showing cursor");
        self.w
            .execute(terminal::LeaveAlternateScreen)
            .expect("leaving alternate screen");
        terminal::disable_raw_mode().expect("disabling raw mode");
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn render(&mut self, board: &Board, message: &str) -> Result<()> {
        let timings = board.timings();
        let mut lines = vec![
            format!("Score: {}", board.score()),
            format!("Highest Tile: {}", board.highest_tile()),
            format!(
                "Minimax: {} ms | Alpha-Beta: {} ms",
                millis(timings.minimax_last),
                millis(timings.alpha_beta_last)
            ),
            format!(
                "Total Minimax Time: {} ms",
                timings.total(Strategy::Minimax).as_millis()
            ),
            format!(
                "Total Alpha-Beta Time: {} ms",
                timings.total(Strategy::AlphaBeta).as_millis()
            ),
            String::new(),
        ];

        let (width, height) = board.dimensions();
        let border = format!("+{}+", "-".repeat(width * TILE_WIDTH));
        lines.push(border.clone());
        for y in 0..height {
            let row = (0..width)
                .map(|x| match board.grid().get(&Idx(x, y)) {
                    0 => format!("{:^w$}", ".", w = TILE_WIDTH),
                    card => format!("{:^w$}", card, w = TILE_WIDTH),
                })
                .collect::<String>();
            lines.push(format!("|{}|", row));
        }
        lines.push(border);
        lines.push(String::new());
        lines.push(message.to_string());
        lines.push(HELP.to_string());

        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        self.w.queue(terminal::Clear(terminal::ClearType::All))?;
        for (y, line) in lines.iter().enumerate() {
            self.w.queue(cursor::MoveTo(0, y as u16))?;
            self.w.queue(style::Print(line))?;
        }
        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }
}

fn millis(d: Option<Duration>) -> u128 {
    d.map_or(0, |d| d.as_millis())
}

#[derive(Default)]
pub(crate) struct CrosstermEvents {}

impl EventSource for CrosstermEvents {
    /// Block until the next Crossterm event the game cares about.
    fn next_event(&mut self) -> Result<Event> {
        loop {
            match event::read()? {
                CrossTermEvent::Key(ke) => match handle_key_event(ke) {
                    Some(ui) => return Ok(Event::UserInput(ui)),
                    None => continue,
                },
                CrossTermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            };
        }
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    if ke.kind != KeyEventKind::Press {
        return None;
    }
    match ke.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => {
            Some(UserInput::Direction(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => {
            Some(UserInput::Direction(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => {
            Some(UserInput::Direction(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => {
            Some(UserInput::Direction(Direction::Down))
        }
        KeyCode::Char('m') => Some(UserInput::Search(Strategy::Minimax)),
        KeyCode::Char('b') => Some(UserInput::Search(Strategy::AlphaBeta)),
        KeyCode::Char('M') => Some(UserInput::Batch(Strategy::Minimax)),
        KeyCode::Char('B') => Some(UserInput::Batch(Strategy::AlphaBeta)),
        KeyCode::Char('n') => Some(UserInput::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserInput::Quit),
        _ => None,
    }
}
