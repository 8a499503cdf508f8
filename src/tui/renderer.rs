use minimax48::engine::Board;
use minimax48::error::Result;

pub(crate) trait Renderer {
    /// Draw the board along with a one-line status message.
    fn render(&mut self, board: &Board, message: &str) -> Result<()>;
}
