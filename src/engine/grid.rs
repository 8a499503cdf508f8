/// Side length of the square grid.
pub const SIZE: usize = 4;

/// Card is the value held by a single slot; 0 means the slot is empty.
pub type Card = u32;

/// Direction represents a move of every tile on the grid towards one edge.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// The order in which directions are tried by the search; earlier directions win ties.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Left => "left",
            Self::Right => "right",
            Self::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// Idx is the (x, y) coordinate of a slot, where x is the column and y the row.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Idx(pub usize, pub usize);

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gidx({0},{1})", self.0, self.1)
    }
}

impl Idx {
    pub fn x(&self) -> usize {
        self.0
    }

    pub fn y(&self) -> usize {
        self.1
    }
}

/// Grid is a 4x4 board of cards. It is a plain value: copying it yields an independent board.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Grid {
    slots: [[Card; SIZE]; SIZE],
}

impl From<[[Card; SIZE]; SIZE]> for Grid {
    fn from(slots: [[Card; SIZE]; SIZE]) -> Self {
        Self { slots }
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.slots {
            for card in row {
                match card {
                    0 => write!(f, "{:>6}", ".")?,
                    c => write!(f, "{:>6}", c)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid {
    pub fn get(&self, idx: &Idx) -> Card {
        *self
            .slots
            .get(idx.y())
            .unwrap_or_else(|| panic!("invalid y coordinate {}", idx.y()))
            .get(idx.x())
            .unwrap_or_else(|| panic!("invalid x coordinate {}", idx.x()))
    }

    pub fn set(&mut self, idx: &Idx, value: Card) {
        let rf = self
            .slots
            .get_mut(idx.y())
            .unwrap_or_else(|| panic!("invalid y coordinate {}", idx.y()))
            .get_mut(idx.x())
            .unwrap_or_else(|| panic!("invalid x coordinate {}", idx.x()));
        *rf = value;
    }

    pub fn rows(&self) -> &[[Card; SIZE]; SIZE] {
        &self.slots
    }

    /// Empty slots in row-major order.
    pub fn empty_slots(&self) -> Vec<Idx> {
        self.indices()
            .filter(|idx| self.get(idx) == 0)
            .collect()
    }

    pub fn highest(&self) -> Card {
        self.cards().max().unwrap_or(0)
    }

    /// Heuristic value of the grid: the sum of every card on it.
    pub fn evaluate(&self) -> f64 {
        self.cards().map(f64::from).sum()
    }

    /// A grid is terminal when no move could change it: it has no empty slot and no two
    /// neighbouring slots along either axis hold the same card.
    pub fn is_terminal(&self) -> bool {
        if self.cards().any(|c| c == 0) {
            return false;
        }
        for y in 0..SIZE {
            for x in 0..SIZE - 1 {
                if self.slots[y][x] == self.slots[y][x + 1] {
                    return false;
                }
            }
        }
        for x in 0..SIZE {
            for y in 0..SIZE - 1 {
                if self.slots[y][x] == self.slots[y + 1][x] {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the grid produced by moving in `direction` along with whether anything moved.
    /// `self` is left untouched.
    pub fn simulate(&self, direction: Direction) -> (Grid, bool) {
        let mut next = *self;
        let changed = next.shift(direction);
        (next, changed)
    }

    /// shift slides and merges every line towards the edge named by `direction` and reports
    /// whether any slot changed. Each slot, walked from the edge, either takes the nearest card
    /// behind it when empty or merges with it when equal, and is then left alone. A slot that
    /// received a slid card does not merge again in the same shift.
    pub fn shift(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        let idxs = Indices::new(direction).collect::<Vec<Idx>>();
        for line in idxs.chunks(SIZE) {
            let mut pivot_iter = line.iter();
            let mut pivot_idx = pivot_iter.next().expect("lines are never empty");
            let mut cmp_iter = pivot_iter.clone();
            while let Some(cmp_idx) = cmp_iter.next() {
                let pivot = self.get(pivot_idx);
                let cmp = self.get(cmp_idx);
                if cmp == 0 {
                    continue;
                }
                if pivot == 0 {
                    self.set(pivot_idx, cmp);
                    self.set(cmp_idx, 0);
                    changed = true;
                } else if pivot == cmp {
                    self.set(pivot_idx, pivot + cmp);
                    self.set(cmp_idx, 0);
                    changed = true;
                }
                // the first card found behind the pivot settles it; move on to the next slot
                match pivot_iter.next() {
                    Some(idx) => {
                        pivot_idx = idx;
                        cmp_iter = pivot_iter.clone();
                    }
                    None => break,
                }
            }
        }
        changed
    }
}

// private methods
impl Grid {
    fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().flat_map(|row| row.iter().copied())
    }

    fn indices(&self) -> impl Iterator<Item = Idx> {
        (0..SIZE * SIZE).map(|n| Idx(n % SIZE, n / SIZE))
    }
}

// Indices walks the grid one line at a time, each line starting at the edge tiles move
// towards. Lines are rows for Left/Right and columns for Up/Down.
struct Indices {
    direction: Direction,
    n: usize,
}

impl Indices {
    fn new(direction: Direction) -> Self {
        Indices { direction, n: 0 }
    }
}

impl Iterator for Indices {
    type Item = Idx;

    fn next(&mut self) -> Option<Self::Item> {
        if self.n == SIZE * SIZE {
            return None;
        }
        let (line, pos) = (self.n / SIZE, self.n % SIZE);
        self.n += 1;
        let far = SIZE - 1 - pos;
        Some(match self.direction {
            Direction::Left => Idx(pos, line),
            Direction::Right => Idx(far, line),
            Direction::Up => Idx(line, pos),
            Direction::Down => Idx(line, far),
        })
    }
}
