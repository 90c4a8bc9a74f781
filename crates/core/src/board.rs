//! Board module - the gem grid and the pure board algorithms
//!
//! The board is an NxN grid where each cell is empty or holds a gem type.
//! Cells live in a flat row-major vector (`row * size + col`).
//! Row 0 is the top; gravity pulls gems toward increasing row index.
//!
//! The algorithms are free functions that take a board by reference and
//! return a new board, so the engine can keep the pre- and post-step boards
//! side by side while animating between them.

use serde::Serialize;

use crate::rng::GemSource;
use crate::types::{Cell, Gem, Pos, MAX_BOARD_SIZE, MIN_MATCH_LEN};

/// Resampling attempts before generation falls back to a linear scan.
const MAX_RESAMPLES: u32 = 32;

/// The game board - `size` x `size` cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board. `size` is clamped to `1..=MAX_BOARD_SIZE`.
    pub fn new(size: u8) -> Self {
        let size = size.clamp(1, MAX_BOARD_SIZE);
        let len = (size as usize) * (size as usize);
        Self {
            size,
            cells: vec![None; len],
        }
    }

    /// Build a board from rows of cells.
    ///
    /// Returns `None` unless the rows form a non-empty square of supported size.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let size = rows.len();
        if size == 0 || size > MAX_BOARD_SIZE as usize || rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size: size as u8,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a fully occupied board from rows of gem types.
    pub fn from_gems(rows: &[&[Gem]]) -> Option<Self> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().copied().map(Some).collect())
                .collect(),
        )
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some((pos.row as usize) * (self.size as usize) + (pos.col as usize))
    }

    /// Edge length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`; `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Set cell at `pos`; returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells in place; returns false if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Iterate all coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Pos::new(row, col)))
    }

    /// Copy out as rows of cells
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(self.size as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// The union of all matched cells on a board, deduplicated, row-major order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: Vec<Pos>,
}

impl MatchSet {
    pub fn from_cells(mut cells: Vec<Pos>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.binary_search(&pos).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().copied()
    }

    pub fn as_slice(&self) -> &[Pos] {
        &self.cells
    }
}

/// One gem that changes row when a column is compacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallMove {
    pub from: Pos,
    pub to: Pos,
    pub gem: Gem,
}

/// Fill a board with random gems so that no run of three exists.
///
/// Cells are filled row by row, left to right, so only the two cells to the
/// left and the two cells above can complete a run with the candidate.
pub fn generate(size: u8, type_count: u8, rng: &mut impl GemSource) -> Board {
    let mut board = Board::new(size);
    for pos in board.positions().collect::<Vec<_>>() {
        let gem = pick_non_matching(&board, pos, type_count, rng);
        board.set(pos, Some(gem));
    }
    board
}

fn pick_non_matching(board: &Board, pos: Pos, type_count: u8, rng: &mut impl GemSource) -> Gem {
    let completes_run = |gem: Gem| {
        let left = pos.col >= 2
            && board.get(Pos::new(pos.row, pos.col - 1)) == Some(Some(gem))
            && board.get(Pos::new(pos.row, pos.col - 2)) == Some(Some(gem));
        let above = pos.row >= 2
            && board.get(Pos::new(pos.row - 1, pos.col)) == Some(Some(gem))
            && board.get(Pos::new(pos.row - 2, pos.col)) == Some(Some(gem));
        left || above
    };

    let mut gem = rng.next_gem(type_count);
    for _ in 0..MAX_RESAMPLES {
        if !completes_run(gem) {
            return gem;
        }
        gem = rng.next_gem(type_count);
    }

    // At most two types can be forbidden, so with three or more types this
    // always finds one.
    (0..type_count).find(|&g| !completes_run(g)).unwrap_or(gem)
}

/// Walk every maximal run of equal non-empty cells along each row and column.
///
/// `f` receives the run's cells as `(start, len, horizontal)` and returns
/// `true` to stop the scan early.
fn for_each_run(board: &Board, mut f: impl FnMut(Pos, usize, bool) -> bool) -> bool {
    let size = board.size();
    for horizontal in [true, false] {
        for line in 0..size {
            let at = |i: u8| {
                if horizontal {
                    Pos::new(line, i)
                } else {
                    Pos::new(i, line)
                }
            };
            let mut start = 0u8;
            while start < size {
                let cell = board.get(at(start)).flatten();
                let mut end = start + 1;
                while end < size && cell.is_some() && board.get(at(end)).flatten() == cell {
                    end += 1;
                }
                if cell.is_some() && f(at(start), (end - start) as usize, horizontal) {
                    return true;
                }
                start = end;
            }
        }
    }
    false
}

/// Find every cell that belongs to a horizontal or vertical run of 3+.
pub fn find_matches(board: &Board) -> MatchSet {
    let mut cells = Vec::new();
    for_each_run(board, |start, len, horizontal| {
        if len >= MIN_MATCH_LEN {
            for i in 0..len as u8 {
                cells.push(if horizontal {
                    Pos::new(start.row, start.col + i)
                } else {
                    Pos::new(start.row + i, start.col)
                });
            }
        }
        false
    });
    MatchSet::from_cells(cells)
}

/// Early-exit variant of [`find_matches`].
pub fn has_match(board: &Board) -> bool {
    for_each_run(board, |_, len, _| len >= MIN_MATCH_LEN)
}

/// Empty the given cells; everything else is left untouched.
pub fn remove_matches(board: &Board, matched: &MatchSet) -> Board {
    let mut next = board.clone();
    for pos in matched.iter() {
        next.set(pos, None);
    }
    next
}

/// Compact each column downward, preserving order, leaving empties on top.
pub fn drop_gems(board: &Board) -> Board {
    let mut next = Board::new(board.size());
    for mv in column_moves(board) {
        next.set(mv.to, Some(mv.gem));
    }
    next
}

/// The gems that change row under [`drop_gems`].
pub fn fall_moves(board: &Board) -> Vec<FallMove> {
    column_moves(board)
        .into_iter()
        .filter(|mv| mv.from != mv.to)
        .collect()
}

/// Destination of every non-empty cell after gravity, bottom-up per column.
fn column_moves(board: &Board) -> Vec<FallMove> {
    let size = board.size();
    let mut moves = Vec::with_capacity(board.cells().len());
    for col in 0..size {
        let mut write = size;
        for row in (0..size).rev() {
            if let Some(Some(gem)) = board.get(Pos::new(row, col)) {
                write -= 1;
                moves.push(FallMove {
                    from: Pos::new(row, col),
                    to: Pos::new(write, col),
                    gem,
                });
            }
        }
    }
    moves
}

/// Give every empty cell a random gem. No match avoidance here: refills are
/// what makes cascades happen.
pub fn fill_empty(board: &Board, type_count: u8, rng: &mut impl GemSource) -> Board {
    let mut next = board.clone();
    for pos in board.positions() {
        if next.get(pos) == Some(None) {
            next.set(pos, Some(rng.next_gem(type_count)));
        }
    }
    next
}

/// True if swapping some cell with its right or bottom neighbour makes a match.
///
/// Scanning right and down from every cell covers each adjacent pair once.
pub fn has_valid_move(board: &Board) -> bool {
    let size = board.size();
    let mut scratch = board.clone();
    for pos in board.positions() {
        let neighbours = [
            (pos.col + 1 < size).then(|| Pos::new(pos.row, pos.col + 1)),
            (pos.row + 1 < size).then(|| Pos::new(pos.row + 1, pos.col)),
        ];
        for other in neighbours.into_iter().flatten() {
            scratch.swap(pos, other);
            let found = has_match(&scratch);
            scratch.swap(pos, other);
            if found {
                return true;
            }
        }
    }
    false
}
