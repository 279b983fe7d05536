//! Tic-tac-toe with strict turn order. The opener plays `X`.

use std::fmt::Display;

use game_types::{GameError, Player, RandomStream};
use mcts::{Game, GameMove, GameState};
use smallvec::SmallVec;

pub const SIZE: usize = 3;

const LINES: [[(usize, usize); SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Swap the top and bottom rows.
    Horizontal,
    /// Swap the left and right columns.
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    grid: [[Option<Player>; SIZE]; SIZE],
    count: u8,
    last: Option<Player>,
}

fn symbol(cell: Option<Player>) -> char {
    match cell {
        Some(Player::First) => 'X',
        Some(Player::Second) => 'O',
        None => '.',
    }
}

impl Position {
    /// Parses rows separated by newlines, cells separated by whitespace:
    /// `X`, `O` or `.`.
    pub fn parse(grid: &str, last: Option<Player>) -> Result<Self, GameError> {
        let rows: Vec<&str> = grid.lines().map(str::trim).filter(|r| !r.is_empty()).collect();
        if rows.len() != SIZE {
            return Err(GameError::Parse(format!("expected {SIZE} rows, got {}", rows.len())));
        }
        let mut position = Self {
            last,
            ..Self::default()
        };
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != SIZE {
                return Err(GameError::Parse(format!(
                    "row {row} has {} cells",
                    cells.len()
                )));
            }
            for (col, cell) in cells.iter().enumerate() {
                let value = match cell.to_ascii_uppercase().as_str() {
                    "X" => Some(Player::First),
                    "O" => Some(Player::Second),
                    "." => None,
                    other => return Err(GameError::Parse(format!("unknown cell '{other}'"))),
                };
                position.grid[row][col] = value;
                position.count += u8::from(value.is_some());
            }
        }
        Ok(position)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.grid.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// The player who moved last, `None` before the first move.
    #[must_use]
    pub fn last(&self) -> Option<Player> {
        self.last
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        usize::from(self.count) == SIZE * SIZE
    }

    pub fn play(&self, player: Player, row: usize, col: usize) -> Result<Self, GameError> {
        if row >= SIZE || col >= SIZE {
            return Err(GameError::OutOfBounds { row, col });
        }
        if self.is_full() {
            return Err(GameError::GameOver);
        }
        if self.last == Some(player) {
            return Err(GameError::OutOfTurn {
                expected: player.opponent(),
                got: player,
            });
        }
        if self.grid[row][col].is_some() {
            return Err(GameError::Occupied { row, col });
        }
        let mut next = *self;
        next.grid[row][col] = Some(player);
        next.count += 1;
        next.last = Some(player);
        Ok(next)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|(row, col)| self.grid[*row][*col].is_none())
    }

    #[must_use]
    pub fn three_in_a_row(&self) -> bool {
        LINES.iter().any(|line| {
            let [a, b, c] = line.map(|(row, col)| self.grid[row][col]);
            a.is_some() && a == b && b == c
        })
    }

    /// Only the last mover can have completed a line.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        if self.count > 4 && self.three_in_a_row() {
            self.last
        } else {
            None
        }
    }

    #[must_use]
    pub fn reflect(&self, axis: Axis) -> Self {
        let mut next = *self;
        for i in 0..SIZE {
            for j in 0..SIZE {
                next.grid[i][j] = match axis {
                    Axis::Horizontal => self.grid[SIZE - 1 - i][j],
                    Axis::Vertical => self.grid[i][SIZE - 1 - j],
                };
            }
        }
        next
    }

    /// Quarter turn clockwise.
    #[must_use]
    pub fn rotate(&self) -> Self {
        let mut next = *self;
        for i in 0..SIZE {
            for j in 0..SIZE {
                next.grid[i][j] = self.grid[SIZE - 1 - j][i];
            }
        }
        next
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| symbol(*cell).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToeMove {
    pub player: Player,
    pub row: usize,
    pub col: usize,
}

impl GameMove for TicTacToeMove {
    fn player(&self) -> Player {
        self.player
    }
}

#[derive(Debug, Clone)]
pub struct TicTacToeState {
    position: Position,
    to_move: Player,
    random: RandomStream,
}

impl TicTacToeState {
    /// Resumes from `position`; the player to move is whoever did not move last.
    #[must_use]
    pub fn from_position(position: Position, seed: u64) -> Self {
        let to_move = position.last().map_or(Player::First, Player::opponent);
        Self {
            position,
            to_move,
            random: RandomStream::new(seed),
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }
}

impl GameState for TicTacToeState {
    type Move = TicTacToeMove;
    type MoveList = SmallVec<TicTacToeMove, 9>;

    fn player(&self) -> Player {
        self.to_move
    }

    fn opener(&self) -> Player {
        Player::First
    }

    fn is_terminal(&self) -> bool {
        self.position.is_full() || self.position.winner().is_some()
    }

    fn winner(&self) -> Option<Player> {
        self.position.winner()
    }

    fn moves(&self, player: Player) -> Result<Self::MoveList, GameError> {
        if player != self.to_move {
            return Err(GameError::OutOfTurn {
                expected: self.to_move,
                got: player,
            });
        }
        if self.is_terminal() {
            return Ok(SmallVec::new());
        }
        Ok(self
            .position
            .empty_cells()
            .map(|(row, col)| TicTacToeMove { player, row, col })
            .collect())
    }

    fn next(&self, mv: &TicTacToeMove) -> Result<Self, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        if mv.player != self.to_move {
            return Err(GameError::OutOfTurn {
                expected: self.to_move,
                got: mv.player,
            });
        }
        Ok(Self {
            position: self.position.play(mv.player, mv.row, mv.col)?,
            to_move: self.to_move.opponent(),
            random: self.random.next(),
        })
    }

    fn random(&self) -> &RandomStream {
        &self.random
    }
}

impl Display for TicTacToeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.position.render().replace('\n', "/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    seed: u64,
}

impl TicTacToe {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Game for TicTacToe {
    type State = TicTacToeState;

    fn start(&self) -> TicTacToeState {
        TicTacToeState::from_position(Position::default(), self.seed)
    }

    fn opener(&self) -> Player {
        Player::First
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts::{Manager, SearchConfig, UniformRollout};

    fn mv(player: Player, row: usize, col: usize) -> TicTacToeMove {
        TicTacToeMove { player, row, col }
    }

    #[test]
    fn opening_moves() {
        let state = TicTacToe::new(0).start();
        assert_eq!(state.player(), Player::First);
        assert_eq!(state.legal_moves().unwrap().len(), 9);
        assert!(!state.is_terminal());
    }

    #[test]
    fn strict_turn_order() {
        let state = TicTacToe::new(0).start();
        assert_eq!(
            state.moves(Player::Second).unwrap_err(),
            GameError::OutOfTurn {
                expected: Player::First,
                got: Player::Second
            }
        );
        assert!(state.next(&mv(Player::Second, 0, 0)).is_err());
    }

    #[test]
    fn occupied_and_out_of_bounds() {
        let state = TicTacToe::new(0).start();
        let state = state.next(&mv(Player::First, 1, 1)).unwrap();
        assert_eq!(
            state.next(&mv(Player::Second, 1, 1)).unwrap_err(),
            GameError::Occupied { row: 1, col: 1 }
        );
        assert_eq!(
            state.next(&mv(Player::Second, 3, 0)).unwrap_err(),
            GameError::OutOfBounds { row: 3, col: 0 }
        );
        assert_eq!(state.legal_moves().unwrap().len(), 8);
    }

    #[test]
    fn top_row_wins() {
        let mut state = TicTacToe::new(0).start();
        for (player, row, col) in [
            (Player::First, 0, 0),
            (Player::Second, 1, 0),
            (Player::First, 0, 1),
            (Player::Second, 1, 1),
            (Player::First, 0, 2),
        ] {
            state = state.next(&mv(player, row, col)).unwrap();
        }
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Player::First));
        assert!(state.legal_moves().unwrap().is_empty());
        assert_eq!(state.next(&mv(Player::Second, 2, 2)).unwrap_err(), GameError::GameOver);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let position = Position::parse("X O X\nX O O\nO X X", Some(Player::First)).unwrap();
        let state = TicTacToeState::from_position(position, 0);
        assert!(state.is_terminal());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn parse_render() {
        let text = "X . O\n. X .\nO . .";
        let position = Position::parse(text, Some(Player::Second)).unwrap();
        assert_eq!(position.render(), text);
        assert_eq!(position.cell(0, 2), Some(Player::Second));
        assert_eq!(position.cell(5, 5), None);
        assert!(Position::parse("X . O\n. X .", None).is_err());
        assert!(Position::parse("X . Q\n. X .\n. . .", None).is_err());
    }

    #[test]
    fn rotate_and_reflect() {
        let position = Position::parse("X X .\n. . .\n. . O", Some(Player::Second)).unwrap();
        assert_eq!(position.rotate().render(), ". . X\n. . X\nO . .");
        let mut turned = position;
        for _ in 0..4 {
            turned = turned.rotate();
        }
        assert_eq!(turned, position);
        assert_eq!(position.reflect(Axis::Horizontal).render(), ". . O\n. . .\nX X .");
        assert_eq!(position.reflect(Axis::Vertical).render(), ". X X\n. . .\nO . .");
    }

    #[test]
    fn search_takes_the_win() {
        let position = Position::parse("X X .\nO O .\n. . .", Some(Player::Second)).unwrap();
        let state = TicTacToeState::from_position(position, 31);
        let mut manager = Manager::new(state, SearchConfig::default(), UniformRollout);
        manager.search().unwrap();
        let choice = manager.best_state();
        assert_eq!(choice.position().cell(0, 2), Some(Player::First));
        assert_eq!(choice.winner(), Some(Player::First));
    }
}
