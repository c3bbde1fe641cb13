//! Shared types and constants.
//!
//! Pure data with no dependencies on the core logic, input handling, or
//! rendering, so every layer can use them freely.
//!
//! # Playfield geometry
//!
//! The grid is `BOARD_WIDTH` columns by `TOTAL_HEIGHT` rows. Only the bottom
//! `BOARD_HEIGHT` rows are visible; the `SPAWN_ROWS` rows above them give
//! pieces room to enter the field. Coordinates are `(x, y)` with x growing
//! right and y growing down, y = 0 being the top hidden row.

/// Playfield width in columns.
pub const BOARD_WIDTH: i8 = 10;

/// Visible playfield height in rows.
pub const BOARD_HEIGHT: i8 = 20;

/// Hidden rows above the visible field where pieces spawn.
pub const SPAWN_ROWS: i8 = 4;

/// Total grid height including the hidden spawn rows.
pub const TOTAL_HEIGHT: i8 = BOARD_HEIGHT + SPAWN_ROWS;

/// Spawn column for new pieces.
pub const SPAWN_X: i8 = BOARD_WIDTH / 2 - 1;

/// Spawn row for new pieces (inside the hidden area).
pub const SPAWN_Y: i8 = SPAWN_ROWS - 2;

/// Fixed timestep for the terminal front end (~60 FPS).
pub const TICK_MS: u32 = 16;

/// Grace period between a piece grounding and committing to the board.
pub const LOCK_DELAY_MS: u32 = 500;

/// Gravity divisor while soft drop is held.
pub const SOFT_DROP_MULTIPLIER: u32 = 20;

/// Lines required to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Level a fresh game starts at.
pub const START_LEVEL: u32 = 1;

/// Upcoming-piece preview depth.
pub const NEXT_QUEUE_LEN: usize = 5;

/// DAS (delayed auto shift) for horizontal movement, in milliseconds.
pub const DAS_MS: u32 = 150;

/// ARR (auto repeat rate) for horizontal movement, in milliseconds.
pub const ARR_MS: u32 = 50;

/// A board cell: 0 is empty, 1-7 is the color index of the kind that
/// occupies it.
pub type Cell = u8;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in catalog order. One full bag is a shuffle of this set.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Color index written into board cells when a piece of this kind locks.
    pub fn color_index(self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }
}

/// Rotation states, clockwise from spawn: North is the spawn orientation,
/// East one clockwise step, South 180 degrees, West one counter-clockwise
/// step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Numeric index 0-3, North first.
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Discrete input actions understood by the engine.
///
/// The mapping from physical keys (including auto-repeat) to these actions
/// lives entirely in the input layer; the engine only ever sees this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    /// Held state: press accelerates gravity, release restores it.
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    /// Starts from attract/game-over, toggles pause while playing.
    StartPause,
    /// Restarts after game over.
    Restart,
}

/// Session status. Drives which actions are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Idle, pre-game. Waiting for StartPause.
    Attract,
    Playing,
    Paused,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_cell_matches_field_geometry() {
        assert_eq!(SPAWN_X, 4);
        assert_eq!(SPAWN_Y, 2);
        assert_eq!(TOTAL_HEIGHT, 24);
    }

    #[test]
    fn rotation_cycle_is_closed() {
        let mut r = Rotation::North;
        for _ in 0..4 {
            r = r.cw();
        }
        assert_eq!(r, Rotation::North);

        assert_eq!(Rotation::North.cw().ccw(), Rotation::North);
        assert_eq!(Rotation::West.cw(), Rotation::North);
    }

    #[test]
    fn color_indices_are_distinct_and_nonzero() {
        let mut seen = [false; 8];
        for kind in PieceKind::ALL {
            let idx = kind.color_index() as usize;
            assert!((1..=7).contains(&idx));
            assert!(!seen[idx], "duplicate color index {}", idx);
            seen[idx] = true;
        }
    }
}
