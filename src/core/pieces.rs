//! Piece catalog: tetromino shapes and SRS wall-kick data.
//!
//! Shapes are given per rotation state as four cell offsets from the piece
//! origin (the top-left of the piece's bounding box). Kick tables hold the
//! published SRS offsets, which use an upward-positive y axis; callers apply
//! a candidate `(dx, dy)` to a grid position as `(x + dx, y - dy)`.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Offset of a single cell relative to the piece origin.
pub type CellOffset = (i8, i8);

/// Shape of a piece in one rotation state: four cell offsets.
pub type PieceShape = [CellOffset; 4];

/// The active falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
}

impl Piece {
    /// A fresh piece at the canonical spawn cell, spawn orientation.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            x: SPAWN_X,
            y: SPAWN_Y,
            rotation: Rotation::North,
        }
    }

    /// Cell offsets for the current rotation state.
    pub fn shape(&self) -> PieceShape {
        shape(self.kind, self.rotation)
    }

    /// Absolute grid coordinates of the four occupied cells.
    pub fn cells(&self) -> [(i8, i8); 4] {
        let mut out = self.shape();
        for cell in &mut out {
            cell.0 += self.x;
            cell.1 += self.y;
        }
        out
    }

    /// The same piece shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Look up the shape for a kind and rotation state.
pub fn shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let table: &[PieceShape; 4] = match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
    };
    table[rotation.index()]
}

// Shapes indexed by rotation: North, East, South, West. The I piece lives in
// a 4x4 box, everything else in 3x3.

const I_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const O_SHAPES: [PieceShape; 4] = [
    [(1, 0), (2, 0), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (2, 1)],
];

const T_SHAPES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_SHAPES: [PieceShape; 4] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_SHAPES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// Ordered kick candidates for a rotation transition, or `None` when the
/// transition is not part of the rotation system (180-degree turns).
///
/// Candidates are tried first-fit; the first offset yielding a valid
/// position wins. Offsets are in SRS y-up convention (see module docs).
pub fn kick_candidates(
    kind: PieceKind,
    from: Rotation,
    to: Rotation,
) -> Option<&'static [CellOffset]> {
    // O is rotationally symmetric on the grid: one zero-offset candidate.
    if kind == PieceKind::O {
        return if transition_index(from, to).is_some() {
            Some(&O_KICKS)
        } else {
            None
        };
    }

    let idx = transition_index(from, to)?;
    let table: &'static [[CellOffset; 5]; 8] = match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    Some(&table[idx])
}

/// Map a (from, to) rotation pair to a kick-table row. Only the eight
/// quarter-turn transitions exist.
fn transition_index(from: Rotation, to: Rotation) -> Option<usize> {
    match (from, to) {
        (Rotation::North, Rotation::East) => Some(0),
        (Rotation::East, Rotation::North) => Some(1),
        (Rotation::East, Rotation::South) => Some(2),
        (Rotation::South, Rotation::East) => Some(3),
        (Rotation::South, Rotation::West) => Some(4),
        (Rotation::West, Rotation::South) => Some(5),
        (Rotation::West, Rotation::North) => Some(6),
        (Rotation::North, Rotation::West) => Some(7),
        _ => None,
    }
}

const O_KICKS: [CellOffset; 1] = [(0, 0)];

/// Kick offsets shared by J, L, S, T and Z, rows in `transition_index`
/// order.
const JLSTZ_KICKS: [[CellOffset; 5]; 8] = [
    // N->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // E->N
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // E->S
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // S->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // S->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // W->S
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // W->N
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // N->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// Kick offsets for the I piece, whose 4-wide box needs larger shifts.
const I_KICKS: [[CellOffset; 5]; 8] = [
    // N->E
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // E->N
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // E->S
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // S->E
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // S->W
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // W->S
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // W->N
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // N->W
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];
