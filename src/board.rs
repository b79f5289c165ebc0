// Read-only view of the server's board. No move rules live here: legality and captures
// are decided by the server, the client only mirrors what it is told.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::{Coord, NUM_SQUARES};
use crate::side::Side;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    WhiteNormal,
    WhiteDame,
    BlackNormal,
    BlackDame,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Normal,
    Dame,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl CellState {
    pub fn piece(self) -> Option<Piece> {
        use PieceKind::*;
        use Side::*;
        let (side, kind) = match self {
            CellState::Empty => return None,
            CellState::WhiteNormal => (White, Normal),
            CellState::WhiteDame => (White, Dame),
            CellState::BlackNormal => (Black, Normal),
            CellState::BlackDame => (Black, Dame),
        };
        Some(Piece { side, kind })
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SnapshotError {
    WrongSize(usize),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::WrongSize(n) => {
                write!(f, "board has {} cells, expected {}", n, NUM_SQUARES)
            }
        }
    }
}


// 64 cells in row-major order: index = y * 8 + x.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellState>", into = "Vec<CellState>")]
pub struct BoardSnapshot {
    cells: Vec<CellState>,
}

impl BoardSnapshot {
    pub fn empty() -> Self { BoardSnapshot { cells: vec![CellState::Empty; NUM_SQUARES] } }

    pub fn cell(&self, coord: Coord) -> CellState { self.cells[coord.to_index()] }
    pub fn set_cell(&mut self, coord: Coord, cell: CellState) {
        self.cells[coord.to_index()] = cell;
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|coord| self.cell(coord).piece().map(|piece| (coord, piece)))
    }
}

impl TryFrom<Vec<CellState>> for BoardSnapshot {
    type Error = SnapshotError;
    fn try_from(cells: Vec<CellState>) -> Result<Self, Self::Error> {
        if cells.len() != NUM_SQUARES {
            return Err(SnapshotError::WrongSize(cells.len()));
        }
        Ok(BoardSnapshot { cells })
    }
}

impl From<BoardSnapshot> for Vec<CellState> {
    fn from(board: BoardSnapshot) -> Self { board.cells }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PieceId(u32);

impl PieceId {
    pub fn to_u32(self) -> u32 { self.0 }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "piece-{}", self.0) }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PieceOnBoard {
    pub id: PieceId,
    pub coord: Coord,
    pub piece: Piece,
}

// Pieces currently shown, keyed by id. Rebuilt from scratch on every redraw; between redraws
// only animations move pieces around.
#[derive(Clone, Debug, Default)]
pub struct PieceMap {
    pieces: BTreeMap<PieceId, PieceOnBoard>,
}

impl PieceMap {
    pub fn new() -> Self { Self::default() }

    // Ids are assigned in row-major order, so the same snapshot always yields the same map.
    pub fn from_snapshot(board: &BoardSnapshot) -> Self {
        let pieces = board
            .pieces()
            .zip(0..)
            .map(|((coord, piece), n)| {
                let id = PieceId(n);
                (id, PieceOnBoard { id, coord, piece })
            })
            .collect();
        PieceMap { pieces }
    }

    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }
    pub fn len(&self) -> usize { self.pieces.len() }
    pub fn get(&self, id: PieceId) -> Option<&PieceOnBoard> { self.pieces.get(&id) }
    pub fn iter(&self) -> impl Iterator<Item = &PieceOnBoard> { self.pieces.values() }

    pub fn piece_at(&self, coord: Coord) -> Option<&PieceOnBoard> {
        self.pieces.values().find(|p| p.coord == coord)
    }

    // Moves a piece without any rule checks. Returns false if there is no such piece.
    pub fn relocate(&mut self, id: PieceId, to: Coord) -> bool {
        match self.pieces.get_mut(&id) {
            Some(p) => {
                p.coord = to;
                true
            }
            None => false,
        }
    }
}
