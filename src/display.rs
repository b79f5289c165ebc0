// Mapping from board squares to screen pixels.
//
// The board picture is a fixed-size image; squares are located by a constant affine transform
// relative to the top-left corner of the board container. Rank 8 is at the top.

use derive_new::new;

use crate::coord::{Coord, NUM_ROWS};


const SQUARE_WIDTH: f64 = 63.4;
const SQUARE_HEIGHT: f64 = 63.2;
// Offsets of the top-left corner of square a8 (as the transform sees it) for each element
// kind. Markers are slightly larger than pieces, hence the smaller offset.
const PIECE_OFFSET: ScreenPos = ScreenPos { left: 52.0, top: 56.0 };
const MARKER_OFFSET: ScreenPos = ScreenPos { left: 46.0, top: 51.0 };


// Document coordinates, in pixels.
#[derive(Clone, Copy, PartialEq, Debug, new)]
pub struct ScreenPos {
    pub left: f64,
    pub top: f64,
}

impl ScreenPos {
    // Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`. `t` is clamped.
    pub fn lerp(self, other: ScreenPos, t: f64) -> ScreenPos {
        let t = t.clamp(0.0, 1.0);
        ScreenPos {
            left: self.left + (other.left - self.left) * t,
            top: self.top + (other.top - self.top) * t,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlayKind {
    Piece,
    Marker,
}

// Position of the board container in the document.
pub type BoardOffset = ScreenPos;

pub fn square_position(board_offset: BoardOffset, coord: Coord, kind: OverlayKind) -> ScreenPos {
    let offset = match kind {
        OverlayKind::Piece => PIECE_OFFSET,
        OverlayKind::Marker => MARKER_OFFSET,
    };
    let display_row = (NUM_ROWS - 1 - coord.y()) as f64;
    ScreenPos {
        left: board_offset.left + offset.left + coord.x() as f64 * SQUARE_WIDTH,
        top: board_offset.top + offset.top + display_row * SQUARE_HEIGHT,
    }
}

pub fn piece_position(board_offset: BoardOffset, coord: Coord) -> ScreenPos {
    square_position(board_offset, coord, OverlayKind::Piece)
}

pub fn marker_position(board_offset: BoardOffset, coord: Coord) -> ScreenPos {
    square_position(board_offset, coord, OverlayKind::Marker)
}
