use std::time::Duration;

use derive_new::new;
use instant::Instant;

use crate::board::PieceId;
use crate::coord::Coord;
use crate::display::{BoardOffset, ScreenPos, piece_position};


// A displacement to be shown. The piece is identified by the square it stands on when the
// animation starts: earlier steps in the queue may still move it there.
#[derive(Clone, Copy, PartialEq, Eq, Debug, new)]
pub struct PlannedAnimation {
    pub from: Coord,
    pub to: Coord,
    pub duration: Duration,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AnimationStep {
    pub piece: PieceId,
    pub from: Coord,
    pub to: Coord,
    pub duration: Duration,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActiveAnimation {
    pub step: AnimationStep,
    pub start: Instant,
}

impl ActiveAnimation {
    pub fn end(&self) -> Instant { self.start + self.step.duration }
    pub fn is_finished(&self, now: Instant) -> bool { now >= self.end() }

    // Fraction of the animation completed, in [0, 1].
    pub fn progress(&self, now: Instant) -> f64 {
        if self.step.duration.is_zero() {
            return 1.0;
        }
        if now <= self.start {
            return 0.0;
        }
        let elapsed = now - self.start;
        (elapsed.as_secs_f64() / self.step.duration.as_secs_f64()).min(1.0)
    }

    pub fn screen_position(&self, board_offset: BoardOffset, now: Instant) -> ScreenPos {
        let from = piece_position(board_offset, self.step.from);
        let to = piece_position(board_offset, self.step.to);
        from.lerp(to, self.progress(now))
    }

    // For renderers that cannot draw between squares: the piece jumps halfway through.
    pub fn current_square(&self, now: Instant) -> Coord {
        if self.progress(now) < 0.5 { self.step.from } else { self.step.to }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardSnapshot, CellState, PieceMap};

    #[test]
    fn progress_and_square() {
        let start = Instant::now();
        let from = Coord::from_algebraic("c3").unwrap();
        let to = Coord::from_algebraic("d4").unwrap();
        let mut board = BoardSnapshot::empty();
        board.set_cell(from, CellState::WhiteNormal);
        let piece = PieceMap::from_snapshot(&board).piece_at(from).unwrap().id;
        let animation = ActiveAnimation {
            step: AnimationStep { piece, from, to, duration: Duration::from_millis(200) },
            start,
        };
        assert_eq!(animation.progress(start), 0.0);
        assert_eq!(animation.current_square(start + Duration::from_millis(50)), from);
        assert!((animation.progress(start + Duration::from_millis(100)) - 0.5).abs() < 1e-9);
        assert_eq!(animation.current_square(start + Duration::from_millis(150)), to);
        assert!(!animation.is_finished(start + Duration::from_millis(199)));
        assert!(animation.is_finished(start + Duration::from_millis(200)));
        assert_eq!(animation.progress(start + Duration::from_secs(5)), 1.0);
    }
}
