// Cooperative scheduler for everything that must happen in order: animations, board redraws,
// sending a move after its local animation. Nothing runs by itself; the host calls `refresh`
// on the client regularly and the client pulls ready work from here.

use std::collections::VecDeque;

use instant::Instant;
use log::debug;

use crate::animation::{ActiveAnimation, AnimationStep, PlannedAnimation};
use crate::board::PieceMap;


#[derive(Clone, Debug)]
pub enum Task<A> {
    Animate(PlannedAnimation),
    // Executed by the owner as soon as it reaches the head of the queue.
    Action(A),
}

#[derive(Debug)]
pub struct Scheduler<A> {
    queue: VecDeque<Task<A>>,
    active: Option<ActiveAnimation>,
    poll_at: Option<Instant>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self { Scheduler { queue: VecDeque::new(), active: None, poll_at: None } }

    pub fn push(&mut self, task: Task<A>) { self.queue.push_back(task); }
    pub fn push_animation(&mut self, animation: PlannedAnimation) {
        self.push(Task::Animate(animation));
    }
    pub fn push_action(&mut self, action: A) { self.push(Task::Action(action)); }

    pub fn active_animation(&self) -> Option<&ActiveAnimation> { self.active.as_ref() }
    pub fn is_busy(&self) -> bool { self.active.is_some() || !self.queue.is_empty() }

    // Advances animations up to `now` and returns the next action that is ready to run.
    // Finished animations are committed to `pieces`. Call repeatedly until `None`.
    pub fn next_action(&mut self, now: Instant, pieces: &mut PieceMap) -> Option<A> {
        loop {
            if let Some(active) = self.active {
                if !active.is_finished(now) {
                    return None;
                }
                pieces.relocate(active.step.piece, active.step.to);
                self.active = None;
            }
            match self.queue.pop_front()? {
                Task::Animate(planned) => match pieces.piece_at(planned.from) {
                    Some(piece) => {
                        self.active = Some(ActiveAnimation {
                            step: AnimationStep {
                                piece: piece.id,
                                from: planned.from,
                                to: planned.to,
                                duration: planned.duration,
                            },
                            start: now,
                        });
                    }
                    None => {
                        // Normal when the server echoes a move we have already shown locally.
                        debug!(
                            "No piece on {}, skipping animation to {}",
                            planned.from, planned.to
                        );
                    }
                },
                Task::Action(action) => return Some(action),
            }
        }
    }

    pub fn schedule_poll(&mut self, at: Instant) { self.poll_at = Some(at); }
    pub fn poll_scheduled(&self) -> Option<Instant> { self.poll_at }

    // Returns true once per scheduled poll, when it is due.
    pub fn take_due_poll(&mut self, now: Instant) -> bool {
        match self.poll_at {
            Some(at) if at <= now => {
                self.poll_at = None;
                true
            }
            _ => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::{BoardSnapshot, CellState};
    use crate::coord::Coord;

    fn coord(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }
    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    fn single_piece_map(at: &str) -> PieceMap {
        let mut board = BoardSnapshot::empty();
        board.set_cell(coord(at), CellState::BlackNormal);
        PieceMap::from_snapshot(&board)
    }

    #[test]
    fn actions_wait_for_preceding_animations() {
        let t0 = Instant::now();
        let mut pieces = single_piece_map("e5");
        let mut scheduler = Scheduler::new();
        scheduler.push_animation(PlannedAnimation::new(coord("e5"), coord("c3"), ms(300)));
        scheduler.push_animation(PlannedAnimation::new(coord("c3"), coord("a1"), ms(300)));
        scheduler.push_action("redraw");

        assert_eq!(scheduler.next_action(t0, &mut pieces), None);
        assert_eq!(scheduler.active_animation().unwrap().step.to, coord("c3"));

        assert_eq!(scheduler.next_action(t0 + ms(300), &mut pieces), None);
        assert!(pieces.piece_at(coord("c3")).is_some());
        assert_eq!(scheduler.active_animation().unwrap().step.to, coord("a1"));

        assert_eq!(scheduler.next_action(t0 + ms(599), &mut pieces), None);
        assert_eq!(scheduler.next_action(t0 + ms(600), &mut pieces), Some("redraw"));
        assert!(pieces.piece_at(coord("a1")).is_some());
        assert!(!scheduler.is_busy());
    }

    #[test]
    fn missing_piece_is_skipped() {
        let t0 = Instant::now();
        let mut pieces = single_piece_map("e5");
        let mut scheduler = Scheduler::new();
        scheduler.push_animation(PlannedAnimation::new(coord("b2"), coord("c3"), ms(300)));
        scheduler.push_action(1);
        assert_eq!(scheduler.next_action(t0, &mut pieces), Some(1));
        assert!(pieces.piece_at(coord("e5")).is_some());
    }

    #[test]
    fn poll_timer_fires_once() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::<()>::new();
        scheduler.schedule_poll(t0 + ms(250));
        assert!(!scheduler.take_due_poll(t0 + ms(249)));
        assert!(scheduler.take_due_poll(t0 + ms(250)));
        assert!(!scheduler.take_due_poll(t0 + ms(500)));
        assert_eq!(scheduler.poll_scheduled(), None);
    }
}
