// Client controller. Owns the whole client-side game state, but performs no I/O: requests are
// queued for the host to execute, and the host feeds response bodies (or failures) back.
// Time is passed in explicitly, so the host decides how often things advance.

use std::collections::VecDeque;
use std::fmt;

use instant::Instant;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::animation::{ActiveAnimation, PlannedAnimation};
use crate::board::{BoardSnapshot, PieceId, PieceMap};
use crate::coord::Coord;
use crate::protocol::{DameRequest, NewGameResponse, PollResponse, SelectResponse};
use crate::scheduler::Scheduler;
use crate::session::{Session, SessionId};
use crate::side::{Outcome, PlayerType, Side};
use crate::timing::Timing;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted,
    BoardRedrawn,
    SelectionChanged,
    GameOver(Side),
    RequestFailed,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CommandError {
    GameAlreadyStarted,
    NoGameInProgress,
    NotAwaitingMove,
    NotYourTurn,
    NoPieceAt(Coord),
    NotAMarker(Coord),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::GameAlreadyStarted => write!(f, "A game is already in progress"),
            CommandError::NoGameInProgress => write!(f, "No game in progress"),
            CommandError::NotAwaitingMove => write!(f, "Not accepting moves right now"),
            CommandError::NotYourTurn => write!(f, "It's not your turn"),
            CommandError::NoPieceAt(coord) => write!(f, "No piece on {}", coord),
            CommandError::NotAMarker(coord) => write!(f, "Cannot move to {}", coord),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    MalformedResponse { request: String, message: String },
    UnexpectedResponse(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::MalformedResponse { request, message } => {
                write!(f, "Malformed response to {}: {}", request, message)
            }
            EventError::UnexpectedResponse(message) => {
                write!(f, "Unexpected response: {}", message)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GamePhase {
    Setup,
    AwaitingMove,
    Animating,
    Finished,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnStatus {
    AiThinking,
    // Exactly one side is human and it is to move.
    YourTurn,
    // Both sides are human.
    SideToMove(Side),
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnStatus::AiThinking => write!(f, "AI is thinking ..."),
            TurnStatus::YourTurn => write!(f, "It's your turn."),
            TurnStatus::SideToMove(side) => write!(f, "It's {}'s turn.", side.lowercase_name()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Selection {
    pub piece: PieceId,
    pub from: Coord,
    // Valid destinations, as reported by the server.
    pub markers: Vec<Coord>,
}

#[derive(Clone, Debug)]
struct TargetState {
    board: BoardSnapshot,
    next_move: Side,
    outcome: Outcome,
}

#[derive(Clone, Debug)]
enum Action {
    // Redraw from the server's board once all preceding animations are done.
    ApplySnapshot(Box<TargetState>),
    // Optimistic: sent after the local animation, without waiting for confirmation.
    SendMove { from: Coord, to: Coord },
}


pub struct ClientState {
    timing: Timing,
    session: Option<Session>,
    game_requested: bool,
    pieces: PieceMap,
    next_move: Option<Side>,
    selection: Option<Selection>,
    pending_select: Option<Coord>,
    turn_status: Option<TurnStatus>,
    winner: Option<Side>,
    error_shown: bool,
    poll_in_flight: bool,
    scheduler: Scheduler<Action>,
    outgoing_requests: VecDeque<DameRequest>,
    notable_events: VecDeque<NotableEvent>,
}

impl ClientState {
    pub fn new(timing: Timing) -> Self {
        ClientState {
            timing,
            session: None,
            game_requested: false,
            pieces: PieceMap::new(),
            next_move: None,
            selection: None,
            pending_select: None,
            turn_status: None,
            winner: None,
            error_shown: false,
            poll_in_flight: false,
            scheduler: Scheduler::new(),
            outgoing_requests: VecDeque::new(),
            notable_events: VecDeque::new(),
        }
    }

    pub fn timing(&self) -> &Timing { &self.timing }
    pub fn session(&self) -> Option<&Session> { self.session.as_ref() }
    pub fn pieces(&self) -> &PieceMap { &self.pieces }
    pub fn next_move(&self) -> Option<Side> { self.next_move }
    pub fn selection(&self) -> Option<&Selection> { self.selection.as_ref() }
    pub fn markers(&self) -> &[Coord] {
        self.selection.as_ref().map(|s| s.markers.as_slice()).unwrap_or(&[])
    }
    pub fn turn_status(&self) -> Option<TurnStatus> { self.turn_status }
    pub fn status_text(&self) -> Option<String> { self.turn_status.map(|s| s.to_string()) }
    pub fn spinner_shown(&self) -> bool { self.turn_status == Some(TurnStatus::AiThinking) }
    pub fn winner(&self) -> Option<Side> { self.winner }
    pub fn winner_text(&self) -> Option<String> {
        self.winner.map(|side| format!("{} wins!", side))
    }
    pub fn error_shown(&self) -> bool { self.error_shown }
    pub fn active_animation(&self) -> Option<&ActiveAnimation> { self.scheduler.active_animation() }
    pub fn next_poll(&self) -> Option<Instant> { self.scheduler.poll_scheduled() }

    pub fn phase(&self) -> GamePhase {
        if self.winner.is_some() {
            GamePhase::Finished
        } else if self.session.is_none() {
            GamePhase::Setup
        } else if self.scheduler.is_busy() {
            GamePhase::Animating
        } else {
            GamePhase::AwaitingMove
        }
    }

    pub fn next_outgoing_request(&mut self) -> Option<DameRequest> {
        self.outgoing_requests.pop_front()
    }
    pub fn next_notable_event(&mut self) -> Option<NotableEvent> { self.notable_events.pop_front() }

    pub fn start_game(&mut self, white: PlayerType, black: PlayerType) -> Result<(), CommandError> {
        if self.session.is_some() || self.game_requested {
            return Err(CommandError::GameAlreadyStarted);
        }
        self.game_requested = true;
        self.send(DameRequest::NewGame { white, black });
        Ok(())
    }

    pub fn select_piece(&mut self, coord: Coord) -> Result<(), CommandError> {
        let session_id = self.session_id_for_command()?;
        let Some(piece) = self.pieces.piece_at(coord) else {
            return Err(CommandError::NoPieceAt(coord));
        };
        if Some(piece.piece.side) == self.next_move && self.is_ai(piece.piece.side) {
            return Err(CommandError::NotYourTurn);
        }
        self.clear_selection();
        self.pending_select = Some(coord);
        self.send(DameRequest::Select { session_id, from: coord });
        Ok(())
    }

    pub fn move_piece(&mut self, to: Coord, now: Instant) -> Result<(), CommandError> {
        self.session_id_for_command()?;
        let Some(selection) = &self.selection else {
            return Err(CommandError::NotAMarker(to));
        };
        if !selection.markers.contains(&to) {
            return Err(CommandError::NotAMarker(to));
        }
        let from = selection.from;
        self.scheduler.push_animation(PlannedAnimation::new(from, to, self.timing.local_move));
        self.scheduler.push_action(Action::SendMove { from, to });
        self.run_scheduler(now);
        Ok(())
    }

    // A click on a board square: markers move the selected piece, pieces get selected.
    pub fn click(&mut self, coord: Coord, now: Instant) -> Result<(), CommandError> {
        if self.markers().contains(&coord) {
            self.move_piece(coord, now)
        } else {
            self.select_piece(coord)
        }
    }

    pub fn refresh(&mut self, now: Instant) {
        self.run_scheduler(now);
        if self.scheduler.take_due_poll(now) {
            self.send_poll();
        }
    }

    // Any error is also reported to the user via the error indicator; the return value is
    // for logging.
    pub fn process_response(
        &mut self, request: &DameRequest, body: &str, now: Instant,
    ) -> Result<(), EventError> {
        let result = match request {
            DameRequest::NewGame { .. } => {
                parse_body(request, body).map(|response| self.on_new_game(response))
            }
            DameRequest::Poll { session_id } => parse_body(request, body)
                .and_then(|response| self.on_poll(session_id, response, now)),
            DameRequest::Select { from, .. } => {
                parse_body(request, body).map(|response| self.on_select(*from, response))
            }
            DameRequest::Move { .. } => Ok(()),
        };
        if let Err(err) = &result {
            warn!("{}", err);
            self.show_error();
        }
        result
    }

    pub fn process_failure(&mut self, request: &DameRequest, message: &str) {
        warn!("Request {} failed: {}", request, message);
        match request {
            DameRequest::NewGame { .. } => self.game_requested = false,
            // Not rescheduled: the poll loop ends here.
            DameRequest::Poll { .. } => self.poll_in_flight = false,
            DameRequest::Select { from, .. } => {
                if self.pending_select == Some(*from) {
                    self.pending_select = None;
                }
            }
            DameRequest::Move { .. } => {}
        }
        self.show_error();
    }

    fn on_new_game(&mut self, response: NewGameResponse) {
        let NewGameResponse {
            uid,
            move_no,
            player_white,
            player_black,
            board,
            next_move,
            winner,
        } = response;
        info!(
            "Game {} started: white is {}, black is {}",
            uid,
            player_white.as_str(),
            player_black.as_str()
        );
        self.game_requested = false;
        self.session = Some(Session::new(uid, move_no, player_white, player_black));
        self.notable_events.push_back(NotableEvent::GameStarted);
        self.redraw(&board);
        if self.finish_or_update_status(next_move, winner) {
            self.send_poll();
        }
    }

    fn on_poll(
        &mut self, session_id: &SessionId, response: PollResponse, now: Instant,
    ) -> Result<(), EventError> {
        self.poll_in_flight = false;
        let Some(session) = self.session.as_mut() else {
            return Err(EventError::UnexpectedResponse("poll response without a game".to_owned()));
        };
        if session.id != *session_id {
            return Err(EventError::UnexpectedResponse(format!(
                "poll response for game {}, playing {}",
                session_id, session.id
            )));
        }
        let move_no = match response.move_no {
            Some(n) if n != session.last_move_no => n,
            _ => {
                self.scheduler.schedule_poll(now + self.timing.poll_interval);
                return Ok(());
            }
        };
        let (Some(board), Some(next_move), Some(outcome)) =
            (response.board, response.next_move, response.winner)
        else {
            return Err(EventError::MalformedResponse {
                request: format!("GET /rest/get/{}", session_id),
                message: format!("move {} without full board state", move_no),
            });
        };
        info!(
            "Move {}: {}",
            move_no,
            response.last_moves.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
        );
        session.last_move_no = move_no;
        self.turn_status = None;
        for last_move in response.last_moves {
            self.scheduler.push_animation(PlannedAnimation::new(
                last_move.from,
                last_move.to,
                self.timing.replay_step,
            ));
        }
        self.scheduler.push_action(Action::ApplySnapshot(Box::new(TargetState {
            board,
            next_move,
            outcome,
        })));
        self.run_scheduler(now);
        Ok(())
    }

    fn on_select(&mut self, from: Coord, response: SelectResponse) {
        if self.pending_select != Some(from) {
            debug!("Ignoring outdated selection of {}", from);
            return;
        }
        self.pending_select = None;
        if response.valid_moves.is_empty() {
            return;
        }
        let Some(piece) = self.pieces.piece_at(from) else {
            debug!("Piece on {} is gone, ignoring selection", from);
            return;
        };
        self.selection = Some(Selection {
            piece: piece.id,
            from,
            markers: response.valid_moves,
        });
        self.notable_events.push_back(NotableEvent::SelectionChanged);
    }

    fn run_scheduler(&mut self, now: Instant) {
        while let Some(action) = self.scheduler.next_action(now, &mut self.pieces) {
            match action {
                Action::ApplySnapshot(target) => {
                    let TargetState { board, next_move, outcome } = *target;
                    self.redraw(&board);
                    if self.finish_or_update_status(next_move, outcome) {
                        self.scheduler.schedule_poll(now + self.timing.poll_interval);
                    }
                }
                Action::SendMove { from, to } => {
                    self.clear_selection();
                    let Some(session) = &self.session else {
                        continue;
                    };
                    info!("Moving {}-{}", from, to);
                    let session_id = session.id.clone();
                    self.send(DameRequest::Move { session_id, from, to });
                }
            }
        }
    }

    // Returns whether the game goes on.
    fn finish_or_update_status(&mut self, next_move: Side, outcome: Outcome) -> bool {
        self.next_move = Some(next_move);
        match outcome.winner() {
            Some(side) => {
                info!("{} wins", side);
                self.winner = Some(side);
                self.turn_status = None;
                self.notable_events.push_back(NotableEvent::GameOver(side));
                false
            }
            None => {
                self.turn_status = Some(self.turn_status_for(next_move));
                true
            }
        }
    }

    fn turn_status_for(&self, next_move: Side) -> TurnStatus {
        if self.is_ai(next_move) {
            TurnStatus::AiThinking
        } else if !self.is_ai(next_move.opponent()) {
            TurnStatus::SideToMove(next_move)
        } else {
            TurnStatus::YourTurn
        }
    }

    fn is_ai(&self, side: Side) -> bool { self.session.as_ref().is_some_and(|s| s.is_ai(side)) }

    fn redraw(&mut self, board: &BoardSnapshot) {
        self.pieces = PieceMap::from_snapshot(board);
        self.selection = None;
        self.pending_select = None;
        self.notable_events.push_back(NotableEvent::BoardRedrawn);
    }

    fn clear_selection(&mut self) {
        self.pending_select = None;
        if self.selection.take().is_some() {
            self.notable_events.push_back(NotableEvent::SelectionChanged);
        }
    }

    fn session_id_for_command(&self) -> Result<SessionId, CommandError> {
        let Some(session) = &self.session else {
            return Err(CommandError::NoGameInProgress);
        };
        if self.phase() != GamePhase::AwaitingMove {
            return Err(CommandError::NotAwaitingMove);
        }
        Ok(session.id.clone())
    }

    fn send_poll(&mut self) {
        if self.poll_in_flight || self.winner.is_some() {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        let session_id = session.id.clone();
        self.poll_in_flight = true;
        self.send(DameRequest::Poll { session_id });
    }

    fn send(&mut self, request: DameRequest) {
        debug!("Queued {}", request);
        self.outgoing_requests.push_back(request);
    }

    fn show_error(&mut self) {
        if !self.error_shown {
            self.error_shown = true;
            self.notable_events.push_back(NotableEvent::RequestFailed);
        }
    }
}

fn parse_body<T: DeserializeOwned>(request: &DameRequest, body: &str) -> Result<T, EventError> {
    serde_json::from_str(body).map_err(|err| EventError::MalformedResponse {
        request: request.to_string(),
        message: err.to_string(),
    })
}
