// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::collections::{HashMap, VecDeque};

use dame_client::coord::{Coord, NUM_COLS, NUM_SQUARES};
use dame_client::protocol::DameRequest;
use serde_json::{Value, json};


pub const STARTING_BOARD: &str = "
    . b . b . b . b
    b . b . b . b .
    . b . b . b . b
    . . . . . . . .
    . . . . . . . .
    w . w . w . w .
    . w . w . w . w
    w . w . w . w .
";

#[allow(dead_code)]
pub fn coord(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }

fn cell_name(ch: char) -> Result<&'static str, String> {
    Ok(match ch {
        '.' => "Empty",
        'w' => "WhiteNormal",
        'W' => "WhiteDame",
        'b' => "BlackNormal",
        'B' => "BlackDame",
        _ => return Err(format!("Invalid cell: {}", ch)),
    })
}

// Parses a board drawn with rank 8 on top into the server's row-major cell list.
pub fn parse_board(board_str: &str) -> Result<Vec<&'static str>, String> {
    let rows: Vec<Vec<char>> = board_str
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().flat_map(|s| s.chars()).collect())
        .collect();
    if rows.len() != NUM_COLS as usize || rows.iter().any(|row| row.len() != NUM_COLS as usize) {
        return Err(format!("Expected an 8x8 board, got {:?}", rows));
    }
    let mut cells = vec!["Empty"; NUM_SQUARES];
    for (y, row) in rows.iter().rev().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            cells[y * NUM_COLS as usize + x] = cell_name(ch)?;
        }
    }
    Ok(cells)
}


// In-process stand-in for the game server. It knows nothing about checkers: tests decide which
// moves are valid and what the next board looks like.
pub struct FakeServer {
    pub uid: String,
    move_no: u32,
    board: Vec<&'static str>,
    next_move: &'static str,
    winner: &'static str,
    queued_states: VecDeque<Value>,
    valid_moves: HashMap<Coord, Vec<Coord>>,
    failing: bool,
    pub received: Vec<String>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn new() -> Self {
        FakeServer {
            uid: "3f1c2d9e-game".to_owned(),
            move_no: 0,
            board: parse_board(STARTING_BOARD).unwrap(),
            next_move: "Black",
            winner: "None",
            queued_states: VecDeque::new(),
            valid_moves: HashMap::new(),
            failing: false,
            received: vec![],
        }
    }

    pub fn move_no(&self) -> u32 { self.move_no }

    pub fn set_valid_moves(&mut self, from: &str, to: &[&str]) {
        self.valid_moves.insert(coord(from), to.iter().map(|s| coord(s)).collect());
    }

    pub fn set_failing(&mut self, failing: bool) { self.failing = failing; }

    // Queues a new state, as if a player (usually the AI) moved.
    pub fn push_state(
        &mut self, last_moves: Value, board_str: &str, next_move: &'static str,
        winner: &'static str,
    ) {
        self.move_no += 1;
        self.board = parse_board(board_str).unwrap();
        self.next_move = next_move;
        self.winner = winner;
        let state = self.state_json(last_moves);
        self.queued_states.push_back(state);
    }

    // Queues a raw poll body, for malformed or partial responses.
    pub fn push_raw(&mut self, body: Value) { self.queued_states.push_back(body); }

    fn state_json(&self, last_moves: Value) -> Value {
        json!({
            "positions": [],
            "board": self.board,
            "next_move": self.next_move,
            "valid_pieces_to_move": [],
            "winner": self.winner,
            "last_moves": last_moves,
            "move_no": self.move_no,
        })
    }

    pub fn handle(&mut self, request: &DameRequest) -> Result<String, String> {
        self.received.push(request.to_string());
        if self.failing {
            return Err("500 Internal Server Error".to_owned());
        }
        let body = match request {
            DameRequest::NewGame { white, black } => {
                let mut state = self.state_json(json!([]));
                state["uid"] = json!(self.uid);
                state["player_white"] = json!(white.as_str());
                state["player_black"] = json!(black.as_str());
                state
            }
            DameRequest::Poll { .. } => self.queued_states.pop_front().unwrap_or_else(|| json!({})),
            DameRequest::Select { from, .. } => {
                let moves = self.valid_moves.get(from).cloned().unwrap_or_default();
                json!({ "valid_moves": moves })
            }
            DameRequest::Move { from, to, .. } => {
                // Apply blindly: legality is not the client's concern.
                let piece = self.board[from.to_index()];
                self.board[from.to_index()] = "Empty";
                self.board[to.to_index()] = piece;
                self.next_move = if self.next_move == "White" { "Black" } else { "White" };
                self.move_no += 1;
                let moved = json!([[from.x(), from.y(), to.x(), to.y()]]);
                let state = self.state_json(moved);
                self.queued_states.push_back(state.clone());
                state
            }
        };
        Ok(body.to_string())
    }
}
