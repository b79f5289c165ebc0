// Wire contract of the Dame REST server.
//
// Note. The server serializes its whole board state, so responses carry more fields than
// listed here (e.g. `positions`, `valid_pieces_to_move`). Unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::board::BoardSnapshot;
use crate::coord::Coord;
use crate::session::SessionId;
use crate::side::{Outcome, PlayerType, Side};


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str { self.into() }
}


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DameRequest {
    NewGame { white: PlayerType, black: PlayerType },
    Poll { session_id: SessionId },
    Select { session_id: SessionId, from: Coord },
    Move { session_id: SessionId, from: Coord, to: Coord },
}

impl DameRequest {
    pub fn method(&self) -> HttpMethod {
        match self {
            DameRequest::NewGame { .. } | DameRequest::Move { .. } => HttpMethod::Post,
            DameRequest::Poll { .. } | DameRequest::Select { .. } => HttpMethod::Get,
        }
    }

    // Path relative to the server root, always starting with "/rest/".
    pub fn path(&self) -> String {
        match self {
            DameRequest::NewGame { white, black } => {
                format!("/rest/new/{}/{}", white.as_str(), black.as_str())
            }
            DameRequest::Poll { session_id } => format!("/rest/get/{}", session_id),
            DameRequest::Select { session_id, from } => {
                format!("/rest/select/{}/{}/{}", session_id, from.x(), from.y())
            }
            DameRequest::Move { session_id, from, to } => format!(
                "/rest/move/{}/{}/{}/{}/{}",
                session_id,
                from.x(),
                from.y(),
                to.x(),
                to.y()
            ),
        }
    }
}

impl fmt::Display for DameRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}


#[derive(Clone, Debug, Deserialize)]
pub struct NewGameResponse {
    pub uid: SessionId,
    pub move_no: u32,
    pub player_white: PlayerType,
    pub player_black: PlayerType,
    pub board: BoardSnapshot,
    pub next_move: Side,
    pub winner: Outcome,
}

// The server pops one queued board per poll and answers `{}` when the queue is empty,
// hence everything is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PollResponse {
    pub move_no: Option<u32>,
    #[serde(default)]
    pub last_moves: Vec<LastMove>,
    pub board: Option<BoardSnapshot>,
    pub next_move: Option<Side>,
    pub winner: Option<Outcome>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SelectResponse {
    pub valid_moves: Vec<Coord>,
}


// One displacement made since the previous snapshot: `[x, y, dx, dy]`. Some server builds
// prefix the entry with a piece label; pieces are looked up by square anyway, so it is dropped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "WireMove")]
pub struct LastMove {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireMove {
    Plain(i64, i64, i64, i64),
    Labeled(serde_json::Value, i64, i64, i64, i64),
}

impl TryFrom<WireMove> for LastMove {
    type Error = String;
    fn try_from(wire: WireMove) -> Result<Self, Self::Error> {
        let (x, y, dx, dy) = match wire {
            WireMove::Plain(x, y, dx, dy) | WireMove::Labeled(_, x, y, dx, dy) => (x, y, dx, dy),
        };
        Ok(LastMove {
            from: Coord::new(x, y).map_err(|err| err.to_string())?,
            to: Coord::new(dx, dy).map_err(|err| err.to_string())?,
        })
    }
}

impl fmt::Display for LastMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn coord(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }

    #[test]
    fn request_paths() {
        let session_id = SessionId::new("abc".to_owned());
        let new_game = DameRequest::NewGame { white: PlayerType::Human, black: PlayerType::Ai };
        assert_eq!(new_game.to_string(), "POST /rest/new/human/ai");
        let poll = DameRequest::Poll { session_id: session_id.clone() };
        assert_eq!(poll.to_string(), "GET /rest/get/abc");
        let select = DameRequest::Select { session_id: session_id.clone(), from: coord("b6") };
        assert_eq!(select.to_string(), "GET /rest/select/abc/1/5");
        let mv = DameRequest::Move { session_id, from: coord("b6"), to: coord("a5") };
        assert_eq!(mv.to_string(), "POST /rest/move/abc/1/5/0/4");
    }

    #[test]
    fn empty_poll() {
        let poll: PollResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(poll.move_no, None);
        assert!(poll.last_moves.is_empty());
        assert!(poll.board.is_none());
    }

    #[test]
    fn last_moves_with_and_without_label() {
        let poll: PollResponse = serde_json::from_str(indoc! {r#"
            {
                "move_no": 5,
                "last_moves": [[2, 2, 4, 4], ["p", 4, 4, 6, 6]],
                "positions": [[0, 0]],
                "winner": "None"
            }
        "#})
        .unwrap();
        assert_eq!(poll.move_no, Some(5));
        assert_eq!(poll.last_moves, vec![
            LastMove { from: coord("c3"), to: coord("e5") },
            LastMove { from: coord("e5"), to: coord("g7") },
        ]);
        assert_eq!(poll.winner, Some(Outcome::Undecided));
    }

    #[test]
    fn last_move_off_board() {
        assert!(serde_json::from_str::<LastMove>("[7, 7, 8, 8]").is_err());
    }

    #[test]
    fn select_response() {
        let select: SelectResponse =
            serde_json::from_str(r#"{"valid_moves": [[0, 4], [2, 4]]}"#).unwrap();
        assert_eq!(select.valid_moves, vec![coord("a5"), coord("c5")]);
    }
}
