use std::fmt;

use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::side::{PlayerType, Side};


// Opaque game identifier issued by the server (a UUID in practice).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self { SessionId(id) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}


// Everything the client remembers about a running game.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    // Move counter of the last applied snapshot. Snapshots with the same number carry no news.
    pub last_move_no: u32,
    // As confirmed by the server, which may differ from what was requested.
    pub players: EnumMap<Side, PlayerType>,
}

impl Session {
    pub fn new(id: SessionId, move_no: u32, white: PlayerType, black: PlayerType) -> Self {
        Session {
            id,
            last_move_no: move_no,
            players: enum_map! {
                Side::White => white,
                Side::Black => black,
            },
        }
    }

    pub fn is_ai(&self, side: Side) -> bool { self.players[side] == PlayerType::Ai }
}
