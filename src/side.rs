use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn lowercase_name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    // The server is not consistent about case, so accept any.
    pub fn from_name(name: &str) -> Option<Side> {
        match name.to_ascii_uppercase().as_str() {
            "WHITE" => Some(Side::White),
            "BLACK" => Some(Side::Black),
            _ => None,
        }
    }
}

impl TryFrom<String> for Side {
    type Error = String;
    fn try_from(name: String) -> Result<Self, Self::Error> {
        Side::from_name(&name).ok_or_else(|| format!("unknown side \"{}\"", name))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}


// Who makes the moves for a side. The server runs the AI; humans move through this client.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerType {
    Human,
    Ai,
}

impl PlayerType {
    pub fn as_str(self) -> &'static str { self.into() }
}


// The `winner` field. The server sends "None" until the game is decided.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "String")]
pub enum Outcome {
    Undecided,
    Won(Side),
}

impl TryFrom<String> for Outcome {
    type Error = String;
    fn try_from(name: String) -> Result<Self, Self::Error> {
        if name == "None" {
            Ok(Outcome::Undecided)
        } else {
            Side::from_name(&name)
                .map(Outcome::Won)
                .ok_or_else(|| format!("unknown winner \"{}\"", name))
        }
    }
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Undecided => None,
            Outcome::Won(side) => Some(side),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_names() {
        assert_eq!(serde_json::from_str::<Side>("\"White\"").unwrap(), Side::White);
        assert_eq!(serde_json::from_str::<Side>("\"BLACK\"").unwrap(), Side::Black);
        assert!(serde_json::from_str::<Side>("\"None\"").is_err());
    }

    #[test]
    fn winner_sentinel() {
        assert_eq!(serde_json::from_str::<Outcome>("\"None\"").unwrap(), Outcome::Undecided);
        assert_eq!(
            serde_json::from_str::<Outcome>("\"Black\"").unwrap(),
            Outcome::Won(Side::Black)
        );
        assert!(serde_json::from_str::<Outcome>("\"Nobody\"").is_err());
    }

    #[test]
    fn player_type_names() {
        assert_eq!(PlayerType::Ai.as_str(), "ai");
        assert_eq!("human".parse::<PlayerType>().unwrap(), PlayerType::Human);
        assert_eq!(serde_json::from_str::<PlayerType>("\"ai\"").unwrap(), PlayerType::Ai);
    }
}
