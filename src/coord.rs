use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;
pub const NUM_SQUARES: usize = NUM_ROWS as usize * NUM_COLS as usize;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CoordError {
    OutOfBoard { x: i64, y: i64 },
    BadAlgebraic(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::OutOfBoard { x, y } => write!(f, "square ({}, {}) is off the board", x, y),
            CoordError::BadAlgebraic(s) => write!(f, "cannot parse square \"{}\"", s),
        }
    }
}


// A board square: `x` is the file (0 = 'a'), `y` is the rank (0 = '1'). White starts at low ranks.
//
// On the wire a square is a pair of integers `[x, y]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    pub fn new(x: i64, y: i64) -> Result<Self, CoordError> {
        if (0..NUM_COLS as i64).contains(&x) && (0..NUM_ROWS as i64).contains(&y) {
            Ok(Coord { x: x as u8, y: y as u8 })
        } else {
            Err(CoordError::OutOfBoard { x, y })
        }
    }

    pub fn x(self) -> u8 { self.x }
    pub fn y(self) -> u8 { self.y }

    // Row-major index into a board snapshot.
    pub fn to_index(self) -> usize { self.y as usize * NUM_COLS as usize + self.x as usize }
    pub fn from_index(idx: usize) -> Self {
        assert!(idx < NUM_SQUARES);
        Coord {
            x: (idx % NUM_COLS as usize) as u8,
            y: (idx / NUM_COLS as usize) as u8,
        }
    }

    pub fn all() -> impl Iterator<Item = Self> + Clone { (0..NUM_SQUARES).map(Coord::from_index) }

    pub fn from_algebraic(s: &str) -> Result<Self, CoordError> {
        let bad = || CoordError::BadAlgebraic(s.to_owned());
        let (file, rank) = s.trim().chars().collect_tuple().ok_or_else(bad)?;
        let file = file.to_ascii_lowercase();
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return Err(bad());
        }
        let x = file as i64 - 'a' as i64;
        let y = rank as i64 - '1' as i64;
        Coord::new(x, y).map_err(|_| bad())
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.x) as char, (b'1' + self.y) as char)
    }
}

impl TryFrom<(i64, i64)> for Coord {
    type Error = CoordError;
    fn try_from((x, y): (i64, i64)) -> Result<Self, Self::Error> { Coord::new(x, y) }
}

impl From<Coord> for (i64, i64) {
    fn from(coord: Coord) -> Self { (coord.x as i64, coord.y as i64) }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_algebraic()) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let c = Coord::new(4, 5).unwrap();
        assert_eq!(c.to_index(), 44);
        assert_eq!(Coord::from_index(44), c);
        assert_eq!(Coord::all().count(), NUM_SQUARES);
        assert_eq!(Coord::all().last(), Some(Coord::new(7, 7).unwrap()));
    }

    #[test]
    fn out_of_board() {
        assert!(Coord::new(8, 1).is_err());
        assert!(Coord::new(1, 8).is_err());
        assert!(Coord::new(-1, 3).is_err());
        assert!(Coord::new(3, -1).is_err());
    }

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("a1"), Coord::new(0, 0));
        assert_eq!(Coord::from_algebraic("H8"), Coord::new(7, 7));
        assert_eq!(Coord::from_algebraic(" c3 "), Coord::new(2, 2));
        assert_eq!(Coord::new(1, 5).unwrap().to_algebraic(), "b6");
        assert!(Coord::from_algebraic("i1").is_err());
        assert!(Coord::from_algebraic("a9").is_err());
        assert!(Coord::from_algebraic("a10").is_err());
        assert!(Coord::from_algebraic("").is_err());
    }

    #[test]
    fn wire_format() {
        let c: Coord = serde_json::from_str("[2, 3]").unwrap();
        assert_eq!(c, Coord::new(2, 3).unwrap());
        assert_eq!(serde_json::to_string(&c).unwrap(), "[2,3]");
        assert!(serde_json::from_str::<Coord>("[2, 9]").is_err());
    }
}
