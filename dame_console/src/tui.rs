// Improvement potential. Interpolate animated pieces between squares instead of jumping
//   halfway through the step.

use console::Style;
use dame_client::board::{Piece, PieceKind};
use dame_client::client::ClientState;
use dame_client::coord::{Coord, NUM_COLS, NUM_ROWS, NUM_SQUARES};
use dame_client::side::Side;
use instant::Instant;
use itertools::Itertools;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SquareContent {
    Empty,
    Piece(Piece),
    Marker,
}

fn piece_to_pictogram(piece: Piece) -> char {
    match (piece.side, piece.kind) {
        (Side::White, PieceKind::Normal) => '⛀',
        (Side::White, PieceKind::Dame) => '⛁',
        (Side::Black, PieceKind::Normal) => '⛂',
        (Side::Black, PieceKind::Dame) => '⛃',
    }
}

// Where pieces are right now, accounting for a running animation.
fn board_contents(client: &ClientState, now: Instant) -> Vec<SquareContent> {
    let mut squares = vec![SquareContent::Empty; NUM_SQUARES];
    for &marker in client.markers() {
        squares[marker.to_index()] = SquareContent::Marker;
    }
    let animation = client.active_animation();
    for p in client.pieces().iter() {
        let coord = match animation {
            Some(a) if a.step.piece == p.id => a.current_square(now),
            _ => p.coord,
        };
        squares[coord.to_index()] = SquareContent::Piece(p.piece);
    }
    squares
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

pub fn render_board(client: &ClientState, now: Instant) -> String {
    let light = Style::new().color256(233).on_color256(230);
    let dark = Style::new().color256(233).on_color256(137);
    let selected = Style::new().color256(233).on_color256(186);
    let selected_from = client.selection().map(|s| s.from);
    let squares = board_contents(client, now);
    let col_header =
        format!("   {}   ", (0..NUM_COLS).map(|x| format_square((b'a' + x) as char)).join(""));
    let mut ret = String::new();
    ret.push_str(&col_header);
    ret.push('\n');
    for y in (0..NUM_ROWS).rev() {
        let rank = format_square((b'1' + y) as char);
        ret.push_str(&rank);
        for x in 0..NUM_COLS {
            let coord = Coord::from_index(usize::from(y) * usize::from(NUM_COLS) + usize::from(x));
            let ch = match squares[coord.to_index()] {
                SquareContent::Empty => ' ',
                SquareContent::Piece(piece) => piece_to_pictogram(piece),
                SquareContent::Marker => '•',
            };
            let style = if Some(coord) == selected_from {
                &selected
            } else if (x + y) % 2 == 0 {
                &dark
            } else {
                &light
            };
            ret.push_str(&style.apply_to(format_square(ch)).to_string());
        }
        ret.push_str(&rank);
        ret.push('\n');
    }
    ret.push_str(&col_header);
    ret
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn render_status(client: &ClientState, now: Instant, app_start_time: Instant) -> String {
    if let Some(winner) = client.winner_text() {
        return Style::new().magenta().bold().apply_to(winner).to_string();
    }
    let Some(status) = client.status_text() else {
        return String::new();
    };
    if client.spinner_shown() {
        let frame = now.duration_since(app_start_time).as_millis() / 150;
        format!("{} {}", status, SPINNER[frame as usize % SPINNER.len()])
    } else {
        status
    }
}


#[cfg(test)]
mod tests {
    use dame_client::timing::Timing;

    use super::*;

    #[test]
    fn empty_board_has_headers_only() {
        console::set_colors_enabled(false);
        let client = ClientState::new(Timing::default());
        let board = render_board(&client, Instant::now());
        let lines = board.lines().collect_vec();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].trim(), "a  b  c  d  e  f  g  h");
        assert!(lines[1].starts_with(" 8 "));
        assert!(lines[8].starts_with(" 1 "));
    }

    #[test]
    fn no_status_before_game() {
        let client = ClientState::new(Timing::default());
        let now = Instant::now();
        assert_eq!(render_status(&client, now, now), "");
    }
}
