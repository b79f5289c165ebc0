// Browser front-end. JS owns the event loop: on every animation frame it calls `refresh` and
// `update_state`, it performs `fetch` for each outgoing request and feeds the result back, and
// it routes clicks on elements carrying `data-dame-location` to `click`.
//
// Improvement potential. Move fetching into Rust via `wasm-bindgen-futures`.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod web_document;
mod web_element_ext;
pub mod web_error_handling;

use std::collections::HashSet;
use std::str::FromStr;

use dame_client::board::{Piece, PieceKind};
use dame_client::client::{ClientState, GamePhase, NotableEvent};
use dame_client::coord::Coord;
use dame_client::display::{self, BoardOffset, ScreenPos};
use dame_client::protocol::DameRequest;
use dame_client::side::{PlayerType, Side};
use dame_client::timing::Timing;
use enum_map::{EnumMap, enum_map};
use instant::Instant;
use itertools::Itertools;
use wasm_bindgen::prelude::*;
use web_document::{WebDocument, web_document, web_window};
use web_element_ext::WebElementExt;
use web_error_handling::JsResult;


const BOARD_ID: &str = "boxboard";
const PIECE_LAYER_ID: &str = "dame-pieces";
const MARKER_LAYER_ID: &str = "dame-markers";
const LOCATION_ATTR: &str = "data-dame-location";


#[wasm_bindgen]
pub struct JsEventNoop {} // in contrast to `null`, indicates that event list is not over

#[wasm_bindgen]
pub struct JsEventGameStarted {}

#[wasm_bindgen(getter_with_clone)]
pub struct JsEventGameOver {
    pub winner: String,
}

#[wasm_bindgen]
pub struct JsEventRequestFailed {}

// `request` is an opaque token: pass it back to `process_response` or `process_failure`.
#[wasm_bindgen(getter_with_clone)]
pub struct JsOutgoingRequest {
    pub method: String,
    pub path: String,
    pub request: String,
}


#[wasm_bindgen]
pub struct WebClient {
    state: ClientState,
    modes: EnumMap<Side, PlayerType>,
}

#[wasm_bindgen]
impl WebClient {
    pub fn new_client() -> WebClient {
        WebClient {
            state: ClientState::new(Timing::default()),
            modes: enum_map! {
                Side::White => PlayerType::Human,
                Side::Black => PlayerType::Ai,
            },
        }
    }

    pub fn mode(&self, side: &str) -> JsResult<String> {
        Ok(self.modes[parse_side(side)?].as_str().to_owned())
    }

    pub fn set_mode(&mut self, side: &str, mode: &str) -> JsResult<()> {
        if self.state.phase() != GamePhase::Setup {
            return Err(rust_error!("Cannot change players after the game has started"));
        }
        let side = parse_side(side)?;
        self.modes[side] =
            PlayerType::from_str(mode).map_err(|_| rust_error!("Unknown player type: {}", mode))?;
        Ok(())
    }

    // Returns the new mode.
    pub fn toggle_mode(&mut self, side: &str) -> JsResult<String> {
        let new_mode = match self.modes[parse_side(side)?] {
            PlayerType::Human => PlayerType::Ai,
            PlayerType::Ai => PlayerType::Human,
        };
        self.set_mode(side, new_mode.as_str())?;
        Ok(new_mode.as_str().to_owned())
    }

    pub fn start_game(&mut self) -> JsResult<()> {
        self.state
            .start_game(self.modes[Side::White], self.modes[Side::Black])
            .map_err(|err| rust_error!("{}", err))
    }

    // Returns whether the click did anything. Clicks on empty squares or at the wrong time are
    // normal and are not reported as errors.
    pub fn click(&mut self, location: &str) -> JsResult<bool> {
        let coord = Coord::from_algebraic(location).map_err(|err| rust_error!("{}", err))?;
        Ok(self.state.click(coord, Instant::now()).is_ok())
    }

    pub fn next_outgoing_request(&mut self) -> JsResult<Option<JsOutgoingRequest>> {
        let Some(request) = self.state.next_outgoing_request() else {
            return Ok(None);
        };
        Ok(Some(JsOutgoingRequest {
            method: request.method().as_str().to_owned(),
            path: request.path(),
            request: serde_json::to_string(&request).map_err(|err| rust_error!("{}", err))?,
        }))
    }

    pub fn process_response(&mut self, request: &str, body: &str) -> JsResult<()> {
        let request = parse_request(request)?;
        self.state
            .process_response(&request, body, Instant::now())
            .map_err(|err| rust_error!("{}", err))
    }

    pub fn process_failure(&mut self, request: &str, message: &str) -> JsResult<()> {
        let request = parse_request(request)?;
        self.state.process_failure(&request, message);
        Ok(())
    }

    pub fn next_notable_event(&mut self) -> JsValue {
        match self.state.next_notable_event() {
            Some(NotableEvent::GameStarted) => JsEventGameStarted {}.into(),
            Some(NotableEvent::GameOver(side)) => {
                JsEventGameOver { winner: side.lowercase_name().to_owned() }.into()
            }
            Some(NotableEvent::RequestFailed) => JsEventRequestFailed {}.into(),
            Some(NotableEvent::BoardRedrawn | NotableEvent::SelectionChanged) => {
                JsEventNoop {}.into()
            }
            None => JsValue::NULL,
        }
    }

    pub fn refresh(&mut self) { self.state.refresh(Instant::now()); }

    pub fn update_state(&self) -> JsResult<()> {
        let document = web_document()?;
        document.get_existing_element_by_id("error")?.set_displayed(self.state.error_shown())?;
        document
            .get_existing_element_by_id("winner")?
            .set_displayed(self.state.winner().is_some())?;
        document
            .get_existing_element_by_id("winnertxt")?
            .set_text_content(self.state.winner_text().as_deref());
        document
            .query_selector_existing(".statusi")?
            .set_text_content(self.state.status_text().as_deref());
        document.query_selector_existing(".spinning")?.set_displayed(self.state.spinner_shown())?;

        let board_offset = board_offset(&document)?;
        self.update_pieces(&document, board_offset)?;
        self.update_markers(&document, board_offset)?;
        Ok(())
    }
}

impl WebClient {
    fn update_pieces(&self, document: &WebDocument, board_offset: BoardOffset) -> JsResult<()> {
        let now = Instant::now();
        let layer = ensure_layer(document, PIECE_LAYER_ID)?;
        let animation = self.state.active_animation();
        let selected = self.state.selection().map(|s| s.piece);
        let mut shown = HashSet::new();
        for p in self.state.pieces().iter() {
            let (pos, location) = match animation {
                Some(a) if a.step.piece == p.id => {
                    (a.screen_position(board_offset, now), a.current_square(now))
                }
                _ => (display::piece_position(board_offset, p.coord), p.coord),
            };
            let id = p.id.to_string();
            let node = document.ensure_node("div", &id, &layer)?;
            node.set_attribute("class", &piece_classes(p.piece, selected == Some(p.id)))?;
            node.set_attribute(LOCATION_ATTR, &location.to_algebraic())?;
            node.set_attribute("style", &position_style(pos))?;
            // Ids are reassigned on every redraw, so the same node may hold a different piece.
            let has_dame_marker = node.child_element_count() > 0;
            match (p.piece.kind, has_dame_marker) {
                (PieceKind::Dame, false) => {
                    let crown = node.append_new_element("div")?.with_classes(["piece"])?;
                    let dame = crown.append_new_element("div")?.with_classes(["dame"])?;
                    dame.set_text_content(Some("D"));
                }
                (PieceKind::Normal, true) => node.remove_all_children(),
                _ => {}
            }
            shown.insert(id);
        }
        remove_stale_children(&layer, &shown);
        Ok(())
    }

    fn update_markers(&self, document: &WebDocument, board_offset: BoardOffset) -> JsResult<()> {
        let layer = ensure_layer(document, MARKER_LAYER_ID)?;
        let mut shown = HashSet::new();
        for &coord in self.state.markers() {
            let id = marker_id(coord);
            let node = document.ensure_node("div", &id, &layer)?;
            node.set_attribute("class", "possible")?;
            node.set_attribute(LOCATION_ATTR, &coord.to_algebraic())?;
            node.set_attribute(
                "style",
                &position_style(display::marker_position(board_offset, coord)),
            )?;
            shown.insert(id);
        }
        remove_stale_children(&layer, &shown);
        Ok(())
    }
}

fn parse_side(side: &str) -> JsResult<Side> {
    Side::from_name(side).ok_or_else(|| rust_error!("Unknown side: {}", side))
}

fn parse_request(request: &str) -> JsResult<DameRequest> {
    serde_json::from_str(request).map_err(|err| rust_error!("Invalid request token: {}", err))
}

// Document position of the board container, so that overlays stay aligned when scrolled.
fn board_offset(document: &WebDocument) -> JsResult<BoardOffset> {
    let window = web_window()?;
    let rect = document.get_existing_element_by_id(BOARD_ID)?.get_bounding_client_rect();
    Ok(ScreenPos::new(rect.left() + window.scroll_x()?, rect.top() + window.scroll_y()?))
}

fn ensure_layer(document: &WebDocument, id: &str) -> JsResult<web_sys::Element> {
    document.ensure_node("div", id, &document.body()?.into())
}

fn remove_stale_children(layer: &web_sys::Element, keep: &HashSet<String>) {
    let stale =
        layer.child_elements().into_iter().filter(|e| !keep.contains(&e.id())).collect_vec();
    for element in stale {
        element.remove();
    }
}

fn marker_id(coord: Coord) -> String { format!("marker-{}", coord.to_algebraic()) }

fn piece_classes(piece: Piece, selected: bool) -> String {
    let mut classes = vec![piece.side.lowercase_name()];
    if selected {
        classes.push("selected");
    }
    classes.join(" ")
}

fn position_style(pos: ScreenPos) -> String {
    format!("position: absolute; left: {:.1}px; top: {:.1}px;", pos.left, pos.top)
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn classes() {
        let dame = Piece { side: Side::Black, kind: PieceKind::Dame };
        assert_eq!(piece_classes(dame, false), "black");
        assert_eq!(piece_classes(dame, true), "black selected");
    }

    #[test]
    fn marker_style() {
        let coord = Coord::from_algebraic("b3").unwrap();
        let pos = display::marker_position(ScreenPos::new(100.0, 20.0), coord);
        assert_eq!(marker_id(coord), "marker-b3");
        assert_eq!(position_style(pos), "position: absolute; left: 209.4px; top: 387.0px;");
    }
}
