// Improvement potential. Allow clicking squares with the mouse.

use std::io;
use std::mem;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use crossterm::event::{self as term_event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Stylize};
use crossterm::{cursor, execute, terminal};
use dame_client::client::{ClientState, NotableEvent};
use dame_client::coord::Coord;
use dame_client::protocol::DameRequest;
use dame_client::side::PlayerType;
use dame_client::timing::Timing;
use instant::Instant;
use log::{info, warn};
use scopeguard::defer;

use crate::network::{self, CommunicationError, RestConnection};
use crate::tui;


const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub struct PlayConfig {
    pub server_address: String,
    pub white: PlayerType,
    pub black: PlayerType,
    pub timing: Timing,
}

enum IncomingEvent {
    Network {
        request: DameRequest,
        result: Result<String, CommunicationError>,
    },
    Terminal(term_event::Event),
    Tick,
}

enum InputOutcome {
    Continue,
    Quit,
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl std::fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(
            stdout,
            style::Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1)
        )?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, client_state: &ClientState,
    keyboard_input: &str, command_error: &Option<String>,
) -> io::Result<()> {
    let now = Instant::now();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    if client_state.session().is_some() {
        writeln_raw(stdout, format!("{}\n", tui::render_board(client_state, now)))?;
    } else {
        writeln_raw(stdout, "Starting a new game...\n")?;
    }
    writeln_raw(stdout, tui::render_status(client_state, now, app_start_time))?;
    if client_state.error_shown() {
        writeln_raw(stdout, "Request failed. See the log for details.".with(style::Color::Red))?;
    }

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = now.duration_since(app_start_time).as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    let input_with_cursor = format!("> {}{}", keyboard_input, cursor);
    writeln_raw(stdout, input_with_cursor.with(style::Color::White))?;
    if let Some(err) = command_error {
        writeln_raw(stdout, err.clone().with(style::Color::Red))?;
    }
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}

// Applies one line of user input: a square to click or a slash-command.
fn execute_input(
    client_state: &mut ClientState, input: &str, now: Instant,
) -> (InputOutcome, Option<String>) {
    if let Some(cmd) = input.strip_prefix('/') {
        return match cmd {
            "quit" => (InputOutcome::Quit, None),
            _ => (InputOutcome::Continue, Some(format!("Unknown command: '{}'", cmd))),
        };
    }
    let error = match Coord::from_algebraic(input) {
        Ok(coord) => client_state.click(coord, now).err().map(|err| err.to_string()),
        Err(err) => Some(err.to_string()),
    };
    (InputOutcome::Continue, error)
}

pub fn run(config: PlayConfig) -> anyhow::Result<()> {
    let connection = RestConnection::new(network::server_url(&config.server_address)?);
    info!("Using server {}", connection.server());

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    let (request_tx, request_rx) = mpsc::channel::<DameRequest>();
    // Requests are executed one at a time, in the order the client queued them.
    thread::spawn(move || {
        for request in request_rx {
            let result = connection.execute(&request);
            if tx_net.send(IncomingEvent::Network { request, result }).is_err() {
                break;
            }
        }
    });
    thread::spawn(move || {
        loop {
            match term_event::read() {
                Ok(ev) => {
                    if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("Cannot read terminal input: {}", err);
                    break;
                }
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(TICK_INTERVAL);
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let mut client_state = ClientState::new(config.timing);
    client_state.start_game(config.white, config.black).map_err(|err| anyhow!("{}", err))?;
    let mut keyboard_input = String::new();
    let mut command_error = None;
    for event in rx {
        let now = Instant::now();
        match event {
            IncomingEvent::Network { request, result } => match result {
                Ok(body) => {
                    // Errors are logged and shown by the client itself.
                    let _ = client_state.process_response(&request, &body, now);
                }
                Err(err) => client_state.process_failure(&request, &err.to_string()),
            },
            IncomingEvent::Terminal(term_event::Event::Key(event)) => {
                if event.kind != KeyEventKind::Press {
                    continue;
                }
                match event.code {
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(ch) => {
                        keyboard_input.push(ch);
                    }
                    KeyCode::Backspace => {
                        keyboard_input.pop();
                    }
                    KeyCode::Enter => {
                        let input = mem::take(&mut keyboard_input);
                        let (outcome, error) = execute_input(&mut client_state, input.trim(), now);
                        if let InputOutcome::Quit = outcome {
                            return Ok(());
                        }
                        command_error = error;
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(_) | IncomingEvent::Tick => {
                // Any event triggers repaint, so no additional action is required.
            }
        }
        client_state.refresh(now);
        while let Some(request) = client_state.next_outgoing_request() {
            request_tx.send(request).map_err(|_| anyhow!("Network thread stopped"))?;
        }
        while let Some(event) = client_state.next_notable_event() {
            match event {
                NotableEvent::GameStarted => {
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                NotableEvent::GameOver(side) => {
                    info!("Game over: {} wins", side);
                }
                NotableEvent::BoardRedrawn
                | NotableEvent::SelectionChanged
                | NotableEvent::RequestFailed => {}
            }
        }
        render(&mut stdout, app_start_time, &client_state, &keyboard_input, &command_error)?;
    }
    bail!("Unexpected end of events stream");
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_command() {
        let mut client_state = ClientState::new(Timing::default());
        let (outcome, error) = execute_input(&mut client_state, "/quit", Instant::now());
        assert!(matches!(outcome, InputOutcome::Quit));
        assert_eq!(error, None);
    }

    #[test]
    fn bad_input_is_reported() {
        let mut client_state = ClientState::new(Timing::default());
        let now = Instant::now();
        let (_, error) = execute_input(&mut client_state, "/resign", now);
        assert_eq!(error.unwrap(), "Unknown command: 'resign'");
        let (_, error) = execute_input(&mut client_state, "z9", now);
        assert!(error.is_some());
        let (_, error) = execute_input(&mut client_state, "c3", now);
        assert_eq!(error.unwrap(), "No game in progress");
    }
}
