use std::time::Duration;

use blockfall_engine::{Command, GameSession, SessionEvent, SessionState};
use crossterm::event::{Event, KeyCode};
use log::{debug, info};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    tui::{App, RenderMode, Tui},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const TICK_RATE: f64 = 60.0;

const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["↑", "Z"], "Rotate"),
    (&["Q"], "Quit"),
];
const IDLE_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Start"), (&["Q"], "Quit")];

/// Maps a key to a session command.
fn key_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Up | KeyCode::Char('x') => Command::RotateCw,
        KeyCode::Char('z') => Command::RotateCcw,
        KeyCode::Enter | KeyCode::Char('s') => Command::Start,
        _ => return None,
    };
    Some(command)
}

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    pub fn score(&self) -> usize {
        self.session.score()
    }

    fn apply(&mut self, command: Command) {
        for event in self.session.apply(command) {
            match event {
                SessionEvent::PieceLocked {
                    cleared_rows,
                    points,
                } if cleared_rows > 0 => {
                    info!("cleared {cleared_rows} rows for {points} points");
                }
                SessionEvent::GameOver => {
                    info!("game over with score {}", self.session.score());
                }
                _ => debug!("{command}: {event:?}"),
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(TICK_RATE);
        tui.set_render_mode(RenderMode::throttled_from_rate(TICK_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.is_exiting = true;
            return;
        }
        let Some(command) = key_command(key.code) else {
            return;
        };
        // A running game is only restarted from the game-over screen.
        if command.is_start() && self.session.state().is_playing() {
            return;
        }
        self.apply(command);
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot);
        let bindings = match snapshot.state {
            SessionState::Playing => PLAYING_BINDINGS,
            SessionState::Initial | SessionState::GameOver => IDLE_BINDINGS,
        };

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.apply(Command::Tick(elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_command(KeyCode::Left), Some(Command::MoveLeft));
        assert_eq!(key_command(KeyCode::Up), Some(Command::RotateCw));
        assert_eq!(key_command(KeyCode::Char('z')), Some(Command::RotateCcw));
        assert_eq!(key_command(KeyCode::Char(' ')), Some(Command::HardDrop));
        assert_eq!(key_command(KeyCode::Enter), Some(Command::Start));
        assert_eq!(key_command(KeyCode::Tab), None);
    }
}
