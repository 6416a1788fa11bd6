use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, GameCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(GameCommand),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Command(GameCommand::Restart),
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Command(GameCommand::Resume),

            _ => KeyAction::None,
        }
    }
}

fn turn(direction: Direction) -> KeyAction {
    KeyAction::Command(GameCommand::Turn(direction))
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
