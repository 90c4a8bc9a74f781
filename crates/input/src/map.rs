//! Key and mouse mapping from terminal events to player actions.

use crate::types::{Direction, InputAction, Pos};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Cursor direction for a movement key (arrows, hjkl, wasd).
pub fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Direction::Down),
        _ => None,
    }
}

/// Map keyboard input to player actions.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if let Some(dir) = key_direction(key.code) {
        return Some(InputAction::Move(dir));
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(InputAction::Activate),

        // Difficulty for the next restart
        KeyCode::Char(c @ '1'..='3') => Some(InputAction::Difficulty(c as u8 - b'0')),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),

        _ => None,
    }
}

/// Map a mouse event to a click on the cell under the pointer.
///
/// `cell_at` translates terminal coordinates `(column, row)` to a board
/// cell; it comes from whatever view drew the board.
pub fn handle_mouse_event(
    event: MouseEvent,
    cell_at: impl Fn(u16, u16) -> Option<Pos>,
) -> Option<InputAction> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            cell_at(event.column, event.row).map(InputAction::Click)
        }
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_movement_keys() {
        let cases = [
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('h'), Direction::Left),
            (KeyCode::Char('L'), Direction::Right),
            (KeyCode::Char('k'), Direction::Up),
            (KeyCode::Char('J'), Direction::Down),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('S'), Direction::Down),
        ];
        for (code, dir) in cases {
            assert_eq!(
                handle_key_event(KeyEvent::from(code)),
                Some(InputAction::Move(dir)),
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(InputAction::Activate)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(InputAction::Activate)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(InputAction::Restart)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('3'))),
            Some(InputAction::Difficulty(3))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('4'))), None);
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_left_click_maps_through_view() {
        let cell_at = |x: u16, y: u16| {
            (x < 16 && y < 8).then(|| Pos::new(y as u8, (x / 2) as u8))
        };
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), cell_at),
            Some(InputAction::Click(Pos::new(3, 2)))
        );
        // Outside the board.
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 3), cell_at),
            None
        );
        // Other buttons and moves are ignored.
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 5, 3), cell_at),
            None
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, 5, 3), cell_at),
            None
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
