//! Input state shared between event handlers and the frame tick
//!
//! Browser events only flip entries in a fixed key-state table; the simulation
//! reads the table once per tick.

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Thrust forward
    W,
    /// Strafe left
    A,
    /// Thrust backward
    S,
    /// Strafe right
    D,
    /// Free-look up
    I,
    /// Free-look left
    J,
    /// Free-look down
    K,
    /// Free-look right
    L,
    /// Toggle viewport lock
    V,
}

impl KeyCode {
    pub const ALL: [KeyCode; 9] = [
        KeyCode::W,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::I,
        KeyCode::J,
        KeyCode::K,
        KeyCode::L,
        KeyCode::V,
    ];

    /// Map a DOM `KeyboardEvent.code` to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(KeyCode::W),
            "KeyA" => Some(KeyCode::A),
            "KeyS" => Some(KeyCode::S),
            "KeyD" => Some(KeyCode::D),
            "KeyI" => Some(KeyCode::I),
            "KeyJ" => Some(KeyCode::J),
            "KeyK" => Some(KeyCode::K),
            "KeyL" => Some(KeyCode::L),
            "KeyV" => Some(KeyCode::V),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Fixed table of held keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    active: [bool; KeyCode::ALL.len()],
}

impl KeyboardState {
    pub fn key_down(&mut self, key: KeyCode) {
        self.active[key.index()] = true;
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.active[key.index()] = false;
    }

    pub fn is_active(&self, key: KeyCode) -> bool {
        self.active[key.index()]
    }

    /// Direction from two opposing keys
    pub fn direction(&self, negative: KeyCode, positive: KeyCode) -> Direction {
        Direction::from_opposing(self.is_active(negative), self.is_active(positive))
    }
}

/// Direction resolved from a pair of opposing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Neutral,
    Positive,
}

impl Direction {
    /// Both or neither held cancels out
    pub fn from_opposing(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => Direction::Negative,
            (false, true) => Direction::Positive,
            _ => Direction::Neutral,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Negative => -1.0,
            Direction::Neutral => 0.0,
            Direction::Positive => 1.0,
        }
    }
}

/// Pointer state, position in viewport-local pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub position: Vec2,
    pub primary: bool,
}

/// Everything a render tick reads from the outside world
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Wall-clock timestamp of this tick (ms)
    pub now_ms: f64,
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel() {
        assert_eq!(Direction::from_opposing(true, true), Direction::Neutral);
        assert_eq!(Direction::from_opposing(false, false), Direction::Neutral);
        assert_eq!(Direction::from_opposing(true, false), Direction::Negative);
        assert_eq!(Direction::from_opposing(false, true), Direction::Positive);
    }

    #[test]
    fn test_key_table() {
        let mut keyboard = KeyboardState::default();
        keyboard.key_down(KeyCode::W);
        assert!(keyboard.is_active(KeyCode::W));
        assert_eq!(keyboard.direction(KeyCode::S, KeyCode::W), Direction::Positive);
        keyboard.key_down(KeyCode::S);
        assert_eq!(keyboard.direction(KeyCode::S, KeyCode::W), Direction::Neutral);
        keyboard.key_up(KeyCode::W);
        assert_eq!(keyboard.direction(KeyCode::S, KeyCode::W), Direction::Negative);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(KeyCode::from_code("KeyV"), Some(KeyCode::V));
        assert_eq!(KeyCode::from_code("Space"), None);
    }
}
