//! Keyboard shortcuts for choosing the sponge level.

use winit::keyboard::KeyCode;

/// Maps number keys to sponge levels.
///
/// The default binding is `1`–`4` for levels 0–3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelBindings {
    bindings: Vec<(KeyCode, i32)>,
}

impl Default for LevelBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyCode::Digit1, 0),
                (KeyCode::Digit2, 1),
                (KeyCode::Digit3, 2),
                (KeyCode::Digit4, 3),
            ],
        }
    }
}

impl LevelBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `level`, replacing any previous binding for that key.
    pub fn bind(mut self, key: KeyCode, level: i32) -> Self {
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.push((key, level));
        self
    }

    /// The level bound to `key`, if any.
    pub fn level_for(&self, key: KeyCode) -> Option<i32> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, level)| level)
    }

    /// The level requested by the last bound key in `pressed`.
    pub fn requested_level(&self, pressed: &[KeyCode]) -> Option<i32> {
        pressed.iter().rev().find_map(|&key| self.level_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_levels() {
        let bindings = LevelBindings::new();
        assert_eq!(bindings.level_for(KeyCode::Digit1), Some(0));
        assert_eq!(bindings.level_for(KeyCode::Digit4), Some(3));
        assert_eq!(bindings.level_for(KeyCode::Digit5), None);
        assert_eq!(bindings.level_for(KeyCode::KeyW), None);
    }

    #[test]
    fn rebinding_replaces() {
        let bindings = LevelBindings::new()
            .bind(KeyCode::Digit1, 2)
            .bind(KeyCode::Digit5, 4);
        assert_eq!(bindings.level_for(KeyCode::Digit1), Some(2));
        assert_eq!(bindings.level_for(KeyCode::Digit5), Some(4));
    }

    #[test]
    fn last_press_wins() {
        let bindings = LevelBindings::new();
        let pressed = [KeyCode::Digit2, KeyCode::KeyA, KeyCode::Digit3, KeyCode::KeyR];
        assert_eq!(bindings.requested_level(&pressed), Some(2));
        assert_eq!(bindings.requested_level(&[KeyCode::KeyA]), None);
    }
}
