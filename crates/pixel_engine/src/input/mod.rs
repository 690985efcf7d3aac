//! Input management system
//!
//! The engine does not own the window or the event loop; the embedder
//! translates platform events into [`KeyCode`]/[`KeyModifiers`] values
//! and feeds them to the game driver, which tracks held keys here and
//! dispatches the press/release hooks to live entities.

use std::collections::HashSet;

/// Key codes delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

bitflags::bitflags! {
    /// Modifier keys held during a key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        /// Either shift key
        const SHIFT = 1 << 0;
        /// Either control key
        const CTRL = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
    }
}

/// Tracks which keys are currently held
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
}

impl InputState {
    /// Create an input state with no keys held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key as pressed or released
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Whether a key is currently held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Number of keys currently held
    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_tracked() {
        let mut input = InputState::new();
        assert!(!input.is_key_down(KeyCode::Space));

        input.set_key(KeyCode::Space, true);
        input.set_key(KeyCode::Left, true);
        assert!(input.is_key_down(KeyCode::Space));
        assert_eq!(input.held_count(), 2);

        input.set_key(KeyCode::Space, false);
        assert!(!input.is_key_down(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Left));
    }

    #[test]
    fn test_release_without_press_is_harmless() {
        let mut input = InputState::new();
        input.set_key(KeyCode::Enter, false);
        assert_eq!(input.held_count(), 0);
    }

    #[test]
    fn test_modifier_flags_combine() {
        let mods = KeyModifiers::SHIFT | KeyModifiers::CTRL;
        assert!(mods.contains(KeyModifiers::SHIFT));
        assert!(!mods.contains(KeyModifiers::ALT));
    }
}
