use std::fmt;

/// Logical key carried by a `KeyEvent`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    /// Printable character.
    Char(char),
    /// A special or non-printable key was pressed; inspect `key_code`.
    Coded,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Held modifier key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Pointer event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// `None` for plain moves.
    pub button: Option<MouseButton>,
}

impl PointerEvent {
    pub fn moved(x: f32, y: f32) -> Self {
        Self { x, y, button: None }
    }

    pub fn button(x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            x,
            y,
            button: Some(button),
        }
    }
}

/// Normalized keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Option<Key>,
    /// Stable platform code when available.
    pub key_code: Option<u32>,
    pub modifiers: Vec<Modifier>,
    /// True when the event is a key-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    /// Builds an event from the produced text (if any).
    ///
    /// A single printable character becomes `Key::Char`; anything else that
    /// still carries a key code becomes `Key::Coded`.
    pub fn from_text(
        text: Option<&str>,
        key_code: Option<u32>,
        modifiers: Vec<Modifier>,
        repeat: bool,
    ) -> Self {
        let printable = text.and_then(|t| {
            let mut chars = t.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_control() => Some(c),
                _ => None,
            }
        });

        let key = match (printable, key_code) {
            (Some(c), _) => Some(Key::Char(c)),
            (None, Some(_)) => Some(Key::Coded),
            (None, None) => None,
        };

        Self {
            key,
            key_code,
            modifiers,
            repeat,
        }
    }

    #[inline]
    pub fn is_coded(&self) -> bool {
        self.key == Some(Key::Coded)
    }

    pub fn has_modifier(&self, m: Modifier) -> bool {
        self.modifiers.contains(&m)
    }
}

/// Host input routed to a sketch hook.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchEvent {
    MousePressed(PointerEvent),
    MouseReleased(PointerEvent),
    MouseMoved(PointerEvent),
    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Coded => f.write_str("CODED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_text_becomes_char() {
        let ev = KeyEvent::from_text(Some("a"), Some(30), vec![], false);
        assert_eq!(ev.key, Some(Key::Char('a')));
        assert!(!ev.is_coded());
    }

    #[test]
    fn non_printable_becomes_coded_sentinel() {
        let ev = KeyEvent::from_text(None, Some(40), vec![Modifier::Shift], true);
        assert_eq!(ev.key, Some(Key::Coded));
        assert!(ev.has_modifier(Modifier::Shift));
        assert!(ev.repeat);

        let ev = KeyEvent::from_text(Some("\u{1b}"), Some(1), vec![], false);
        assert!(ev.is_coded());
    }

    #[test]
    fn nothing_known_yields_no_key() {
        let ev = KeyEvent::from_text(None, None, vec![], false);
        assert_eq!(ev.key, None);
        assert_eq!(ev.key_code, None);
    }
}
