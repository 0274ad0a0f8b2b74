use std::collections::HashSet;

use super::types::{Modifier, MouseButton, SketchEvent};

/// Current input state for the sketch window.
///
/// winit does not attach a position to button events or modifiers to key
/// events, so the adapter reads both from here.
#[derive(Debug, Default)]
pub struct InputState {
    /// Held modifier keys in press order.
    pub modifiers: Vec<Modifier>,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn set_modifiers(&mut self, modifiers: Vec<Modifier>) {
        self.modifiers = modifiers;
    }

    /// Folds a translated event into the tracked state.
    pub fn apply(&mut self, event: &SketchEvent) {
        match event {
            SketchEvent::MouseMoved(p) => {
                self.pointer_pos = Some((p.x, p.y));
            }
            SketchEvent::MousePressed(p) => {
                self.pointer_pos = Some((p.x, p.y));
                if let Some(b) = p.button {
                    self.buttons_down.insert(b);
                }
            }
            SketchEvent::MouseReleased(p) => {
                self.pointer_pos = Some((p.x, p.y));
                if let Some(b) = p.button {
                    self.buttons_down.remove(&b);
                }
            }
            SketchEvent::KeyPressed(_) | SketchEvent::KeyReleased(_) => {}
        }
    }

    /// Clears held state when the window loses focus or the pointer leaves.
    pub fn reset_pointer(&mut self) {
        self.pointer_pos = None;
        self.buttons_down.clear();
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer_pos.unwrap_or((0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;

    #[test]
    fn press_release_tracks_buttons() {
        let mut s = InputState::default();
        s.apply(&SketchEvent::MousePressed(PointerEvent::button(3.0, 4.0, MouseButton::Left)));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer(), (3.0, 4.0));

        s.apply(&SketchEvent::MouseReleased(PointerEvent::button(5.0, 6.0, MouseButton::Left)));
        assert!(!s.button_down(MouseButton::Left));
        assert_eq!(s.pointer(), (5.0, 6.0));
    }

    #[test]
    fn reset_clears_pointer() {
        let mut s = InputState::default();
        s.apply(&SketchEvent::MouseMoved(PointerEvent::moved(1.0, 1.0)));
        s.reset_pointer();
        assert_eq!(s.pointer_pos, None);
    }
}
