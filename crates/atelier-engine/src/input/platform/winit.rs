use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{Key as WinitKey, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::input::{InputState, KeyEvent, Modifier, MouseButton, PointerEvent, SketchEvent};

/// Translates a winit `WindowEvent` into a sketch event.
///
/// Updates `state` for events that only carry context (modifiers, cursor
/// leaving). Returns `None` for events not routed to sketch hooks.
pub fn translate_window_event(
    window: &Window,
    state: &mut InputState,
    event: &WindowEvent,
) -> Option<SketchEvent> {
    let translated = match event {
        WindowEvent::ModifiersChanged(m) => {
            // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
            state.set_modifiers(map_modifiers(m.state()));
            None
        }

        WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => {
            state.reset_pointer();
            None
        }

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(SketchEvent::MouseMoved(PointerEvent::moved(x, y)))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            // winit 0.30 does not expose cursor query; use tracked pointer position.
            let (x, y) = state.pointer();
            let ev = PointerEvent::button(x, y, map_mouse_button(*button));
            Some(match st {
                ElementState::Pressed => SketchEvent::MousePressed(ev),
                ElementState::Released => SketchEvent::MouseReleased(ev),
            })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let text = match &event.logical_key {
                WinitKey::Character(s) => Some(s.as_str()),
                _ => None,
            };
            let key_code = match event.physical_key {
                PhysicalKey::Code(code) => Some(code as u32),
                // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
                PhysicalKey::Unidentified(_) => None,
            };
            let ev = KeyEvent::from_text(text, key_code, state.modifiers.clone(), event.repeat);
            Some(match event.state {
                ElementState::Pressed => SketchEvent::KeyPressed(ev),
                ElementState::Released => SketchEvent::KeyReleased(ev),
            })
        }

        _ => None,
    };

    if let Some(ev) = &translated {
        state.apply(ev);
    }
    translated
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Vec<Modifier> {
    [
        (m.shift_key(), Modifier::Shift),
        (m.control_key(), Modifier::Control),
        (m.alt_key(), Modifier::Alt),
        (m.super_key(), Modifier::Meta),
    ]
    .into_iter()
    .filter_map(|(held, modifier)| held.then_some(modifier))
    .collect()
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}
