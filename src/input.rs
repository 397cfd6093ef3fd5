use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::params::{Param, TransformParameters};

/// Keys pressed since the last frame, plus the current modifiers.
#[derive(Default)]
pub struct Input {
    keys_pressed: HashSet<KeyCode>,
    modifiers: ModifiersState,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // Key repeat counts as another press.
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.keys_pressed.insert(key);
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            _ => {}
        }
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.shift_key()
    }
}

/// Keyboard editing of the user-owned transform parameters.
///
/// Tab / Shift+Tab selects a parameter, Up/Down moves it one step,
/// PageUp/PageDown ten steps, and R resets every user-owned field.
#[derive(Debug, Default)]
pub struct ParamControl {
    selected: usize,
}

impl ParamControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Param {
        Param::USER_OWNED[self.selected]
    }

    /// Apply this frame's key presses. Returns true if anything changed.
    pub fn apply(&mut self, input: &Input, params: &mut TransformParameters) -> bool {
        let count = Param::USER_OWNED.len();
        let mut changed = false;

        if input.key_pressed(KeyCode::Tab) {
            self.selected = if input.shift() {
                (self.selected + count - 1) % count
            } else {
                (self.selected + 1) % count
            };
            changed = true;
        }

        let steps = [
            (KeyCode::ArrowUp, 1),
            (KeyCode::ArrowDown, -1),
            (KeyCode::PageUp, 10),
            (KeyCode::PageDown, -10),
        ]
        .iter()
        .filter(|(key, _)| input.key_pressed(*key))
        .map(|(_, steps)| steps)
        .sum::<i32>();

        if steps != 0 {
            let param = self.selected();
            let value = params.nudge(param, steps);
            log::info!("{} = {:.2}", param, value);
            changed = true;
        }

        if input.key_pressed(KeyCode::KeyR) {
            params.reset_user_owned();
            log::info!("parameters reset");
            changed = true;
        }

        changed
    }

    /// Short status line for the window title.
    pub fn status(&self, params: &TransformParameters) -> String {
        let param = self.selected();
        format!("{} = {:.2}", param, params.get(param))
    }
}
