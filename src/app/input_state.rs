use std::collections::HashSet;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Default)]
pub struct InputState {
    pub keys_down: HashSet<KeyCode>,

    pub mouse_curr_pos: Option<Vec2>,
    /// Cursor travel since the last `reset_frame`
    pub mouse_delta: Vec2,
    pub mouse_wheel_delta_y: f32,
    pub mouse_buttons_down: u32,
}

impl InputState {
    pub fn process_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                },
                ..
            } => {
                match state {
                    ElementState::Pressed => self.press_key(*code),
                    ElementState::Released => self.release_key(*code),
                }
            }
            WindowEvent::MouseInput { state, .. } => {
                self.set_mouse_button(*state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved {
                position,
                ..
            } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel {
                delta,
                ..
            } => {
                match delta {
                    MouseScrollDelta::LineDelta(_x, y) => {
                        self.mouse_wheel_delta_y += y.signum();
                    }
                    MouseScrollDelta::PixelDelta(pos) => {
                        self.mouse_wheel_delta_y += pos.y.signum() as f32;
                    }
                }
            }
            WindowEvent::CursorLeft { .. } => {
                // Re-entering elsewhere must not register as one huge jump
                self.mouse_curr_pos = None;
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
                self.mouse_buttons_down = 0;
            }
            _ => {}
        }
    }

    pub fn press_key(&mut self, code: KeyCode) {
        self.keys_down.insert(code);
    }

    pub fn release_key(&mut self, code: KeyCode) {
        self.keys_down.remove(&code);
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.keys_down.contains(&code)
    }

    pub fn set_mouse_button(&mut self, pressed: bool) {
        if pressed {
            self.mouse_buttons_down += 1;
        } else {
            self.mouse_buttons_down = self.mouse_buttons_down.saturating_sub(1);
        }
    }

    pub fn is_any_mouse_button_down(&self) -> bool {
        self.mouse_buttons_down > 0
    }

    pub fn move_cursor(&mut self, pos: Vec2) {
        if let Some(prev) = self.mouse_curr_pos {
            self.mouse_delta += pos - prev;
        }
        self.mouse_curr_pos = Some(pos);
    }

    /// Reset the input states for the next frame.
    pub fn reset_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.mouse_wheel_delta_y = 0.0;
    }
}
