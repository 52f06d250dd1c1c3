use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::renderer::camera::Camera;

/// Fly-through controls: WASD to move, Space/Shift to rise and sink, any
/// mouse button held to look around, wheel to zoom.
pub struct CameraController {
    movement_speed: f32,
    look_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            movement_speed: 1.5,
            look_sensitivity: 0.2,
            zoom_sensitivity: 1.0,
        }
    }

    pub fn process_input(
        &self,
        input_state: &InputState,
        camera: &mut Camera,
        delta_time: f32,
    ) {
        let step = self.movement_speed * delta_time;
        let moves = [
            (KeyCode::KeyW, camera.get_front()),
            (KeyCode::KeyS, -camera.get_front()),
            (KeyCode::KeyA, -camera.get_right()),
            (KeyCode::KeyD, camera.get_right()),
            (KeyCode::Space, camera.get_up()),
            (KeyCode::ShiftLeft, -camera.get_up()),
        ];
        let mut position = camera.get_position();
        for (key, direction) in moves {
            if input_state.is_key_down(key) {
                position += direction * step;
            }
        }
        camera.set_position(position);

        if input_state.is_any_mouse_button_down() {
            let delta = input_state.mouse_delta * self.look_sensitivity;
            camera.set_yaw(camera.get_yaw() + delta.x);
            camera.set_pitch(camera.get_pitch() - delta.y);
        }

        if input_state.mouse_wheel_delta_y != 0.0 {
            camera.set_fov(camera.get_fov() - input_state.mouse_wheel_delta_y * self.zoom_sensitivity);
        }
    }
}
