//! Translates pointer input into buffered orbit deltas.
//!
//! Unlike an immediate-mode controller, deltas accumulate as events arrive
//! and are applied to the viewport exactly once per paint tick via
//! [`CameraController::flush`], so camera motion participates in the same
//! per-tick cycle as animation and asset resolution.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
};

use super::viewport::Viewport;

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    is_mouse_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            is_mouse_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }

    /// Buffers one device event
    pub fn process_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.pending_zoom += scroll_amount * self.zoom_speed;
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.pending_yaw += -delta.0 as f32 * self.rotate_speed;
                    self.pending_pitch += delta.1 as f32 * self.rotate_speed;
                }
            }
            _ => (),
        }
    }

    /// True if buffered input is waiting to be applied
    pub fn has_pending(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_zoom != 0.0
    }

    /// Applies and clears the buffered deltas; called once per tick
    pub fn flush(&mut self, viewport: &mut Viewport) {
        if !self.has_pending() {
            return;
        }

        viewport.apply_orbit_delta(self.pending_yaw, self.pending_pitch, self.pending_zoom);
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn press() -> DeviceEvent {
        DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        }
    }

    #[test]
    fn test_motion_without_press_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        controller.process_event(&DeviceEvent::MouseMotion { delta: (10.0, 5.0) });
        assert!(!controller.has_pending());
    }

    #[test]
    fn test_drag_buffers_until_flush() {
        let mut controller = CameraController::new(0.5, 0.1);
        controller.process_event(&press());
        controller.process_event(&DeviceEvent::MouseMotion { delta: (-1.0, 2.0) });
        controller.process_event(&DeviceEvent::MouseMotion { delta: (-1.0, 0.0) });
        assert!(controller.has_pending());

        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        controller.flush(&mut viewport);

        // Two -1.0 horizontal steps at rotate_speed 0.5, sign-flipped
        assert!((viewport.yaw() - 1.0).abs() < 1e-6);
        assert!((viewport.pitch() - 1.0).abs() < 1e-6);
        assert!(!controller.has_pending());
    }

    #[test]
    fn test_scroll_buffers_zoom() {
        let mut controller = CameraController::new(0.005, 0.5);
        controller.process_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -2.0),
        });

        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        controller.flush(&mut viewport);
        assert!((viewport.distance() - 3.0).abs() < 1e-6);
    }
}
