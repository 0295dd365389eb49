use std::collections::VecDeque;

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Activate,
}

/// Queues input from window callbacks until the next frame drains it.
#[derive(Debug)]
pub struct PlatformLayer {
    boot_timestamp: std::time::Instant,
    pending: VecDeque<InputAction>,
}

impl PlatformLayer {
    pub fn new() -> Self {
        Self {
            boot_timestamp: std::time::Instant::now(),
            pending: VecDeque::new(),
        }
    }

    /// Queues the action `event` maps to, if any.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        let action = match event {
            WindowEvent::KeyboardInput { event, .. } => {
                action_for_key(event.physical_key, event.state, event.repeat)
            }
            WindowEvent::MouseInput { state, button, .. } => action_for_button(*button, *state),
            _ => None,
        };
        if let Some(action) = action {
            self.push(action);
        }
    }

    pub fn push(&mut self, action: InputAction) {
        tracing::trace!(?action, "input queued");
        self.pending.push_back(action);
    }

    pub fn pump_events(&mut self) -> impl Iterator<Item = InputAction> + '_ {
        self.pending.drain(..)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.boot_timestamp.elapsed()
    }
}

impl Default for PlatformLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Space, Enter and Up activate on press. Repeats and releases are ignored.
pub fn action_for_key(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<InputAction> {
    if state != ElementState::Pressed || repeat {
        return None;
    }
    match key {
        PhysicalKey::Code(KeyCode::Space | KeyCode::Enter | KeyCode::ArrowUp) => {
            Some(InputAction::Activate)
        }
        _ => None,
    }
}

pub fn action_for_button(button: MouseButton, state: ElementState) -> Option<InputAction> {
    match (button, state) {
        (MouseButton::Left, ElementState::Pressed) => Some(InputAction::Activate),
        _ => None,
    }
}
