//! Immutable per-frame input snapshot

use std::time::Duration;

use super::key_repeat::KeyState;
use super::manager::InputId;

/// Framebuffer state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferSnapshot {
    /// A resize notification arrived since the previous frame
    pub resized: bool,
    pub width: u32,
    pub height: u32,
}

impl FramebufferSnapshot {
    /// Width over height, `None` while minimized (zero height)
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

/// Mouse state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseSnapshot {
    pub capture_enabled: bool,
    /// Cursor moved while captured
    pub movement_offset_changed: bool,
    /// Horizontal movement since the previous frame
    pub offset_x: f32,
    /// Vertical movement since the previous frame, up-positive
    pub offset_y: f32,
    pub scroll_offset_changed: bool,
    pub scroll_x: f32,
    pub scroll_y: f32,
    /// Left button pressed this frame (with repeat)
    pub left_button_pressed: bool,
    /// Right button pressed this frame (with repeat)
    pub right_button_pressed: bool,
}

/// Everything downstream logic needs to know about input for one frame
///
/// Built once per frame by [`InputsManager::inputs_snapshot`] and never
/// mutated afterwards. Only valid for the frame it was built in.
///
/// [`InputsManager::inputs_snapshot`]: super::InputsManager::inputs_snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct InputsSnapshot {
    frame: u64,
    time: Duration,
    framebuffer: FramebufferSnapshot,
    mouse: MouseSnapshot,
    keys: Vec<KeyState>,
}

impl InputsSnapshot {
    pub(super) fn new(
        frame: u64,
        time: Duration,
        framebuffer: FramebufferSnapshot,
        mouse: MouseSnapshot,
        keys: Vec<KeyState>,
    ) -> Self {
        Self {
            frame,
            time,
            framebuffer,
            mouse,
            keys,
        }
    }

    /// Number of the poll this snapshot was built from, starting at 1
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Input clock at the time of the poll
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Framebuffer size and resize flag for this frame
    pub fn framebuffer(&self) -> &FramebufferSnapshot {
        &self.framebuffer
    }

    /// Mouse movement, scroll and button state for this frame
    pub fn mouse(&self) -> &MouseSnapshot {
        &self.mouse
    }

    /// State of a registered input
    ///
    /// # Panics
    /// Panics if `id` was not returned by the manager that built this
    /// snapshot.
    pub fn key(&self, id: InputId) -> KeyState {
        match self.keys.get(id.index()) {
            Some(state) => *state,
            None => panic!(
                "unknown input id {} (snapshot holds {} inputs)",
                id.index(),
                self.keys.len()
            ),
        }
    }

    pub fn is_pressed(&self, id: InputId) -> bool {
        self.key(id).is_pressed
    }

    pub fn is_held(&self, id: InputId) -> bool {
        self.key(id).is_held
    }

    pub fn is_double_pressed(&self, id: InputId) -> bool {
        self.key(id).is_double_pressed
    }

    /// All registered inputs with their state
    pub fn keys(&self) -> impl Iterator<Item = (InputId, KeyState)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, state)| (InputId::from_index(index), *state))
    }
}
