//! Per-frame input orchestration

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::events::{InputBinding, MouseButton, PhysicalInput};
use super::key_repeat::{KeyRepeatState, KeyState, RepeatConfig};
use super::snapshot::{FramebufferSnapshot, InputsSnapshot, MouseSnapshot};
use super::source::InputSource;
use super::window::InputWindow;

/// Stable identifier of a registered logical input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u32);

impl InputId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the input in registration order
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct RegisteredInput {
    name: String,
    binding: InputBinding,
    state: KeyRepeatState,
}

/// Owns the repeat state machines and turns one poll into one snapshot
///
/// Call [`poll_inputs`](Self::poll_inputs) then
/// [`inputs_snapshot`](Self::inputs_snapshot) exactly once per frame, on the
/// thread that owns the window.
#[derive(Debug)]
pub struct InputsManager {
    source: InputSource,
    defaults: RepeatConfig,
    inputs: Vec<RegisteredInput>,
    mouse_left: KeyRepeatState,
    mouse_right: KeyRepeatState,
    clock: Instant,
    mouse_capture_enabled: bool,
    /// Cursor movement from the latest poll, `None` if not sampled
    mouse_offset: Option<[f32; 2]>,
    /// A poll happened that no snapshot has consumed yet
    polled: bool,
    frame: u64,
    last_poll: Duration,
}

impl InputsManager {
    /// Creates a manager whose default-registered inputs use `defaults`
    pub fn new(defaults: RepeatConfig) -> Self {
        Self {
            source: InputSource::new(0, 0),
            defaults,
            inputs: Vec::new(),
            mouse_left: KeyRepeatState::new(defaults),
            mouse_right: KeyRepeatState::new(defaults),
            clock: Instant::now(),
            mouse_capture_enabled: false,
            mouse_offset: None,
            polled: false,
            frame: 0,
            last_poll: Duration::ZERO,
        }
    }

    /// Seeds the framebuffer size and installs the resize/scroll callbacks
    pub fn attach<W: InputWindow + ?Sized>(&mut self, window: &mut W) {
        self.source.attach(window);
        let (width, height) = window.framebuffer_size();
        debug!(width, height, "Input manager attached to window");
    }

    /// Registers a logical input with its own timing
    ///
    /// Meant to be called during setup; the returned id stays valid for the
    /// life of the manager.
    pub fn register_input(
        &mut self,
        name: impl Into<String>,
        binding: impl Into<InputBinding>,
        config: RepeatConfig,
    ) -> InputId {
        let id = InputId::from_index(self.inputs.len());
        let name = name.into();
        let binding = binding.into();
        debug!(
            id = id.index(),
            name = %name,
            ?binding,
            ?config,
            "Registered input"
        );

        self.inputs.push(RegisteredInput {
            name,
            binding,
            state: KeyRepeatState::new(config),
        });
        id
    }

    /// Registers a logical input with the manager's default timing
    pub fn register_input_default(
        &mut self,
        name: impl Into<String>,
        binding: impl Into<InputBinding>,
    ) -> InputId {
        let defaults = self.defaults;
        self.register_input(name, binding, defaults)
    }

    /// Samples the window using the manager's clock
    pub fn poll_inputs<W: InputWindow + ?Sized>(&mut self, window: &W) {
        let now = self.clock.elapsed();
        self.poll_inputs_at(window, now);
    }

    /// Samples the window at an explicit time
    ///
    /// `now` must not go backwards between calls.
    pub fn poll_inputs_at<W: InputWindow + ?Sized>(&mut self, window: &W, now: Duration) {
        if self.polled {
            warn!(
                frame = self.frame,
                "Inputs polled twice without taking a snapshot"
            );
        }

        for input in &mut self.inputs {
            let down = self.source.poll_key(window, &input.binding);
            input.state.update(down, now);
        }

        self.mouse_left
            .update(window.is_down(PhysicalInput::Mouse(MouseButton::Left)), now);
        self.mouse_right
            .update(window.is_down(PhysicalInput::Mouse(MouseButton::Right)), now);

        self.mouse_offset = if self.mouse_capture_enabled {
            self.source.poll_cursor_delta(window)
        } else {
            None
        };

        self.polled = true;
        self.frame += 1;
        self.last_poll = now;
    }

    /// Builds this frame's snapshot, consuming pending resize and scroll
    /// notifications
    pub fn inputs_snapshot(&mut self) -> InputsSnapshot {
        if !self.polled {
            warn!(frame = self.frame, "Input snapshot taken without a poll");
            debug_assert!(false, "inputs_snapshot called without poll_inputs");
        }
        self.polled = false;

        let framebuffer = self.source.consume_framebuffer_size();
        let scroll = self.source.consume_scroll();
        let [offset_x, offset_y] = self.mouse_offset.unwrap_or([0.0, 0.0]);

        let mouse = MouseSnapshot {
            capture_enabled: self.mouse_capture_enabled,
            movement_offset_changed: offset_x != 0.0 || offset_y != 0.0,
            offset_x,
            offset_y,
            scroll_offset_changed: scroll.changed,
            scroll_x: scroll.dx,
            scroll_y: scroll.dy,
            left_button_pressed: self.mouse_left.is_pressed(),
            right_button_pressed: self.mouse_right.is_pressed(),
        };

        InputsSnapshot::new(
            self.frame,
            self.last_poll,
            FramebufferSnapshot {
                resized: framebuffer.changed,
                width: framebuffer.width,
                height: framebuffer.height,
            },
            mouse,
            self.inputs.iter().map(|input| input.state.state()).collect(),
        )
    }

    /// Locks or releases the cursor for mouse-look
    ///
    /// Enabling forces the next poll to re-baseline the cursor so the camera
    /// does not jump. Key state is left untouched either way.
    pub fn set_mouse_capture_enabled<W: InputWindow + ?Sized>(
        &mut self,
        window: &mut W,
        enabled: bool,
    ) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;

        if let Err(e) = window.set_cursor_captured(enabled) {
            warn!(error = %e, enabled, "Failed to change cursor capture");
        }
        if enabled {
            self.source.request_rebaseline();
        }
        self.mouse_offset = None;

        debug!(enabled, "Mouse capture changed");
    }

    /// Whether relative mouse movement is currently being tracked
    pub fn is_mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    /// Live state of a registered input
    ///
    /// # Panics
    /// Panics if `id` was not returned by this manager.
    pub fn key_state(&self, id: InputId) -> KeyState {
        self.input(id).state.state()
    }

    /// Name given at registration
    ///
    /// # Panics
    /// Panics if `id` was not returned by this manager.
    pub fn input_name(&self, id: InputId) -> &str {
        &self.input(id).name
    }

    /// Looks up an input by its registration name
    pub fn find_input(&self, name: &str) -> Option<InputId> {
        self.inputs
            .iter()
            .position(|input| input.name == name)
            .map(InputId::from_index)
    }

    /// Number of registered inputs
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of polls so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn input(&self, id: InputId) -> &RegisteredInput {
        match self.inputs.get(id.index()) {
            Some(input) => input,
            None => panic!(
                "unknown input id {} ({} inputs registered)",
                id.index(),
                self.inputs.len()
            ),
        }
    }
}

impl Default for InputsManager {
    fn default() -> Self {
        Self::new(RepeatConfig::default())
    }
}
