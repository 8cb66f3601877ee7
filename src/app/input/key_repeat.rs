//! Key repeat and double-press timing

use std::time::Duration;

/// Timing configuration for one logical input
///
/// Fixed at registration; there are no setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatConfig {
    repeat_delay: Duration,
    repeat_interval: Duration,
    double_press_window: Duration,
}

impl RepeatConfig {
    pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(600);
    pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(400);
    pub const DEFAULT_DOUBLE_PRESS_WINDOW: Duration = Duration::from_millis(500);

    /// Creates a configuration with explicit timings
    pub const fn new(
        repeat_delay: Duration,
        repeat_interval: Duration,
        double_press_window: Duration,
    ) -> Self {
        Self {
            repeat_delay,
            repeat_interval,
            double_press_window,
        }
    }

    /// Returns a copy with a different initial repeat delay
    pub const fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.repeat_delay = delay;
        self
    }

    /// Returns a copy with a different repeat interval
    pub const fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }

    /// Returns a copy with a different double-press window
    pub const fn with_double_press_window(mut self, window: Duration) -> Self {
        self.double_press_window = window;
        self
    }

    /// Delay between the initial press and the first repeat
    pub fn repeat_delay(&self) -> Duration {
        self.repeat_delay
    }

    /// Interval between subsequent repeats
    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Maximum gap between two fresh presses counted as a double press
    pub fn double_press_window(&self) -> Duration {
        self.double_press_window
    }
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_REPEAT_DELAY,
            Self::DEFAULT_REPEAT_INTERVAL,
            Self::DEFAULT_DOUBLE_PRESS_WINDOW,
        )
    }
}

/// Derived state of one logical input for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    /// Activated this frame (initial press or repeat tick)
    pub is_pressed: bool,
    /// Down since the initial press, not released yet
    pub is_held: bool,
    /// Second fresh press within the double-press window
    pub is_double_pressed: bool,
}

/// Per-input state machine turning raw down samples into press, repeat and
/// double-press signals
///
/// Timestamps are offsets from an arbitrary clock origin that must stay the
/// same for the life of the machine.
#[derive(Debug, Clone)]
pub struct KeyRepeatState {
    config: RepeatConfig,
    was_down: bool,
    is_pressed: bool,
    is_held: bool,
    first_delay_pending: bool,
    last_activation: Duration,
    is_double_pressed: bool,
    double_press_candidate: Option<Duration>,
}

impl KeyRepeatState {
    /// Creates an idle machine
    pub fn new(config: RepeatConfig) -> Self {
        Self {
            config,
            was_down: false,
            is_pressed: false,
            is_held: false,
            first_delay_pending: true,
            last_activation: Duration::ZERO,
            is_double_pressed: false,
            double_press_candidate: None,
        }
    }

    /// Advances the machine by one frame
    pub fn update(&mut self, is_down_now: bool, now: Duration) {
        let fresh_press = is_down_now && !self.was_down;

        if fresh_press {
            self.is_pressed = true;
            self.is_held = true;
            self.first_delay_pending = true;
            self.last_activation = now;
        } else if is_down_now {
            let elapsed = now.saturating_sub(self.last_activation);
            let threshold = if self.first_delay_pending {
                self.config.repeat_delay
            } else {
                self.config.repeat_interval
            };

            self.is_pressed = elapsed >= threshold;
            if self.is_pressed {
                self.first_delay_pending = false;
                self.last_activation = now;
            }
        } else {
            self.is_pressed = false;
            self.is_held = false;
            self.first_delay_pending = true;
            self.last_activation = Duration::ZERO;
        }

        // Release does not clear the candidate, only the window does.
        self.is_double_pressed = false;
        if fresh_press {
            match self.double_press_candidate {
                Some(previous)
                    if now.saturating_sub(previous) <= self.config.double_press_window =>
                {
                    self.is_double_pressed = true;
                    self.double_press_candidate = None;
                }
                _ => self.double_press_candidate = Some(now),
            }
        }

        self.was_down = is_down_now;
    }

    /// True on the initial press and on every repeat tick
    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// True from the initial press until release
    pub fn is_held(&self) -> bool {
        self.is_held
    }

    /// True only on the frame a double press completes
    pub fn is_double_pressed(&self) -> bool {
        self.is_double_pressed
    }

    /// All derived signals for the current frame
    pub fn state(&self) -> KeyState {
        KeyState {
            is_pressed: self.is_pressed,
            is_held: self.is_held,
            is_double_pressed: self.is_double_pressed,
        }
    }

    /// Timing this state was created with
    pub fn config(&self) -> &RepeatConfig {
        &self.config
    }
}
