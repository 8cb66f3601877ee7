//! Raw sampling of a window plus the callback-fed notification slots

use std::sync::Arc;

use tracing::trace;

use super::events::InputBinding;
use super::shared::{FramebufferSample, FramebufferSlot, ScrollSample, ScrollSlot};
use super::window::InputWindow;

#[derive(Debug)]
struct Notifications {
    framebuffer: FramebufferSlot,
    scroll: ScrollSlot,
}

/// Writer side of the notification slots, handed to the window callbacks
#[derive(Debug, Clone)]
pub struct InputCallbacks {
    shared: Arc<Notifications>,
}

impl InputCallbacks {
    /// Records a framebuffer resize
    pub fn on_framebuffer_resize(&self, width: u32, height: u32) {
        trace!(width, height, "Framebuffer resized");
        self.shared.framebuffer.publish(width, height);
    }

    /// Records a scroll delta
    pub fn on_scroll(&self, dx: f32, dy: f32) {
        trace!(dx, dy, "Scrolled");
        self.shared.scroll.publish(dx, dy);
    }

    /// Registers both callbacks with a window, replacing any previous ones
    pub fn install<W: InputWindow + ?Sized>(&self, window: &mut W) {
        let resize = self.clone();
        window.set_framebuffer_size_callback(Box::new(move |width, height| {
            resize.on_framebuffer_resize(width, height);
        }));

        let scroll = self.clone();
        window.set_scroll_callback(Box::new(move |dx, dy| {
            scroll.on_scroll(dx as f32, dy as f32);
        }));
    }
}

/// Translates a window into raw per-frame samples
#[derive(Debug)]
pub struct InputSource {
    shared: Arc<Notifications>,
    /// Previous cursor position, `None` until a baseline is taken
    last_cursor: Option<[f64; 2]>,
}

impl InputSource {
    /// Creates a source with an initial framebuffer size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shared: Arc::new(Notifications {
                framebuffer: FramebufferSlot::new(width, height),
                scroll: ScrollSlot::new(),
            }),
            last_cursor: None,
        }
    }

    /// Handle for the window callbacks
    pub fn callbacks(&self) -> InputCallbacks {
        InputCallbacks {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Seeds the framebuffer size from the window and installs the callbacks
    pub fn attach<W: InputWindow + ?Sized>(&mut self, window: &mut W) {
        let (width, height) = window.framebuffer_size();
        self.shared.framebuffer.seed(width, height);
        self.callbacks().install(window);
    }

    /// Whether any physical input of the binding is down right now
    pub fn poll_key<W: InputWindow + ?Sized>(&self, window: &W, binding: &InputBinding) -> bool {
        binding.inputs().iter().any(|input| window.is_down(*input))
    }

    /// Cursor movement since the previous poll, vertical axis up-positive
    ///
    /// The first poll after a re-baseline reports no movement. Returns `None`
    /// if the window could not report a cursor position; the baseline is
    /// kept so the next successful poll measures from the last known spot.
    pub fn poll_cursor_delta<W: InputWindow + ?Sized>(&mut self, window: &W) -> Option<[f32; 2]> {
        let Some(position) = window.cursor_position() else {
            trace!("Cursor position unavailable");
            return None;
        };

        let [last_x, last_y] = self.last_cursor.replace(position).unwrap_or(position);
        Some([
            (position[0] - last_x) as f32,
            (last_y - position[1]) as f32,
        ])
    }

    /// Forces the next cursor poll to establish a new baseline
    pub fn request_rebaseline(&mut self) {
        self.last_cursor = None;
    }

    /// Same as [`InputCallbacks::on_framebuffer_resize`]
    pub fn on_framebuffer_resize(&self, width: u32, height: u32) {
        self.callbacks().on_framebuffer_resize(width, height);
    }

    /// Same as [`InputCallbacks::on_scroll`]
    pub fn on_scroll(&self, dx: f32, dy: f32) {
        self.callbacks().on_scroll(dx, dy);
    }

    /// Reads the framebuffer size, clearing the resized flag
    pub fn consume_framebuffer_size(&self) -> FramebufferSample {
        self.shared.framebuffer.consume()
    }

    /// Takes the scroll delta, clearing the changed flag
    pub fn consume_scroll(&self) -> ScrollSample {
        self.shared.scroll.consume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::{KeyCode, MouseButton};
    use crate::app::platform::HeadlessWindow;

    #[test]
    fn test_poll_key_alternate_binding() {
        let window = HeadlessWindow::new(800, 600);
        let input = window.controller();
        let source = InputSource::new(800, 600);
        let binding = InputBinding::new(KeyCode::Equal).or(KeyCode::NumpadAdd);

        assert!(!source.poll_key(&window, &binding));
        input.press(KeyCode::NumpadAdd);
        assert!(source.poll_key(&window, &binding));
        input.release(KeyCode::NumpadAdd);
        input.press(MouseButton::Left);
        assert!(!source.poll_key(&window, &binding));
    }

    #[test]
    fn test_cursor_baseline_then_deltas() {
        let window = HeadlessWindow::new(800, 600);
        let input = window.controller();
        let mut source = InputSource::new(800, 600);

        input.move_cursor(100.0, 100.0);
        assert_eq!(source.poll_cursor_delta(&window), Some([0.0, 0.0]));

        input.move_cursor(110.0, 90.0);
        assert_eq!(source.poll_cursor_delta(&window), Some([10.0, 10.0]));

        source.request_rebaseline();
        input.move_cursor(500.0, 500.0);
        assert_eq!(source.poll_cursor_delta(&window), Some([0.0, 0.0]));
    }

    #[test]
    fn test_cursor_failure_keeps_baseline() {
        let window = HeadlessWindow::new(800, 600);
        let input = window.controller();
        let mut source = InputSource::new(800, 600);

        input.move_cursor(10.0, 10.0);
        source.poll_cursor_delta(&window);

        input.set_cursor_available(false);
        assert_eq!(source.poll_cursor_delta(&window), None);

        input.set_cursor_available(true);
        input.move_cursor(15.0, 10.0);
        assert_eq!(source.poll_cursor_delta(&window), Some([5.0, 0.0]));
    }

    #[test]
    fn test_attached_callbacks_feed_slots() {
        let mut window = HeadlessWindow::new(1280, 720);
        let input = window.controller();
        let mut source = InputSource::new(800, 600);
        source.attach(&mut window);

        let seeded = source.consume_framebuffer_size();
        assert!(!seeded.changed);
        assert_eq!((seeded.width, seeded.height), (1280, 720));

        input.resize(640, 480);
        input.scroll(0.0, -1.0);
        // Nothing is delivered until the window pumps its events.
        assert!(!source.consume_scroll().changed);
        window.pump_events();

        let size = source.consume_framebuffer_size();
        assert!(size.changed);
        assert_eq!((size.width, size.height), (640, 480));
        assert!(!source.consume_framebuffer_size().changed);

        let scroll = source.consume_scroll();
        assert!(scroll.changed);
        assert_eq!(scroll.dy, -1.0);
        assert!(!source.consume_scroll().changed);
    }

    #[test]
    fn test_direct_notifications_are_consumed_once() {
        let source = InputSource::new(800, 600);

        source.on_framebuffer_resize(1920, 1080);
        source.on_scroll(1.0, 0.0);
        source.on_scroll(0.5, -2.0);

        let size = source.consume_framebuffer_size();
        assert!(size.changed);
        assert_eq!((size.width, size.height), (1920, 1080));
        assert!(!source.consume_framebuffer_size().changed);

        let scroll = source.consume_scroll();
        assert!(scroll.changed);
        assert_eq!((scroll.dx, scroll.dy), (1.5, -2.0));
        assert!(!source.consume_scroll().changed);
    }
}
