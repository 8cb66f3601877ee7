//! Notification slots written by window callbacks and consumed by the frame poll
//!
//! Window systems may fire resize and scroll notifications nested inside the
//! event pump, or from another OS thread. Each slot is a small value behind a
//! reader/writer lock with a consume-and-clear read: a notification is seen
//! by exactly one consume.

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// Framebuffer size as seen by one consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferSample {
    /// A resize notification arrived since the previous consume
    pub changed: bool,
    pub width: u32,
    pub height: u32,
}

/// Scroll delta as seen by one consume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// A scroll notification arrived since the previous consume
    pub changed: bool,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug)]
struct FramebufferValue {
    width: u32,
    height: u32,
    resized: bool,
}

/// Latest framebuffer size plus a one-shot "resized" flag
#[derive(Debug)]
pub struct FramebufferSlot {
    inner: RwLock<FramebufferValue>,
}

impl FramebufferSlot {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: RwLock::new(FramebufferValue {
                width,
                height,
                resized: false,
            }),
        }
    }

    /// Stores a new size and raises the resized flag
    pub fn publish(&self, width: u32, height: u32) {
        let mut value = self.inner.write();
        value.width = width;
        value.height = height;
        value.resized = true;
    }

    /// Overwrites the size without raising the flag
    pub fn seed(&self, width: u32, height: u32) {
        let mut value = self.inner.write();
        value.width = width;
        value.height = height;
    }

    /// Reads the size and clears the resized flag
    pub fn consume(&self) -> FramebufferSample {
        let value = self.inner.upgradable_read();
        let sample = FramebufferSample {
            changed: value.resized,
            width: value.width,
            height: value.height,
        };
        if value.resized {
            RwLockUpgradableReadGuard::upgrade(value).resized = false;
        }
        sample
    }
}

#[derive(Debug, Default)]
struct ScrollValue {
    dx: f32,
    dy: f32,
    changed: bool,
}

/// Scroll delta accumulated between two consumes
///
/// Deltas are summed rather than overwritten, so two wheel notifications
/// inside one frame are both reported.
#[derive(Debug, Default)]
pub struct ScrollSlot {
    inner: RwLock<ScrollValue>,
}

impl ScrollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a delta and raises the changed flag
    pub fn publish(&self, dx: f32, dy: f32) {
        let mut value = self.inner.write();
        value.dx += dx;
        value.dy += dy;
        value.changed = true;
    }

    /// Takes the accumulated delta and clears the changed flag
    pub fn consume(&self) -> ScrollSample {
        let value = self.inner.upgradable_read();
        if !value.changed {
            return ScrollSample {
                changed: false,
                dx: 0.0,
                dy: 0.0,
            };
        }

        let mut value = RwLockUpgradableReadGuard::upgrade(value);
        let sample = ScrollSample {
            changed: true,
            dx: value.dx,
            dy: value.dy,
        };
        *value = ScrollValue::default();
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_framebuffer_consume_is_one_shot() {
        let slot = FramebufferSlot::new(800, 600);
        assert!(!slot.consume().changed);

        slot.publish(1024, 768);
        let first = slot.consume();
        assert!(first.changed);
        assert_eq!((first.width, first.height), (1024, 768));

        let second = slot.consume();
        assert!(!second.changed);
        assert_eq!((second.width, second.height), (1024, 768));
    }

    #[test]
    fn test_framebuffer_latest_size_wins() {
        let slot = FramebufferSlot::new(800, 600);
        slot.publish(640, 480);
        slot.publish(1280, 720);
        assert_eq!(
            slot.consume(),
            FramebufferSample {
                changed: true,
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn test_framebuffer_seed_does_not_flag() {
        let slot = FramebufferSlot::new(800, 600);
        slot.seed(1920, 1080);
        let sample = slot.consume();
        assert!(!sample.changed);
        assert_eq!(sample.width, 1920);
    }

    #[test]
    fn test_scroll_consume_is_one_shot() {
        let slot = ScrollSlot::new();
        slot.publish(0.0, 1.0);
        slot.publish(0.5, 2.0);

        let first = slot.consume();
        assert!(first.changed);
        assert_eq!((first.dx, first.dy), (0.5, 3.0));

        let second = slot.consume();
        assert!(!second.changed);
        assert_eq!((second.dx, second.dy), (0.0, 0.0));
    }

    #[test]
    fn test_scroll_from_other_threads() {
        let slot = Arc::new(ScrollSlot::new());
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for _ in 0..100 {
                        slot.publish(0.0, 1.0);
                    }
                })
            })
            .collect();

        let mut total = 0.0;
        for writer in writers {
            writer.join().expect("writer thread panicked");
            total += slot.consume().dy;
        }
        total += slot.consume().dy;

        assert_eq!(total, 400.0);
    }
}
