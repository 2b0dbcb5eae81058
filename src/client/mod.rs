mod channel_capture;
mod log_notifier;
mod wayland_inject;

pub use channel_capture::ChannelCapture;
pub use log_notifier::LogNotifier;
pub use wayland_inject::{InjectMethod, WaylandTextInjector};

use std::sync::Arc;
use std::time::Duration;

use crate::chord::Chord;
use crate::event::InputToken;
use crate::manager::KeyPath;

/// Source of keystrokes while a chord waits for its next key.
pub trait InputCapture: Send + Sync {
    /// Blocks until a key arrives or `timeout` elapses.
    fn await_input(&self, timeout: Duration) -> Option<InputToken>;

    /// Called before each wait so the host stops delivering its own hotkeys.
    fn suspend_hotkeys(&self) {}

    /// Called after each wait, on every exit path.
    fn resume_hotkeys(&self) {}
}

pub trait TextInjector: Send + Sync {
    fn send_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Purely informational output. Nothing it returns is consumed.
pub trait Notifier: Send + Sync {
    fn show_message(&self, text: &str, duration: Duration);
    fn show_binding_help(&self, chord: &Chord, path: &KeyPath);
}

/// Holds host hotkeys suspended for as long as it lives.
pub struct CaptureGuard<'a> {
    capture: &'a dyn InputCapture,
}

impl<'a> CaptureGuard<'a> {
    pub fn acquire(capture: &'a dyn InputCapture) -> Self {
        capture.suspend_hotkeys();
        CaptureGuard { capture }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.capture.resume_hotkeys();
    }
}

impl<T: InputCapture + ?Sized> InputCapture for Arc<T> {
    fn await_input(&self, timeout: Duration) -> Option<InputToken> {
        (**self).await_input(timeout)
    }

    fn suspend_hotkeys(&self) {
        (**self).suspend_hotkeys()
    }

    fn resume_hotkeys(&self) {
        (**self).resume_hotkeys()
    }
}

impl<T: TextInjector + ?Sized> TextInjector for Arc<T> {
    fn send_text(&self, text: &str) -> anyhow::Result<()> {
        (**self).send_text(text)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn show_message(&self, text: &str, duration: Duration) {
        (**self).show_message(text, duration)
    }

    fn show_binding_help(&self, chord: &Chord, path: &KeyPath) {
        (**self).show_binding_help(chord, path)
    }
}
