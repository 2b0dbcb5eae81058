use log::info;
use std::time::Duration;

use crate::chord::Chord;
use crate::client::Notifier;
use crate::manager::KeyPath;

/// Writes messages and binding help to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_message(&self, text: &str, _duration: Duration) {
        info!("{text}");
    }

    fn show_binding_help(&self, chord: &Chord, path: &KeyPath) {
        info!("Keys available after {path}:");
        for line in chord.help_lines() {
            info!("  {line}");
        }
    }
}
