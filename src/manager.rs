use log::{debug, error, info};
use std::fmt;
use std::time::Duration;

use crate::chord::{Action, Chord, OwnedResolution, Resolution, SharedChord};
use crate::client::{CaptureGuard, InputCapture, Notifier, TextInjector};
use crate::config::Settings;
use crate::error::{ChordError, Result};

/// Keys pressed so far in one chord invocation, starting with the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn root(trigger: impl Into<String>) -> Self {
        KeyPath {
            segments: vec![trigger.into()],
        }
    }

    /// A new path with `segment` appended. `self` is left untouched.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        KeyPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(", "))
    }
}

/// How one chord invocation ended, short of a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A literal was sent or a callback ran.
    Dispatched { key: String, path: KeyPath },
    /// The selected action's condition did not hold, so nothing ran.
    ConditionFalse { key: String, path: KeyPath },
    NoInputReceived { path: KeyPath },
    KeyNotFound { input: String, path: KeyPath },
}

impl Outcome {
    pub fn path(&self) -> &KeyPath {
        match self {
            Outcome::Dispatched { path, .. }
            | Outcome::ConditionFalse { path, .. }
            | Outcome::NoInputReceived { path }
            | Outcome::KeyNotFound { path, .. } => path,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, Outcome::Dispatched { .. })
    }

    /// Turns the soft misses into errors for callers that prefer `?`.
    pub fn into_result(self) -> Result<Self> {
        match self {
            Outcome::NoInputReceived { path } => Err(ChordError::NoInputReceived(path.to_string())),
            Outcome::KeyNotFound { input, .. } => Err(ChordError::KeyNotFound(input)),
            outcome => Ok(outcome),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Dispatched { key, path } => write!(f, "{path}: dispatched '{key}'"),
            Outcome::ConditionFalse { key, path } => write!(f, "{path}: condition of '{key}' is false"),
            Outcome::NoInputReceived { path } => write!(f, "{path}: no input received"),
            Outcome::KeyNotFound { input, path } => write!(f, "{path}: key '{input}' not found"),
        }
    }
}

/// What an [`Action`] needs while it runs.
pub struct ExecutionContext<'a> {
    manager: &'a ChordManager,
    path: KeyPath,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(manager: &'a ChordManager, path: KeyPath) -> Self {
        ExecutionContext { manager, path }
    }

    pub fn manager(&self) -> &'a ChordManager {
        self.manager
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }
}

/// Drives chord invocations: waits for a key, resolves it, dispatches, and
/// descends into nested chords until a leaf runs or the user stops typing.
pub struct ChordManager {
    capture: Box<dyn InputCapture>,
    injector: Box<dyn TextInjector>,
    notifier: Box<dyn Notifier>,
    message_duration: Duration,
}

impl ChordManager {
    pub fn new(
        capture: impl InputCapture + 'static,
        injector: impl TextInjector + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        ChordManager {
            capture: Box::new(capture),
            injector: Box::new(injector),
            notifier: Box::new(notifier),
            message_duration: Settings::default().message_duration(),
        }
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.message_duration = settings.message_duration();
        self
    }

    /// Entry point for a fired hotkey named `trigger`.
    pub fn trigger(&self, trigger: &str, chord: &Chord) -> Result<Outcome> {
        debug!("trigger {trigger}");
        self.execute(chord, chord.timeout(), KeyPath::root(trigger))
    }

    /// Waits up to `timeout` for one key and handles it against `chord`.
    /// Nested chords are entered with their own timeout.
    pub fn execute(&self, chord: &Chord, timeout: Duration, path: KeyPath) -> Result<Outcome> {
        let Some(input) = self.await_input(timeout) else {
            return Ok(self.no_input(chord, path, timeout));
        };
        let path = path.child(input.as_str());
        match chord.resolve(&input) {
            Resolution::Selected(action) | Resolution::NestedInto(_, action) => self.dispatch(action, path),
            Resolution::NotFound => Ok(self.not_found(chord, input, path)),
        }
    }

    /// Like [`execute`](Self::execute) for a chord that may be edited
    /// concurrently. The chord's lock is only held while resolving.
    pub fn execute_shared(&self, chord: &SharedChord, path: KeyPath) -> Result<Outcome> {
        let timeout = chord.timeout();
        let Some(input) = self.await_input(timeout) else {
            return Ok(self.no_input(&chord.snapshot(), path, timeout));
        };
        let path = path.child(input.as_str());
        match chord.resolve_owned(&input) {
            OwnedResolution::Selected(action) | OwnedResolution::NestedInto(action) => self.dispatch(&action, path),
            OwnedResolution::NotFound => Ok(self.not_found(&chord.snapshot(), input, path)),
        }
    }

    /// Fire and forget. Injection failures are logged, never raised.
    pub fn send_text(&self, text: &str) {
        if let Err(e) = self.injector.send_text(text) {
            error!("Error sending text {text:?}: {e:#}");
        }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    fn await_input(&self, timeout: Duration) -> Option<String> {
        let _guard = CaptureGuard::acquire(self.capture.as_ref());
        let token = self.capture.await_input(timeout)?;
        let input = token.to_input_string();
        (!input.is_empty()).then_some(input)
    }

    fn dispatch(&self, action: &Action, path: KeyPath) -> Result<Outcome> {
        debug!("{path}: dispatching '{}' ({})", action.key(), action.command().kind());
        action.execute(&ExecutionContext::new(self, path))
    }

    fn no_input(&self, chord: &Chord, path: KeyPath, timeout: Duration) -> Outcome {
        info!("{path}: no input within {timeout:?}");
        if chord.remind_keys() {
            self.notifier.show_binding_help(chord, &path);
        }
        Outcome::NoInputReceived { path }
    }

    fn not_found(&self, chord: &Chord, input: String, path: KeyPath) -> Outcome {
        info!("{path}: key '{input}' not found");
        self.notifier
            .show_message(&format!("Key not found: {path}"), self.message_duration);
        if chord.remind_keys() {
            self.notifier.show_binding_help(chord, &path);
        }
        Outcome::KeyNotFound { input, path }
    }
}
