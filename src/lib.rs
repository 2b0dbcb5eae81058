// Exports which are used in integration/e2e test cases.
pub mod chord;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod manager;

pub use chord::{
    matches, Action, ActionUpdate, Callback, Chord, Command, Condition, KeyPattern, Literal, OwnedResolution,
    Resolution, SharedChord, Tier,
};
pub use client::{CaptureGuard, InputCapture, Notifier, TextInjector};
pub use config::Settings;
pub use error::{ChordError, Result};
pub use event::{InputToken, Modifiers};
pub use manager::{ChordManager, ExecutionContext, KeyPath, Outcome};
