use anyhow::{anyhow, Result};
use log::debug;
use serde::Deserialize;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

use crate::client::TextInjector;
use crate::config::Settings;

// evdev codes for the ydotool key syntax
const KEY_LEFTCTRL: u16 = 29;
const KEY_V: u16 = 47;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectMethod {
    /// Type the text key by key with `ydotool type`.
    #[default]
    Type,
    /// Put the text on the clipboard with `wl-copy`, then press Ctrl+V.
    Clipboard,
}

/// Sends literal text into the focused Wayland window through external tools.
#[derive(Debug, Clone)]
pub struct WaylandTextInjector {
    method: InjectMethod,
    timeout: Duration,
}

impl WaylandTextInjector {
    pub fn new(method: InjectMethod, timeout: Duration) -> Self {
        WaylandTextInjector { method, timeout }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.inject_method, settings.inject_timeout())
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        self.run("wl-copy", &["--type", "text/plain"], Some(text))
    }

    fn paste(&self) -> Result<()> {
        let press = format!("{KEY_LEFTCTRL}:1");
        let v_down = format!("{KEY_V}:1");
        let v_up = format!("{KEY_V}:0");
        let release = format!("{KEY_LEFTCTRL}:0");
        self.run(
            "ydotool",
            &["key", press.as_str(), v_down.as_str(), v_up.as_str(), release.as_str()],
            None,
        )
    }

    fn run(&self, program: &str, args: &[&str], stdin: Option<&str>) -> Result<()> {
        debug!("Running {program} {args:?}");
        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let (Some(text), Some(pipe)) = (stdin, child.stdin.as_mut()) {
            pipe.write_all(text.as_bytes())?;
        }
        // close stdin so the tool sees EOF
        drop(child.stdin.take());

        match child.wait_timeout(self.timeout)? {
            Some(status) if status.success() => Ok(()),
            Some(status) => Err(anyhow!("{program} failed: {status}")),
            None => {
                child.kill()?;
                Err(anyhow!("{program} timed out after {:?}", self.timeout))
            }
        }
    }
}

impl Default for WaylandTextInjector {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl TextInjector for WaylandTextInjector {
    fn send_text(&self, text: &str) -> Result<()> {
        match self.method {
            InjectMethod::Type => self.run("ydotool", &["type", "--", text], None),
            InjectMethod::Clipboard => {
                self.copy_to_clipboard(text)?;
                self.paste()
            }
        }
    }
}
