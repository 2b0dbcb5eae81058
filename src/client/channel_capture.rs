use log::info;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::client::InputCapture;
use crate::event::InputToken;

/// Input capture fed through a channel by whatever produces keystrokes
/// (an OS hook thread, a script, stdin).
pub struct ChannelCapture {
    receiver: Mutex<Receiver<InputToken>>,
    closed: AtomicBool,
}

impl ChannelCapture {
    pub fn new() -> (ChannelCapture, Sender<InputToken>) {
        let (sender, receiver) = mpsc::channel();
        let capture = ChannelCapture {
            receiver: Mutex::new(receiver),
            closed: AtomicBool::new(false),
        };
        (capture, sender)
    }

    /// True once every sender is gone. A closed capture times out immediately.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl InputCapture for ChannelCapture {
    fn await_input(&self, timeout: Duration) -> Option<InputToken> {
        let receiver = self.receiver.lock();
        match receiver.recv_timeout(timeout) {
            Ok(token) => Some(token),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                if !self.closed.swap(true, Ordering::SeqCst) {
                    info!("Input channel closed");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_queued_tokens_in_order() {
        let (capture, sender) = ChannelCapture::new();
        sender.send(InputToken::raw("w")).unwrap();
        sender.send(InputToken::raw("g")).unwrap();
        assert_eq!(capture.await_input(Duration::from_millis(10)), Some(InputToken::raw("w")));
        assert_eq!(capture.await_input(Duration::from_millis(10)), Some(InputToken::raw("g")));
        assert_eq!(capture.await_input(Duration::from_millis(10)), None);
        assert!(!capture.is_closed());
    }

    #[test]
    fn test_disconnect_reads_as_timeout() {
        let (capture, sender) = ChannelCapture::new();
        drop(sender);
        assert_eq!(capture.await_input(Duration::from_secs(5)), None);
        assert!(capture.is_closed());
    }
}
