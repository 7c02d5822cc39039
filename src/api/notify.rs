//! Error notification sinks.
//!
//! A notification is fire-and-forget: sinks never fail and never block.

use tokio::sync::mpsc;
use tracing::{error, warn};

/// Single-message "show error" channel to the user.
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Writes notifications to the log; the default for the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        error!(message, "Saved cart operation failed");
    }
}

/// Forwards notifications to a UI task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn show_error(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            warn!(message, "Notification dropped, receiver closed");
        }
    }
}
