//! Copy-to-clipboard with a timed acknowledgment.

use std::time::{Duration, Instant};

use log::{debug, error};
use thiserror::Error;

/// How long the copied acknowledgment stays visible.
pub const ACKNOWLEDGE_FOR: Duration = Duration::from_secs(2);

/// Write access to the host's clipboard.
pub trait Clipboard {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Fails when the host refuses or cannot provide clipboard access.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied: {0}")]
    Denied(String),

    #[error("clipboard is unavailable")]
    Unavailable,
}

/// An in-process clipboard, for hosts without a system clipboard and for tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The copied flag of a copy button.
///
/// Set on a successful copy and cleared by [`CopyFeedback::tick`] once
/// [`ACKNOWLEDGE_FOR`] has elapsed. Failed copies are logged and leave the
/// flag untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    /// Copies `text`, returning whether the clipboard accepted it.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, text: &str, now: Instant) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                debug!(bytes = text.len(); "Copied block source to clipboard");
                self.copied_at = Some(now);
                true
            }
            Err(err) => {
                error!(err:% = err; "Failed to copy");
                false
            }
        }
    }

    /// Reverts the acknowledgment once it has been shown long enough.
    pub fn tick(&mut self, now: Instant) {
        if self
            .copied_at
            .is_some_and(|at| now.saturating_duration_since(at) >= ACKNOWLEDGE_FOR)
        {
            self.copied_at = None;
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        self.copied_at.is_some()
    }
}
