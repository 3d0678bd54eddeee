//! Spoken announcements
//!
//! Recognized signs are handed to an external speech consumer as messages.
//! Speaking happens elsewhere; this side only decides what is worth saying
//! and never repeats the same sign twice in a row.

use crate::matcher::Verdict;
use tokio::sync::mpsc;

/// A label to be vocalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
}

/// Deduplicating sender of announcements
#[derive(Debug)]
pub struct Announcer {
    tx: mpsc::UnboundedSender<Announcement>,
    last_spoken: Option<String>,
}

impl Announcer {
    pub fn new(tx: mpsc::UnboundedSender<Announcement>) -> Self {
        Self {
            tx,
            last_spoken: None,
        }
    }

    /// Create an announcer along with the receiving end for the speech consumer
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Announcement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Announce a verdict if it names a sign other than the last one spoken.
    ///
    /// Returns whether an announcement was sent.
    pub fn announce(&mut self, verdict: &Verdict) -> bool {
        let Some(label) = verdict.label() else {
            return false;
        };
        if self.last_spoken.as_deref() == Some(label) {
            return false;
        }

        self.last_spoken = Some(label.to_string());

        if self
            .tx
            .send(Announcement {
                text: label.to_string(),
            })
            .is_err()
        {
            tracing::warn!("Announcement receiver closed, dropping '{}'", label);
            return false;
        }

        tracing::info!("Announcing: {}", label);
        true
    }

    /// Forget the last announcement so the next sign is always spoken
    pub fn reset(&mut self) {
        self.last_spoken = None;
    }

    pub fn last_spoken(&self) -> Option<&str> {
        self.last_spoken.as_deref()
    }
}
