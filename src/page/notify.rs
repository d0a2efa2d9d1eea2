use tracing::{info, warn};

pub const SAVED: &str = "Password saved successfully";
pub const SAVE_FAILED: &str = "Failed to save password";
pub const UPDATED: &str = "Password updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update password";
pub const DELETED: &str = "Password deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete password";
pub const COPIED: &str = "Copied to clipboard!";
pub const CLIPBOARD_UNAVAILABLE: &str = "Clipboard unavailable";
pub const CLIPBOARD_RESTORE_FAILED: &str = "Failed to restore clipboard";
pub const LIST_FAILED: &str = "Failed to load passwords";
pub const RECORD_FAILED: &str = "Failed to load password";

// ~2s at the 200ms UI tick
const TOAST_TICKS: u16 = 10;
const HISTORY_LIMIT: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Transient toast plus a short history of everything shown.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
    ticks_left: u16,
    history: Vec<Notification>,
}

impl Notifier {
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        match level {
            Level::Success => info!(%message, "notify"),
            Level::Error => warn!(%message, "notify"),
        }
        let n = Notification { level, message };
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(n.clone());
        self.current = Some(n);
        self.ticks_left = TOAST_TICKS;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[Notification] {
        &self.history
    }

    pub fn last(&self) -> Option<&Notification> {
        self.history.last()
    }

    pub fn tick(&mut self) {
        if self.ticks_left > 0 {
            self.ticks_left -= 1;
            if self.ticks_left == 0 {
                self.current = None;
            }
        }
    }
}
