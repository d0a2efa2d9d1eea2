//! Clipboard copies with a time limit.
//!
//! A run of copies remembers what the clipboard held before the first one and
//! puts it back once the newest copy's TTL runs out. If the user copied
//! something else in the meantime, nothing is restored. Each restore attempt
//! is reported back over a channel so the page or the CLI can surface it.

use anyhow::{anyhow, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::config::app_config::Config;
use crate::records::Record;

pub const DEFAULT_CLIPBOARD_TTL: u64 = 20;

pub trait ClipboardEngine: Send + Sync + 'static {
    /// Current text, or `None` when it cannot be read as text.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, contents: &str) -> Result<()>;
}

/// The desktop clipboard through copypasta.
pub struct SystemClipboard {
    ctx: Mutex<ClipboardContext>,
}

impl SystemClipboard {
    pub fn open() -> Result<Self> {
        let ctx = ClipboardContext::new().map_err(|e| anyhow!("cannot open clipboard: {e}"))?;
        Ok(Self {
            ctx: Mutex::new(ctx),
        })
    }
}

impl ClipboardEngine for SystemClipboard {
    fn read(&self) -> Result<Option<String>> {
        let mut ctx = self.ctx.lock().map_err(|_| anyhow!("clipboard lock poisoned"))?;
        Ok(ctx.get_contents().ok())
    }

    fn write(&self, contents: &str) -> Result<()> {
        let mut ctx = self.ctx.lock().map_err(|_| anyhow!("clipboard lock poisoned"))?;
        ctx.set_contents(contents.to_string())
            .map_err(|e| anyhow!("cannot write clipboard: {e}"))
    }
}

/// Which part of a record a copy carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipField {
    Username,
    Password,
}

impl ClipField {
    pub fn label(self) -> &'static str {
        match self {
            ClipField::Username => "username",
            ClipField::Password => "password",
        }
    }

    pub fn of(self, record: &Record) -> SecretString {
        match self {
            ClipField::Username => SecretString::from(record.fields.username.clone()),
            ClipField::Password => record.fields.password.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restore {
    /// The earlier text is back.
    Restored,
    /// The clipboard was empty before, so it was emptied again.
    Cleared,
    /// The user copied something else; it was left in place.
    Skipped,
    /// A later copy took over the restore.
    Superseded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreReport {
    pub field: ClipField,
    pub outcome: Restore,
}

#[derive(Default)]
struct Held {
    /// Bumped on every copy; only the newest copy may restore.
    epoch: u64,
    /// What to put back; `Some` while a restore is outstanding.
    original: Option<Option<String>>,
}

pub struct Clipboard {
    engine: Arc<dyn ClipboardEngine>,
    ttl: Duration,
    held: Arc<Mutex<Held>>,
    tx: UnboundedSender<RestoreReport>,
    rx: UnboundedReceiver<RestoreReport>,
}

impl Clipboard {
    pub fn new(engine: Arc<dyn ClipboardEngine>, ttl: Duration) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            engine,
            ttl,
            held: Arc::new(Mutex::new(Held::default())),
            tx,
            rx,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn copy_from(&self, record: &Record, field: ClipField) -> Result<()> {
        self.copy(field, &field.of(record))
    }

    /// Puts `value` on the clipboard and schedules the restore.
    pub fn copy(&self, field: ClipField, value: &SecretString) -> Result<()> {
        let mut held = self.held.lock().map_err(|_| anyhow!("clipboard state poisoned"))?;
        let earlier = held.original.take();
        let pending = earlier.is_some();
        let original = match earlier {
            Some(text) => text,
            None => self.engine.read()?,
        };
        if let Err(e) = self.engine.write(value.expose_secret()) {
            // An outstanding restore still owns the original text.
            if pending {
                held.original = Some(original);
            }
            return Err(e);
        }
        held.epoch += 1;
        held.original = Some(original);
        let epoch = held.epoch;
        drop(held);
        info!(field = field.label(), ttl_secs = self.ttl.as_secs(), "copied to clipboard");

        let engine = self.engine.clone();
        let state = self.held.clone();
        let tx = self.tx.clone();
        let copied = value.clone();
        let ttl = self.ttl;
        thread::spawn(move || {
            thread::sleep(ttl);
            let outcome = restore(engine.as_ref(), &state, epoch, &copied);
            debug!(field = field.label(), ?outcome, "clipboard restore");
            // Nobody may be listening any more.
            let _ = tx.send(RestoreReport { field, outcome });
        });
        Ok(())
    }

    /// Restore reports that have arrived so far.
    pub fn drain_reports(&mut self) -> Vec<RestoreReport> {
        let mut out = Vec::new();
        while let Ok(report) = self.rx.try_recv() {
            out.push(report);
        }
        out
    }

    /// Waits for the next restore report, at most `ttl` plus `grace`.
    pub async fn next_report(&mut self, grace: Duration) -> Option<RestoreReport> {
        tokio::time::timeout(self.ttl + grace, self.rx.recv())
            .await
            .ok()
            .flatten()
    }
}

fn restore(
    engine: &dyn ClipboardEngine,
    state: &Mutex<Held>,
    epoch: u64,
    copied: &SecretString,
) -> Restore {
    let Ok(mut held) = state.lock() else {
        return Restore::Failed("clipboard state poisoned".into());
    };
    if held.epoch != epoch {
        return Restore::Superseded;
    }
    let Some(original) = held.original.take() else {
        return Restore::Superseded;
    };

    match engine.read() {
        Ok(Some(current)) if current != copied.expose_secret() => return Restore::Skipped,
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "cannot read clipboard before restoring");
            return Restore::Failed(e.to_string());
        }
    }

    let text = original.unwrap_or_default();
    match engine.write(&text) {
        Ok(()) if text.is_empty() => Restore::Cleared,
        Ok(()) => Restore::Restored,
        Err(e) => {
            warn!(error = %e, "failed to restore clipboard");
            Restore::Failed(e.to_string())
        }
    }
}

/// Clipboard lifetime: flag, then config (env or file), then 20 seconds.
pub fn resolve_ttl(config: &Config, flag: Option<u64>) -> Duration {
    Duration::from_secs(
        flag.or(config.clipboard_ttl)
            .unwrap_or(DEFAULT_CLIPBOARD_TTL),
    )
}

/// A hint for sessions where the clipboard likely cannot reach the desktop.
pub fn session_warning() -> Option<&'static str> {
    let over_ssh = ["SSH_CONNECTION", "SSH_TTY"]
        .iter()
        .any(|k| env::var_os(k).is_some());
    if over_ssh {
        return Some("SSH session detected; the clipboard may not reach your desktop. Try --no-copy --echo");
    }
    let no_display = ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .all(|k| env::var_os(k).is_none());
    if cfg!(all(unix, not(target_os = "macos"))) && no_display {
        return Some("No display server found; the clipboard is probably unavailable.");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RecordFields, RecordId};

    #[derive(Default)]
    struct Scratch {
        text: Mutex<Option<String>>,
        fail_writes: bool,
    }

    impl ClipboardEngine for Scratch {
        fn read(&self) -> Result<Option<String>> {
            Ok(self.text.lock().unwrap().clone())
        }

        fn write(&self, contents: &str) -> Result<()> {
            if self.fail_writes {
                return Err(anyhow!("denied"));
            }
            *self.text.lock().unwrap() = Some(contents.to_string());
            Ok(())
        }
    }

    fn record() -> Record {
        Record {
            id: RecordId::from("1"),
            fields: RecordFields::new("GitHub", "https://github.com", "alice", "p@ss1"),
        }
    }

    #[test]
    fn fields_pick_the_right_value() {
        let r = record();
        assert_eq!(ClipField::Username.of(&r).expose_secret(), "alice");
        assert_eq!(ClipField::Password.of(&r).expose_secret(), "p@ss1");
    }

    #[test]
    fn restore_skips_when_user_copied_something_else() {
        let engine = Scratch::default();
        let held = Mutex::new(Held {
            epoch: 1,
            original: Some(Some("before".into())),
        });
        engine.write("user text").unwrap();
        let outcome = restore(&engine, &held, 1, &SecretString::from("p@ss1"));
        assert_eq!(outcome, Restore::Skipped);
        assert_eq!(engine.read().unwrap().as_deref(), Some("user text"));
    }

    #[test]
    fn stale_epoch_does_not_restore() {
        let engine = Scratch::default();
        engine.write("p@ss2").unwrap();
        let held = Mutex::new(Held {
            epoch: 2,
            original: Some(Some("before".into())),
        });
        let outcome = restore(&engine, &held, 1, &SecretString::from("p@ss1"));
        assert_eq!(outcome, Restore::Superseded);
        assert_eq!(engine.read().unwrap().as_deref(), Some("p@ss2"));
    }

    #[test]
    fn empty_original_is_cleared() {
        let engine = Scratch::default();
        engine.write("p@ss1").unwrap();
        let held = Mutex::new(Held {
            epoch: 1,
            original: Some(None),
        });
        let outcome = restore(&engine, &held, 1, &SecretString::from("p@ss1"));
        assert_eq!(outcome, Restore::Cleared);
        assert_eq!(engine.read().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn failed_copy_is_an_error() {
        let engine = Arc::new(Scratch {
            fail_writes: true,
            ..Scratch::default()
        });
        let clip = Clipboard::new(engine, Duration::from_secs(60));
        assert!(clip.copy_from(&record(), ClipField::Password).is_err());
    }
}
