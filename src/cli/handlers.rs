use anyhow::{Context, Result};
use inquire::{Password, Text};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::clipboard::{resolve_ttl, session_warning, ClipField, Clipboard, Restore, SystemClipboard};
use crate::config::app_config::Config;
use crate::page::card::PASSWORD_MASK;
use crate::page::notify;
use crate::records::filter::name_matches;
use crate::records::{RecordFields, RecordId, RecordService, RecordSummary};

pub struct AddOptions {
    pub name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
}

pub struct EditOptions {
    pub name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password_prompt: bool,
}

pub struct CopyOptions {
    pub field: ClipField,
    pub no_copy: bool,
    pub echo: bool,
    pub ttl: Option<u64>,
}

/// Non-interactive front for the record service.
pub struct CardCommands<'a> {
    config: &'a Config,
    service: Arc<RecordService>,
}

impl<'a> CardCommands<'a> {
    pub fn new(config: &'a Config, service: Arc<RecordService>) -> Self {
        Self { config, service }
    }

    pub async fn handle_list(
        &self,
        query: Option<String>,
        show_users: bool,
        json_mode: bool,
    ) -> Result<()> {
        let mut records = self.service.list().await.context(notify::LIST_FAILED)?;
        if let Some(q) = query {
            records.retain(|r| name_matches(&r.name, &q));
        }

        if json_mode {
            println!("{}", serde_json::to_string_pretty(&list_json(&records, show_users))?);
            return Ok(());
        }
        if records.is_empty() {
            println!("No passwords found");
            return Ok(());
        }
        for line in list_lines(&records, show_users) {
            println!("{line}");
        }
        Ok(())
    }

    pub async fn handle_show(&self, id: &str, reveal_password: bool) -> Result<()> {
        let record = self
            .service
            .get_by_id(&RecordId::from(id))
            .await
            .context(notify::RECORD_FAILED)?;
        let f = &record.fields;
        println!("Id:       {}", record.id);
        println!("Name:     {}", f.name);
        println!("URL:      {}", f.url);
        println!("Username: {}", f.username);
        if reveal_password {
            println!("Password: {}", f.password.expose_secret());
        } else {
            println!("Password: {PASSWORD_MASK} (use --reveal-password to show)");
        }
        Ok(())
    }

    pub async fn handle_add(&self, opts: AddOptions) -> Result<()> {
        let name = value_or_prompt(opts.name, "Name")?;
        let url = value_or_prompt(opts.url, "URL")?;
        let username = value_or_prompt(opts.username, "Username")?;
        let password = password_from_env_or_prompt()?;
        let fields = RecordFields {
            name,
            url,
            username,
            password,
        };
        fields.validate()?;

        let created = self
            .service
            .create(&fields)
            .await
            .context(notify::SAVE_FAILED)?;
        println!("✅ {} (id {})", notify::SAVED, created.id);
        Ok(())
    }

    pub async fn handle_edit(&self, id: &str, opts: EditOptions) -> Result<()> {
        let id = RecordId::from(id);
        // Updates replace all four fields, so start from the full record.
        let current = self
            .service
            .get_by_id(&id)
            .await
            .context(notify::RECORD_FAILED)?;
        let mut fields = current.fields;
        if let Some(n) = opts.name {
            fields.name = n;
        }
        if let Some(u) = opts.url {
            fields.url = u;
        }
        if let Some(u) = opts.username {
            fields.username = u;
        }
        if opts.password_prompt {
            fields.password = password_from_env_or_prompt()?;
        }
        fields.validate()?;

        self.service
            .update(&id, &fields)
            .await
            .context(notify::UPDATE_FAILED)?;
        println!("✅ {}", notify::UPDATED);
        Ok(())
    }

    pub async fn handle_rm(&self, id: &str) -> Result<()> {
        self.service
            .delete(&RecordId::from(id))
            .await
            .context(notify::DELETE_FAILED)?;
        println!("🗑️ {}", notify::DELETED);
        Ok(())
    }

    pub async fn handle_copy(&self, id: &str, opts: CopyOptions) -> Result<()> {
        let record = self
            .service
            .get_by_id(&RecordId::from(id))
            .await
            .context(notify::RECORD_FAILED)?;

        if opts.echo {
            println!("{}", opts.field.of(&record).expose_secret());
        }
        if opts.no_copy {
            return Ok(());
        }

        if let Some(hint) = session_warning() {
            eprintln!("⚠️ {hint}");
        }
        let engine = match SystemClipboard::open() {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("⚠️ {}: {e}", notify::CLIPBOARD_UNAVAILABLE);
                return Ok(());
            }
        };
        let mut clipboard = Clipboard::new(Arc::new(engine), resolve_ttl(self.config, opts.ttl));
        clipboard.copy_from(&record, opts.field)?;
        eprintln!(
            "📋 {} {} ({}s)",
            opts.field.label(),
            notify::COPIED,
            clipboard.ttl().as_secs()
        );

        // The restore runs on its own thread; stay alive until it reports.
        match clipboard.next_report(Duration::from_secs(2)).await {
            Some(report) => match report.outcome {
                Restore::Restored | Restore::Cleared => eprintln!("🧹 Clipboard restored"),
                Restore::Skipped => eprintln!("ℹ️ Clipboard changed since the copy; left as is"),
                Restore::Failed(reason) => {
                    eprintln!("⚠️ {}: {reason}", notify::CLIPBOARD_RESTORE_FAILED)
                }
                Restore::Superseded => {}
            },
            None => eprintln!("⚠️ {}", notify::CLIPBOARD_RESTORE_FAILED),
        }
        Ok(())
    }
}

pub fn list_json(records: &[RecordSummary], show_users: bool) -> serde_json::Value {
    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|r| {
            if show_users {
                json!({"id": r.id, "name": r.name, "url": r.url, "username": r.username})
            } else {
                json!({"id": r.id, "name": r.name})
            }
        })
        .collect();
    serde_json::Value::Array(items)
}

pub fn list_lines(records: &[RecordSummary], show_users: bool) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            if show_users {
                format!("{}\t{}\t{}\t{}", r.id, r.name, r.url, r.username)
            } else {
                format!("{}\t{}", r.id, r.name)
            }
        })
        .collect()
}

fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Text::new(label).prompt()?),
    }
}

fn password_from_env_or_prompt() -> Result<SecretString> {
    if let Ok(pw) = env::var("PASSCARD_PASSWORD") {
        if !pw.is_empty() {
            return Ok(SecretString::from(pw));
        }
    }
    let pw = Password::new("Password").prompt()?;
    Ok(SecretString::from(pw))
}
