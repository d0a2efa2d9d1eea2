//! Main page state: the cached record list, the search box, per-card reveal
//! toggles, the add/edit dialog and the footer notifications.
//!
//! The page never talks to the backend itself. Intents return [`Effect`]s,
//! whoever owns the page runs them, and the results come back through
//! [`MainPage::apply`].

pub mod cache;
pub mod card;
pub mod dialog;
pub mod effects;
pub mod notify;

use secrecy::SecretString;
use std::collections::HashSet;
use tracing::debug;

use crate::clipboard::{ClipField, Clipboard, Restore};
use crate::records::filter::filter_by_name;
use crate::records::{RecordId, RecordSummary};

use self::cache::{ListCache, Resolution};
use self::card::CardView;
use self::dialog::{DialogMode, EditDialog, SubmitError};
pub use self::effects::{run_effect, settle, Effect, Outcome};
use self::notify::{Notification, Notifier};

pub struct PageOptions {
    pub reveal_control: bool,
    /// `None` when no clipboard could be opened; copies then report failure.
    pub clipboard: Option<Clipboard>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            reveal_control: true,
            clipboard: None,
        }
    }
}

/// What the body of the page shows right now.
pub enum PageView<'a> {
    Loading,
    LoadFailed,
    NoResults,
    Cards(Vec<CardView<'a>>),
}

pub struct MainPage {
    cache: ListCache,
    search_query: String,
    visible: Vec<usize>,
    selected: usize,
    dialog: Option<EditDialog>,
    dialog_seq: u64,
    editing: Option<RecordSummary>,
    revealed: HashSet<RecordId>,
    notifier: Notifier,
    options: PageOptions,
}

impl MainPage {
    pub fn new(options: PageOptions) -> Self {
        Self {
            cache: ListCache::default(),
            search_query: String::new(),
            visible: Vec::new(),
            selected: 0,
            dialog: None,
            dialog_seq: 0,
            editing: None,
            revealed: HashSet::new(),
            notifier: Notifier::default(),
            options,
        }
    }

    /// First fetch of the list. Later calls are no-ops.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.cache.has_fetched() {
            return Vec::new();
        }
        vec![Effect::FetchList {
            generation: self.cache.begin_fetch(),
        }]
    }

    /// Manual refresh: invalidate and re-fetch.
    pub fn refresh(&mut self) -> Vec<Effect> {
        self.invalidate()
    }

    fn invalidate(&mut self) -> Vec<Effect> {
        vec![Effect::FetchList {
            generation: self.cache.invalidate(),
        }]
    }

    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    pub fn records(&self) -> &[RecordSummary] {
        self.cache.records()
    }

    // ----- search -----

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.recompute();
    }

    pub fn push_search(&mut self, c: char) {
        self.search_query.push(c);
        self.recompute();
    }

    pub fn pop_search(&mut self) {
        self.search_query.pop();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = filter_by_name(self.cache.records(), &self.search_query);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    pub fn visible_records(&self) -> Vec<&RecordSummary> {
        let records = self.cache.records();
        self.visible.iter().map(|&i| &records[i]).collect()
    }

    pub fn visible_names(&self) -> Vec<String> {
        self.visible_records()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn view(&self) -> PageView<'_> {
        if self.cache.is_loading() {
            return PageView::Loading;
        }
        if self.cache.data().is_none() {
            return PageView::LoadFailed;
        }
        if self.visible.is_empty() {
            return PageView::NoResults;
        }
        PageView::Cards(
            self.visible_records()
                .into_iter()
                .map(|r| self.card(r))
                .collect(),
        )
    }

    fn card<'a>(&self, record: &'a RecordSummary) -> CardView<'a> {
        let card = CardView::new(record);
        if self.options.reveal_control {
            card.with_reveal(self.revealed.contains(&record.id))
        } else {
            card
        }
    }

    // ----- selection -----

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&RecordSummary> {
        let idx = *self.visible.get(self.selected)?;
        self.cache.records().get(idx)
    }

    /// Moves the selection by `delta` cards, clamped to the visible range.
    pub fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, last as isize) as usize;
    }

    // ----- card actions -----

    pub fn is_revealed(&self, id: &RecordId) -> bool {
        self.revealed.contains(id)
    }

    /// Flips the reveal toggle of one card. Display state only.
    pub fn toggle_reveal(&mut self, id: &RecordId) {
        if !self.options.reveal_control {
            return;
        }
        if !self.revealed.remove(id) {
            self.revealed.insert(id.clone());
        }
    }

    pub fn toggle_selected_reveal(&mut self) {
        if let Some(id) = self.selected_record().map(|r| r.id.clone()) {
            self.toggle_reveal(&id);
        }
    }

    pub fn copy_username(&mut self, id: &RecordId) {
        let username = self
            .cache
            .records()
            .iter()
            .find(|r| &r.id == id)
            .map(|r| SecretString::from(r.username.clone()));
        if let Some(value) = username {
            self.copy(ClipField::Username, &value);
        }
    }

    pub fn copy_selected_username(&mut self) {
        if let Some(id) = self.selected_record().map(|r| r.id.clone()) {
            self.copy_username(&id);
        }
    }

    fn copy(&mut self, field: ClipField, value: &SecretString) {
        let result = match &self.options.clipboard {
            Some(clipboard) => clipboard.copy(field, value),
            None => Err(anyhow::anyhow!("no clipboard")),
        };
        match result {
            Ok(()) => self.notifier.success(notify::COPIED),
            Err(e) => {
                debug!(error = %e, "copy failed");
                self.notifier.error(notify::CLIPBOARD_UNAVAILABLE);
            }
        }
    }

    fn collect_restores(&mut self) {
        let Some(clipboard) = self.options.clipboard.as_mut() else {
            return;
        };
        for report in clipboard.drain_reports() {
            if let Restore::Failed(reason) = &report.outcome {
                debug!(field = report.field.label(), %reason, "restore failed");
                self.notifier.error(notify::CLIPBOARD_RESTORE_FAILED);
            }
        }
    }

    /// Immediate delete: there is no confirmation step.
    pub fn delete(&mut self, id: RecordId) -> Vec<Effect> {
        debug!(%id, "delete requested");
        vec![Effect::Delete { id }]
    }

    pub fn delete_selected(&mut self) -> Vec<Effect> {
        match self.selected_record().map(|r| r.id.clone()) {
            Some(id) => self.delete(id),
            None => Vec::new(),
        }
    }

    // ----- dialog -----

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn dialog(&self) -> Option<&EditDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut EditDialog> {
        self.dialog.as_mut()
    }

    /// The summary the dialog was opened for; `None` in create mode.
    pub fn editing_record(&self) -> Option<&RecordSummary> {
        self.editing.as_ref()
    }

    pub fn open_add(&mut self) -> Vec<Effect> {
        self.editing = None;
        let ticket = self.next_ticket();
        self.dialog = Some(EditDialog::create().with_ticket(ticket));
        Vec::new()
    }

    /// Opens the dialog for `record` and asks for the full record, since the
    /// listed password may be withheld.
    pub fn open_edit(&mut self, record: &RecordSummary) -> Vec<Effect> {
        self.editing = Some(record.clone());
        let ticket = self.next_ticket();
        self.dialog = Some(EditDialog::edit(record.id.clone()).with_ticket(ticket));
        vec![Effect::FetchRecord {
            id: record.id.clone(),
        }]
    }

    pub fn open_edit_selected(&mut self) -> Vec<Effect> {
        match self.selected_record().cloned() {
            Some(record) => self.open_edit(&record),
            None => Vec::new(),
        }
    }

    fn next_ticket(&mut self) -> u64 {
        self.dialog_seq += 1;
        self.dialog_seq
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.editing = None;
    }

    pub fn copy_dialog_password(&mut self) {
        if let Some(secret) = self.dialog.as_ref().map(EditDialog::password_for_copy) {
            self.copy(ClipField::Password, &secret);
        }
    }

    pub fn submit_dialog(&mut self) -> Vec<Effect> {
        let Some(dialog) = self.dialog.as_mut() else {
            return Vec::new();
        };
        let fields = match dialog.submission() {
            Ok(fields) => fields,
            Err(SubmitError::Invalid(e)) => {
                self.notifier.error(e.to_string());
                return Vec::new();
            }
            Err(_) => return Vec::new(),
        };
        dialog.set_saving(true);
        let ticket = dialog.ticket();
        match dialog.mode().clone() {
            DialogMode::Create => vec![Effect::Create { ticket, fields }],
            DialogMode::Edit { id } => vec![Effect::Update { ticket, id, fields }],
        }
    }

    /// Settles the dialog that issued save `ticket`, if it is still open.
    /// A dialog opened since then is left alone.
    fn finish_save(&mut self, ticket: u64, succeeded: bool) {
        let waiting = self
            .dialog
            .as_ref()
            .is_some_and(|d| d.ticket() == ticket && d.is_saving());
        if !waiting {
            debug!(ticket, "save outcome for a closed dialog");
            return;
        }
        if succeeded {
            self.close_dialog();
        } else if let Some(d) = self.dialog.as_mut() {
            d.set_saving(false);
        }
    }

    // ----- outcomes -----

    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::ListLoaded { generation, result } => {
                match self.cache.resolve(generation, result) {
                    Resolution::Applied => {
                        let present: HashSet<&RecordId> =
                            self.cache.records().iter().map(|r| &r.id).collect();
                        self.revealed.retain(|id| present.contains(id));
                        self.recompute();
                    }
                    Resolution::Failed => self.notifier.error(notify::LIST_FAILED),
                    Resolution::Superseded => debug!(generation, "dropping superseded list"),
                }
                Vec::new()
            }
            Outcome::RecordLoaded { id, result } => {
                if let Some(dialog) = self.dialog.as_mut() {
                    match result {
                        Ok(record) => {
                            dialog.hydrate(&record);
                        }
                        Err(_) => {
                            if dialog.hydration_failed(&id) {
                                self.notifier.error(notify::RECORD_FAILED);
                            }
                        }
                    }
                }
                Vec::new()
            }
            Outcome::Created { ticket, result } => {
                let ok = result.is_ok();
                self.finish_save(ticket, ok);
                if ok {
                    self.notifier.success(notify::SAVED);
                    self.invalidate()
                } else {
                    self.notifier.error(notify::SAVE_FAILED);
                    Vec::new()
                }
            }
            Outcome::Updated { ticket, result, .. } => {
                let ok = result.is_ok();
                self.finish_save(ticket, ok);
                if ok {
                    self.notifier.success(notify::UPDATED);
                    self.invalidate()
                } else {
                    self.notifier.error(notify::UPDATE_FAILED);
                    Vec::new()
                }
            }
            Outcome::Deleted { id, result } => {
                if result.is_ok() {
                    self.revealed.remove(&id);
                    self.notifier.success(notify::DELETED);
                    self.invalidate()
                } else {
                    self.notifier.error(notify::DELETE_FAILED);
                    Vec::new()
                }
            }
        }
    }

    // ----- notifications -----

    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifier.history()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifier.last()
    }

    /// Advances the toast timer and picks up finished clipboard restores.
    pub fn tick(&mut self) {
        self.notifier.tick();
        self.collect_restores();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::records::{ListedPassword, Record, RecordFields};

    fn row(id: &str, name: &str) -> RecordSummary {
        RecordSummary {
            id: RecordId::from(id),
            name: name.into(),
            url: "https://example.com".into(),
            username: format!("{name}-user"),
            password: ListedPassword::Withheld,
        }
    }

    fn loaded(rows: Vec<RecordSummary>) -> MainPage {
        let mut page = MainPage::new(PageOptions::default());
        let effects = page.mount();
        let Effect::FetchList { generation } = effects[0] else {
            panic!("expected list fetch");
        };
        page.apply(Outcome::ListLoaded {
            generation,
            result: Ok(rows),
        });
        page
    }

    #[test]
    fn mount_fetches_once_and_shows_loading() {
        let mut page = MainPage::new(PageOptions::default());
        assert_eq!(page.mount().len(), 1);
        assert!(matches!(page.view(), PageView::Loading));
        assert!(page.mount().is_empty());
    }

    #[test]
    fn search_filters_names_and_clamps_selection() {
        let mut page = loaded(vec![row("1", "alpha"), row("2", "beta"), row("3", "gamma")]);
        page.move_selection(2);
        assert_eq!(page.selected(), 2);
        page.push_search('B');
        assert_eq!(page.visible_names(), vec!["beta"]);
        assert_eq!(page.selected(), 0);
        page.pop_search();
        assert_eq!(page.visible_names().len(), 3);
    }

    #[test]
    fn empty_filter_result_is_no_results() {
        let mut page = loaded(vec![row("1", "alpha")]);
        page.set_search("zzz");
        assert!(matches!(page.view(), PageView::NoResults));
    }

    #[test]
    fn initial_failure_shows_failed_state() {
        let mut page = MainPage::new(PageOptions::default());
        let Effect::FetchList { generation } = page.mount()[0] else {
            panic!("expected list fetch");
        };
        page.apply(Outcome::ListLoaded {
            generation,
            result: Err(ApiError::Network("down".into())),
        });
        assert!(matches!(page.view(), PageView::LoadFailed));
        assert_eq!(page.last_notification().unwrap().message, notify::LIST_FAILED);
    }

    #[test]
    fn open_edit_requests_full_record_and_tracks_summary() {
        let mut page = loaded(vec![row("7", "bank")]);
        let effects = page.open_edit_selected();
        assert!(matches!(&effects[..], [Effect::FetchRecord { id }] if id.as_str() == "7"));
        assert_eq!(page.editing_record().unwrap().name, "bank");
        assert!(!page.dialog().unwrap().is_editable());
    }

    #[test]
    fn stale_record_response_does_not_hydrate_new_dialog() {
        let mut page = loaded(vec![row("1", "a"), row("2", "b")]);
        page.open_edit(&row("1", "a"));
        page.close_dialog();
        page.open_edit(&row("2", "b"));
        page.apply(Outcome::RecordLoaded {
            id: RecordId::from("1"),
            result: Ok(Record {
                id: RecordId::from("1"),
                fields: RecordFields::new("a", "https://a.io", "u", "pw-a"),
            }),
        });
        assert!(!page.dialog().unwrap().is_editable());
    }

    #[test]
    fn failed_save_keeps_dialog_open_for_retry() {
        let mut page = loaded(vec![]);
        page.open_add();
        let d = page.dialog_mut().unwrap();
        d.set_value(crate::records::Field::Name, "n");
        d.set_value(crate::records::Field::Url, "https://n.io");
        d.set_value(crate::records::Field::Username, "u");
        d.set_value(crate::records::Field::Password, "p");
        let effects = page.submit_dialog();
        let [Effect::Create { ticket, .. }] = effects[..] else {
            panic!("expected a create");
        };
        assert!(page.submit_dialog().is_empty(), "second submit while saving");
        let follow_up = page.apply(Outcome::Created {
            ticket,
            result: Err(ApiError::Server {
                status: 500,
                message: "x".into(),
            }),
        });
        assert!(follow_up.is_empty());
        assert!(page.is_dialog_open());
        assert!(page.dialog().unwrap().is_editable());
        assert_eq!(page.last_notification().unwrap().message, notify::SAVE_FAILED);
    }

    fn fill(page: &mut MainPage, name: &str) {
        let d = page.dialog_mut().unwrap();
        d.set_value(crate::records::Field::Name, name);
        d.set_value(crate::records::Field::Url, "https://n.io");
        d.set_value(crate::records::Field::Username, "u");
        d.set_value(crate::records::Field::Password, "p");
    }

    fn ticket_of(effects: &[Effect]) -> u64 {
        match effects {
            [Effect::Create { ticket, .. }] | [Effect::Update { ticket, .. }] => *ticket,
            other => panic!("expected one save, got {other:?}"),
        }
    }

    #[test]
    fn save_outcome_of_a_closed_dialog_leaves_the_new_one_alone() {
        let mut page = loaded(vec![row("2", "b")]);

        page.open_add();
        fill(&mut page, "new");
        let create = ticket_of(&page.submit_dialog());
        page.close_dialog();

        page.open_edit(&row("2", "b"));
        page.apply(Outcome::RecordLoaded {
            id: RecordId::from("2"),
            result: Ok(Record {
                id: RecordId::from("2"),
                fields: RecordFields::new("b", "https://b.io", "u", "pw-b"),
            }),
        });
        let update = ticket_of(&page.submit_dialog());
        assert_ne!(create, update);

        // The earlier create succeeds: notified and refetched, edit stays saving.
        let follow_up = page.apply(Outcome::Created {
            ticket: create,
            result: Ok(Record {
                id: RecordId::from("3"),
                fields: RecordFields::new("new", "https://n.io", "u", "p"),
            }),
        });
        assert_eq!(follow_up.len(), 1);
        assert_eq!(page.last_notification().unwrap().message, notify::SAVED);
        assert!(page.is_dialog_open());
        assert!(page.dialog().unwrap().is_saving());

        // A failed one must not re-enable submit while the update is in flight.
        page.apply(Outcome::Created {
            ticket: create,
            result: Err(ApiError::Network("down".into())),
        });
        assert!(page.dialog().unwrap().is_saving());
        assert!(page.submit_dialog().is_empty());

        page.apply(Outcome::Updated {
            ticket: update,
            id: RecordId::from("2"),
            result: Ok(Record {
                id: RecordId::from("2"),
                fields: RecordFields::new("b", "https://b.io", "u", "pw-b"),
            }),
        });
        assert!(!page.is_dialog_open());
        assert_eq!(page.last_notification().unwrap().message, notify::UPDATED);
    }

    #[test]
    fn invalid_submit_notifies_without_effects() {
        let mut page = loaded(vec![]);
        page.open_add();
        assert!(page.submit_dialog().is_empty());
        assert_eq!(page.last_notification().unwrap().message, "Name is required");
    }

    #[test]
    fn reveal_toggle_is_local_only() {
        let mut page = loaded(vec![row("1", "a")]);
        let id = RecordId::from("1");
        page.toggle_reveal(&id);
        assert!(page.is_revealed(&id));
        page.toggle_reveal(&id);
        assert!(!page.is_revealed(&id));
    }

    #[test]
    fn reveal_disabled_without_control() {
        let mut page = MainPage::new(PageOptions {
            reveal_control: false,
            ..PageOptions::default()
        });
        let id = RecordId::from("1");
        page.toggle_reveal(&id);
        assert!(!page.is_revealed(&id));
    }

    #[test]
    fn copy_without_clipboard_reports_unavailable() {
        let mut page = loaded(vec![row("1", "a")]);
        page.copy_selected_username();
        assert_eq!(
            page.last_notification().unwrap().message,
            notify::CLIPBOARD_UNAVAILABLE
        );
    }
}
