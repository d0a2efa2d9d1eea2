use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::records::{Field, Record, RecordFields, RecordId, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit { id: RecordId },
}

/// Whether the draft holds the backend's full record yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hydration {
    Ready,
    Pending,
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("form is not ready yet")]
    NotReady,
    #[error("save already in progress")]
    Saving,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Add/edit form bound to a local draft of the four editable fields.
pub struct EditDialog {
    mode: DialogMode,
    ticket: u64,
    hydration: Hydration,
    focus: Field,
    name: String,
    url: String,
    username: String,
    password: Zeroizing<String>,
    show_password: bool,
    saving: bool,
}

impl EditDialog {
    pub fn create() -> Self {
        Self::blank(DialogMode::Create, Hydration::Ready)
    }

    /// Edit mode starts blank and disabled until the full record arrives.
    pub fn edit(id: RecordId) -> Self {
        Self::blank(DialogMode::Edit { id }, Hydration::Pending)
    }

    fn blank(mode: DialogMode, hydration: Hydration) -> Self {
        Self {
            mode,
            ticket: 0,
            hydration,
            focus: Field::Name,
            name: String::new(),
            url: String::new(),
            username: String::new(),
            password: Zeroizing::new(String::new()),
            show_password: false,
            saving: false,
        }
    }

    /// Tags this dialog instance so save outcomes can be matched to it.
    pub fn with_ticket(mut self, ticket: u64) -> Self {
        self.ticket = ticket;
        self
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn mode(&self) -> &DialogMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            DialogMode::Edit { id } => Some(id),
            DialogMode::Create => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Add Password",
            DialogMode::Edit { .. } => "Edit Password",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Add Password",
            DialogMode::Edit { .. } => "Save Changes",
        }
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    pub fn is_editable(&self) -> bool {
        self.hydration == Hydration::Ready && !self.saving
    }

    /// Fills the draft from the by-id fetch. Returns false when the record is
    /// not the one this dialog is waiting for.
    pub fn hydrate(&mut self, record: &Record) -> bool {
        let waiting = matches!(&self.mode, DialogMode::Edit { id } if *id == record.id)
            && self.hydration == Hydration::Pending;
        if !waiting {
            return false;
        }
        let fields = &record.fields;
        self.name = fields.name.clone();
        self.url = fields.url.clone();
        self.username = fields.username.clone();
        self.password = Zeroizing::new(fields.password.expose_secret().to_string());
        self.hydration = Hydration::Ready;
        true
    }

    pub fn hydration_failed(&mut self, id: &RecordId) -> bool {
        if self.editing_id() == Some(id) && self.hydration == Hydration::Pending {
            self.hydration = Hydration::Failed;
            return true;
        }
        false
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Url => &self.url,
            Field::Username => &self.username,
            Field::Password => self.password.as_str(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Url => &mut self.url,
            Field::Username => &mut self.username,
            Field::Password => &mut *self.password,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.is_editable() || c.is_control() {
            return;
        }
        let focus = self.focus;
        self.slot(focus).push(c);
    }

    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        let focus = self.focus;
        self.slot(focus).pop();
    }

    pub fn set_value(&mut self, field: Field, value: &str) {
        if !self.is_editable() {
            return;
        }
        let slot = self.slot(field);
        slot.clear();
        slot.push_str(value);
    }

    pub fn show_password(&self) -> bool {
        self.show_password
    }

    /// Display-only; the draft is untouched.
    pub fn toggle_reveal(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_display(&self) -> String {
        if self.show_password {
            self.password.as_str().to_string()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }

    /// The full draft password, whatever the reveal state.
    pub fn password_for_copy(&self) -> SecretString {
        SecretString::from(self.password.as_str().to_string())
    }

    /// The four fields to save. Never includes an id.
    pub fn submission(&self) -> Result<RecordFields, SubmitError> {
        if self.saving {
            return Err(SubmitError::Saving);
        }
        if self.hydration != Hydration::Ready {
            return Err(SubmitError::NotReady);
        }
        let fields = RecordFields {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            username: self.username.trim().to_string(),
            password: SecretString::from(self.password.as_str().to_string()),
        };
        fields.validate()?;
        Ok(fields)
    }
}
