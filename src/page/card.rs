use secrecy::ExposeSecret;

use crate::records::RecordSummary;

/// Fixed-length placeholder shown instead of a password.
pub const PASSWORD_MASK: &str = "••••••••••••";

/// Read-only view of one record. Revealing only switches which value is
/// shown; it never asks the backend for anything.
#[derive(Debug, Clone, Copy)]
pub struct CardView<'a> {
    record: &'a RecordSummary,
    reveal_control: bool,
    revealed: bool,
}

impl<'a> CardView<'a> {
    pub fn new(record: &'a RecordSummary) -> Self {
        Self {
            record,
            reveal_control: false,
            revealed: false,
        }
    }

    pub fn with_reveal(mut self, revealed: bool) -> Self {
        self.reveal_control = true;
        self.revealed = revealed;
        self
    }

    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    pub fn url(&self) -> &'a str {
        &self.record.url
    }

    pub fn username(&self) -> &'a str {
        &self.record.username
    }

    pub fn has_reveal_control(&self) -> bool {
        self.reveal_control
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal_control && self.revealed
    }

    /// The list payload left the password out, so revealing shows nothing new.
    pub fn password_withheld(&self) -> bool {
        self.record.password.is_withheld()
    }

    pub fn password_display(&self) -> String {
        match (self.is_revealed(), self.record.password.secret()) {
            (true, Some(secret)) => secret.expose_secret().to_string(),
            _ => PASSWORD_MASK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ListedPassword, RecordId};
    use secrecy::SecretString;

    fn record(password: ListedPassword) -> RecordSummary {
        RecordSummary {
            id: RecordId::from("1"),
            name: "GitHub".into(),
            url: "https://github.com".into(),
            username: "alice".into(),
            password,
        }
    }

    #[test]
    fn mask_is_twelve_bullets() {
        assert_eq!(PASSWORD_MASK.chars().count(), 12);
    }

    #[test]
    fn reveal_switches_between_mask_and_value() {
        let r = record(ListedPassword::Present(SecretString::from("p@ss1")));
        assert_eq!(CardView::new(&r).with_reveal(false).password_display(), PASSWORD_MASK);
        assert_eq!(CardView::new(&r).with_reveal(true).password_display(), "p@ss1");
    }

    #[test]
    fn card_without_control_never_reveals() {
        let r = record(ListedPassword::Present(SecretString::from("p@ss1")));
        let card = CardView::new(&r);
        assert!(!card.has_reveal_control());
        assert!(!card.is_revealed());
        assert_eq!(card.password_display(), PASSWORD_MASK);
    }

    #[test]
    fn withheld_password_stays_masked_when_revealed() {
        let r = record(ListedPassword::Withheld);
        let card = CardView::new(&r).with_reveal(true);
        assert!(card.password_withheld());
        assert_eq!(card.password_display(), PASSWORD_MASK);
    }
}
