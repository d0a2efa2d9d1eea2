use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Backend-assigned record identifier. Opaque to the client; numeric ids are
/// accepted on the wire and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Unsigned(n) => RecordId(n.to_string()),
            RawId::Signed(n) => RecordId(n.to_string()),
        })
    }
}

/// The editable fields of a record, as posted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFields {
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(with = "crate::records::secret_string")]
    pub password: SecretString,
}

impl RecordFields {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Checks the same constraints the form enforces before a request is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        validate_url(&self.url)
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Url => &self.url,
            Field::Username => &self.username,
            Field::Password => self.password.expose_secret(),
        }
    }
}

impl PartialEq for RecordFields {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

/// A full record as returned by the single-record endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl Record {
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            name: self.fields.name.clone(),
            url: self.fields.url.clone(),
            username: self.fields.username.clone(),
            password: ListedPassword::Present(self.fields.password.clone()),
        }
    }
}

/// Password as it appears in a list response: either carried along or left out.
#[derive(Debug, Clone, Default)]
pub enum ListedPassword {
    Present(SecretString),
    #[default]
    Withheld,
}

impl ListedPassword {
    pub fn secret(&self) -> Option<&SecretString> {
        match self {
            ListedPassword::Present(s) => Some(s),
            ListedPassword::Withheld => None,
        }
    }

    pub fn is_withheld(&self) -> bool {
        matches!(self, ListedPassword::Withheld)
    }
}

impl<'de> Deserialize<'de> for ListedPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            Some(s) if !s.is_empty() => ListedPassword::Present(SecretString::from(s)),
            _ => ListedPassword::Withheld,
        })
    }
}

/// A row from the list endpoint. The password may be withheld.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: ListedPassword,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Url,
    Username,
    Password,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Url, Field::Username, Field::Password];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Url => "URL",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    pub fn next(self) -> Field {
        match self {
            Field::Name => Field::Url,
            Field::Url => Field::Username,
            Field::Username => Field::Password,
            Field::Password => Field::Name,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Name => Field::Password,
            Field::Url => Field::Name,
            Field::Username => Field::Url,
            Field::Password => Field::Username,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingField(Field),
    #[error("URL must be an absolute http(s) address")]
    InvalidUrl,
}

fn validate_url(raw: &str) -> Result<(), ValidationError> {
    match url::Url::parse(raw.trim()) {
        Ok(u) if u.has_host() && matches!(u.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl),
    }
}
