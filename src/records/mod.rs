pub mod filter;
pub mod models;
pub mod secret_string;
pub mod service;

pub use models::{Field, ListedPassword, Record, RecordFields, RecordId, RecordSummary, ValidationError};
pub use service::RecordService;
