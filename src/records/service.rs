use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::records::models::{Record, RecordFields, RecordId, RecordSummary};

pub const RESOURCE_PATH: &str = "/password-card";

/// Maps the record CRUD verbs onto the `password-card` resource.
#[derive(Clone)]
pub struct RecordService {
    api: ApiClient,
}

impl RecordService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All records in backend order. Passwords may be withheld.
    pub async fn list(&self) -> Result<Vec<RecordSummary>, ApiError> {
        let records: Vec<RecordSummary> = self.api.get(RESOURCE_PATH).await?;
        info!(count = records.len(), "listed records");
        Ok(records)
    }

    /// The full record, password included.
    pub async fn get_by_id(&self, id: &RecordId) -> Result<Record, ApiError> {
        self.api.get(&record_path(id)).await
    }

    pub async fn create(&self, fields: &RecordFields) -> Result<Record, ApiError> {
        let created: Record = self.api.post(RESOURCE_PATH, fields).await?;
        info!(id = %created.id, "created record");
        Ok(created)
    }

    /// Replaces all four editable fields at once.
    pub async fn update(&self, id: &RecordId, fields: &RecordFields) -> Result<Record, ApiError> {
        let updated: Record = self.api.put(&record_path(id), fields).await?;
        info!(id = %updated.id, "updated record");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.api.delete(&record_path(id)).await?;
        info!(id = %id, "deleted record");
        Ok(())
    }
}

pub fn record_path(id: &RecordId) -> String {
    format!("{RESOURCE_PATH}/{}", urlencoding::encode(id.as_str()))
}
