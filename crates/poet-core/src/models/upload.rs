use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::StorageLocation;

/// An upload submitted by a user or an anonymous caller.
///
/// `location` is internal and never serialized to clients; see `UploadResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: Uuid,
    pub filename: String,
    /// Weak reference to the owning user; deleting the user keeps the upload.
    pub owner: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub location: Option<StorageLocation>,
}

impl UploadRecord {
    /// A fresh, not yet persisted record.
    pub fn new(filename: impl Into<String>, owner: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            owner,
            created_at: Utc::now(),
            location: None,
        }
    }

    /// True once bytes have been written and a non-empty location recorded.
    pub fn is_persisted(&self) -> bool {
        self.location
            .as_ref()
            .is_some_and(|location| !location.key.is_empty())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == Some(user_id)
    }
}

/// Client-facing view of an upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
}

impl From<&UploadRecord> for UploadResponse {
    fn from(record: &UploadRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename.clone(),
            created_at: record.created_at,
            owner: record.owner,
        }
    }
}

/// Public link to an upload stored in a public-read bucket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadLinkResponse {
    pub url: String,
}
