use chrono::{DateTime, Utc};
use r2e::r2e_data::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a photo attached to an inspection item. The
/// byte stream and `storage_key` come from the external photo-storage
/// collaborator — this row never holds the bytes themselves.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub inspection_item_id: Uuid,
    pub storage_key: String,
    pub url: String,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Photo {
    type Id = Uuid;

    fn table_name() -> &'static str {
        "photos"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "inspection_item_id", "storage_key", "url", "content_type", "created_at"]
    }

    fn id(&self) -> &Uuid {
        &self.id
    }
}
