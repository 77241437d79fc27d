use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct InspectionItemTemplate {
    pub id: Uuid,
    pub shop_id: Option<Uuid>,
    pub category: String,
    pub component: String,
    pub default_priority: i16,
    pub measurement_required: bool,
    pub measurement_unit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
