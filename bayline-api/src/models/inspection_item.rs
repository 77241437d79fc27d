use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, JsonSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Checked,
    NotApplicable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, JsonSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Green,
    Yellow,
    Red,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct InspectionItem {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub category: String,
    pub component: String,
    pub status: ItemStatus,
    pub condition: Option<Condition>,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<String>,
    pub notes: Option<String>,
    pub recommendations: Option<String>,
    pub estimated_cost: Option<f64>,
    pub priority: i16,
    pub requires_immediate_attention: bool,
    pub checked_by: Option<Uuid>,
    pub checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateInspectionItemRequest {
    pub category: String,
    pub component: String,
    #[serde(default)]
    pub priority: Option<i16>,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
pub struct ItemListFilters {
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    pub condition: Option<Condition>,
    pub priority: Option<i16>,
}

/// A partial update to one item. Every field is independently
/// optional; absent fields pass through unchanged.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct ItemPatch {
    pub status: Option<ItemStatus>,
    pub condition: Option<Condition>,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<String>,
    pub notes: Option<String>,
    pub recommendations: Option<String>,
    pub estimated_cost: Option<f64>,
    pub priority: Option<i16>,
    pub requires_immediate_attention: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BulkItemUpdate {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: ItemPatch,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BulkUpdateRequest {
    pub updates: Vec<BulkItemUpdate>,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct InspectionSummary {
    pub total_items: i64,
    pub by_status: std::collections::BTreeMap<String, i64>,
    pub by_condition: std::collections::BTreeMap<String, i64>,
    pub requires_immediate_attention: i64,
    pub completion_percentage: f64,
}
