use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, JsonSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Draft,
    InProgress,
    Completed,
    Sent,
    Archived,
}

impl InspectionStatus {
    /// Ordered lifecycle: only the next state in this list
    /// may be entered from the current one.
    pub fn next(&self) -> Option<InspectionStatus> {
        match self {
            InspectionStatus::Draft => Some(InspectionStatus::InProgress),
            InspectionStatus::InProgress => Some(InspectionStatus::Completed),
            InspectionStatus::Completed => Some(InspectionStatus::Sent),
            InspectionStatus::Sent => Some(InspectionStatus::Archived),
            InspectionStatus::Archived => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InspectionStatus::Sent | InspectionStatus::Archived)
    }

    /// The wire representation used wherever this status is rendered as a bare
    /// string rather than through `Serialize` (e.g. the portal projection).
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Draft => "draft",
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Sent => "sent",
            InspectionStatus::Archived => "archived",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inspection {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub technician_id: Uuid,
    pub inspection_number: String,
    pub status: InspectionStatus,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateInspectionRequest {
    pub vehicle_id: Uuid,
    pub shop_id: Uuid,
    pub inspection_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateInspectionRequest {
    pub status: Option<InspectionStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
pub struct InspectionListFilters {
    pub shop_id: Option<Uuid>,
    pub status: Option<InspectionStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::InspectionStatus;

    #[test]
    fn lifecycle_advances_one_step_at_a_time() {
        assert_eq!(InspectionStatus::Draft.next(), Some(InspectionStatus::InProgress));
        assert_eq!(InspectionStatus::InProgress.next(), Some(InspectionStatus::Completed));
        assert_eq!(InspectionStatus::Completed.next(), Some(InspectionStatus::Sent));
        assert_eq!(InspectionStatus::Sent.next(), Some(InspectionStatus::Archived));
        assert_eq!(InspectionStatus::Archived.next(), None);
    }

    #[test]
    fn only_sent_and_archived_are_terminal() {
        assert!(!InspectionStatus::Draft.is_terminal());
        assert!(!InspectionStatus::InProgress.is_terminal());
        assert!(!InspectionStatus::Completed.is_terminal());
        assert!(InspectionStatus::Sent.is_terminal());
        assert!(InspectionStatus::Archived.is_terminal());
    }

    #[test]
    fn as_str_matches_serde_snake_case_rendering() {
        for status in [
            InspectionStatus::Draft,
            InspectionStatus::InProgress,
            InspectionStatus::Completed,
            InspectionStatus::Sent,
            InspectionStatus::Archived,
        ] {
            let serialized = serde_json::to_value(status).unwrap();
            assert_eq!(serialized.as_str().unwrap(), status.as_str());
        }
    }
}
