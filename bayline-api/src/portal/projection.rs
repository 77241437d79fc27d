use chrono::{DateTime, Utc};
use serde::Serialize;

/// The redacted read model returned by `GET /api/portal/:token`.
/// Carries no `shop_id`, no `checked_by` ids, and no User id other than
/// the technician's display name.
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PortalProjection {
    pub inspection_number: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub vehicle: VehicleView,
    pub customer: CustomerView,
    pub shop: ShopView,
    pub technician_name: String,
    pub items: Vec<ItemView>,
    pub summary: PortalSummary,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct VehicleView {
    pub year: i32,
    pub make: String,
    pub model: String,
    pub license_plate: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CustomerView {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ShopView {
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ItemView {
    pub category: String,
    pub component: String,
    pub status: String,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub recommendation: Option<String>,
    pub estimated_cost: Option<f64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PortalSummary {
    pub total_items: i64,
    pub ok_items: i64,
    pub issue_items: i64,
    pub urgent_items: i64,
}

/// `ok` is `condition == green` or `status == not_applicable` — this data
/// model has no item-level "good" status the way the literal wording
/// assumes; condition is the closest equivalent (see DESIGN.md).
pub fn summarize(items: &[ItemView]) -> PortalSummary {
    let total_items = items.len() as i64;
    let ok_items = items
        .iter()
        .filter(|i| i.condition.as_deref() == Some("green") || i.status == "not_applicable")
        .count() as i64;
    let issue_items = total_items - ok_items;
    let urgent_items = items
        .iter()
        .filter(|i| i.condition.as_deref() == Some("red"))
        .count() as i64;
    PortalSummary {
        total_items,
        ok_items,
        issue_items,
        urgent_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: &str, condition: Option<&str>) -> ItemView {
        ItemView {
            category: "brakes".into(),
            component: "front pads".into(),
            status: status.into(),
            condition: condition.map(String::from),
            notes: None,
            recommendation: None,
            estimated_cost: None,
        }
    }

    #[test]
    fn counts_green_and_not_applicable_as_ok() {
        let items = vec![
            item("checked", Some("green")),
            item("not_applicable", None),
            item("checked", Some("yellow")),
            item("checked", Some("red")),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.ok_items, 2);
        assert_eq!(summary.issue_items, 2);
        assert_eq!(summary.urgent_items, 1);
    }

    #[test]
    fn empty_item_list_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.ok_items, 0);
        assert_eq!(summary.issue_items, 0);
        assert_eq!(summary.urgent_items, 0);
    }
}
