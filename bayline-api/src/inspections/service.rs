use chrono::Utc;
use r2e::prelude::*;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::AuthIdentity;
use crate::error::AppError;
use crate::models::inspection::{CreateInspectionRequest, InspectionListFilters, InspectionStatus};
use crate::models::inspection_item::{
    BulkItemUpdate, Condition, CreateInspectionItemRequest, ItemListFilters, ItemPatch, ItemStatus,
};
use crate::models::{Inspection, InspectionItem, InspectionSummary, Vehicle};

const MAX_NUMBER_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
pub struct InspectionPage {
    pub rows: Vec<Inspection>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Clone)]
pub struct InspectionService {
    pool: PgPool,
}

#[bean]
impl InspectionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tenancy enforcement: admins may touch any shop; everyone
    /// else is confined to their own, regardless of what a request body claims.
    fn ensure_shop_access(caller: &AuthIdentity, shop_id: Uuid) -> Result<(), AppError> {
        if caller.can_access_shop(shop_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("not permitted for this shop".into()))
        }
    }

    async fn generate_number(
        tx: &mut sqlx::PgConnection,
        shop_id: Uuid,
    ) -> Result<String, AppError> {
        let year = Utc::now().format("%Y").to_string();
        let prefix = format!("CI-{year}-");
        let max_serial: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT MAX(inspection_number) FROM inspections \
             WHERE shop_id = $1 AND inspection_number LIKE $2",
        )
        .bind(shop_id)
        .bind(format!("{prefix}%"))
        .fetch_optional(&mut *tx)
        .await?;

        let next_serial = max_serial
            .and_then(|(s,)| s)
            .and_then(|s| s.rsplit('-').next().map(str::to_string))
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;

        Ok(format!("{prefix}{next_serial:06}"))
    }

    pub async fn create(
        &self,
        caller: &AuthIdentity,
        req: CreateInspectionRequest,
    ) -> Result<Inspection, AppError> {
        Self::ensure_shop_access(caller, req.shop_id)?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, customer_id, shop_id, year, make, model, vin, license_plate, color, mileage, created_at, updated_at \
             FROM vehicles WHERE id = $1",
        )
        .bind(req.vehicle_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Invalid("vehicle does not exist".into()))?;

        if vehicle.shop_id != req.shop_id {
            return Err(AppError::Invalid("vehicle belongs to a different shop".into()));
        }

        let mut attempt = 0;
        loop {
            let mut tx = self.pool.begin().await?;
            let number = Self::generate_number(&mut tx, req.shop_id).await?;
            // tx is used for both the number lookup and the insert below, inside the
            // same transaction, per the collision-retry rule.

            let result = sqlx::query_as::<_, Inspection>(
                "INSERT INTO inspections \
                 (id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, 'in_progress', $7, now(), now(), now()) \
                 RETURNING id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at",
            )
            .bind(Uuid::new_v4())
            .bind(req.shop_id)
            .bind(vehicle.customer_id)
            .bind(vehicle.id)
            .bind(caller.user_id)
            .bind(&number)
            .bind(&req.notes)
            .fetch_one(&mut *tx)
            .await;

            match result {
                Ok(inspection) => {
                    tx.commit().await?;
                    return Ok(inspection);
                }
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() && attempt < MAX_NUMBER_RETRIES => {
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn get(&self, caller: &AuthIdentity, inspection_id: Uuid) -> Result<Inspection, AppError> {
        let inspection = self.fetch(inspection_id).await?;
        Self::ensure_shop_access(caller, inspection.shop_id)?;
        Ok(inspection)
    }

    async fn fetch(&self, inspection_id: Uuid) -> Result<Inspection, AppError> {
        sqlx::query_as::<_, Inspection>(
            "SELECT id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at \
             FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("inspection not found".into()))
    }

    pub async fn list(
        &self,
        caller: &AuthIdentity,
        mut filters: InspectionListFilters,
    ) -> Result<InspectionPage, AppError> {
        if !caller.is_admin() {
            filters.shop_id = Some(caller.shop_id);
        } else if let Some(shop_id) = filters.shop_id {
            Self::ensure_shop_access(caller, shop_id)?;
        }

        let page = filters.page.unwrap_or(1).max(1);
        let limit = filters.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * limit;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM inspections \
             WHERE ($1::uuid IS NULL OR shop_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
               AND ($3::timestamptz IS NULL OR created_at >= $3) \
               AND ($4::timestamptz IS NULL OR created_at <= $4)",
        )
        .bind(filters.shop_id)
        .bind(filters.status)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Inspection>(
            "SELECT id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at \
             FROM inspections \
             WHERE ($1::uuid IS NULL OR shop_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
               AND ($3::timestamptz IS NULL OR created_at >= $3) \
               AND ($4::timestamptz IS NULL OR created_at <= $4) \
             ORDER BY created_at DESC \
             LIMIT $5 OFFSET $6",
        )
        .bind(filters.shop_id)
        .bind(filters.status)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let pages = if total.0 == 0 { 1 } else { (total.0 + limit - 1) / limit };

        Ok(InspectionPage {
            rows,
            page,
            limit,
            total: total.0,
            pages,
        })
    }

    pub async fn update_status_and_notes(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        status: Option<InspectionStatus>,
        notes: Option<String>,
    ) -> Result<Inspection, AppError> {
        let inspection = self.get(caller, inspection_id).await?;

        let new_status = match status {
            Some(requested) => {
                if Some(requested) != inspection.status.next() {
                    return Err(AppError::Conflict(format!(
                        "cannot transition from {:?} to {:?}",
                        inspection.status, requested
                    )));
                }
                requested
            }
            None => inspection.status,
        };

        let row = sqlx::query_as::<_, Inspection>(
            "UPDATE inspections SET \
               status = $1, \
               notes = COALESCE($2, notes), \
               started_at = CASE WHEN $1 = 'in_progress' AND started_at IS NULL THEN now() ELSE started_at END, \
               completed_at = CASE WHEN $1 = 'completed' AND completed_at IS NULL THEN now() ELSE completed_at END, \
               sent_at = CASE WHEN $1 = 'sent' AND sent_at IS NULL THEN now() ELSE sent_at END, \
               updated_at = now() \
             WHERE id = $3 \
             RETURNING id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at",
        )
        .bind(new_status)
        .bind(notes)
        .bind(inspection_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn initialize_items(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
    ) -> Result<(i64, Vec<InspectionItem>), AppError> {
        let inspection = self.get(caller, inspection_id).await?;

        let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inspection_items WHERE inspection_id = $1")
            .bind(inspection_id)
            .fetch_one(&self.pool)
            .await?;
        if existing.0 > 0 {
            return Err(AppError::Conflict("items already initialized".into()));
        }

        let mut tx = self.pool.begin().await?;
        // A shop's own template takes precedence over a global one for the same
        // (category, component) pair, since both would otherwise collide against
        // the per-inspection uniqueness constraint below.
        let items = sqlx::query_as::<_, InspectionItem>(
            "INSERT INTO inspection_items \
               (id, inspection_id, category, component, status, priority, requires_immediate_attention, created_at, updated_at) \
             SELECT gen_random_uuid(), $1, category, component, 'pending', default_priority, false, now(), now() \
             FROM ( \
                 SELECT DISTINCT ON (category, component) category, component, default_priority \
                 FROM inspection_item_templates \
                 WHERE is_active = true AND (shop_id IS NULL OR shop_id = $2) \
                 ORDER BY category, component, shop_id NULLS LAST \
             ) templates \
             RETURNING id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                       notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at",
        )
        .bind(inspection_id)
        .bind(inspection.shop_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok((items.len() as i64, items))
    }

    pub async fn create_item(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        req: CreateInspectionItemRequest,
    ) -> Result<InspectionItem, AppError> {
        let inspection = self.get(caller, inspection_id).await?;
        Self::ensure_not_terminal(&inspection)?;

        let result = sqlx::query_as::<_, InspectionItem>(
            "INSERT INTO inspection_items \
               (id, inspection_id, category, component, status, priority, requires_immediate_attention, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 'pending', $5, false, now(), now()) \
             RETURNING id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                       notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(inspection_id)
        .bind(&req.category)
        .bind(&req.component)
        .bind(req.priority.unwrap_or(0))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(format!(
                "{} / {} already exists on this inspection",
                req.category, req.component
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_items(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        filters: ItemListFilters,
    ) -> Result<(Vec<InspectionItem>, InspectionSummary), AppError> {
        self.get(caller, inspection_id).await?;

        let items = sqlx::query_as::<_, InspectionItem>(
            "SELECT id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                    notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at \
             FROM inspection_items \
             WHERE inspection_id = $1 \
               AND ($2::text IS NULL OR category = $2) \
               AND ($3::text IS NULL OR status = $3) \
               AND ($4::text IS NULL OR condition = $4) \
               AND ($5::int2 IS NULL OR priority = $5) \
             ORDER BY priority DESC, created_at ASC",
        )
        .bind(inspection_id)
        .bind(filters.category)
        .bind(filters.status)
        .bind(filters.condition)
        .bind(filters.priority)
        .fetch_all(&self.pool)
        .await?;

        let summary = summarize(&items);
        Ok((items, summary))
    }

    pub async fn delete_item(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        item_id: Uuid,
    ) -> Result<InspectionItem, AppError> {
        let inspection = self.get(caller, inspection_id).await?;
        Self::ensure_not_terminal(&inspection)?;

        sqlx::query_as::<_, InspectionItem>(
            "DELETE FROM inspection_items WHERE id = $1 AND inspection_id = $2 \
             RETURNING id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                       notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at",
        )
        .bind(item_id)
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("item not found".into()))
    }

    fn ensure_not_terminal(inspection: &Inspection) -> Result<(), AppError> {
        if inspection.status.is_terminal() {
            Err(AppError::Conflict("inspection is in a terminal state".into()))
        } else {
            Ok(())
        }
    }

    pub async fn update_item(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        item_id: Uuid,
        patch: ItemPatch,
    ) -> Result<InspectionItem, AppError> {
        let inspection = self.get(caller, inspection_id).await?;
        Self::ensure_not_terminal(&inspection)?;

        let current = sqlx::query_as::<_, InspectionItem>(
            "SELECT id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                    notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at \
             FROM inspection_items WHERE id = $1 AND inspection_id = $2",
        )
        .bind(item_id)
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("item not found".into()))?;

        let stamped = Self::apply_patch(&current, &patch, caller.user_id);

        let row = sqlx::query_as::<_, InspectionItem>(
            "UPDATE inspection_items SET \
               status = $1, condition = $2, measurement_value = $3, measurement_unit = $4, \
               notes = $5, recommendations = $6, estimated_cost = $7, priority = $8, \
               requires_immediate_attention = $9, checked_by = $10, checked_at = $11, updated_at = now() \
             WHERE id = $12 \
             RETURNING id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                       notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at",
        )
        .bind(stamped.status)
        .bind(stamped.condition)
        .bind(stamped.measurement_value)
        .bind(&stamped.measurement_unit)
        .bind(&stamped.notes)
        .bind(&stamped.recommendations)
        .bind(stamped.estimated_cost)
        .bind(stamped.priority)
        .bind(stamped.requires_immediate_attention)
        .bind(stamped.checked_by)
        .bind(stamped.checked_at)
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a patch to a current item, enforcing the `checked_by`/`checked_at`
    /// stamping rule: entering `checked` stamps both, leaving it clears both.
    fn apply_patch(current: &InspectionItem, patch: &ItemPatch, caller_id: Uuid) -> InspectionItem {
        let mut next = current.clone();
        if let Some(status) = patch.status {
            let entering_checked = status == ItemStatus::Checked && current.status != ItemStatus::Checked;
            let leaving_checked = status != ItemStatus::Checked && current.status == ItemStatus::Checked;
            next.status = status;
            if entering_checked {
                next.checked_by = Some(caller_id);
                next.checked_at = Some(Utc::now());
            } else if leaving_checked {
                next.checked_by = None;
                next.checked_at = None;
            }
        }
        if let Some(condition) = patch.condition {
            next.condition = Some(condition);
        }
        if patch.measurement_value.is_some() {
            next.measurement_value = patch.measurement_value;
        }
        if patch.measurement_unit.is_some() {
            next.measurement_unit = patch.measurement_unit.clone();
        }
        if patch.notes.is_some() {
            next.notes = patch.notes.clone();
        }
        if patch.recommendations.is_some() {
            next.recommendations = patch.recommendations.clone();
        }
        if patch.estimated_cost.is_some() {
            next.estimated_cost = patch.estimated_cost;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(flag) = patch.requires_immediate_attention {
            next.requires_immediate_attention = flag;
        }
        next
    }

    pub async fn bulk_update_items(
        &self,
        caller: &AuthIdentity,
        inspection_id: Uuid,
        updates: Vec<BulkItemUpdate>,
    ) -> Result<(Vec<InspectionItem>, InspectionSummary), AppError> {
        let inspection = self.get(caller, inspection_id).await?;
        Self::ensure_not_terminal(&inspection)?;

        let mut tx = self.pool.begin().await?;

        let mut updated = Vec::with_capacity(updates.len());
        for update in &updates {
            let current = sqlx::query_as::<_, InspectionItem>(
                "SELECT id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                        notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at \
                 FROM inspection_items WHERE id = $1 AND inspection_id = $2",
            )
            .bind(update.id)
            .bind(inspection_id)
            .fetch_optional(&mut *tx)
            .await?;

            // Every id must belong to this inspection before anything is written.
            let Some(current) = current else {
                return Err(AppError::Invalid(format!(
                    "item {} does not belong to inspection {}",
                    update.id, inspection_id
                )));
            };
            updated.push((current, &update.patch));
        }

        let mut results = Vec::with_capacity(updated.len());
        for (current, patch) in updated {
            let stamped = Self::apply_patch(&current, patch, caller.user_id);
            let row = sqlx::query_as::<_, InspectionItem>(
                "UPDATE inspection_items SET \
                   status = $1, condition = $2, measurement_value = $3, measurement_unit = $4, \
                   notes = $5, recommendations = $6, estimated_cost = $7, priority = $8, \
                   requires_immediate_attention = $9, checked_by = $10, checked_at = $11, updated_at = now() \
                 WHERE id = $12 \
                 RETURNING id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                           notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at",
            )
            .bind(stamped.status)
            .bind(stamped.condition)
            .bind(stamped.measurement_value)
            .bind(&stamped.measurement_unit)
            .bind(&stamped.notes)
            .bind(&stamped.recommendations)
            .bind(stamped.estimated_cost)
            .bind(stamped.priority)
            .bind(stamped.requires_immediate_attention)
            .bind(stamped.checked_by)
            .bind(stamped.checked_at)
            .bind(stamped.id)
            .fetch_one(&mut *tx)
            .await?;
            results.push(row);
        }

        tx.commit().await?;

        let summary = self.summary(caller, inspection_id).await?;
        Ok((results, summary))
    }

    pub async fn summary(&self, caller: &AuthIdentity, inspection_id: Uuid) -> Result<InspectionSummary, AppError> {
        let inspection = self.get(caller, inspection_id).await?;

        let items = sqlx::query_as::<_, InspectionItem>(
            "SELECT id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                    notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at \
             FROM inspection_items WHERE inspection_id = $1",
        )
        .bind(inspection.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summarize(&items))
    }
}

/// Pure aggregation used by both `summary()` and bulk-update's returned summary.
fn summarize(items: &[InspectionItem]) -> InspectionSummary {
    let mut by_status = std::collections::BTreeMap::new();
    let mut by_condition = std::collections::BTreeMap::new();
    let mut requires_immediate_attention = 0;
    let mut non_pending = 0;

    for item in items {
        let status_key = match item.status {
            ItemStatus::Pending => "pending",
            ItemStatus::Checked => "checked",
            ItemStatus::NotApplicable => "not_applicable",
        };
        *by_status.entry(status_key.to_string()).or_insert(0) += 1;
        if item.status != ItemStatus::Pending {
            non_pending += 1;
        }

        let condition_key = match item.condition {
            Some(Condition::Green) => "green",
            Some(Condition::Yellow) => "yellow",
            Some(Condition::Red) => "red",
            None => "none",
        };
        *by_condition.entry(condition_key.to_string()).or_insert(0) += 1;

        if item.requires_immediate_attention {
            requires_immediate_attention += 1;
        }
    }

    let total = items.len() as i64;
    let completion_percentage = if total == 0 {
        0.0
    } else {
        (non_pending as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
    };

    InspectionSummary {
        total_items: total,
        by_status,
        by_condition,
        requires_immediate_attention,
        completion_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(status: ItemStatus, condition: Option<Condition>, urgent: bool) -> InspectionItem {
        InspectionItem {
            id: Uuid::new_v4(),
            inspection_id: Uuid::new_v4(),
            category: "Brakes".into(),
            component: "Front Brake Pads".into(),
            status,
            condition,
            measurement_value: None,
            measurement_unit: None,
            notes: None,
            recommendations: None,
            estimated_cost: None,
            priority: 5,
            requires_immediate_attention: urgent,
            checked_by: None,
            checked_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_counts_match_total_and_completion() {
        let items = vec![
            item(ItemStatus::Checked, Some(Condition::Green), false),
            item(ItemStatus::Checked, Some(Condition::Red), true),
            item(ItemStatus::Pending, None, false),
            item(ItemStatus::NotApplicable, None, false),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.total_items, 4);
        let status_sum: i64 = summary.by_status.values().sum();
        assert_eq!(status_sum, summary.total_items);
        assert_eq!(summary.requires_immediate_attention, 1);
        // 3 of 4 items are non-pending -> 75.00%
        assert_eq!(summary.completion_percentage, 75.0);
    }

    #[test]
    fn summary_of_empty_inspection_is_zero_percent() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.completion_percentage, 0.0);
    }

    #[test]
    fn apply_patch_stamps_checked_by_and_checked_at_on_entering_checked() {
        let current = item(ItemStatus::Pending, None, false);
        let caller = Uuid::new_v4();
        let patch = ItemPatch {
            status: Some(ItemStatus::Checked),
            condition: Some(Condition::Yellow),
            notes: Some("glazed".into()),
            ..Default::default()
        };
        let updated = InspectionService::apply_patch(&current, &patch, caller);
        assert_eq!(updated.checked_by, Some(caller));
        assert!(updated.checked_at.is_some());
        assert_eq!(updated.condition, Some(Condition::Yellow));
    }

    #[test]
    fn apply_patch_clears_checked_by_and_checked_at_on_leaving_checked() {
        let mut current = item(ItemStatus::Checked, Some(Condition::Yellow), false);
        current.checked_by = Some(Uuid::new_v4());
        current.checked_at = Some(Utc::now());
        let patch = ItemPatch {
            status: Some(ItemStatus::Pending),
            ..Default::default()
        };
        let updated = InspectionService::apply_patch(&current, &patch, Uuid::new_v4());
        assert!(updated.checked_by.is_none());
        assert!(updated.checked_at.is_none());
    }
}
