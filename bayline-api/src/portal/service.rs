use chrono::{DateTime, Utc};
use r2e::prelude::*;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::AuthIdentity;
use crate::error::AppError;
use crate::models::{Condition, Customer, Inspection, InspectionItem, Shop, User, Vehicle};
use crate::portal::projection::{self, CustomerView, ItemView, PortalProjection, ShopView, VehicleView};
use crate::portal::token::PortalTokenService;

#[derive(Clone)]
pub struct PortalService {
    pool: PgPool,
    tokens: PortalTokenService,
}

#[bean]
impl PortalService {
    pub fn new(pool: PgPool, tokens: PortalTokenService) -> Self {
        Self { pool, tokens }
    }

    pub async fn mint(&self, caller: &AuthIdentity, inspection_id: Uuid) -> Result<(String, DateTime<Utc>), AppError> {
        let inspection: Inspection = sqlx::query_as(
            "SELECT id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at \
             FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("inspection not found".into()))?;

        if !caller.can_access_shop(inspection.shop_id) {
            return Err(AppError::Forbidden("not permitted for this shop".into()));
        }

        let jti = Uuid::new_v4();
        let ttl = PortalTokenService::default_ttl();
        let expires_at = Utc::now() + ttl;

        sqlx::query(
            "INSERT INTO portal_tokens (id, inspection_id, expires_at, revoked, created_at) \
             VALUES ($1, $2, $3, false, now())",
        )
        .bind(jti)
        .bind(inspection_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let token = self.tokens.mint(inspection_id, jti, ttl);
        Ok((token, expires_at))
    }

    pub async fn verify_and_read(&self, token: &str) -> Result<PortalProjection, AppError> {
        let verified = self.tokens.verify(token)?;

        let row: (bool,) = sqlx::query_as("SELECT revoked FROM portal_tokens WHERE id = $1")
            .bind(verified.jti)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Invalid("portal token not recognized".into()))?;
        if row.0 {
            return Err(AppError::Revoked("portal token revoked".into()));
        }

        self.read_projection(verified.inspection_id).await
    }

    pub async fn revoke(&self, caller: &AuthIdentity, inspection_id: Uuid) -> Result<(), AppError> {
        let inspection: Inspection = sqlx::query_as(
            "SELECT id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at \
             FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("inspection not found".into()))?;
        if !caller.can_access_shop(inspection.shop_id) {
            return Err(AppError::Forbidden("not permitted for this shop".into()));
        }

        sqlx::query("UPDATE portal_tokens SET revoked = true WHERE inspection_id = $1")
            .bind(inspection_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Builds the redacted projection: no `shop_id`, no `checked_by`,
    /// no internal user ids besides the technician's display name.
    async fn read_projection(&self, inspection_id: Uuid) -> Result<PortalProjection, AppError> {
        let inspection: Inspection = sqlx::query_as(
            "SELECT id, shop_id, customer_id, vehicle_id, technician_id, inspection_number, status, notes, started_at, completed_at, sent_at, created_at, updated_at \
             FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("inspection not found".into()))?;

        let vehicle: Vehicle = sqlx::query_as(
            "SELECT id, customer_id, shop_id, year, make, model, vin, license_plate, color, mileage, created_at, updated_at \
             FROM vehicles WHERE id = $1",
        )
        .bind(inspection.vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        let customer: Customer = sqlx::query_as(
            "SELECT id, shop_id, first_name, last_name, phone, email, address, created_at, updated_at \
             FROM customers WHERE id = $1",
        )
        .bind(inspection.customer_id)
        .fetch_one(&self.pool)
        .await?;

        let shop: Shop = sqlx::query_as(
            "SELECT id, name, timezone, phone, email, address, created_at, updated_at FROM shops WHERE id = $1",
        )
        .bind(inspection.shop_id)
        .fetch_one(&self.pool)
        .await?;

        let technician: User = sqlx::query_as(
            "SELECT id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(inspection.technician_id)
        .fetch_one(&self.pool)
        .await?;

        let items: Vec<InspectionItem> = sqlx::query_as(
            "SELECT id, inspection_id, category, component, status, condition, measurement_value, measurement_unit, \
                    notes, recommendations, estimated_cost, priority, requires_immediate_attention, checked_by, checked_at, created_at, updated_at \
             FROM inspection_items WHERE inspection_id = $1",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;

        let item_views: Vec<ItemView> = items
            .iter()
            .map(|item| ItemView {
                category: item.category.clone(),
                component: item.component.clone(),
                status: match item.status {
                    crate::models::ItemStatus::Pending => "pending".to_string(),
                    crate::models::ItemStatus::Checked => "checked".to_string(),
                    crate::models::ItemStatus::NotApplicable => "not_applicable".to_string(),
                },
                condition: item.condition.map(|c| match c {
                    Condition::Green => "green".to_string(),
                    Condition::Yellow => "yellow".to_string(),
                    Condition::Red => "red".to_string(),
                }),
                notes: item.notes.clone(),
                recommendation: item.recommendations.clone(),
                estimated_cost: item.estimated_cost,
            })
            .collect();

        let summary = projection::summarize(&item_views);

        Ok(PortalProjection {
            inspection_number: inspection.inspection_number,
            status: inspection.status.as_str().to_string(),
            started_at: inspection.started_at,
            completed_at: inspection.completed_at,
            sent_at: inspection.sent_at,
            vehicle: VehicleView {
                year: vehicle.year,
                make: vehicle.make,
                model: vehicle.model,
                license_plate: vehicle.license_plate,
            },
            customer: CustomerView {
                name: format!("{} {}", customer.first_name, customer.last_name),
                phone: customer.phone,
            },
            shop: ShopView {
                name: shop.name,
                phone: shop.phone,
            },
            technician_name: technician.full_name,
            items: item_views,
            summary,
        })
    }
}
