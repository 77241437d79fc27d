use r2e::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::identity::AuthIdentity;
use crate::envelope::{Envelope, PagedEnvelope, Pagination};
use crate::error::AppError;
use crate::inspections::service::InspectionService;
use crate::models::inspection::{CreateInspectionRequest, InspectionListFilters, UpdateInspectionRequest};
use crate::models::inspection_item::{BulkUpdateRequest, CreateInspectionItemRequest, ItemListFilters, ItemPatch};
use crate::models::{Inspection, InspectionItem, InspectionSummary};

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct ItemsBody {
    items: Vec<InspectionItem>,
    summary: InspectionSummary,
    total: i64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct InitializeBody {
    items_created: i64,
    items: Vec<InspectionItem>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct BulkUpdateBody {
    updated_items: Vec<InspectionItem>,
    summary: InspectionSummary,
}

#[derive(Controller)]
#[controller(path = "/api/inspections", state = crate::state::AppState)]
pub struct InspectionController {
    #[inject]
    inspections: InspectionService,
}

#[routes]
impl InspectionController {
    #[post("/")]
    async fn create(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Json(body): Json<CreateInspectionRequest>,
    ) -> Result<Json<Envelope<Inspection>>, AppError> {
        let inspection = self.inspections.create(&caller, body).await?;
        Ok(Json(Envelope::ok(inspection)))
    }

    #[get("/")]
    async fn list(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Query(filters): Query<InspectionListFilters>,
    ) -> Result<Json<PagedEnvelope<Vec<Inspection>>>, AppError> {
        let page = self.inspections.list(&caller, filters).await?;
        Ok(Json(PagedEnvelope::ok(
            page.rows,
            Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
                pages: page.pages,
            },
        )))
    }

    #[get("/shop/{shop_id}")]
    async fn list_for_shop(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(shop_id): Path<Uuid>,
        Query(mut filters): Query<InspectionListFilters>,
    ) -> Result<Json<PagedEnvelope<Vec<Inspection>>>, AppError> {
        filters.shop_id = Some(shop_id);
        let page = self.inspections.list(&caller, filters).await?;
        Ok(Json(PagedEnvelope::ok(
            page.rows,
            Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
                pages: page.pages,
            },
        )))
    }

    #[get("/{id}")]
    async fn get(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
    ) -> Result<Json<Envelope<Inspection>>, AppError> {
        let inspection = self.inspections.get(&caller, id).await?;
        Ok(Json(Envelope::ok(inspection)))
    }

    #[put("/{id}")]
    async fn update(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
        Json(body): Json<UpdateInspectionRequest>,
    ) -> Result<Json<Envelope<Inspection>>, AppError> {
        let inspection = self
            .inspections
            .update_status_and_notes(&caller, id, body.status, body.notes)
            .await?;
        Ok(Json(Envelope::ok(inspection)))
    }

    #[get("/{id}/items")]
    async fn list_items(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
        Query(filters): Query<ItemListFilters>,
    ) -> Result<Json<Envelope<ItemsBody>>, AppError> {
        let (items, summary) = self.inspections.list_items(&caller, id, filters).await?;
        let total = items.len() as i64;
        Ok(Json(Envelope::ok(ItemsBody { items, summary, total })))
    }

    #[post("/{id}/items")]
    async fn create_item(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
        Json(body): Json<CreateInspectionItemRequest>,
    ) -> Result<Json<Envelope<InspectionItem>>, AppError> {
        let item = self.inspections.create_item(&caller, id, body).await?;
        Ok(Json(Envelope::ok(item)))
    }

    #[post("/{id}/items/initialize")]
    async fn initialize_items(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
    ) -> Result<Json<Envelope<InitializeBody>>, AppError> {
        let (items_created, items) = self.inspections.initialize_items(&caller, id).await?;
        Ok(Json(Envelope::ok(InitializeBody { items_created, items })))
    }

    #[put("/{id}/items/{item_id}")]
    async fn update_item(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path((id, item_id)): Path<(Uuid, Uuid)>,
        Json(patch): Json<ItemPatch>,
    ) -> Result<Json<Envelope<InspectionItem>>, AppError> {
        let item = self.inspections.update_item(&caller, id, item_id, patch).await?;
        Ok(Json(Envelope::ok(item)))
    }

    #[patch("/{id}/items/bulk-update")]
    async fn bulk_update_items(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path(id): Path<Uuid>,
        Json(body): Json<BulkUpdateRequest>,
    ) -> Result<Json<Envelope<BulkUpdateBody>>, AppError> {
        let (updated_items, summary) = self
            .inspections
            .bulk_update_items(&caller, id, body.updates)
            .await?;
        Ok(Json(Envelope::ok(BulkUpdateBody { updated_items, summary })))
    }

    #[delete("/{id}/items/{item_id}")]
    async fn delete_item(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Path((id, item_id)): Path<(Uuid, Uuid)>,
    ) -> Result<Json<Envelope<InspectionItem>>, AppError> {
        let item = self.inspections.delete_item(&caller, id, item_id).await?;
        Ok(Json(Envelope::ok(item)))
    }
}
