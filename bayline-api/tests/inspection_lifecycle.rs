mod common;

use bayline_api::error::AppError;
use bayline_api::inspections::InspectionService;
use bayline_api::models::inspection::CreateInspectionRequest;
use bayline_api::models::inspection_item::{
    BulkItemUpdate, Condition, CreateInspectionItemRequest, ItemPatch, ItemStatus,
};
use bayline_api::models::Role;
use sqlx::PgPool;

#[sqlx::test]
async fn inspection_numbers_increment_within_a_shop_and_year(pool: PgPool) {
    let shop_id = common::seed_shop(&pool, "Bayline West").await;
    let tech = common::seed_user(&pool, shop_id, Role::Mechanic).await;
    let caller = common::identity(&tech);
    let customer_id = common::seed_customer(&pool, shop_id).await;
    let vehicle_id = common::seed_vehicle(&pool, shop_id, customer_id).await;
    let service = InspectionService::new(pool);

    let first = service
        .create(
            &caller,
            CreateInspectionRequest {
                vehicle_id,
                shop_id,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    let second = service
        .create(
            &caller,
            CreateInspectionRequest {
                vehicle_id,
                shop_id,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_ne!(first.inspection_number, second.inspection_number);
    let first_serial: u32 = first.inspection_number.rsplit('-').next().unwrap().parse().unwrap();
    let second_serial: u32 = second.inspection_number.rsplit('-').next().unwrap().parse().unwrap();
    assert_eq!(second_serial, first_serial + 1);
}

#[sqlx::test]
async fn item_lifecycle_stamps_checked_by_and_checked_at(pool: PgPool) {
    let shop_id = common::seed_shop(&pool, "Bayline East").await;
    let tech = common::seed_user(&pool, shop_id, Role::Mechanic).await;
    let caller = common::identity(&tech);
    let customer_id = common::seed_customer(&pool, shop_id).await;
    let vehicle_id = common::seed_vehicle(&pool, shop_id, customer_id).await;
    let service = InspectionService::new(pool);

    let inspection = service
        .create(
            &caller,
            CreateInspectionRequest {
                vehicle_id,
                shop_id,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let item = service
        .create_item(
            &caller,
            inspection.id,
            CreateInspectionItemRequest {
                category: "Brakes".into(),
                component: "Front Pads".into(),
                priority: Some(3),
            },
        )
        .await
        .unwrap();
    assert_eq!(item.status, ItemStatus::Pending);
    assert!(item.checked_by.is_none());

    let checked = service
        .update_item(
            &caller,
            inspection.id,
            item.id,
            ItemPatch {
                status: Some(ItemStatus::Checked),
                condition: Some(Condition::Yellow),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(checked.status, ItemStatus::Checked);
    assert_eq!(checked.checked_by, Some(caller.user_id));
    assert!(checked.checked_at.is_some());
}

#[sqlx::test]
async fn duplicate_category_and_component_on_the_same_inspection_is_rejected(pool: PgPool) {
    let shop_id = common::seed_shop(&pool, "Bayline North").await;
    let tech = common::seed_user(&pool, shop_id, Role::Mechanic).await;
    let caller = common::identity(&tech);
    let customer_id = common::seed_customer(&pool, shop_id).await;
    let vehicle_id = common::seed_vehicle(&pool, shop_id, customer_id).await;
    let service = InspectionService::new(pool);

    let inspection = service
        .create(
            &caller,
            CreateInspectionRequest {
                vehicle_id,
                shop_id,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let req = || CreateInspectionItemRequest {
        category: "Brakes".into(),
        component: "Front Pads".into(),
        priority: None,
    };
    service.create_item(&caller, inspection.id, req()).await.unwrap();
    let result = service.create_item(&caller, inspection.id, req()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test]
async fn bulk_update_is_all_or_nothing(pool: PgPool) {
    let shop_id = common::seed_shop(&pool, "Bayline South").await;
    let tech = common::seed_user(&pool, shop_id, Role::Mechanic).await;
    let caller = common::identity(&tech);
    let customer_id = common::seed_customer(&pool, shop_id).await;
    let vehicle_id = common::seed_vehicle(&pool, shop_id, customer_id).await;
    let service = InspectionService::new(pool);

    let inspection = service
        .create(
            &caller,
            CreateInspectionRequest {
                vehicle_id,
                shop_id,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    let item = service
        .create_item(
            &caller,
            inspection.id,
            CreateInspectionItemRequest {
                category: "Tires".into(),
                component: "Front Left".into(),
                priority: None,
            },
        )
        .await
        .unwrap();

    let foreign_id = uuid::Uuid::new_v4();
    let result = service
        .bulk_update_items(
            &caller,
            inspection.id,
            vec![
                BulkItemUpdate {
                    id: item.id,
                    patch: ItemPatch {
                        status: Some(ItemStatus::Checked),
                        ..Default::default()
                    },
                },
                BulkItemUpdate {
                    id: foreign_id,
                    patch: ItemPatch::default(),
                },
            ],
        )
        .await;
    assert!(result.is_err());

    // The valid update in the same batch must not have been persisted either.
    let (items, _) = service
        .list_items(&caller, inspection.id, Default::default())
        .await
        .unwrap();
    assert_eq!(items[0].status, ItemStatus::Pending);
}

#[sqlx::test]
async fn cross_shop_access_is_rejected_even_when_the_request_body_claims_the_right_shop(pool: PgPool) {
    let shop_a = common::seed_shop(&pool, "Bayline Owner Shop").await;
    let shop_b = common::seed_shop(&pool, "Bayline Other Shop").await;
    let owner = common::seed_user(&pool, shop_a, Role::Mechanic).await;
    let intruder = common::seed_user(&pool, shop_b, Role::Mechanic).await;
    let owner_identity = common::identity(&owner);
    let intruder_identity = common::identity(&intruder);

    let customer_id = common::seed_customer(&pool, shop_a).await;
    let vehicle_id = common::seed_vehicle(&pool, shop_a, customer_id).await;
    let service = InspectionService::new(pool);

    let inspection = service
        .create(
            &owner_identity,
            CreateInspectionRequest {
                vehicle_id,
                shop_id: shop_a,
                inspection_type: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    // The intruder reads/writes the victim's inspection directly by id; no
    // amount of claiming shop_a in a request body helps since the caller's
    // own shop_id comes from their access token, not the payload.
    let read_result = service.get(&intruder_identity, inspection.id).await;
    assert!(matches!(read_result, Err(AppError::Forbidden(_))));

    let create_result = service
        .create(
            &intruder_identity,
            CreateInspectionRequest {
                vehicle_id,
                shop_id: shop_a,
                inspection_type: None,
                notes: None,
            },
        )
        .await;
    assert!(matches!(create_result, Err(AppError::Forbidden(_))));

    let item_result = service
        .create_item(
            &intruder_identity,
            inspection.id,
            CreateInspectionItemRequest {
                category: "Engine".into(),
                component: "Oil".into(),
                priority: None,
            },
        )
        .await;
    assert!(matches!(item_result, Err(AppError::Forbidden(_))));
}
