use bayline_api::auth::identity::AuthIdentity;
use bayline_api::models::user::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn seed_shop(pool: &PgPool, name: &str) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO shops (id, name, timezone) VALUES ($1, $2, 'America/Chicago') RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

pub async fn seed_user(pool: &PgPool, shop_id: Uuid, role: Role) -> User {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, 'unused-hash', 'Test User', $4, true, now(), now()) \
         RETURNING id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(shop_id)
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_customer(pool: &PgPool, shop_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO customers (id, shop_id, first_name, last_name, phone, created_at, updated_at) \
         VALUES ($1, $2, 'Jane', 'Doe', $3, now(), now()) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(shop_id)
    .bind(format!("555-{}", &Uuid::new_v4().to_string()[..7]))
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

pub async fn seed_vehicle(pool: &PgPool, shop_id: Uuid, customer_id: Uuid) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO vehicles (id, customer_id, shop_id, year, make, model, created_at, updated_at) \
         VALUES ($1, $2, $3, 2020, 'Honda', 'Civic', now(), now()) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(customer_id)
    .bind(shop_id)
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

pub fn identity(user: &User) -> AuthIdentity {
    AuthIdentity {
        user_id: user.id,
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        roles: vec![user.role.as_str().to_string()],
        shop_id: user.shop_id,
    }
}
