use chrono::{DateTime, Utc};
use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateVehicleRequest {
    #[garde(skip)]
    pub customer_id: Uuid,
    #[garde(range(min = 1900, max = 2100))]
    pub year: i32,
    #[garde(length(min = 1, max = 100))]
    pub make: String,
    #[garde(length(min = 1, max = 100))]
    pub model: String,
    #[garde(skip)]
    pub vin: Option<String>,
    #[garde(skip)]
    pub license_plate: Option<String>,
    #[garde(skip)]
    pub color: Option<String>,
    #[garde(skip)]
    pub mileage: Option<i32>,
}
