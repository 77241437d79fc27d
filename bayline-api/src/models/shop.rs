use chrono::{DateTime, Utc};
use r2e::r2e_data::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Shop {
    type Id = Uuid;

    fn table_name() -> &'static str {
        "shops"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id", "name", "timezone", "phone", "email", "address", "created_at", "updated_at",
        ]
    }

    fn id(&self) -> &Uuid {
        &self.id
    }
}
