use serde::Serialize;

/// Success envelope for every HTTP response: `{success: true, data: …}`.
/// Failures go through `AppError`'s own `IntoResponse` impl instead.
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PagedEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub pagination: Pagination,
}

impl<T> PagedEnvelope<T> {
    pub fn ok(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}
