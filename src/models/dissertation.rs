use serde::Serialize;
use utoipa::ToSchema;

/// Dissertation listing entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Dissertation {
    pub id: i32,
    pub year: i32,
    pub author: String,
    pub title: String,
    pub institution: Option<String>,
    pub pdf_link: Option<String>,
}
