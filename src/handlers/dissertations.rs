use axum::{extract::State, Json};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Dissertation;

/// All dissertations, newest first
pub async fn fetch_dissertations(pool: &PgPool) -> Result<Vec<Dissertation>, sqlx::Error> {
    sqlx::query_as::<_, Dissertation>(
        r#"
        SELECT id, year, author, title, institution, pdf_link
        FROM dissertations
        ORDER BY year DESC, author
        "#,
    )
    .fetch_all(pool)
    .await
}

#[utoipa::path(
    get,
    path = "/api/dissertations",
    tag = "dissertations",
    responses(
        (status = 200, description = "List all dissertations", body = Vec<Dissertation>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_dissertations(State(pool): State<PgPool>) -> Result<Json<Vec<Dissertation>>, AppError> {
    let dissertations = fetch_dissertations(&pool).await.map_err(|e| {
        tracing::error!("Failed to fetch dissertations: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(dissertations))
}
