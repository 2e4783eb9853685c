use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::models::Meeting;

/// Meetings, optionally restricted to one year
pub async fn fetch_meetings(pool: &PgPool, year: Option<i32>) -> Result<Vec<Meeting>, sqlx::Error> {
    match year {
        Some(year) => {
            sqlx::query_as::<_, Meeting>(
                r#"
                SELECT id, year, title, location, start_date, end_date
                FROM meetings
                WHERE year = $1
                ORDER BY start_date NULLS LAST, id
                "#,
            )
            .bind(year)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Meeting>(
                r#"
                SELECT id, year, title, location, start_date, end_date
                FROM meetings
                ORDER BY year DESC, start_date NULLS LAST, id
                "#,
            )
            .fetch_all(pool)
            .await
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MeetingQuery {
    /// Filter by meeting year
    pub year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "meetings",
    params(MeetingQuery),
    responses(
        (status = 200, description = "List of meetings", body = Vec<Meeting>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_meetings(
    State(pool): State<PgPool>,
    Query(query): Query<MeetingQuery>,
) -> Result<Json<Vec<Meeting>>, AppError> {
    Ok(Json(fetch_meetings(&pool, query.year).await?))
}
