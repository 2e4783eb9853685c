use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use sqlx::PgPool;

use crate::error::AppError;
use crate::handlers::content::fetch_content_item;
use crate::models::Content;
use crate::utils;

async fn content_or_404(pool: &PgPool, id: i32) -> Result<Content, AppError> {
    fetch_content_item(pool, id).await?.ok_or(AppError::NotFound)
}

/// Plain citation of a content item
pub async fn journal_citation(
    Path(id): Path<i32>,
    State(pool): State<PgPool>,
) -> Result<Response, AppError> {
    let content = content_or_404(&pool, id).await?;
    Ok(Html(utils::citation(&content)?).into_response())
}

/// BibTeX entry of a content item
pub async fn journal_bibtex(
    Path(id): Path<i32>,
    State(pool): State<PgPool>,
) -> Result<Response, AppError> {
    let content = content_or_404(&pool, id).await?;
    Ok(Html(utils::bibtex(&content)?).into_response())
}

/// RIS record of a content item
pub async fn journal_ris(
    Path(id): Path<i32>,
    State(pool): State<PgPool>,
) -> Result<Response, AppError> {
    let content = content_or_404(&pool, id).await?;
    Ok(Html(utils::ris(&content)?).into_response())
}
