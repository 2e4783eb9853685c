use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::models::{ArticleType, Content, CONTENT_COLUMNS};
use crate::utils::{content_years, SearchField, SearchFilter};

/// Fields the journal search looks at
pub const CONTENT_SEARCH_FIELDS: [SearchField; 2] = [SearchField::Title, SearchField::Authors];

/// Filters shared by the content API and the journal pages
#[derive(Debug, Default, Clone)]
pub struct ContentFilter {
    pub year: Option<i32>,
    pub article_type: Option<ArticleType>,
    pub search: Option<SearchFilter>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Fetch content matching `filter`, ordered by year (newest first), then
/// article type and start page.
pub async fn fetch_content(pool: &PgPool, filter: &ContentFilter) -> Result<Vec<Content>, sqlx::Error> {
    // Build dynamic query based on filters
    let mut where_clauses = Vec::new();
    let mut param_count = 0;

    if filter.year.is_some() {
        param_count += 1;
        where_clauses.push(format!("year = ${}", param_count));
    }

    if filter.article_type.is_some() {
        param_count += 1;
        where_clauses.push(format!("article_type = ${}", param_count));
    }

    let search = filter.search.as_ref().and_then(|s| s.to_sql(param_count + 1));
    if let Some((clause, binds)) = &search {
        param_count += binds.len();
        where_clauses.push(clause.clone());
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let mut paging = String::new();
    if filter.limit.is_some() {
        param_count += 1;
        paging.push_str(&format!(" LIMIT ${}", param_count));
    }
    if filter.offset.is_some() {
        param_count += 1;
        paging.push_str(&format!(" OFFSET ${}", param_count));
    }

    let query_str = format!(
        r#"
        SELECT {}
        FROM content
        {}
        ORDER BY year DESC, article_type, start_page_n NULLS LAST, id
        {}
        "#,
        CONTENT_COLUMNS, where_clause, paging
    );

    let mut query = sqlx::query_as::<_, Content>(&query_str);

    // Bind parameters in order
    if let Some(year) = filter.year {
        query = query.bind(year);
    }
    if let Some(article_type) = filter.article_type {
        query = query.bind(article_type);
    }
    if let Some((_, binds)) = search {
        for pattern in binds {
            query = query.bind(pattern);
        }
    }
    if let Some(limit) = filter.limit {
        query = query.bind(limit);
    }
    if let Some(offset) = filter.offset {
        query = query.bind(offset);
    }

    query.fetch_all(pool).await
}

/// Fetch a single content item
pub async fn fetch_content_item(pool: &PgPool, id: i32) -> Result<Option<Content>, sqlx::Error> {
    sqlx::query_as::<_, Content>(&format!("SELECT {} FROM content WHERE id = $1", CONTENT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Distinct volume years, ascending
pub async fn fetch_content_years(pool: &PgPool) -> Result<Vec<i32>, sqlx::Error> {
    let years: Vec<i32> = sqlx::query_scalar("SELECT year FROM content")
        .fetch_all(pool)
        .await?;
    Ok(content_years(years))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContentQuery {
    /// Volume year
    pub year: Option<i32>,
    /// Article type (Articles, Reviews, Data, Annual Meeting Abstracts)
    pub article_type: Option<String>,
    /// Search terms; double quotes group a phrase
    pub query: Option<String>,
    /// Maximum number of results (default: 100)
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/content",
    tag = "content",
    params(ContentQuery),
    responses(
        (status = 200, description = "List of content items", body = Vec<Content>),
        (status = 400, description = "Unknown article type"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_content(
    State(pool): State<PgPool>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<Vec<Content>>, AppError> {
    let article_type = query
        .article_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<ArticleType>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let filter = ContentFilter {
        year: query.year,
        article_type,
        search: query
            .query
            .as_deref()
            .map(|q| SearchFilter::new(&CONTENT_SEARCH_FIELDS, q)),
        limit: Some(query.limit.unwrap_or(100).clamp(1, 1000)),
        offset: Some(query.offset.unwrap_or(0).max(0)),
    };

    let content = fetch_content(&pool, &filter).await.map_err(|e| {
        tracing::error!("Failed to fetch content: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(content))
}

#[utoipa::path(
    get,
    path = "/api/content/{id}",
    tag = "content",
    params(("id" = i32, Path, description = "Content ID")),
    responses(
        (status = 200, description = "Content item found", body = Content),
        (status = 404, description = "Content item not found")
    )
)]
pub async fn get_content(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<Json<Content>, AppError> {
    fetch_content_item(&pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[utoipa::path(
    get,
    path = "/api/content/years",
    tag = "content",
    responses(
        (status = 200, description = "Volume years, ascending", body = Vec<i32>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_content_years(State(pool): State<PgPool>) -> Result<Json<Vec<i32>>, AppError> {
    Ok(Json(fetch_content_years(&pool).await?))
}
