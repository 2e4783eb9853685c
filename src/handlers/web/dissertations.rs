use askama::Template;
use axum::extract::State;
use axum::response::Response;
use sqlx::PgPool;

use super::render;
use crate::error::AppError;
use crate::handlers::dissertations::fetch_dissertations;
use crate::utils::encode_path;

#[derive(Template)]
#[template(path = "dissertation_list.html")]
struct DissertationListTemplate {
    dissertations: Vec<DissertationItem>,
}

struct DissertationItem {
    year: i32,
    author: String,
    title: String,
    institution: String,
    pdf_url: String,
}

pub async fn dissertation_list(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let dissertations = fetch_dissertations(&pool)
        .await?
        .into_iter()
        .map(|d| DissertationItem {
            year: d.year,
            author: d.author,
            title: d.title,
            institution: d.institution.unwrap_or_else(|| String::from("-")),
            pdf_url: d
                .pdf_link
                .map(|link| format!("/static/dissertations/{}", encode_path(&link)))
                .unwrap_or_default(),
        })
        .collect();

    render(DissertationListTemplate { dissertations })
}
