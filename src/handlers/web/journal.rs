use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use sqlx::PgPool;

use super::{found, render};
use crate::error::AppError;
use crate::handlers::content::{fetch_content, fetch_content_years, ContentFilter, CONTENT_SEARCH_FIELDS};
use crate::models::{ArticleType, Content};
use crate::utils::{encode_path, latest_year, SearchFilter};

/// Prefix of the static directory holding journal PDFs
pub const STATIC_CONTENT_PREFIX: &str = "/static/journal/content/";

pub struct ContentItem {
    pub id: i32,
    pub title: String,
    pub authors: String,
    pub pages: String,
    pub pdf_url: String,
}

impl From<Content> for ContentItem {
    fn from(content: Content) -> Self {
        Self {
            id: content.id,
            pages: content.pages(),
            pdf_url: content.pdf_url(),
            title: content.title,
            authors: content.authors,
        }
    }
}

pub struct ContentSection {
    pub label: String,
    pub items: Vec<ContentItem>,
}

pub struct VolumeSection {
    pub year: i32,
    pub item_count: usize,
    pub sections: Vec<ContentSection>,
}

/// Split content into one section per article type, in display order.
/// Empty sections are kept; templates decide whether to show them.
pub fn group_by_type(items: Vec<Content>) -> Vec<ContentSection> {
    let mut sections: Vec<ContentSection> = ArticleType::ALL
        .iter()
        .map(|t| ContentSection {
            label: t.to_string(),
            items: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(pos) = ArticleType::ALL.iter().position(|t| *t == item.article_type) {
            sections[pos].items.push(item.into());
        }
    }

    sections
}

/// Group content by year, newest volume first. Within a volume only
/// non-empty sections are kept.
pub fn group_by_year(items: Vec<Content>) -> Vec<VolumeSection> {
    let mut volumes: Vec<(i32, Vec<Content>)> = Vec::new();

    for item in items {
        match volumes.iter_mut().find(|(year, _)| *year == item.year) {
            Some((_, group)) => group.push(item),
            None => volumes.push((item.year, vec![item])),
        }
    }

    volumes.sort_by(|a, b| b.0.cmp(&a.0));
    volumes
        .into_iter()
        .map(|(year, group)| VolumeSection {
            year,
            item_count: group.len(),
            sections: group_by_type(group)
                .into_iter()
                .filter(|s| !s.items.is_empty())
                .collect(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "journal_home.html")]
struct JournalHomeTemplate {
    years: Vec<i32>,
    current_year: i32,
    has_content: bool,
}

pub async fn journal_home(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let years = fetch_content_years(&pool).await?;
    let current = latest_year(years.iter().copied());

    render(JournalHomeTemplate {
        has_content: current.is_some(),
        current_year: current.unwrap_or_default(),
        years,
    })
}

#[derive(Template)]
#[template(path = "journal_index.html")]
struct JournalIndexTemplate {
    years: Vec<i32>,
    volumes: Vec<VolumeSection>,
}

pub async fn journal_index(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let years = fetch_content_years(&pool).await?;
    let content = fetch_content(&pool, &ContentFilter::default()).await?;

    render(JournalIndexTemplate {
        years,
        volumes: group_by_year(content),
    })
}

struct YearLink {
    year: i32,
    current: bool,
}

#[derive(Template)]
#[template(path = "journal_volumes.html")]
struct JournalVolumesTemplate {
    year: i32,
    year_links: Vec<YearLink>,
    sections: Vec<ContentSection>,
    item_count: usize,
}

pub async fn journal_volumes(
    Path(year): Path<i32>,
    State(pool): State<PgPool>,
) -> Result<Response, AppError> {
    let years = fetch_content_years(&pool).await?;
    let content = fetch_content(
        &pool,
        &ContentFilter {
            year: Some(year),
            ..ContentFilter::default()
        },
    )
    .await?;

    render(JournalVolumesTemplate {
        year,
        year_links: years
            .into_iter()
            .map(|y| YearLink { year: y, current: y == year })
            .collect(),
        item_count: content.len(),
        sections: group_by_type(content),
    })
}

/// Path of the most recent volume; no content at all is a 404.
fn current_volume_path(years: Vec<i32>) -> Result<String, AppError> {
    let current = latest_year(years).ok_or(AppError::NotFound)?;
    Ok(format!("/journal/volumes/{}/", current))
}

/// Redirect to the most recent volume
pub async fn journal_current(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let years = fetch_content_years(&pool).await?;
    found(&current_volume_path(years)?)
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

#[derive(Template)]
#[template(path = "search_results.html")]
struct SearchResultsTemplate {
    query: String,
    years: Vec<i32>,
    sections: Vec<ContentSection>,
    result_count: usize,
}

pub async fn journal_search(
    Query(params): Query<SearchParams>,
    State(pool): State<PgPool>,
) -> Result<Response, AppError> {
    let years = fetch_content_years(&pool).await?;

    let search = SearchFilter::new(&CONTENT_SEARCH_FIELDS, &params.query);
    tracing::debug!(terms = ?search.terms(), "Journal search");

    let content = fetch_content(
        &pool,
        &ContentFilter {
            search: Some(search),
            ..ContentFilter::default()
        },
    )
    .await?;

    render(SearchResultsTemplate {
        query: params.query,
        years,
        result_count: content.len(),
        sections: group_by_type(content),
    })
}

/// Legacy PDF URLs registered for DOI lookups point here; send them on to
/// the static content directory.
pub async fn static_redirect(Path(resource): Path<String>) -> Result<Response, AppError> {
    if resource.is_empty() || resource.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest(format!("invalid resource: {}", resource)));
    }

    found(&format!("{}{}", STATIC_CONTENT_PREFIX, encode_path(&resource)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn item(id: i32, year: i32, article_type: ArticleType) -> Content {
        Content {
            id,
            year,
            title: format!("Item {}", id),
            authors: "A. Author".to_string(),
            start_page: id.to_string(),
            end_page: (id + 1).to_string(),
            start_page_n: Some(id),
            article_type,
            pdf_link: format!("PA{}.pdf", id),
        }
    }

    #[test]
    fn test_group_by_type_keeps_order_and_all_headings() {
        let sections = group_by_type(vec![
            item(1, 2014, ArticleType::AnnualMeetingAbstracts),
            item(2, 2014, ArticleType::Articles),
            item(3, 2014, ArticleType::Articles),
        ]);

        let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Articles", "Reviews", "Data", "Annual Meeting Abstracts"]);
        assert_eq!(sections[0].items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 3]);
        assert!(sections[1].items.is_empty());
        assert_eq!(sections[3].items[0].pdf_url, "/static/journal/content/PA1.pdf");
        assert_eq!(sections[3].items[0].pages, "1-2");
    }

    #[test]
    fn test_group_by_year_newest_first() {
        let volumes = group_by_year(vec![
            item(1, 2012, ArticleType::Articles),
            item(2, 2014, ArticleType::Reviews),
            item(3, 2012, ArticleType::Data),
        ]);

        assert_eq!(volumes.iter().map(|v| v.year).collect::<Vec<_>>(), vec![2014, 2012]);
        assert_eq!(volumes[1].item_count, 2);
        let labels: Vec<&str> = volumes[1].sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Articles", "Data"]);
    }

    #[test]
    fn test_current_volume_path_uses_latest_year() {
        assert_eq!(current_volume_path(vec![2006, 2014, 2010]).unwrap(), "/journal/volumes/2014/");
    }

    #[test]
    fn test_current_volume_without_content_is_not_found() {
        let err = current_volume_path(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
