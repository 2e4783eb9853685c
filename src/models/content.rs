use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::encode_path;

/// Article type enum matching the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "article_type")]
pub enum ArticleType {
    #[sqlx(rename = "Articles")]
    #[serde(rename = "Articles")]
    Articles,
    #[sqlx(rename = "Reviews")]
    #[serde(rename = "Reviews")]
    Reviews,
    #[sqlx(rename = "Data")]
    #[serde(rename = "Data")]
    Data,
    #[sqlx(rename = "Annual Meeting Abstracts")]
    #[serde(rename = "Annual Meeting Abstracts")]
    AnnualMeetingAbstracts,
}

impl ArticleType {
    /// Display order of the sections on a volume page.
    pub const ALL: [ArticleType; 4] = [
        ArticleType::Articles,
        ArticleType::Reviews,
        ArticleType::Data,
        ArticleType::AnnualMeetingAbstracts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleType::Articles => "Articles",
            ArticleType::Reviews => "Reviews",
            ArticleType::Data => "Data",
            ArticleType::AnnualMeetingAbstracts => "Annual Meeting Abstracts",
        }
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleType {
    type Err = String;

    /// Accepts the display name or a short lowercase alias (`articles`, `abstracts`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "articles" => Ok(ArticleType::Articles),
            "reviews" => Ok(ArticleType::Reviews),
            "data" => Ok(ArticleType::Data),
            "annual meeting abstracts" | "abstracts" => Ok(ArticleType::AnnualMeetingAbstracts),
            _ => Err(format!("unknown article type: {}", s)),
        }
    }
}

/// Journal content item (one article, review, dataset or abstract)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Content {
    pub id: i32,
    pub year: i32,
    pub title: String,
    /// Display string, comma or " and " separated
    pub authors: String,
    pub start_page: String,
    pub end_page: String,
    /// Numeric sort key for the start page
    pub start_page_n: Option<i32>,
    pub article_type: ArticleType,
    /// File name under the static journal content directory
    pub pdf_link: String,
}

impl Content {
    /// Page range as printed in citations, e.g. `12-34`
    pub fn pages(&self) -> String {
        format!("{}-{}", self.start_page, self.end_page)
    }

    pub fn pdf_url(&self) -> String {
        format!("/static/journal/content/{}", encode_path(&self.pdf_link))
    }
}

/// Columns selected for every content query
pub const CONTENT_COLUMNS: &str =
    "id, year, title, authors, start_page, end_page, start_page_n, article_type, pdf_link";
