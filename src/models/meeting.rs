use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Annual meeting of the society
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Meeting {
    pub id: i32,
    pub year: i32,
    pub title: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Meeting {
    /// Label used in the meeting drop-down of the abstract form
    pub fn label(&self) -> String {
        match &self.location {
            Some(location) => format!("{} ({})", self.title, location),
            None => self.title.clone(),
        }
    }
}
