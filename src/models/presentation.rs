use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Presentation type enum matching the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "presentation_type")]
pub enum PresentationType {
    Oral,
    Poster,
}

impl PresentationType {
    pub const ALL: [PresentationType; 2] = [PresentationType::Oral, PresentationType::Poster];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationType::Oral => "Oral",
            PresentationType::Poster => "Poster",
        }
    }
}

impl fmt::Display for PresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresentationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oral" => Ok(PresentationType::Oral),
            "Poster" => Ok(PresentationType::Poster),
            _ => Err(format!("unknown presentation type: {}", s)),
        }
    }
}
