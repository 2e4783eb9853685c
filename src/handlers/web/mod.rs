pub mod abstracts;
pub mod citations;
pub mod dissertations;
pub mod journal;

pub use abstracts::*;
pub use citations::*;
pub use dissertations::*;
pub use journal::*;

use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;

/// Render a page template to an HTML response.
pub fn render<T: Template>(template: T) -> Result<Response, AppError> {
    let html = template.render()?;
    Ok(Html(html).into_response())
}

/// `302 Found` redirect.
pub fn found(location: &str) -> Result<Response, AppError> {
    let value = header::HeaderValue::from_str(location)
        .map_err(|_| AppError::BadRequest(format!("invalid redirect target: {}", location)))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}
