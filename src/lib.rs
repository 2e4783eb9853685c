pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod state;
pub mod utils;

use axum::{response::Redirect, routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Re-export commonly used items
pub use config::{Config, ConfigError};
pub use error::AppError;
pub use forms::{AbstractForm, CleanAbstract, FormErrors};
pub use models::{
    ArticleType, Content, Dissertation, Meeting, PresentationType,
};
pub use state::AppState;
pub use utils::{
    content_years, latest_year, normalize_query, split_authors, SearchField, SearchFilter,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::content::list_content,
        handlers::content::get_content,
        handlers::content::list_content_years,
        handlers::dissertations::list_dissertations,
        handlers::meetings::list_meetings,
    ),
    components(schemas(Content, ArticleType, Dissertation, Meeting)),
    tags(
        (name = "content", description = "Journal content"),
        (name = "dissertations", description = "Dissertation listings"),
        (name = "meetings", description = "Annual meetings")
    )
)]
pub struct ApiDoc;

/// Build the application router: HTML pages, the JSON API and static files.
pub fn app(state: AppState) -> Router {
    use handlers::web;

    let static_root = state.config.static_root.clone();

    Router::new()
        .route("/", get(|| async { Redirect::permanent("/journal/") }))
        // Journal pages
        .route("/journal/", get(web::journal_home))
        .route("/journal/index/", get(web::journal_index))
        .route("/journal/current/", get(web::journal_current))
        .route("/journal/volumes/{year}/", get(web::journal_volumes))
        .route("/journal/search/", get(web::journal_search))
        .route("/journal/content/{*resource}", get(web::static_redirect))
        // Citation export
        .route("/journal/citation/{id}/", get(web::journal_citation))
        .route("/journal/bibtex/{id}/", get(web::journal_bibtex))
        .route("/journal/ris/{id}/", get(web::journal_ris))
        // Dissertations
        .route("/dissertations/", get(web::dissertation_list))
        // Meeting abstracts
        .route("/meetings/abstract/", get(web::abstract_form).post(web::submit_abstract))
        .route("/meetings/abstract/thanks/", get(web::abstract_thanks))
        // JSON API
        .route("/api/content", get(handlers::list_content))
        .route("/api/content/years", get(handlers::list_content_years))
        .route("/api/content/{id}", get(handlers::get_content))
        .route("/api/dissertations", get(handlers::list_dissertations))
        .route("/api/meetings", get(handlers::list_meetings))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/static", ServeDir::new(static_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
