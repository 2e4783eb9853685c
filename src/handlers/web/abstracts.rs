use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use sqlx::PgPool;

use super::render;
use crate::error::AppError;
use crate::forms::{AbstractForm, FormErrors};
use crate::handlers::meetings::fetch_meetings;
use crate::models::{Meeting, PresentationType};
use crate::state::AppState;
use crate::utils::{issue_challenge, verify_challenge};

pub const THANKS_PATH: &str = "/meetings/abstract/thanks/";

const INVALID_CAPTCHA: &str = "Invalid CAPTCHA, please try again.";

#[derive(Template)]
#[template(path = "abstract_form.html")]
struct AbstractFormTemplate {
    year: i32,
    is_open: bool,
    form: AbstractForm,
    errors: FormErrors,
    meetings: Vec<ChoiceOption>,
    presentation_types: Vec<ChoiceOption>,
    authors: Vec<AuthorRow>,
    total_forms: usize,
    captcha_key: String,
    captcha_question: String,
}

struct ChoiceOption {
    value: String,
    label: String,
    selected: bool,
}

struct AuthorRow {
    index: usize,
    name: String,
    department: String,
    institution: String,
    country: String,
    email: String,
    name_errors: Vec<String>,
    email_errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "abstract_thanks.html")]
struct AbstractThanksTemplate {
    year: i32,
}

/// Render the form with a freshly issued spam challenge.
async fn render_form(
    pool: &PgPool,
    year: i32,
    meetings: &[Meeting],
    mut form: AbstractForm,
    errors: FormErrors,
) -> Result<Response, AppError> {
    let challenge = issue_challenge(pool).await?;
    form.captcha_answer.clear();

    let meeting_options = meetings
        .iter()
        .map(|m| ChoiceOption {
            value: m.id.to_string(),
            label: m.label(),
            selected: form.meeting.trim() == m.id.to_string() || meetings.len() == 1,
        })
        .collect();

    let presentation_types = PresentationType::ALL
        .iter()
        .map(|pt| ChoiceOption {
            value: pt.as_str().to_string(),
            label: pt.as_str().to_string(),
            selected: form.presentation_type.trim() == pt.as_str(),
        })
        .collect();

    let authors: Vec<AuthorRow> = form
        .authors
        .iter()
        .enumerate()
        .map(|(index, a)| AuthorRow {
            index,
            name: a.name.clone(),
            department: a.department.clone(),
            institution: a.institution.clone(),
            country: a.country.clone(),
            email: a.email.clone(),
            name_errors: errors.author(index, "name").to_vec(),
            email_errors: errors.author(index, "email").to_vec(),
        })
        .collect();

    render(AbstractFormTemplate {
        year,
        is_open: !meetings.is_empty(),
        total_forms: authors.len(),
        authors,
        meetings: meeting_options,
        presentation_types,
        errors,
        form,
        captcha_key: challenge.hashkey.to_string(),
        captcha_question: challenge.challenge,
    })
}

/// Blank abstract form for the configured meeting year
pub async fn abstract_form(State(state): State<AppState>) -> Result<Response, AppError> {
    let year = state.config.abstract_year;
    let meetings = fetch_meetings(&state.pool, Some(year)).await?;

    render_form(&state.pool, year, &meetings, AbstractForm::blank(year, 1), FormErrors::default()).await
}

pub async fn submit_abstract(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let year = state.config.abstract_year;
    let meetings = fetch_meetings(&state.pool, Some(year)).await?;
    let mut form = AbstractForm::from_pairs(&pairs);

    // "Add another author" posts the form back without validating it
    if pairs.iter().any(|(k, _)| k == "add_author") {
        form.add_author_row();
        return render_form(&state.pool, year, &meetings, form, FormErrors::default()).await;
    }

    let validated = form.validate(year, &meetings);

    let captcha_ok = if form.captcha_key.trim().is_empty() || form.captcha_answer.trim().is_empty() {
        false
    } else {
        verify_challenge(&state.pool, &form.captcha_key, &form.captcha_answer).await?
    };

    let errors = match validated {
        Ok(clean) if captcha_ok => {
            let abstract_id = clean.save(&state.pool).await.map_err(|e| {
                tracing::error!("Failed to save abstract: {:?}", e);
                AppError::from(e)
            })?;
            tracing::info!(
                abstract_id,
                authors = clean.authors.len(),
                meeting_id = clean.meeting_id,
                "Abstract submitted"
            );
            return Ok(Redirect::to(THANKS_PATH).into_response());
        }
        Ok(_) => {
            let mut errors = FormErrors::default();
            errors.add("captcha", INVALID_CAPTCHA);
            errors
        }
        Err(mut errors) => {
            if !captcha_ok && !errors.has("captcha") {
                errors.add("captcha", INVALID_CAPTCHA);
            }
            errors
        }
    };

    tracing::debug!(error_count = errors.len(), "Abstract form invalid");
    render_form(&state.pool, year, &meetings, form, errors).await
}

pub async fn abstract_thanks(State(state): State<AppState>) -> Result<Response, AppError> {
    render(AbstractThanksTemplate {
        year: state.config.abstract_year,
    })
}
