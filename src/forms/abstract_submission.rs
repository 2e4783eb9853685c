//! Abstract submission form with its repeatable author sub-form.
//!
//! Field names follow the usual formset layout so a plain HTML form can
//! post any number of authors:
//!
//! ```text
//! title=...&contact_email=...&author_set-TOTAL_FORMS=2
//! &author_set-0-name=...&author_set-1-name=...
//! ```
//!
//! Author rank is not a form field; it is the author's position in the
//! submitted list.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use sqlx::PgPool;

use crate::models::{Meeting, PresentationType};
use crate::utils::{collapse_whitespace, non_empty, normalize_input};

pub const AUTHOR_PREFIX: &str = "author_set";
pub const MAX_AUTHORS: usize = 50;
/// Key for errors not tied to a single field
pub const NON_FIELD_ERRORS: &str = "__all__";

const REQUIRED: &str = "This field is required.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Raw author sub-form values, as posted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorForm {
    pub name: String,
    pub department: String,
    pub institution: String,
    pub country: String,
    pub email: String,
}

/// Raw abstract form values, as posted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractForm {
    pub year: String,
    pub meeting: String,
    pub presentation_type: String,
    pub title: String,
    pub abstract_text: String,
    pub acknowledgements: String,
    pub references: String,
    pub funding: String,
    pub comments: String,
    pub contact_email: String,
    pub confirm_email: String,
    /// Challenge hashkey
    pub captcha_key: String,
    /// Visitor's answer to the challenge
    pub captcha_answer: String,
    /// Value of the `TOTAL_FORMS` management field; `None` when absent or
    /// not a number
    pub total_forms: Option<usize>,
    pub authors: Vec<AuthorForm>,
}

impl AbstractForm {
    /// Unbound form for `year` with `extra` blank author rows.
    pub fn blank(year: i32, extra: usize) -> Self {
        Self {
            year: year.to_string(),
            total_forms: Some(extra),
            authors: vec![AuthorForm::default(); extra],
            ..Self::default()
        }
    }

    /// Bind posted `application/x-www-form-urlencoded` pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let data: HashMap<&str, &str> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let field = |name: &str| data.get(name).map(|v| v.to_string()).unwrap_or_default();

        let total_forms = data
            .get(format!("{}-TOTAL_FORMS", AUTHOR_PREFIX).as_str())
            .and_then(|v| v.trim().parse::<usize>().ok());

        // Never allocate more rows than the limit, whatever the client claims
        let rows = total_forms.unwrap_or(0).min(MAX_AUTHORS + 1);
        let authors = (0..rows)
            .map(|i| {
                let author_field = |name: &str| field(&author_field_name(i, name));
                AuthorForm {
                    name: author_field("name"),
                    department: author_field("department"),
                    institution: author_field("institution"),
                    country: author_field("country"),
                    email: author_field("email"),
                }
            })
            .collect();

        Self {
            year: field("year"),
            meeting: field("meeting"),
            presentation_type: field("presentation_type"),
            title: field("title"),
            abstract_text: field("abstract_text"),
            acknowledgements: field("acknowledgements"),
            references: field("references"),
            funding: field("funding"),
            comments: field("comments"),
            contact_email: field("contact_email"),
            confirm_email: field("confirm_email"),
            captcha_key: field("captcha_0"),
            captcha_answer: field("captcha_1"),
            total_forms,
            authors,
        }
    }

    /// Append a blank author row (the "add another author" button).
    pub fn add_author_row(&mut self) {
        if self.authors.len() < MAX_AUTHORS {
            self.authors.push(AuthorForm::default());
        }
        self.total_forms = Some(self.authors.len());
    }

    /// Validate everything that does not need the database. The spam
    /// challenge answer is only checked for presence here.
    pub fn validate(&self, expected_year: i32, meetings: &[Meeting]) -> Result<CleanAbstract, FormErrors> {
        let mut errors = FormErrors::default();

        let year = match self.year.trim().parse::<i32>() {
            Ok(year) if year == expected_year => Some(year),
            Ok(_) => {
                errors.add("year", format!("Abstracts are only accepted for the {} meeting.", expected_year));
                None
            }
            Err(_) => {
                errors.add("year", "Enter a whole number.");
                None
            }
        };

        let meeting_id = if self.meeting.trim().is_empty() {
            errors.add("meeting", REQUIRED);
            None
        } else {
            match self.meeting.trim().parse::<i32>() {
                Ok(id) if meetings.iter().any(|m| m.id == id && m.year == expected_year) => Some(id),
                _ => {
                    errors.add(
                        "meeting",
                        "Select a valid choice. That choice is not one of the available choices.",
                    );
                    None
                }
            }
        };

        let presentation_type = if self.presentation_type.trim().is_empty() {
            errors.add("presentation_type", REQUIRED);
            None
        } else {
            match self.presentation_type.trim().parse::<PresentationType>() {
                Ok(pt) => Some(pt),
                Err(_) => {
                    errors.add("presentation_type", "Select a valid choice.");
                    None
                }
            }
        };

        let title = collapse_whitespace(&self.title);
        if title.is_empty() {
            errors.add("title", REQUIRED);
        }

        let abstract_text = normalize_input(&self.abstract_text);
        if abstract_text.is_empty() {
            errors.add("abstract_text", REQUIRED);
        }

        let contact_email = normalize_input(&self.contact_email);
        if contact_email.is_empty() {
            errors.add("contact_email", REQUIRED);
        } else if !is_valid_email(&contact_email) {
            errors.add("contact_email", "Enter a valid email address.");
        }

        let confirm_email = normalize_input(&self.confirm_email);
        if confirm_email.is_empty() {
            errors.add("confirm_email", REQUIRED);
        } else if !is_valid_email(&confirm_email) {
            errors.add("confirm_email", "Enter a valid email address.");
        } else if !confirm_email.eq_ignore_ascii_case(&contact_email) {
            errors.add("confirm_email", "The email addresses do not match.");
        }

        if self.captcha_key.trim().is_empty() || self.captcha_answer.trim().is_empty() {
            errors.add("captcha", REQUIRED);
        }

        let authors = self.validate_authors(&mut errors);

        match (year, meeting_id, presentation_type) {
            (Some(year), Some(meeting_id), Some(presentation_type)) if errors.is_empty() => {
                Ok(CleanAbstract {
                    year,
                    meeting_id,
                    presentation_type,
                    title,
                    abstract_text,
                    acknowledgements: normalize_input(&self.acknowledgements),
                    references: normalize_input(&self.references),
                    funding: normalize_input(&self.funding),
                    comments: normalize_input(&self.comments),
                    contact_email,
                    authors,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_authors(&self, errors: &mut FormErrors) -> Vec<CleanAuthor> {
        let Some(total) = self.total_forms else {
            errors.add(NON_FIELD_ERRORS, "Author form data is missing or has been tampered with.");
            return Vec::new();
        };

        if total == 0 {
            errors.add(NON_FIELD_ERRORS, "At least one author is required.");
            return Vec::new();
        }
        if total > MAX_AUTHORS {
            errors.add(NON_FIELD_ERRORS, format!("Please submit {} or fewer authors.", MAX_AUTHORS));
            return Vec::new();
        }

        let mut clean = Vec::with_capacity(self.authors.len());
        for (i, author) in self.authors.iter().enumerate() {
            // Every row is required, a blank row is an error rather than skipped
            let name = collapse_whitespace(&author.name);
            if name.is_empty() {
                errors.add(author_field_name(i, "name"), REQUIRED);
            }

            let email = non_empty(&author.email);
            if let Some(email) = &email {
                if !is_valid_email(email) {
                    errors.add(author_field_name(i, "email"), "Enter a valid email address.");
                }
            }

            clean.push(CleanAuthor {
                rank: i as i32 + 1,
                name,
                department: non_empty(&author.department),
                institution: non_empty(&author.institution),
                country: non_empty(&author.country),
                email,
            });
        }
        clean
    }
}

/// Name of field `name` of author row `index`, e.g. `author_set-0-name`
pub fn author_field_name(index: usize, name: &str) -> String {
    format!("{}-{}-{}", AUTHOR_PREFIX, index, name)
}

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Errors of author row `index` field `name`
    pub fn author(&self, index: usize, name: &str) -> &[String] {
        self.get(&author_field_name(index, name))
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }
}

/// Validated author, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanAuthor {
    pub rank: i32,
    pub name: String,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
}

/// Validated abstract, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanAbstract {
    pub year: i32,
    pub meeting_id: i32,
    pub presentation_type: PresentationType,
    pub title: String,
    pub abstract_text: String,
    pub acknowledgements: String,
    pub references: String,
    pub funding: String,
    pub comments: String,
    pub contact_email: String,
    pub authors: Vec<CleanAuthor>,
}

impl CleanAbstract {
    /// Insert the abstract and its authors in one transaction, returning
    /// the new abstract id.
    pub async fn save(&self, pool: &PgPool) -> Result<i32, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let abstract_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO abstracts (
                year, meeting_id, presentation_type, title, abstract_text,
                acknowledgements, "references", funding, comments, contact_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(self.year)
        .bind(self.meeting_id)
        .bind(self.presentation_type)
        .bind(&self.title)
        .bind(&self.abstract_text)
        .bind(&self.acknowledgements)
        .bind(&self.references)
        .bind(&self.funding)
        .bind(&self.comments)
        .bind(&self.contact_email)
        .fetch_one(&mut *tx)
        .await?;

        for author in &self.authors {
            sqlx::query(
                r#"
                INSERT INTO abstract_authors (
                    abstract_id, author_rank, name, department, institution, country, email
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(abstract_id)
            .bind(author.rank)
            .bind(&author.name)
            .bind(&author.department)
            .bind(&author.institution)
            .bind(&author.country)
            .bind(&author.email)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(abstract_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meetings() -> Vec<Meeting> {
        vec![
            Meeting {
                id: 7,
                year: 2015,
                title: "PaleoAnthropology Society Meeting".to_string(),
                location: Some("San Francisco".to_string()),
                start_date: None,
                end_date: None,
            },
            Meeting {
                id: 3,
                year: 2014,
                title: "PaleoAnthropology Society Meeting".to_string(),
                location: Some("Calgary".to_string()),
                start_date: None,
                end_date: None,
            },
        ]
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn valid_pairs() -> Vec<(String, String)> {
        pairs(&[
            ("year", "2015"),
            ("meeting", "7"),
            ("presentation_type", "Poster"),
            ("title", "  Dental   microwear in early Homo "),
            ("abstract_text", "We analyzed molars."),
            ("acknowledgements", ""),
            ("references", ""),
            ("funding", "NSF"),
            ("comments", ""),
            ("contact_email", "jane@example.edu"),
            ("confirm_email", "jane@example.edu"),
            ("captcha_0", "0b5c4f4e-7d4e-4a43-9d7c-0d1ad0e0f5a1"),
            ("captcha_1", "8"),
            ("author_set-TOTAL_FORMS", "2"),
            ("author_set-0-name", "Jane Doe"),
            ("author_set-0-institution", "University of Somewhere"),
            ("author_set-0-email", "jane@example.edu"),
            ("author_set-1-name", "John  Roe"),
            ("author_set-1-country", "Kenya"),
        ])
    }

    fn replace(mut data: Vec<(String, String)>, key: &str, value: &str) -> Vec<(String, String)> {
        for (k, v) in data.iter_mut() {
            if k == key {
                *v = value.to_string();
            }
        }
        data
    }

    #[test]
    fn test_valid_submission() {
        let form = AbstractForm::from_pairs(&valid_pairs());
        let clean = form.validate(2015, &meetings()).unwrap();

        assert_eq!(clean.year, 2015);
        assert_eq!(clean.meeting_id, 7);
        assert_eq!(clean.presentation_type, PresentationType::Poster);
        assert_eq!(clean.title, "Dental microwear in early Homo");
        assert_eq!(clean.funding, "NSF");
        assert_eq!(clean.authors.len(), 2);
        assert_eq!(clean.authors[0].rank, 1);
        assert_eq!(clean.authors[0].institution.as_deref(), Some("University of Somewhere"));
        assert_eq!(clean.authors[1].rank, 2);
        assert_eq!(clean.authors[1].name, "John Roe");
        assert_eq!(clean.authors[1].department, None);
        assert_eq!(clean.authors[1].country.as_deref(), Some("Kenya"));
    }

    #[test]
    fn test_email_mismatch() {
        let data = replace(valid_pairs(), "confirm_email", "other@example.edu");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert_eq!(errors.get("confirm_email"), ["The email addresses do not match."]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_invalid_contact_email() {
        let data = replace(valid_pairs(), "contact_email", "not-an-email");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert!(errors.has("contact_email"));
    }

    #[test]
    fn test_wrong_year_rejected() {
        let data = replace(valid_pairs(), "year", "2014");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert!(errors.has("year"));
    }

    #[test]
    fn test_meeting_from_other_year_rejected() {
        let data = replace(valid_pairs(), "meeting", "3");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert!(errors.has("meeting"));
    }

    #[test]
    fn test_unknown_presentation_type() {
        let data = replace(valid_pairs(), "presentation_type", "Keynote");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert!(errors.has("presentation_type"));
    }

    #[test]
    fn test_required_fields() {
        let form = AbstractForm::from_pairs(&pairs(&[("year", "2015"), ("author_set-TOTAL_FORMS", "1")]));
        let errors = form.validate(2015, &meetings()).unwrap_err();
        for field in ["meeting", "presentation_type", "title", "abstract_text", "contact_email", "confirm_email", "captcha"] {
            assert_eq!(errors.get(field), [REQUIRED], "field {}", field);
        }
        assert_eq!(errors.author(0, "name"), [REQUIRED]);
    }

    #[test]
    fn test_blank_author_row_is_an_error() {
        let data = replace(valid_pairs(), "author_set-1-name", "   ");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert!(errors.author(0, "name").is_empty());
        assert_eq!(errors.author(1, "name"), [REQUIRED]);
    }

    #[test]
    fn test_no_authors() {
        let data = replace(valid_pairs(), "author_set-TOTAL_FORMS", "0");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert_eq!(errors.non_field(), ["At least one author is required."]);
    }

    #[test]
    fn test_missing_management_data() {
        let data: Vec<(String, String)> = valid_pairs()
            .into_iter()
            .filter(|(k, _)| k != "author_set-TOTAL_FORMS")
            .collect();
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert_eq!(errors.non_field().len(), 1);
    }

    #[test]
    fn test_too_many_authors() {
        let data = replace(valid_pairs(), "author_set-TOTAL_FORMS", "10000");
        let form = AbstractForm::from_pairs(&data);
        assert_eq!(form.authors.len(), MAX_AUTHORS + 1);
        let errors = form.validate(2015, &meetings()).unwrap_err();
        assert!(errors.non_field()[0].contains("or fewer authors"));
    }

    #[test]
    fn test_invalid_author_email() {
        let data = replace(valid_pairs(), "author_set-0-email", "jane at example");
        let errors = AbstractForm::from_pairs(&data).validate(2015, &meetings()).unwrap_err();
        assert_eq!(errors.author(0, "email"), ["Enter a valid email address."]);
    }

    #[test]
    fn test_add_author_row() {
        let mut form = AbstractForm::blank(2015, 1);
        form.add_author_row();
        assert_eq!(form.authors.len(), 2);
        assert_eq!(form.total_forms, Some(2));
    }

    #[test]
    fn test_email_regex() {
        assert!(is_valid_email("a.b@c.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.org"));
        assert!(!is_valid_email("@c.org"));
    }
}
