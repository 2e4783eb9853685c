//! Free-text search over journal content.
//!
//! A query string is split into terms, double-quoted runs staying together
//! as one phrase. Every term must match (AND) and a term matches when any
//! of the searched fields contains it, case-insensitively (OR).

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::normalize_input;

static FIND_TERMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|(\S+)"#).expect("valid term regex"));
static NORM_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Split a query string into search terms.
///
/// # Examples
///
/// ```
/// use paleoanthro::utils::normalize_query;
///
/// assert_eq!(
///     normalize_query(r#"  some random  words "with   quotes  " and   spaces"#),
///     vec!["some", "random", "words", "with quotes", "and", "spaces"],
/// );
/// ```
pub fn normalize_query(query: &str) -> Vec<String> {
    FIND_TERMS
        .captures_iter(query)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| normalize_input(&NORM_SPACE.replace_all(m.as_str(), " ")))
        .filter(|term| !term.is_empty())
        .collect()
}

/// Columns a search may look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Authors,
}

impl SearchField {
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Authors => "authors",
        }
    }
}

/// Parsed search, ready to be turned into a SQL condition
#[derive(Debug, Clone)]
pub struct SearchFilter {
    fields: Vec<SearchField>,
    terms: Vec<String>,
}

impl SearchFilter {
    pub fn new(fields: &[SearchField], query: &str) -> Self {
        Self {
            fields: fields.to_vec(),
            terms: normalize_query(query),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() || self.fields.is_empty()
    }

    /// SQL condition plus its bind values, numbering placeholders from
    /// `first_param`. `None` when there is nothing to filter on.
    ///
    /// ```
    /// use paleoanthro::utils::{SearchField, SearchFilter};
    ///
    /// let filter = SearchFilter::new(&[SearchField::Title, SearchField::Authors], "homo erectus");
    /// let (sql, binds) = filter.to_sql(1).unwrap();
    /// assert_eq!(sql, "(title ILIKE $1 OR authors ILIKE $1) AND (title ILIKE $2 OR authors ILIKE $2)");
    /// assert_eq!(binds, vec!["%homo%", "%erectus%"]);
    /// ```
    pub fn to_sql(&self, first_param: usize) -> Option<(String, Vec<String>)> {
        if self.is_empty() {
            return None;
        }

        let clauses: Vec<String> = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let param = first_param + i;
                let or_clause = self
                    .fields
                    .iter()
                    .map(|field| format!("{} ILIKE ${}", field.column(), param))
                    .collect::<Vec<String>>()
                    .join(" OR ");
                format!("({})", or_clause)
            })
            .collect();

        let binds = self
            .terms
            .iter()
            .map(|term| format!("%{}%", escape_like(term)))
            .collect();

        Some((clauses.join(" AND "), binds))
    }
}

/// Escape LIKE wildcards so a term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
