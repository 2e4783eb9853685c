//! Citation export for journal content: plain citation, BibTeX and RIS.
//!
//! All three are served as `text/html` with `<br>` line breaks, so field
//! values pass through the HTML escaper.

use askama::Template;

use crate::models::Content;

/// Journal name printed in every export
pub const JOURNAL_NAME: &str = "PaleoAnthropology";

#[derive(Template)]
#[template(
    source = r#"{{ authors }} ({{ year }}) "{{ title }}" <i>{{ journal }}</i> {{ year }}:{{ start_page }}-{{ end_page }}"#,
    ext = "html"
)]
struct CitationTemplate<'a> {
    authors: &'a str,
    year: i32,
    title: &'a str,
    journal: &'a str,
    start_page: &'a str,
    end_page: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"@article{{ "{" }}{{ key }}, <br>author="{{ authors }}",<br>title="{{ title }}",<br>journal="{{ journal }}",<br>year="{{ year }}",<br>volume="{{ year }}",<br>pages="{{ start_page }}-{{ end_page }}"<br>}"#,
    ext = "html"
)]
struct BibtexTemplate<'a> {
    key: &'a str,
    authors: &'a str,
    title: &'a str,
    journal: &'a str,
    year: i32,
    start_page: &'a str,
    end_page: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"TY - JOUR<br>{% for author in authors %}AU - {{ author }}<br>{% endfor %}T1 - {{ title }}<br>JO - {{ journal }}<br>Y1 - {{ year }}<br>VL - {{ year }}<br>SP - {{ start_page }}<br>EP - {{ end_page }}<br>ER - "#,
    ext = "html"
)]
struct RisTemplate<'a> {
    authors: Vec<&'a str>,
    title: &'a str,
    journal: &'a str,
    year: i32,
    start_page: &'a str,
    end_page: &'a str,
}

/// `Authors (2014) "Title" <i>PaleoAnthropology</i> 2014:1-10`
pub fn citation(content: &Content) -> Result<String, askama::Error> {
    CitationTemplate {
        authors: &content.authors,
        year: content.year,
        title: &content.title,
        journal: JOURNAL_NAME,
        start_page: &content.start_page,
        end_page: &content.end_page,
    }
    .render()
}

/// BibTeX entry keyed by the item's PDF file name. The volume is the year.
pub fn bibtex(content: &Content) -> Result<String, askama::Error> {
    BibtexTemplate {
        key: &content.pdf_link,
        authors: &content.authors,
        title: &content.title,
        journal: JOURNAL_NAME,
        year: content.year,
        start_page: &content.start_page,
        end_page: &content.end_page,
    }
    .render()
}

/// RIS record with one `AU` line per author.
pub fn ris(content: &Content) -> Result<String, askama::Error> {
    RisTemplate {
        authors: split_authors(&content.authors),
        title: &content.title,
        journal: JOURNAL_NAME,
        year: content.year,
        start_page: &content.start_page,
        end_page: &content.end_page,
    }
    .render()
}

/// Split an author display string on commas and on " and ".
///
/// ```
/// use paleoanthro::utils::split_authors;
///
/// assert_eq!(
///     split_authors("Tim White, Berhane Asfaw and Gen Suwa"),
///     vec!["Tim White", "Berhane Asfaw", "Gen Suwa"],
/// );
/// ```
pub fn split_authors(authors: &str) -> Vec<&str> {
    authors
        .split(',')
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
