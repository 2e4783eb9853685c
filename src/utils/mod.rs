pub mod captcha;
pub mod citation;
pub mod normalize;
pub mod search;
pub mod url;
pub mod years;

pub use captcha::{issue_challenge, verify_challenge, Challenge};
pub use citation::{bibtex, citation, ris, split_authors, JOURNAL_NAME};
pub use normalize::{collapse_whitespace, non_empty, normalize_input};
pub use search::{normalize_query, SearchField, SearchFilter};
pub use url::encode_path;
pub use years::{content_years, latest_year};
