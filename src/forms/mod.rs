pub mod abstract_submission;

pub use abstract_submission::*;
