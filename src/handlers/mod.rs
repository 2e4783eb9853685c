pub mod content;
pub mod dissertations;
pub mod meetings;
pub mod web;

pub use content::*;
pub use dissertations::*;
pub use meetings::*;
