pub mod content;
pub mod meeting;
pub mod presentation;
pub mod dissertation;

pub use content::*;
pub use meeting::*;
pub use presentation::*;
pub use dissertation::*;
