//! Report sections, top to bottom.

pub mod explorer;
pub mod findings;
pub mod framework;
pub mod hero;
pub mod methodology;
pub mod sectors;
