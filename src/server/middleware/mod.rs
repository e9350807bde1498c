pub mod auth;
pub mod validation;

pub use auth::require_admin;
pub use validation::{Validate, ValidatedJson};
