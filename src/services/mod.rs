//! Service layer: the pure business logic behind the REST handlers.
//!
//! Everything in here is side-effect free - documents and clock readings
//! come in as arguments, results go out as values - which is what lets the
//! occurrence engine be shared by every renderer instead of re-implemented
//! per view.

pub mod import;

pub mod occurrence;

pub mod validation;


pub use import::parse_course_csv;
pub use occurrence::{resolve_occurrence, week_number, OccurrenceQuery};
pub use validation::{normalize_document, validate_document, ValidationError};
