//! Storage for schedule documents and share links.
//!
//! Follows the repository pattern: handlers talk to the
//! [`repository::ScheduleRepository`] trait, and the concrete backend is
//! chosen at startup. The only backend shipped here is the in-memory
//! [`local::LocalRepository`]; the trait is the seam a database-backed
//! implementation would plug into.

pub mod local;
pub mod repository;

pub use local::LocalRepository;
pub use repository::{RepositoryError, RepositoryResult, ScheduleRepository};
