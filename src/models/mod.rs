pub mod course;
pub mod document;
pub mod periods;
pub mod share;
pub mod weeks;

pub use course::*;
pub use document::*;
pub use periods::*;
pub use share::*;
pub use weeks::*;
