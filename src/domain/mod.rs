//! Domain logic - pure version and tag rules independent of git operations

pub mod tag;
pub mod version;

pub use tag::TagSet;
pub use version::{render_message, ResolvedVersion};
