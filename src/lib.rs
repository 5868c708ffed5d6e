pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod release;
pub mod resolver;
pub mod ui;

pub use error::{Result, TagReleaseError};
pub use release::{release, ReleaseEngine, ReleaseOutcome};
