//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of Git
//! operations a release needs, allowing the tag decision engine to run against
//! a real repository or an in-memory mock.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use tag_release::git::{MockRepository, Repository};
//! let repo = MockRepository::new().with_tags(["v1.0.0", "nightly"]);
//! assert!(repo.exists());
//! assert!(repo.tag_exists("nightly").unwrap());
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Repository operations consumed by a release run
///
/// Every call is blocking and the engine never overlaps two of them.
///
/// ## Error Handling
///
/// Methods return [crate::error::Result<T>]; the engine decides which failures
/// are fatal. Implementations should surface the underlying tool diagnostic in
/// the error message.
pub trait Repository {
    /// Whether a repository was found for the working directory
    fn exists(&self) -> bool;

    /// All tag names in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Whether a tag with exactly this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Whether tracked files have no uncommitted changes (staged or not)
    fn is_clean(&self) -> Result<bool>;

    /// Commit every tracked modification on top of HEAD
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Tag the current HEAD
    ///
    /// # Arguments
    /// * `name` - Literal tag name
    /// * `annotated` - Create an annotated tag carrying `message` instead of a lightweight one
    /// * `message` - Tag message, ignored for lightweight tags
    fn create_tag(&self, name: &str, annotated: bool, message: &str) -> Result<()>;
}
