//! User interface module - terminal output for the release binary.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    describe_commit_action, display_error, display_outcome, display_plan, display_status,
    display_success, display_warning,
};
