//! Pure formatting functions for UI output.
//!
//! This module contains all display logic for the command-line front end.
//! Functions here only print; they never touch the repository.

use console::style;

use crate::release::{CommitAction, CommitOutcome, ReleaseOutcome, ReleasePlan};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Describe what the planned commit step will do
pub fn describe_commit_action(action: CommitAction) -> &'static str {
    match action {
        CommitAction::Disabled => "auto-commit disabled",
        CommitAction::NothingToCommit => "working tree clean, nothing to commit",
        CommitAction::Commit => "uncommitted changes will be committed",
    }
}

/// Display the release about to be made.
///
/// Shows either:
/// - If a previous version exists: "From: previous -> To: new_tag"
/// - Otherwise: "Initial Tag: new_tag"
pub fn display_plan(plan: &ReleasePlan) {
    match &plan.highest {
        Some(previous) => {
            println!("\n{}", style("Proposed Release:").bold());
            println!("  From: {}", style(previous).red());
            println!("  To:   {}", style(plan.tag()).green());
        }
        None => {
            println!("\n{}", style("Initial Release:").bold());
            println!("  New tag: {}", style(plan.tag()).green());
        }
    }
    println!("  Message: {}", plan.release.message);
    println!("  Commit:  {}", describe_commit_action(plan.commit));
}

/// Display the result of a completed release.
pub fn display_outcome(outcome: &ReleaseOutcome) {
    match &outcome.commit {
        CommitOutcome::Committed => display_success("Committed outstanding changes"),
        CommitOutcome::Failed(reason) => display_warning(&format!(
            "Couldn't commit outstanding changes, tagged the previous commit: {}",
            reason
        )),
        CommitOutcome::Disabled | CommitOutcome::Clean => {}
    }

    let kind = if outcome.annotated {
        "annotated tag"
    } else {
        "tag"
    };
    display_success(&format!("Tagged as {}: {}", kind, style(&outcome.tag).cyan()));
}
