//! Tag decision engine
//!
//! Queries the repository, gates the candidate version against the highest
//! existing tag, then optionally commits and creates the tag:
//!
//! ```text
//! CheckRepo -> ComputeHighest -> CompareGate -> [Commit] -> CreateTag -> Done
//! ```
//!
//! Any failure before `CreateTag` leaves the repository untouched. A failed
//! commit does not stop the run; it is reported in [ReleaseOutcome::commit].

use crate::config::TaskConfig;
use crate::domain::TagSet;
use crate::error::{Result, TagReleaseError};
use crate::git::Repository;
use crate::resolver::{self, ResolvedRelease};
use log::{debug, info, warn};
use semver::Version;
use std::fmt;

/// What will happen to outstanding changes before tagging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Auto-commit is turned off
    Disabled,
    /// Working tree is clean
    NothingToCommit,
    /// Tracked changes will be committed with the release message
    Commit,
}

/// What happened to outstanding changes before tagging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Disabled,
    Clean,
    Committed,
    /// The commit failed; the tag was still created on the previous HEAD
    Failed(String),
}

impl CommitOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CommitOutcome::Failed(_))
    }
}

/// A release that passed every read-only check
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub release: ResolvedRelease,
    /// Highest semantic-version tag before this release, if any
    pub highest: Option<Version>,
    pub commit: CommitAction,
}

impl ReleasePlan {
    pub fn tag(&self) -> &str {
        self.release.tag()
    }
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// The tag that was created
    pub tag: String,
    pub annotated: bool,
    pub previous: Option<Version>,
    pub commit: CommitOutcome,
}

/// Highest version shown as `0.0.0` when no tag parses
struct DisplayHighest<'a>(&'a Option<Version>);

impl fmt::Display for DisplayHighest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(version) => write!(f, "{}", version),
            None => f.write_str("0.0.0"),
        }
    }
}

/// Runs the release checks and mutations against one repository
pub struct ReleaseEngine<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> ReleaseEngine<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        ReleaseEngine { repo }
    }

    /// Run every read-only check for `release`.
    ///
    /// The tag list is read once and reused for the whole run.
    ///
    /// # Returns
    /// * `Ok(ReleasePlan)` - Tagging is safe to perform
    /// * `Err(TagReleaseError::Environment)` - No repository, or a query failed
    /// * `Err(TagReleaseError::Version)` - The candidate is not newer, or the tag already exists
    pub fn plan(&self, release: &ResolvedRelease) -> Result<ReleasePlan> {
        if !self.repo.exists() {
            return Err(TagReleaseError::environment("Git repository not found"));
        }

        let tags = TagSet::new(self.repo.list_tags().map_err(|e| {
            TagReleaseError::environment(format!(
                "Couldn't list repository tags: {}",
                e.diagnostic()
            ))
        })?);
        let highest = tags.highest(&release.prefix);

        for tag in tags.unparsable(&release.prefix) {
            debug!("ignoring tag {:?}: not a semantic version", tag);
        }
        info!(
            "highest existing tag: {} ({} tags)",
            DisplayHighest(&highest),
            tags.len()
        );

        self.check_version(release, highest.as_ref())?;

        let commit = if !release.commit {
            CommitAction::Disabled
        } else if self.repo.is_clean().map_err(|e| {
            TagReleaseError::environment(format!(
                "Couldn't inspect working tree: {}",
                e.diagnostic()
            ))
        })? {
            CommitAction::NothingToCommit
        } else {
            CommitAction::Commit
        };

        Ok(ReleasePlan {
            release: release.clone(),
            highest,
            commit,
        })
    }

    fn check_version(&self, release: &ResolvedRelease, highest: Option<&Version>) -> Result<()> {
        let candidate = &release.version.version;

        if !release.version.has_build_metadata() {
            if let Some(highest) = highest {
                if candidate <= highest {
                    return Err(TagReleaseError::version(format!(
                        "Version \"{}\" is not higher than current highest tag \"{}\"",
                        candidate, highest
                    )));
                }
            }
            return Ok(());
        }

        if let Some(highest) = highest {
            if candidate < highest {
                return Err(TagReleaseError::version(format!(
                    "Version \"{}\" is lower than current highest tag \"{}\"",
                    release.version, highest
                )));
            }
        }

        let tag = release.tag();
        let exists = self.repo.tag_exists(tag).map_err(|e| {
            TagReleaseError::environment(format!(
                "Couldn't look up tag \"{}\": {}",
                tag,
                e.diagnostic()
            ))
        })?;
        if exists {
            return Err(TagReleaseError::version(format!(
                "Tag \"{}\" already exists (duplicate tag)",
                tag
            )));
        }

        Ok(())
    }

    /// Commit outstanding changes if planned, then create the tag.
    ///
    /// A failed commit is logged and reported in the outcome; a failed tag
    /// creation is fatal.
    pub fn execute(&self, plan: ReleasePlan) -> Result<ReleaseOutcome> {
        let release = &plan.release;

        let commit = match plan.commit {
            CommitAction::Disabled => CommitOutcome::Disabled,
            CommitAction::NothingToCommit => CommitOutcome::Clean,
            CommitAction::Commit => match self.repo.commit_all(&release.message) {
                Ok(()) => {
                    info!("un-staged changes committed as: {}", release.message);
                    CommitOutcome::Committed
                }
                Err(e) => {
                    warn!("commit failed, tagging current HEAD: {}", e);
                    CommitOutcome::Failed(e.diagnostic())
                }
            },
        };

        self.repo
            .create_tag(release.tag(), release.annotate, &release.message)
            .map_err(|e| {
                debug!("tag creation diagnostic: {:?}", e);
                TagReleaseError::environment(format!(
                    "Couldn't tag the last commit as \"{}\": {}",
                    release.tag(),
                    e.diagnostic()
                ))
            })?;
        info!("tagged as: {}", release.tag());

        Ok(ReleaseOutcome {
            tag: release.tag().to_string(),
            annotated: release.annotate,
            previous: plan.highest,
            commit,
        })
    }

    /// Plan and execute in one step
    pub fn run(&self, release: &ResolvedRelease) -> Result<ReleaseOutcome> {
        let plan = self.plan(release)?;
        self.execute(plan)
    }
}

/// Resolve `config` and release it against `repo`.
///
/// Version resolution completes before any repository operation, so an
/// invalid configuration or version never touches the repository.
pub fn release<R: Repository + ?Sized>(config: TaskConfig, repo: &R) -> Result<ReleaseOutcome> {
    let options = config.normalize()?;
    let release = resolver::resolve(&options)?;
    ReleaseEngine::new(repo).run(&release)
}
