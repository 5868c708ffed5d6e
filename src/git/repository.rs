use crate::error::{Result, TagReleaseError};
use git2::{Repository as Git2Repo, StatusOptions};
use log::debug;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Option<Git2Repo>,
}

impl Git2Repository {
    /// Discover the repository containing `path`.
    ///
    /// Never fails: when no repository is found, [super::Repository::exists]
    /// reports false and every other operation returns an environment error.
    pub fn discover<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let repo = match Git2Repo::discover(path) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!("no git repository at {}: {}", path.display(), e);
                None
            }
        };

        Git2Repository { repo }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo: Some(repo) }
    }

    fn repo(&self) -> Result<&Git2Repo> {
        self.repo
            .as_ref()
            .ok_or_else(|| TagReleaseError::environment("Git repository not found"))
    }
}

impl super::Repository for Git2Repository {
    fn exists(&self) -> bool {
        self.repo.is_some()
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo()?.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo()?.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            // Names git refuses as references cannot exist as tags either
            Err(e) if e.code() == git2::ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo()?.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let repo = self.repo()?;

        // Stage modifications and deletions of tracked files only
        let mut index = repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree = repo.find_tree(index.write_tree()?)?;
        let parent = repo.head()?.peel_to_commit()?;
        let signature = repo.signature()?;

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        debug!("created commit {}", oid);

        Ok(())
    }

    fn create_tag(&self, name: &str, annotated: bool, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let head = repo.head()?.peel_to_commit()?;

        let oid = if annotated {
            let tagger = repo.signature()?;
            repo.tag(name, head.as_object(), &tagger, message, false)?
        } else {
            repo.tag_lightweight(name, head.as_object(), false)?
        };
        debug!("created tag {} -> {}", name, oid);

        Ok(())
    }
}
