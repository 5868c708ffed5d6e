use crate::error::{Result, TagReleaseError};
use crate::git::Repository;
use std::sync::{Mutex, MutexGuard};

/// A tag created through [Repository::create_tag] on a [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub annotated: bool,
    pub message: String,
}

#[derive(Debug, Default)]
struct MockState {
    tags: Vec<String>,
    clean: bool,
    calls: Vec<String>,
    commits: Vec<String>,
    created: Vec<CreatedTag>,
}

/// Mock repository for testing without actual git operations
///
/// Records every call in order so tests can assert which operations ran.
#[derive(Debug)]
pub struct MockRepository {
    exists: bool,
    fail_list: Option<String>,
    fail_lookup: Option<String>,
    fail_status: Option<String>,
    fail_commit: Option<String>,
    fail_tag: Option<String>,
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a new empty, clean mock repository
    pub fn new() -> Self {
        MockRepository {
            exists: true,
            fail_list: None,
            fail_lookup: None,
            fail_status: None,
            fail_commit: None,
            fail_tag: None,
            state: Mutex::new(MockState {
                clean: true,
                ..Default::default()
            }),
        }
    }

    /// A working directory that is not inside any repository
    pub fn missing() -> Self {
        MockRepository {
            exists: false,
            ..Self::new()
        }
    }

    /// Add existing tags
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Mark the working tree as having uncommitted changes
    pub fn dirty(self) -> Self {
        self.lock().clean = false;
        self
    }

    /// Make tag listing fail with the given diagnostic
    pub fn fail_list_tags(mut self, diagnostic: impl Into<String>) -> Self {
        self.fail_list = Some(diagnostic.into());
        self
    }

    /// Make exact tag lookups fail with the given diagnostic
    pub fn fail_tag_exists(mut self, diagnostic: impl Into<String>) -> Self {
        self.fail_lookup = Some(diagnostic.into());
        self
    }

    /// Make working-tree inspection fail with the given diagnostic
    pub fn fail_is_clean(mut self, diagnostic: impl Into<String>) -> Self {
        self.fail_status = Some(diagnostic.into());
        self
    }

    /// Make commits fail with the given diagnostic
    pub fn fail_commit(mut self, diagnostic: impl Into<String>) -> Self {
        self.fail_commit = Some(diagnostic.into());
        self
    }

    /// Make tag creation fail with the given diagnostic
    pub fn fail_create_tag(mut self, diagnostic: impl Into<String>) -> Self {
        self.fail_tag = Some(diagnostic.into());
        self
    }

    /// Names of the operations invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Messages of the commits made so far
    pub fn commits(&self) -> Vec<String> {
        self.lock().commits.clone()
    }

    /// Tags created so far
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.lock().created.clone()
    }

    /// Current tag names, including created ones
    pub fn tags(&self) -> Vec<String> {
        self.lock().tags.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: &str) -> MutexGuard<'_, MockState> {
        let mut state = self.lock();
        state.calls.push(call.to_string());
        state
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn exists(&self) -> bool {
        let _state = self.record("exists");
        self.exists
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let state = self.record("list_tags");
        match &self.fail_list {
            Some(diagnostic) => Err(TagReleaseError::environment(diagnostic.clone())),
            None => Ok(state.tags.clone()),
        }
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let state = self.record("tag_exists");
        match &self.fail_lookup {
            Some(diagnostic) => Err(TagReleaseError::environment(diagnostic.clone())),
            None => Ok(state.tags.iter().any(|tag| tag == name)),
        }
    }

    fn is_clean(&self) -> Result<bool> {
        let state = self.record("is_clean");
        match &self.fail_status {
            Some(diagnostic) => Err(TagReleaseError::environment(diagnostic.clone())),
            None => Ok(state.clean),
        }
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut state = self.record("commit_all");
        if let Some(diagnostic) = &self.fail_commit {
            return Err(TagReleaseError::environment(diagnostic.clone()));
        }

        state.commits.push(message.to_string());
        state.clean = true;
        Ok(())
    }

    fn create_tag(&self, name: &str, annotated: bool, message: &str) -> Result<()> {
        let mut state = self.record("create_tag");
        if let Some(diagnostic) = &self.fail_tag {
            return Err(TagReleaseError::environment(diagnostic.clone()));
        }
        if state.tags.iter().any(|tag| tag == name) {
            return Err(TagReleaseError::environment(format!(
                "tag '{}' already exists",
                name
            )));
        }

        state.tags.push(name.to_string());
        state.created.push(CreatedTag {
            name: name.to_string(),
            annotated,
            message: message.to_string(),
        });
        Ok(())
    }
}
