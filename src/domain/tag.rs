use crate::domain::version::parse_loose;
use semver::{BuildMetadata, Version};

/// Snapshot of the repository's tags, listed once per release run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Create a tag set from raw tag names
    pub fn new(tags: Vec<String>) -> Self {
        TagSet { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Highest tag that parses as a semantic version.
    ///
    /// Tags carrying `prefix` are parsed with the prefix removed; every tag is
    /// also tried as-is. Build metadata is dropped before ordering. Returns
    /// `None` if no tag parses.
    ///
    /// # Example
    /// ```
    /// # use tag_release::domain::TagSet;
    /// let tags = TagSet::new(vec!["v1.2.0".into(), "nightly".into(), "1.10.0".into()]);
    /// assert_eq!(tags.highest("").unwrap().to_string(), "1.10.0");
    /// ```
    pub fn highest(&self, prefix: &str) -> Option<Version> {
        self.tags
            .iter()
            .filter_map(|tag| parse_tag_version(tag, prefix))
            .max()
    }

    /// Tags that do not parse as semantic versions
    pub fn unparsable<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| parse_tag_version(tag, prefix).is_none())
            .map(String::as_str)
    }
}

/// Parse the version carried by a tag name, ignoring its build metadata
pub fn parse_tag_version(tag: &str, prefix: &str) -> Option<Version> {
    let stripped = if prefix.is_empty() {
        None
    } else {
        tag.strip_prefix(prefix).and_then(parse_loose)
    };

    let mut version = stripped.or_else(|| parse_loose(tag))?;
    version.build = BuildMetadata::EMPTY;
    Some(version)
}
