use crate::error::{TagReleaseError, Result};
use semver::{BuildMetadata, Version};
use std::fmt;

/// Placeholder replaced by the normalized version in message templates
pub const VERSION_PLACEHOLDER: &str = "%version%";

/// Parse a version string leniently.
///
/// Surrounding whitespace, a leading `=` and a single leading `v`/`V` are
/// stripped before the remainder is parsed strictly as `major.minor.patch`
/// with an optional pre-release and build metadata.
///
/// # Example
/// ```
/// # use tag_release::domain::version::parse_loose;
/// assert_eq!(parse_loose("v1.2.3").unwrap().to_string(), "1.2.3");
/// assert!(parse_loose("01.2.3").is_none());
/// ```
pub fn parse_loose(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed
        .strip_prefix(|c: char| c == 'v' || c == 'V')
        .unwrap_or(trimmed);

    Version::parse(trimmed).ok()
}

/// Returns true if the string is a valid semantic version under [parse_loose]
pub fn is_valid(input: &str) -> bool {
    parse_loose(input).is_some()
}

/// Render a message template by substituting every `%version%` token
pub fn render_message(template: &str, version: &Version) -> String {
    template.replace(VERSION_PLACEHOLDER, &version.to_string())
}

/// A validated release version with its build metadata carried separately.
///
/// `version` never holds build metadata; the comparison gate orders on it
/// alone and uses `tag` for exact duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Canonical semantic version (no prefix, no build metadata)
    pub version: Version,
    /// Text after the first literal `+` of the candidate, if any
    pub build_metadata: Option<String>,
    /// Literal tag name: `prefix + version[+build_metadata]`
    pub tag: String,
}

impl ResolvedVersion {
    /// Validate and normalize a candidate version string.
    ///
    /// The candidate is split on its first `+`. The part before it must be a
    /// semantic version; the part after it, when present, must be valid
    /// build metadata.
    ///
    /// # Arguments
    /// * `candidate` - Raw version text (e.g. "v1.2.3", "1.0.0+build.2")
    /// * `prefix` - String prepended to the version to form the tag name
    ///
    /// # Returns
    /// * `Ok(ResolvedVersion)` - Normalized version and tag name
    /// * `Err(TagReleaseError::Validation)` - If the candidate is not a valid semantic version
    pub fn parse(candidate: &str, prefix: &str) -> Result<Self> {
        let candidate = candidate.trim();
        let invalid = || {
            TagReleaseError::validation(format!(
                "\"{}\" is not a valid semantic version",
                candidate
            ))
        };

        let (proper, build) = match candidate.split_once('+') {
            Some((proper, build)) => (proper, Some(build)),
            None => (candidate, None),
        };

        let version = parse_loose(proper).ok_or_else(invalid)?;

        let build_metadata = match build {
            Some(build) if build.is_empty() || BuildMetadata::new(build).is_err() => {
                return Err(invalid());
            }
            Some(build) => Some(build.to_string()),
            None => None,
        };

        let mut resolved = ResolvedVersion {
            version,
            build_metadata,
            tag: String::new(),
        };
        resolved.tag = format!("{}{}", prefix, resolved.full_version());

        Ok(resolved)
    }

    pub fn has_build_metadata(&self) -> bool {
        self.build_metadata.is_some()
    }

    /// Version with build metadata re-attached (e.g. "1.0.0+build.2")
    pub fn full_version(&self) -> String {
        match &self.build_metadata {
            Some(build) => format!("{}+{}", self.version, build),
            None => self.version.to_string(),
        }
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_version())
    }
}
