//! Version resolution: turns release options into a validated version,
//! tag name and rendered message before the repository is touched.

use crate::config::{ReleaseOptions, VersionSource};
use crate::domain::{render_message, ResolvedVersion};
use crate::error::{Result, TagReleaseError};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything the tag decision engine needs for one release
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelease {
    pub version: ResolvedVersion,
    /// Message template with `%version%` substituted
    pub message: String,
    pub prefix: String,
    pub commit: bool,
    pub annotate: bool,
}

impl ResolvedRelease {
    /// Literal tag name to create
    pub fn tag(&self) -> &str {
        &self.version.tag
    }
}

#[derive(Deserialize)]
struct MetadataFile {
    #[serde(default)]
    version: Option<serde_json::Value>,
}

/// Resolve the candidate version and validate it.
///
/// # Returns
/// * `Ok(ResolvedRelease)` - Normalized version, tag name and message
/// * `Err(TagReleaseError::Config)` - Metadata file missing, unreadable, or without a version
/// * `Err(TagReleaseError::Validation)` - Candidate is not a valid semantic version
pub fn resolve(options: &ReleaseOptions) -> Result<ResolvedRelease> {
    let candidate = candidate_version(&options.source)?;
    debug!("candidate version: {:?}", candidate);

    let version = ResolvedVersion::parse(&candidate, &options.prefix)?;
    let message = render_message(&options.message, &version.version);

    Ok(ResolvedRelease {
        version,
        message,
        prefix: options.prefix.clone(),
        commit: options.commit,
        annotate: options.annotate,
    })
}

fn candidate_version(source: &VersionSource) -> Result<String> {
    match source {
        VersionSource::Literal(version) => Ok(version.clone()),
        VersionSource::Callback(callback) => Ok(callback.call()),
        VersionSource::Metadata(path) => read_metadata_version(path),
    }
}

/// Read the `version` field of a JSON metadata file
pub fn read_metadata_version(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(TagReleaseError::config(format!(
            "File \"{}\" not found",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TagReleaseError::config(format!("Cannot read file \"{}\": {}", path.display(), e))
    })?;

    let meta: MetadataFile = serde_json::from_str(&contents).map_err(|e| {
        TagReleaseError::config(format!(
            "File \"{}\" is not a valid metadata document: {}",
            path.display(),
            e
        ))
    })?;

    match meta.version {
        Some(serde_json::Value::String(version)) => Ok(version),
        Some(other) => Err(TagReleaseError::validation(format!(
            "\"{}\" is not a valid semantic version",
            other
        ))),
        None => Err(TagReleaseError::config(format!(
            "File \"{}\" has no version property",
            path.display()
        ))),
    }
}
