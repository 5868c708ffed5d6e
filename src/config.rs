use crate::domain::version;
use crate::error::{Result, TagReleaseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the configuration file looked up in the working and user config directories
pub const CONFIG_FILE_NAME: &str = "tagrelease.toml";

/// Default commit and annotated-tag message
pub const DEFAULT_MESSAGE: &str = "Release %version%";

/// Default string prepended to the version to form the tag name
pub const DEFAULT_PREFIX: &str = "";

/// Zero-argument callback producing a candidate version string.
#[derive(Clone)]
pub struct VersionFn(Arc<dyn Fn() -> String + Send + Sync>);

impl VersionFn {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        VersionFn(Arc::new(f))
    }

    /// Invoke the callback
    pub fn call(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for VersionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VersionFn(..)")
    }
}

/// Raw release options as written in a config file or given on the command line.
///
/// Every field is optional; [TaskConfig::normalize] applies the defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TaskOptions {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(skip)]
    pub version_fn: Option<VersionFn>,

    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub commit: Option<bool>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub annotate: Option<bool>,
}

impl TaskOptions {
    /// Interpret a single string as either a metadata file path or a literal version.
    ///
    /// An existing file wins; otherwise the string must be a valid semantic version.
    pub fn from_shorthand(value: &str) -> Result<Self> {
        if Path::new(value).is_file() {
            Ok(TaskOptions {
                file: Some(PathBuf::from(value)),
                ..Default::default()
            })
        } else if version::is_valid(value) {
            Ok(TaskOptions {
                version: Some(value.to_string()),
                ..Default::default()
            })
        } else {
            Err(TagReleaseError::config(format!(
                "Invalid configuration \"{}\": file doesn't exist and it is not a valid semantic version",
                value
            )))
        }
    }

    fn has_version_source(&self) -> bool {
        self.version.is_some() || self.version_fn.is_some() || self.file.is_some()
    }

    /// Layer `overrides` on top of these options.
    ///
    /// Version sources (`version`, `version_fn`, `file`) are replaced as a group
    /// when `overrides` names any of them; other fields are overridden one by one.
    pub fn merge(self, overrides: TaskOptions) -> TaskOptions {
        let (version, version_fn, file) = if overrides.has_version_source() {
            (overrides.version, overrides.version_fn, overrides.file)
        } else {
            (self.version, self.version_fn, self.file)
        };

        TaskOptions {
            version,
            version_fn,
            file,
            commit: overrides.commit.or(self.commit),
            message: overrides.message.or(self.message),
            prefix: overrides.prefix.or(self.prefix),
            annotate: overrides.annotate.or(self.annotate),
        }
    }

    fn into_release_options(self) -> Result<ReleaseOptions> {
        let source = match (self.version, self.version_fn, self.file) {
            (Some(version), _, _) if !version.trim().is_empty() => VersionSource::Literal(version),
            (_, Some(callback), _) => VersionSource::Callback(callback),
            (_, _, Some(file)) => VersionSource::Metadata(file),
            _ => {
                return Err(TagReleaseError::config(
                    "No version given and no metadata file configured",
                ))
            }
        };

        let mut options = ReleaseOptions::new(source);
        if let Some(commit) = self.commit {
            options.commit = commit;
        }
        if let Some(message) = self.message {
            options.message = message;
        }
        if let Some(prefix) = self.prefix {
            options.prefix = prefix;
        }
        if let Some(annotate) = self.annotate {
            options.annotate = annotate;
        }

        Ok(options)
    }
}

/// The configuration value handed to a release run.
#[derive(Debug, Clone)]
pub enum TaskConfig {
    /// Metadata file path, or a literal version if no such file exists
    Shorthand(String),
    /// Callback producing the version
    Callback(VersionFn),
    /// Structured options record
    Options(TaskOptions),
}

impl TaskConfig {
    /// Resolve the configuration into canonical [ReleaseOptions] with defaults applied
    pub fn normalize(self) -> Result<ReleaseOptions> {
        let options = match self {
            TaskConfig::Shorthand(value) => TaskOptions::from_shorthand(&value)?,
            TaskConfig::Callback(callback) => TaskOptions {
                version_fn: Some(callback),
                ..Default::default()
            },
            TaskConfig::Options(options) => options,
        };

        options.into_release_options()
    }
}

/// Where the candidate version comes from
#[derive(Debug, Clone)]
pub enum VersionSource {
    Literal(String),
    Callback(VersionFn),
    /// JSON metadata file with a `version` field
    Metadata(PathBuf),
}

/// Canonical options record for a single release run
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    pub source: VersionSource,
    /// Commit outstanding tracked changes before tagging
    pub commit: bool,
    /// Message template containing `%version%`
    pub message: String,
    pub prefix: String,
    /// Create an annotated tag carrying the message instead of a lightweight one
    pub annotate: bool,
}

impl ReleaseOptions {
    /// Create options for `source` with every other field at its default
    pub fn new(source: VersionSource) -> Self {
        ReleaseOptions {
            source,
            commit: true,
            message: DEFAULT_MESSAGE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            annotate: false,
        }
    }
}

/// Loads release options from a TOML file or returns empty options.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagrelease.toml` in current directory
/// 3. `tagrelease.toml` in user config directory
/// 4. Empty options if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(TaskOptions)` - Loaded or empty options
/// * `Err(TagReleaseError::Config)` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<TaskOptions> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(TaskOptions::default()),
        },
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        TagReleaseError::config(format!(
            "Cannot read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&config_str).map_err(|e| {
        TagReleaseError::config(format!("Invalid config file {}: {}", path.display(), e))
    })
}

fn default_config_path() -> Option<PathBuf> {
    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
