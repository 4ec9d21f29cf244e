use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use toml::{Table, Value};

/// Top-level key holding one child section per deployment environment
pub const MAILER_SECTION: &str = "Mailer";

pub const DEFAULT_ENVIRONMENT: &str = "Production";
pub const DEFAULT_CONFIG_PATH: &str = "mailer.toml";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Relay connection settings for the active environment.
///
/// Fields missing from the environment section bind to their zero-value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MailConfig {
    pub disabled: bool,
    pub host: String,
    pub port: u16,
    /// Whole-request bound for the relay POST, in seconds.
    /// Absent or `0` falls back to [`DEFAULT_REQUEST_TIMEOUT`].
    pub timeout: Option<u64>,
}

impl MailConfig {
    /// Resolve the `Mailer.<environment>` section of a configuration tree.
    ///
    /// The environment key must match exactly. There is no fallback section.
    pub fn resolve(tree: &Table, environment: &str) -> Result<Self, ConfigError> {
        let section = tree
            .get(MAILER_SECTION)
            .and_then(Value::as_table)
            .and_then(|mailer| mailer.get(environment))
            .ok_or_else(|| ConfigError::MissingEnvironmentSection(environment.to_string()))?;

        section
            .clone()
            .try_into()
            .map_err(|source| ConfigError::InvalidSection {
                environment: environment.to_string(),
                source,
            })
    }

    /// Load the layered configuration files and resolve the section for `environment`
    pub fn load(path: &Path, environment: &str) -> Result<Self, ConfigError> {
        let tree = load_tree(path, environment)?;
        Self::resolve(&tree, environment)
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/Send", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Where the hosting process finds its mail configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: String,
    pub config_path: PathBuf,
    pub templates: String,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Settings {
            environment: env::var("MAILER_ENVIRONMENT")
                .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string()),
            config_path: env::var("MAILER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
            templates: env::var("MAILER_TEMPLATES")
                .unwrap_or_else(|_| crate::render::DEFAULT_TEMPLATES.to_string()),
        }
    }
}

/// Read `path` and merge the optional `<stem>.<environment>.toml` overlay on top of it
pub fn load_tree(path: &Path, environment: &str) -> Result<Table, ConfigError> {
    let mut tree = read_table(path)?;

    let overlay_path = overlay_path(path, environment);
    if overlay_path.exists() {
        let overlay = read_table(&overlay_path)?;
        merge_tables(&mut tree, overlay);
        tracing::debug!(path = %overlay_path.display(), "Merged environment overlay");
    }

    Ok(tree)
}

/// Recursively merge `overlay` into `base`; overlay values win on conflicts
pub fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn overlay_path(path: &Path, environment: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}.toml", stem, environment))
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    raw.parse::<Table>().map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Section {0} not found inside Mailer section")]
    MissingEnvironmentSection(String),

    #[error("Section Mailer.{environment} is malformed: {source}")]
    InvalidSection {
        environment: String,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
