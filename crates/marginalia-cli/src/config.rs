//! Locating and reading `marginalia` TOML configuration.
//!
//! A document can carry its own `.marginalia.toml` next to it, so a folder of
//! notes renders with the same theme regardless of where the CLI runs from.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use marginalia::{MarginaliaError, config::AppConfig};

/// File name looked up beside the input document.
const DOCUMENT_CONFIG: &str = ".marginalia.toml";

/// Path looked up relative to the working directory.
const LOCAL_CONFIG: &str = "marginalia/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MarginaliaError {
    fn from(err: ConfigError) -> Self {
        MarginaliaError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Document,
    Local,
    System,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "--config",
            Self::Document => "document directory",
            Self::Local => "working directory",
            Self::System => "user config directory",
        })
    }
}

/// Loads the configuration for rendering `document`.
///
/// An explicit path must exist. Otherwise the first existing file wins, in
/// this order: `.marginalia.toml` beside the document, `marginalia/config.toml`
/// in the working directory, then `config.toml` in the platform config
/// directory. With none of them present the defaults are used.
///
/// # Errors
///
/// Returns [`MarginaliaError::Config`] when the explicit file is missing or
/// the chosen file is not valid configuration.
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
    document: Option<&Path>,
) -> Result<AppConfig, MarginaliaError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        return read(ConfigSource::Explicit, path);
    }

    match search_paths(document)
        .into_iter()
        .find(|(_, path)| path.is_file())
    {
        Some((source, path)) => read(source, &path),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Implicit locations in the order they are tried.
fn search_paths(document: Option<&Path>) -> Vec<(ConfigSource, PathBuf)> {
    let mut paths = Vec::new();
    if let Some(dir) = document.and_then(Path::parent) {
        paths.push((ConfigSource::Document, dir.join(DOCUMENT_CONFIG)));
    }
    paths.push((ConfigSource::Local, PathBuf::from(LOCAL_CONFIG)));
    match ProjectDirs::from("com", "marginalia", "marginalia") {
        Some(dirs) => paths.push((ConfigSource::System, dirs.config_dir().join("config.toml"))),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

fn read(source: ConfigSource, path: &Path) -> Result<AppConfig, MarginaliaError> {
    info!(source:% = source, path:? = path; "Loading configuration");
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml"), None).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_document_directory_is_searched_first() {
        let paths = search_paths(Some(Path::new("notes/week.md")));
        assert_eq!(
            paths[0],
            (ConfigSource::Document, Path::new("notes").join(DOCUMENT_CONFIG))
        );
        assert_eq!(paths[1], (ConfigSource::Local, PathBuf::from(LOCAL_CONFIG)));

        let paths = search_paths(None);
        assert_eq!(paths[0].0, ConfigSource::Local);
    }

    #[test]
    fn test_config_beside_document_is_loaded() {
        let dir = tempdir().expect("Failed to create temp directory");
        std::fs::write(dir.path().join(DOCUMENT_CONFIG), "[media]\nquality = 42\n")
            .expect("Failed to write config");
        let document = dir.path().join("notes.md");

        let config = load_config(None::<&Path>, Some(&document)).expect("config loads");
        assert_eq!(config.media().quality(), 42);
    }

    #[test]
    fn test_explicit_file_wins_over_document_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        std::fs::write(dir.path().join(DOCUMENT_CONFIG), "[media]\nquality = 42\n")
            .expect("Failed to write config");
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[media]\nquality = 90\n").expect("Failed to write config");

        let config =
            load_config(Some(&explicit), Some(&dir.path().join("notes.md"))).expect("config loads");
        assert_eq!(config.media().quality(), 90);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[media\nquality = ").expect("Failed to write config");

        let err = load_config(Some(&path), None).unwrap_err();
        assert!(matches!(err, MarginaliaError::Config(_)));
        assert!(err.to_string().contains("broken.toml"), "{err}");
    }
}
