//! Configuration loading from files and environment.

use super::settings::Settings;
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let settings = Self::read_file(path.as_ref())?;
        Self::validate(&settings)?;
        Ok(settings)
    }

    fn read_file(path: &Path) -> Result<Settings> {
        info!("Loading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents)
    }

    /// Load from TOML string
    pub fn from_toml(contents: &str) -> Result<Settings> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from environment variables with optional file override
    pub fn from_env_and_file(file_path: Option<&Path>) -> Result<Settings> {
        Self::from_file_with_overrides(file_path, |key| std::env::var(key).ok())
    }

    /// Read the file, apply overrides from `lookup`, then validate the result
    pub fn from_file_with_overrides<F>(file_path: Option<&Path>, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match file_path {
            Some(path) => Self::read_file(path)?,
            None => Settings::default(),
        };

        Self::apply_overrides(&mut settings, lookup)?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Apply `DELIVOPT_*` overrides read through `lookup`
    pub fn apply_overrides<F>(settings: &mut Settings, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("DELIVOPT_ADDRESS") {
            debug!("Overriding server address from environment");
            settings.server.address = address;
        }

        if let Some(level) = lookup("DELIVOPT_LOG_LEVEL") {
            debug!("Overriding log level from environment");
            settings.logging.level = level;
        }

        if let Some(path) = lookup("DELIVOPT_ROUTE_EXECUTABLE") {
            debug!("Overriding route solver executable from environment");
            settings.route.executable = PathBuf::from(path);
        }

        if let Some(path) = lookup("DELIVOPT_SELECTION_EXECUTABLE") {
            debug!("Overriding selection solver executable from environment");
            settings.selection.executable = PathBuf::from(path);
        }

        if let Some(timeout) = lookup("DELIVOPT_TIMEOUT_MS") {
            let timeout = timeout.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("DELIVOPT_TIMEOUT_MS '{}' is not a number", timeout))
            })?;
            debug!("Overriding solver timeout from environment");
            settings.gateway.timeout_ms = timeout;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.gateway.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "gateway.max_concurrent must be at least 1".to_string(),
            ));
        }

        if settings.gateway.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid(format!(
                "gateway.max_concurrent must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }

        if settings.route.executable.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "route.executable must not be empty".to_string(),
            ));
        }

        if settings.selection.executable.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "selection.executable must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load configuration from standard locations
pub fn load_config() -> Result<Settings> {
    // Check for config file in order:
    // 1. Environment variable DELIVOPT_CONFIG
    // 2. ./config/default.toml
    // 3. Defaults with env overrides

    if let Ok(path) = std::env::var("DELIVOPT_CONFIG") {
        return ConfigLoader::from_env_and_file(Some(Path::new(&path)));
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        return ConfigLoader::from_env_and_file(Some(default_path));
    }

    info!("No configuration file found, using defaults");
    ConfigLoader::from_env_and_file(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            address = "127.0.0.1:6000"

            [gateway]
            timeout_ms = 1500
            max_concurrent = 2

            [route]
            executable = "/opt/solvers/a_star"
            verify_endpoints = true
            "#
        )
        .unwrap();

        let settings = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(settings.server.address, "127.0.0.1:6000");
        assert_eq!(settings.gateway.max_concurrent, 2);
        assert_eq!(settings.gateway.timeout_ms, 1500);
        assert_eq!(settings.route.executable, PathBuf::from("/opt/solvers/a_star"));
        assert!(settings.route.verify_endpoints);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::from_file("/nonexistent/delivopt.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_toml() {
        let err = ConfigLoader::from_toml("[gateway\nmax_concurrent = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_stderr_policy() {
        let err = ConfigLoader::from_toml("[gateway]\nstderr_policy = \"ignore\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DELIVOPT_ADDRESS", "127.0.0.1:7000"),
            ("DELIVOPT_SELECTION_EXECUTABLE", "/usr/local/bin/knapsack"),
            ("DELIVOPT_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        ConfigLoader::apply_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.server.address, "127.0.0.1:7000");
        assert_eq!(
            settings.selection.executable,
            PathBuf::from("/usr/local/bin/knapsack")
        );
        assert_eq!(settings.gateway.timeout_ms, 250);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_override_fills_empty_executable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[route]\nexecutable = \"\"").unwrap();

        assert!(ConfigLoader::from_file(file.path()).is_err());

        let settings = ConfigLoader::from_file_with_overrides(Some(file.path()), |key| {
            (key == "DELIVOPT_ROUTE_EXECUTABLE").then(|| "/opt/solvers/a_star".to_string())
        })
        .unwrap();
        assert_eq!(settings.route.executable, PathBuf::from("/opt/solvers/a_star"));

        let err = ConfigLoader::from_file_with_overrides(Some(file.path()), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut settings = Settings::default();
        let err = ConfigLoader::apply_overrides(&mut settings, |key| {
            (key == "DELIVOPT_TIMEOUT_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        assert!(ConfigLoader::validate(&settings).is_ok());

        settings.gateway.max_concurrent = 0;
        assert!(ConfigLoader::validate(&settings).is_err());

        settings.gateway.max_concurrent = usize::MAX;
        let err = ConfigLoader::validate(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        settings.gateway.max_concurrent = Semaphore::MAX_PERMITS;
        assert!(ConfigLoader::validate(&settings).is_ok());

        let mut settings = Settings::default();
        settings.route.executable = PathBuf::new();
        assert!(ConfigLoader::validate(&settings).is_err());
    }
}
