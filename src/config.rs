use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILE_NAME: &str = ".gatorconfig.json";
const CONFIG_PATH_VAR: &str = "GATOR_CONFIG";

const DEFAULT_DATABASE_POOL_SIZE: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_IN_SECONDS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("config file {path} is not valid json: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(serde_json::Error),
    #[error("no database url configured: set DATABASE_URL or db_url in {0}")]
    MissingDatabaseUrl(PathBuf),
    #[error("{name} must be a positive number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Process-wide settings read from the environment (`.env` is loaded by `main`).
pub struct Config;

impl Config {
    pub fn database_pool_size() -> Result<u32, ConfigError> {
        positive_number("DATABASE_POOL_SIZE", DEFAULT_DATABASE_POOL_SIZE)
    }

    pub fn request_timeout_in_seconds() -> Result<u64, ConfigError> {
        positive_number(
            "REQUEST_TIMEOUT_IN_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_IN_SECONDS,
        )
    }

    pub fn database_url_override() -> Option<String> {
        env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

fn positive_number<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => parse_positive(name, &value),
    }
}

fn parse_positive<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}

/// The per-user session file (`~/.gatorconfig.json`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub db_url: String,
    #[serde(default)]
    pub current_user_name: String,

    #[serde(skip)]
    path: PathBuf,
}

impl UserConfig {
    pub fn read() -> Result<Self, ConfigError> {
        Self::read_from(default_path()?)
    }

    /// A missing file is treated as an empty session so that `register` can create it.
    pub fn read_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    ..Self::default()
                })
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let mut config: UserConfig = serde_json::from_str(&data)
            .map_err(|source| ConfigError::Decode {
                path: path.clone(),
                source,
            })?;
        config.path = path;

        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_user(&self) -> Option<&str> {
        if self.current_user_name.is_empty() {
            None
        } else {
            Some(&self.current_user_name)
        }
    }

    pub fn set_user(&mut self, name: &str) -> Result<(), ConfigError> {
        self.current_user_name = name.to_string();

        self.write()
    }

    pub fn clear_user(&mut self) -> Result<(), ConfigError> {
        self.set_user("")
    }

    pub fn database_url(&self) -> Result<String, ConfigError> {
        self.resolve_database_url(Config::database_url_override())
    }

    fn resolve_database_url(&self, env_override: Option<String>) -> Result<String, ConfigError> {
        match env_override {
            Some(url) => Ok(url),
            None if !self.db_url.trim().is_empty() => Ok(self.db_url.clone()),
            None => Err(ConfigError::MissingDatabaseUrl(self.path.clone())),
        }
    }

    fn write(&self) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;

        fs::write(&self.path, data).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        restrict_permissions(&self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn default_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        return Ok(PathBuf::from(path));
    }

    let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;

    Ok(dirs.home_dir().join(CONFIG_FILE_NAME))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
pub(crate) fn temp_config_path() -> PathBuf {
    env::temp_dir().join(format!("gatorconfig-{}.json", uuid::Uuid::new_v4()))
}
