use crate::constants::{
    DEFAULT_HOME_DIR, DEFAULT_LISTEN_PORT, DEFAULT_THREAD_COUNT, DEFAULT_USER,
    DEFAULT_WELCOME_MESSAGE, SALT_LENGTH, USERNAME_REGEX,
};
use crate::core_auth::helper::{generate_salt, hash_password, parse_digest};
use crate::core_auth::{User, UserDirectory};
use crate::core_fs::SandboxedPath;
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse configuration file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write configuration file {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Home directory for user {0} is unusable: {1}")]
    HomeDir(String, String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub thread_count: usize,
    pub welcome_message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    pub name: String,
    pub pass_salt: String,
    pub pass_hash: String,
    /// Relative paths are taken from the configuration file's directory.
    pub home_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            thread_count: DEFAULT_THREAD_COUNT,
            welcome_message: String::from(DEFAULT_WELCOME_MESSAGE),
        }
    }
}

impl Default for Config {
    /// One anonymous user with an empty password and a fresh random salt.
    fn default() -> Self {
        let salt = generate_salt(SALT_LENGTH);
        Self {
            server: ServerConfig::default(),
            users: vec![UserConfig {
                name: String::from(DEFAULT_USER),
                pass_hash: hash_password("", &salt),
                pass_salt: salt,
                home_dir: String::from(DEFAULT_HOME_DIR),
            }],
        }
    }
}

impl Config {
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(&content, path)
    }

    /// Loads `path`, writing a default configuration there first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No configuration at {:?}, writing defaults", path);
            Config::default().save(path)?;
        }
        Self::load_from_file(path)
    }

    /// Writes to `<path>.tmp`, keeps the previous file as `<path>.old`, then
    /// renames the temporary file into place.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let tmp_path = sibling_with_suffix(path, ".tmp");
        let old_path = sibling_with_suffix(path, ".old");

        std::fs::write(&tmp_path, content).map_err(|e| ConfigError::Write(tmp_path.clone(), e))?;
        if path.exists() {
            let _ = std::fs::remove_file(&old_path);
            std::fs::rename(path, &old_path).map_err(|e| ConfigError::Write(old_path.clone(), e))?;
        }
        std::fs::rename(&tmp_path, path).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_port == 0 {
            return Err(ConfigError::Invalid(String::from("listen_port must be non-zero")));
        }
        if self.server.thread_count == 0 {
            return Err(ConfigError::Invalid(String::from("thread_count must be non-zero")));
        }
        if self.users.is_empty() {
            return Err(ConfigError::Invalid(String::from("at least one user is required")));
        }

        let username_pattern = Regex::new(USERNAME_REGEX)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let mut seen = HashSet::new();
        for user in &self.users {
            if !username_pattern.is_match(&user.name) {
                return Err(ConfigError::Invalid(format!("invalid username {:?}", user.name)));
            }
            if !seen.insert(user.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate username {:?}", user.name)));
            }
            if parse_digest(&user.pass_hash).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "pass_hash of user {:?} is not a hex SHA-256 digest",
                    user.name
                )));
            }
        }
        Ok(())
    }

    /// Builds the user directory, creating missing home directories.
    pub fn user_directory(&self, base_dir: &Path) -> Result<UserDirectory, ConfigError> {
        let mut users = Vec::with_capacity(self.users.len());
        for entry in &self.users {
            let home_path = base_dir.join(&entry.home_dir);
            if !home_path.exists() {
                info!("Creating home directory {:?} for user {}", home_path, entry.name);
                std::fs::create_dir_all(&home_path)
                    .map_err(|e| ConfigError::HomeDir(entry.name.clone(), e.to_string()))?;
            }
            let home = SandboxedPath::new(&home_path)
                .map_err(|e| ConfigError::HomeDir(entry.name.clone(), e.to_string()))?;
            if !home.is_dir() {
                return Err(ConfigError::HomeDir(
                    entry.name.clone(),
                    String::from("not a directory"),
                ));
            }
            let digest = parse_digest(&entry.pass_hash).ok_or_else(|| {
                ConfigError::Invalid(format!("bad pass_hash for user {:?}", entry.name))
            })?;
            users.push(User::new(&entry.name, &entry.pass_salt, digest, home));
        }
        Ok(UserDirectory::new(users))
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
