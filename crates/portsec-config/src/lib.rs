//! Shared configuration for the portsec CLI.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `portsec_core::SwitchConfig`. The CLI layers its flag overrides on
//! top of what this crate produces.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portsec_core::{SwitchConfig, SwitchMode};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PORTSEC_CONFIG";
/// Password used when a profile names no other source.
pub const PASSWORD_ENV: &str = "PORTSEC_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named switch profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Starter config written by `portsec config init`: one mock profile.
    pub fn starter() -> Self {
        let mut cfg = Self::default();
        cfg.profiles.insert("default".into(), Profile::default());
        cfg
    }

    /// Name of the profile to use, honouring an explicit override.
    pub fn active_profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// Profile by name. A missing profile is only an error when it was
    /// asked for explicitly; otherwise built-in defaults apply.
    pub fn profile(&self, requested: Option<&str>) -> Result<Profile, ConfigError> {
        let name = self.active_profile_name(requested);
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if requested.is_none() => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named switch profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// "mock" or "real".
    #[serde(default)]
    pub mode: SwitchMode,

    /// Switch host or IP, optionally with `:port`.
    #[serde(default = "default_address")]
    pub address: String,

    /// vty port when `address` has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Login password (plaintext; prefer `password_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the login password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Privileged EXEC secret, when it differs from the login password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_secret: Option<String>,

    /// Override the default timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            mode: SwitchMode::Mock,
            address: default_address(),
            port: None,
            username: None,
            password: None,
            password_env: None,
            enable_secret: None,
            timeout: None,
        }
    }
}

fn default_address() -> String {
    "192.168.1.1".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `PORTSEC_CONFIG`, then platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "portsec", "portsec").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("portsec");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file (missing file means defaults) + environment.
///
/// Environment keys use `__` for nesting, e.g.
/// `PORTSEC_DEFAULTS__TIMEOUT=10` or `PORTSEC_DEFAULT_PROFILE=lab`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("PORTSEC_")
                .ignore(&["config", "password"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the login password: profile's `password_env` variable, then
/// `PORTSEC_PASSWORD`, then plaintext, then the factory default.
pub fn resolve_password(profile: &Profile) -> SecretString {
    resolve_password_with(profile, |name| std::env::var(name).ok())
}

fn resolve_password_with(profile: &Profile, lookup: impl Fn(&str) -> Option<String>) -> SecretString {
    // 1. Profile's password_env → env var lookup
    if let Some(value) = profile.password_env.as_deref().and_then(&lookup) {
        return SecretString::from(value);
    }

    // 2. Tool-wide env var
    if let Some(value) = lookup(PASSWORD_ENV) {
        return SecretString::from(value);
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return SecretString::from(pw.clone());
    }

    SwitchConfig::default().password
}

/// Build a `SwitchConfig` from a profile, no CLI flag overrides.
pub fn profile_to_switch_config(profile: &Profile, defaults: &Defaults) -> Result<SwitchConfig, ConfigError> {
    let address = profile.address.trim();
    if profile.mode == SwitchMode::Real && address.is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: "real mode needs a switch address".into(),
        });
    }

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let base = SwitchConfig::default();
    Ok(SwitchConfig {
        mode: profile.mode,
        address: address.to_string(),
        port: profile.port.unwrap_or(base.port),
        username: profile.username.clone().unwrap_or(base.username),
        password: resolve_password(profile),
        enable_secret: profile
            .enable_secret
            .as_ref()
            .map(|s| SecretString::from(s.clone())),
        timeout: Duration::from_secs(timeout),
    })
}
