//! # Runtime Configuration Module
//!
//! Where declarations come from, where the compiled table is cached and
//! whether declaration files are watched.
//!
//! Configuration is read from an optional TOML file and then overlaid with
//! environment variables, so a deployment can override a checked-in file.
//!
//! ## File
//!
//! ```toml
//! declarations = ["routes/app.yaml", "routes/admin.yaml"]
//! cache_path = "target/routes.cache.json"
//! cache_enabled = true
//! watch = false
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! ## Environment Variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `ROUTEMAP_DECLARATIONS` | Comma-separated declaration files, replaces the file's list |
//! | `ROUTEMAP_CACHE_PATH` | Cache file location |
//! | `ROUTEMAP_CACHE` | `off`/`false`/`0` disables the cache, `on`/`true`/`1` enables it |
//! | `ROUTEMAP_WATCH` | `true`/`1`/`on` enables hot reload |
//!
//! ## Usage
//!
//! ```rust
//! use routemap::runtime_config::RouteConfig;
//!
//! let config = RouteConfig::from_env();
//! println!("{} declaration files", config.declarations.len());
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_DECLARATIONS: &str = "ROUTEMAP_DECLARATIONS";
pub const ENV_CACHE_PATH: &str = "ROUTEMAP_CACHE_PATH";
pub const ENV_CACHE: &str = "ROUTEMAP_CACHE";
pub const ENV_WATCH: &str = "ROUTEMAP_WATCH";

/// Route loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    /// Declaration files, merged in the order listed
    pub declarations: Vec<PathBuf>,
    /// Persisted route cache; `None` disables persistence
    pub cache_path: Option<PathBuf>,
    /// `false` skips both cache load and save
    pub cache_enabled: bool,
    /// Rebuild and republish the table when a declaration file changes
    pub watch: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            declarations: Vec::new(),
            cache_path: None,
            cache_enabled: true,
            watch: false,
        }
    }
}

impl RouteConfig {
    /// Defaults overlaid with environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route config {}", path.display()))?;
        let mut config: RouteConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse route config {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Override fields with any `ROUTEMAP_*` variables that are set.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(list) = var(ENV_DECLARATIONS) {
            self.declarations = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }
        if let Some(path) = var(ENV_CACHE_PATH).filter(|p| !p.is_empty()) {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(value) = var(ENV_CACHE) {
            match parse_flag(&value) {
                Some(enabled) => self.cache_enabled = enabled,
                None => warn!(var = ENV_CACHE, value = %value, "Ignoring unrecognised flag value"),
            }
        }
        if let Some(value) = var(ENV_WATCH) {
            match parse_flag(&value) {
                Some(watch) => self.watch = watch,
                None => warn!(var = ENV_WATCH, value = %value, "Ignoring unrecognised flag value"),
            }
        }
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in &mut self.declarations {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(path) = self.cache_path.as_mut().filter(|p| p.is_relative()) {
            *path = base.join(&*path);
        }
    }

    /// The cache file to use, if caching is enabled and a location is set.
    #[must_use]
    pub fn effective_cache_path(&self) -> Option<&Path> {
        if self.cache_enabled {
            self.cache_path.as_deref()
        } else {
            None
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
