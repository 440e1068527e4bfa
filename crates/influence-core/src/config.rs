//! Configuration management for Influence.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Most post stubs a scrape takes from the profile grid.
pub const MAX_POSTS: usize = 12;

/// Most post pages a scrape visits for metric enrichment.
pub const MAX_ENRICHED_POSTS: usize = 10;

/// Main application configuration.
///
/// This is loaded from `~/.config/influence/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser session settings
    pub browser: BrowserConfig,
    /// Scrape pipeline settings
    pub scraping: ScrapingConfig,
    /// Document store settings
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `INFLUENCE_HEADLESS`: Override browser headless mode (true/false)
    /// - `INFLUENCE_CHROME_PATH`: Use a specific Chrome/Chromium executable
    /// - `INFLUENCE_DATABASE_PATH`: Override the document store location
    /// - `INFLUENCE_PROFILE_BASE_URL`: Override the profile site origin
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("INFLUENCE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(path) = lookup("INFLUENCE_CHROME_PATH") {
            if !path.is_empty() {
                tracing::debug!("Override browser.executable_path from env: {}", path);
                self.browser.executable_path = Some(PathBuf::from(path));
            }
        }

        if let Some(path) = lookup("INFLUENCE_DATABASE_PATH") {
            if !path.is_empty() {
                tracing::debug!("Override database.path from env: {}", path);
                self.database.path = Some(PathBuf::from(path));
            }
        }

        if let Some(url) = lookup("INFLUENCE_PROFILE_BASE_URL") {
            if !url.is_empty() {
                tracing::debug!("Override scraping.profile_base_url from env: {}", url);
                self.scraping.profile_base_url = url;
            }
        }
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scraping.max_posts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_posts".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.scraping.max_posts > MAX_POSTS {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_posts".to_string(),
                reason: format!("must not exceed {MAX_POSTS}"),
            });
        }

        if self.scraping.max_enriched_posts > MAX_ENRICHED_POSTS {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_enriched_posts".to_string(),
                reason: format!("must not exceed {MAX_ENRICHED_POSTS}"),
            });
        }

        if self.scraping.max_enriched_posts > self.scraping.max_posts {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_enriched_posts".to_string(),
                reason: format!(
                    "must not exceed scraping.max_posts ({})",
                    self.scraping.max_posts
                ),
            });
        }

        let timeouts = [
            ("browser.navigation_timeout_secs", self.browser.navigation_timeout_secs),
            ("browser.content_timeout_secs", self.browser.content_timeout_secs),
            (
                "browser.post_navigation_timeout_secs",
                self.browser.post_navigation_timeout_secs,
            ),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/influence/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "influence", "influence").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/influence`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "influence", "influence").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Resolve the database file path, defaulting to `<data_dir>/influence.db`.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("influence.db")),
        }
    }
}

/// Browser session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Explicit Chrome/Chromium executable (auto-detected when unset)
    pub executable_path: Option<PathBuf>,
    /// Browser window and viewport width
    pub window_width: u32,
    /// Browser window and viewport height
    pub window_height: u32,
    /// Ceiling for navigation and default request timeouts, in seconds
    pub navigation_timeout_secs: u64,
    /// How long to wait for the profile's main content landmark, in seconds
    pub content_timeout_secs: u64,
    /// Navigation timeout for individual post pages, in seconds
    pub post_navigation_timeout_secs: u64,
    /// Pick a user agent from a small desktop pool instead of the fixed one
    pub randomize_user_agent: bool,
}

impl BrowserConfig {
    /// Navigation timeout as a `Duration`.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Content landmark timeout as a `Duration`.
    #[must_use]
    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }

    /// Post page navigation timeout as a `Duration`.
    #[must_use]
    pub fn post_navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.post_navigation_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable_path: None,
            window_width: 1280,
            window_height: 800,
            navigation_timeout_secs: 60,
            content_timeout_secs: 30,
            post_navigation_timeout_secs: 45,
            randomize_user_agent: false,
        }
    }
}

/// Scrape pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Origin of the profile site; the profile URL is `<base>/<username>/`
    pub profile_base_url: String,
    /// Maximum number of post stubs taken from the profile page
    pub max_posts: usize,
    /// Maximum number of posts visited for metric enrichment
    pub max_enriched_posts: usize,
}

impl ScrapingConfig {
    /// Build the profile page URL for a normalized username.
    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        format!(
            "{}/{}/",
            self.profile_base_url.trim_end_matches('/'),
            username
        )
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            profile_base_url: "https://www.instagram.com".to_string(),
            max_posts: MAX_POSTS,
            max_enriched_posts: MAX_ENRICHED_POSTS,
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the `SQLite` file (defaults to the XDG data directory)
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.browser.headless);
        assert_eq!(config.browser.window_width, 1280);
        assert_eq!(config.browser.window_height, 800);
        assert_eq!(config.browser.navigation_timeout(), Duration::from_secs(60));
        assert_eq!(config.browser.content_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.browser.post_navigation_timeout(),
            Duration::from_secs(45)
        );
        assert_eq!(config.scraping.max_posts, 12);
        assert_eq!(config.scraping.max_enriched_posts, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_url() {
        let mut scraping = ScrapingConfig::default();
        assert_eq!(
            scraping.profile_url("natgeo"),
            "https://www.instagram.com/natgeo/"
        );

        scraping.profile_base_url = "http://localhost:8080/".to_string();
        assert_eq!(scraping.profile_url("natgeo"), "http://localhost:8080/natgeo/");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[scraping]"));

        let parsed = AppConfig::from_toml(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scraping.max_posts, config.scraping.max_posts);
    }

    #[test]
    fn test_config_file_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.browser.headless = false;
        config.database.path = Some(tmp.path().join("store.db"));

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded = AppConfig::from_toml(&loaded_contents).expect("parse loaded config");

        assert!(!loaded.browser.headless);
        assert_eq!(
            loaded.database_path().expect("database path"),
            tmp.path().join("store.db")
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("INFLUENCE_HEADLESS", "false"),
            ("INFLUENCE_CHROME_PATH", "/usr/bin/google-chrome-stable"),
            ("INFLUENCE_DATABASE_PATH", "/tmp/influence.db"),
            ("INFLUENCE_PROFILE_BASE_URL", "http://127.0.0.1:9000"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| (*v).to_string()));

        assert!(!config.browser.headless);
        assert_eq!(
            config.browser.executable_path,
            Some(PathBuf::from("/usr/bin/google-chrome-stable"))
        );
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/influence.db")));
        assert_eq!(config.scraping.profile_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_env_overrides_ignore_unparsable_values() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| {
            (key == "INFLUENCE_HEADLESS").then(|| "sometimes".to_string())
        });
        assert!(config.browser.headless);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r"
[scraping]
max_enriched_posts = 4
";

        let config = AppConfig::from_toml(toml_str).expect("parse partial config");
        assert_eq!(config.scraping.max_enriched_posts, 4);
        assert_eq!(config.scraping.max_posts, 12);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let toml_str = r"
[scraping]
max_posts = 5
max_enriched_posts = 6
";

        let err = AppConfig::from_toml(toml_str).expect_err("limits should be rejected");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_limits_above_fixed_bounds_rejected() {
        let toml_str = r"
[scraping]
max_posts = 50
max_enriched_posts = 40
";
        let err = AppConfig::from_toml(toml_str).expect_err("max_posts above bound");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scraping.max_posts")
        );

        let toml_str = r"
[scraping]
max_enriched_posts = 11
";
        let err = AppConfig::from_toml(toml_str).expect_err("max_enriched_posts above bound");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scraping.max_enriched_posts")
        );

        let toml_str = r"
[scraping]
max_posts = 12
max_enriched_posts = 10
";
        assert!(AppConfig::from_toml(toml_str).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.browser.content_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
