use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "courier.toml",
    "config/courier.toml",
    "crates/config/courier.toml",
    "../courier.toml",
    "../config/courier.toml",
    "../crates/config/courier.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://courier.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Settings for the local media store backing file attachments.
///
/// ```
/// use courier_config::MediaConfig;
///
/// let media = MediaConfig::default();
/// assert_eq!(media.upload_dir, "uploads");
/// assert!(media.public_base_url.starts_with("http://"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "MediaConfig::default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "MediaConfig::default_public_base_url")]
    pub public_base_url: String,
}

impl MediaConfig {
    fn default_upload_dir() -> String {
        "uploads".to_string()
    }

    fn default_public_base_url() -> String {
        "http://127.0.0.1:5000/uploads".to_string()
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_dir: Self::default_upload_dir(),
            public_base_url: Self::default_public_base_url(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use courier_config::load;
///
/// std::env::remove_var("COURIER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default("media.upload_dir", defaults.media.upload_dir.clone())
        .unwrap()
        .set_default(
            "media.public_base_url",
            defaults.media.public_base_url.clone(),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("COURIER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("COURIER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via COURIER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
