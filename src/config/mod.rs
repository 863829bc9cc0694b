use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Environment variable prefix for overrides, e.g. `STARCHART_WEB__PORT=9000`
pub const ENV_PREFIX: &str = "STARCHART_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default = "default_cache_database")]
    pub cache_database: DatabaseConfig,
    #[serde(default = "default_storage_database")]
    pub storage_database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sky: SkyConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret expected in the `X-API-Key` header; authentication is off when unset
    pub api_key: Option<String>,
}

/// Chart cache retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries older than this are removed by the retention sweeper
    #[serde(default = "default_cache_max_age", with = "duration_serde::duration")]
    pub max_age: Duration,
    /// How often the retention sweeper runs
    #[serde(default = "default_sweep_interval", with = "duration_serde::duration")]
    pub sweep_interval: Duration,
}

/// Star catalog and ephemeris settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyConfig {
    /// Local path of the Hipparcos main catalog (hip_main.dat)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Where to fetch the catalog from when `catalog_path` does not exist
    #[serde(default = "default_catalog_url")]
    pub catalog_url: Option<String>,
    #[serde(
        default = "default_catalog_download_timeout",
        with = "duration_serde::duration"
    )]
    pub download_timeout: Duration,
    /// Faintest magnitude drawn on a chart
    #[serde(default = "default_limiting_magnitude")]
    pub limiting_magnitude: f64,
    #[serde(default = "default_ephemeris_start_year")]
    pub ephemeris_start_year: i32,
    /// Last covered year; the span ends at the start of the following year
    #[serde(default = "default_ephemeris_end_year")]
    pub ephemeris_end_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// Chart raster settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    /// TrueType font for captions; system serif fonts, then the bundled DejaVu
    /// Serif, are used when unset or unreadable
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub compression: PngCompression,
    #[serde(default = "default_marker_scale")]
    pub marker_scale: f64,
    #[serde(default = "default_chart_title")]
    pub default_title: String,
}

fn default_cache_database() -> DatabaseConfig {
    DatabaseConfig {
        url: DEFAULT_CACHE_DATABASE_URL.to_string(),
        max_connections: Some(DEFAULT_MAX_CONNECTIONS),
    }
}

fn default_storage_database() -> DatabaseConfig {
    DatabaseConfig {
        url: DEFAULT_STORAGE_DATABASE_URL.to_string(),
        max_connections: Some(DEFAULT_MAX_CONNECTIONS),
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn parse_default_duration(value: &str) -> Duration {
    humantime::parse_duration(value).unwrap_or(Duration::from_secs(3600))
}

fn default_cache_max_age() -> Duration {
    parse_default_duration(DEFAULT_CACHE_MAX_AGE)
}

fn default_sweep_interval() -> Duration {
    parse_default_duration(DEFAULT_SWEEP_INTERVAL)
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

fn default_catalog_url() -> Option<String> {
    Some(DEFAULT_CATALOG_URL.to_string())
}

fn default_catalog_download_timeout() -> Duration {
    parse_default_duration(DEFAULT_CATALOG_DOWNLOAD_TIMEOUT)
}

fn default_limiting_magnitude() -> f64 {
    DEFAULT_LIMITING_MAGNITUDE
}

fn default_ephemeris_start_year() -> i32 {
    DEFAULT_EPHEMERIS_START_YEAR
}

fn default_ephemeris_end_year() -> i32 {
    DEFAULT_EPHEMERIS_END_YEAR
}

fn default_chart_width() -> u32 {
    DEFAULT_CHART_WIDTH
}

fn default_chart_height() -> u32 {
    DEFAULT_CHART_HEIGHT
}

fn default_marker_scale() -> f64 {
    DEFAULT_MARKER_SCALE
}

fn default_chart_title() -> String {
    DEFAULT_CHART_TITLE.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age: default_cache_max_age(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            catalog_url: default_catalog_url(),
            download_timeout: default_catalog_download_timeout(),
            limiting_magnitude: default_limiting_magnitude(),
            ephemeris_start_year: default_ephemeris_start_year(),
            ephemeris_end_year: default_ephemeris_end_year(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            font_path: None,
            compression: PngCompression::default(),
            marker_scale: default_marker_scale(),
            default_title: default_chart_title(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            cache_database: default_cache_database(),
            storage_database: default_storage_database(),
            cache: CacheConfig::default(),
            sky: SkyConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `config_file`, layering `STARCHART_*` environment
    /// overrides on top. A default file is written when none exists.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !std::path::Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())
                .context("Failed to serialize default configuration")?;
            std::fs::write(config_file, contents)
                .with_context(|| format!("Failed to write default config file: {config_file}"))?;
            info!("Created default config file: {}", config_file);
        }

        let config: Self = Self::figment(config_file)
            .extract()
            .with_context(|| format!("Failed to load configuration from {config_file}"))?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack used by [`Config::load_from_file`]
    pub fn figment(config_file: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_age.is_zero() {
            anyhow::bail!("cache.max_age must be greater than zero");
        }
        if self.cache.sweep_interval.is_zero() {
            anyhow::bail!("cache.sweep_interval must be greater than zero");
        }
        if self.render.width == 0 || self.render.height == 0 {
            anyhow::bail!("render.width and render.height must be non-zero");
        }
        if self.render.marker_scale <= 0.0 {
            anyhow::bail!("render.marker_scale must be positive");
        }
        if self.sky.ephemeris_end_year < self.sky.ephemeris_start_year {
            anyhow::bail!("sky.ephemeris_end_year must not precede sky.ephemeris_start_year");
        }
        Ok(())
    }
}
