/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_CACHE_DATABASE_URL: &str = "sqlite://./data/cache.db";
pub const DEFAULT_STORAGE_DATABASE_URL: &str = "sqlite://./data/starmaps.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Cache defaults
pub const DEFAULT_CACHE_MAX_AGE: &str = "24h";
pub const DEFAULT_SWEEP_INTERVAL: &str = "1h";

// Sky data defaults
pub const DEFAULT_CATALOG_PATH: &str = "./data/hip_main.dat";
pub const DEFAULT_CATALOG_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";
pub const DEFAULT_CATALOG_DOWNLOAD_TIMEOUT: &str = "5m";
pub const DEFAULT_LIMITING_MAGNITUDE: f64 = 6.0;
pub const DEFAULT_EPHEMERIS_START_YEAR: i32 = 1900;
pub const DEFAULT_EPHEMERIS_END_YEAR: i32 = 2100;

// Render defaults (10x12 inch canvas at 150 dpi)
pub const DEFAULT_CHART_WIDTH: u32 = 1500;
pub const DEFAULT_CHART_HEIGHT: u32 = 1800;
pub const DEFAULT_MARKER_SCALE: f64 = 2.0;
pub const DEFAULT_CHART_TITLE: &str = "The Night Sky";

/// System font locations tried before the bundled font
pub const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Times New Roman.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];
