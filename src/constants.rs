pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 0;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_INPUT_DIR: &str = "./public/images";

/// Extension written for every converted file.
pub const TARGET_EXTENSION: &str = "webp";

/// Raster formats accepted for conversion (compared lowercase).
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Vector formats that are never rasterized.
pub const EXCLUDED_EXTENSIONS: &[&str] = &["svg", "svgz"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
pub const SKIP_PREFIX: &str = "⏭️";
pub const SIZE_PREFIX: &str = "📊";
