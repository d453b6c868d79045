//! Per-file classification deciding whether a path is a conversion candidate.
//!
//! Classification looks at the extension only and never touches the
//! filesystem, so it is safe to call from the traversal loop.

use crate::constants::{CONVERTIBLE_EXTENSIONS, EXCLUDED_EXTENSIONS, TARGET_EXTENSION};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a file is or is not converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// Raster format on the allow-list
    Convert,
    /// Already a WebP file
    SkipAlreadyTarget,
    /// Unknown, missing, or non-raster extension
    SkipUnsupportedFormat,
    /// Vector format that is never rasterized
    SkipExcluded,
}

impl Eligibility {
    pub fn is_convert(&self) -> bool {
        matches!(self, Eligibility::Convert)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Eligibility::Convert => "convertible",
            Eligibility::SkipAlreadyTarget => "already WebP",
            Eligibility::SkipUnsupportedFormat => "non-convertible",
            Eligibility::SkipExcluded => "excluded vector format",
        };
        write!(f, "{}", reason)
    }
}

/// Classify a path by its extension (case-insensitive).
///
/// Exclusion wins over everything else, then the target check, then the
/// allow-list.
pub fn classify(path: &Path) -> Eligibility {
    let Some(ext) = lowercase_extension(path) else {
        return Eligibility::SkipUnsupportedFormat;
    };

    if EXCLUDED_EXTENSIONS.contains(&ext.as_str()) {
        Eligibility::SkipExcluded
    } else if ext == TARGET_EXTENSION {
        Eligibility::SkipAlreadyTarget
    } else if CONVERTIBLE_EXTENSIONS.contains(&ext.as_str()) {
        Eligibility::Convert
    } else {
        Eligibility::SkipUnsupportedFormat
    }
}

/// Output path for a source: same directory, same stem, `.webp` extension.
pub fn target_path(source: &Path) -> PathBuf {
    source.with_extension(TARGET_EXTENSION)
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
