use crate::convert::{ConversionOutcome, SourceFile};
use crate::error::{ConvertError, Result};
use std::fs;
use std::path::Path;

/// Delete the original once its WebP replacement is confirmed on disk.
///
/// A failed outcome is a no-op: the source is never touched. A deletion
/// failure is returned as `ConvertError::Replace`; the target is kept and the
/// conversion still counts as a success.
pub fn replace_source(source: &SourceFile, target: &Path, outcome: &ConversionOutcome) -> Result<()> {
    if !outcome.is_success() {
        return Ok(());
    }

    match fs::metadata(target) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        Ok(_) => {
            return Err(ConvertError::replace(
                &source.path,
                format!("target {} is empty", target.display()),
            ))
        }
        Err(e) => {
            return Err(ConvertError::replace(
                &source.path,
                format!("target {} is not readable: {}", target.display(), e),
            ))
        }
    }

    fs::remove_file(&source.path).map_err(|e| ConvertError::replace(&source.path, e))
}
