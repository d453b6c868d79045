use crate::codec::{DecodedImage, EncodeMode, ImageCodec};
use crate::eligibility::lowercase_extension;
use crate::error::{ConvertError, Result};
use crate::utils::savings_percent;
use image::ImageFormat;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub extension: String,
    pub size: u64,
}

impl SourceFile {
    pub fn from_entry(entry: &walkdir::DirEntry) -> Result<Self> {
        let size = entry.metadata()?.len();
        let path = entry.path().to_path_buf();
        let extension = lowercase_extension(&path).unwrap_or_default();
        Ok(Self {
            path,
            extension,
            size,
        })
    }
}

/// One resolved conversion, built once the encode mode is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub target: PathBuf,
    pub quality: u8,
    pub lossless: bool,
}

impl ConversionRequest {
    pub fn mode(&self) -> EncodeMode {
        if self.lossless {
            EncodeMode::Lossless
        } else {
            EncodeMode::Lossy {
                quality: self.quality,
            }
        }
    }
}

#[derive(Debug)]
pub enum ConversionOutcome {
    Converted {
        source_size: u64,
        output_size: u64,
        mode: EncodeMode,
    },
    Failed(ConvertError),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }

    pub fn savings_percent(&self) -> f64 {
        match self {
            ConversionOutcome::Converted {
                source_size,
                output_size,
                ..
            } => savings_percent(*source_size, *output_size),
            ConversionOutcome::Failed(_) => 0.0,
        }
    }

    pub fn error(&self) -> Option<&ConvertError> {
        match self {
            ConversionOutcome::Failed(error) => Some(error),
            ConversionOutcome::Converted { .. } => None,
        }
    }
}

/// Lossless only for PNG sources carrying alpha, lossy at `quality` otherwise.
///
/// The container format comes from content sniffing; the extension is the
/// fallback when sniffing found nothing. Palette transparency is expanded to
/// an alpha channel by the decoder, so it counts as alpha here.
pub fn select_mode(source: &Path, decoded: &DecodedImage, quality: u8) -> EncodeMode {
    let is_png = match decoded.format {
        Some(format) => format == ImageFormat::Png,
        None => lowercase_extension(source).as_deref() == Some("png"),
    };

    if is_png && decoded.has_alpha() {
        EncodeMode::Lossless
    } else {
        EncodeMode::Lossy { quality }
    }
}

/// Removes a written target unless disarmed.
struct PartialOutputGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialOutputGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialOutputGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(self.path);
        }
    }
}

/// Converts one source file to WebP next to it.
#[derive(Clone)]
pub struct Converter {
    codec: Arc<dyn ImageCodec>,
}

impl Converter {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }

    /// Never panics and never leaves a partial target behind: on any
    /// failure the returned outcome is `Failed` and nothing was written to
    /// `target`.
    pub fn convert(&self, source: &Path, target: &Path, quality: u8) -> ConversionOutcome {
        match self.try_convert(source, target, quality) {
            Ok(outcome) => outcome,
            Err(error) => ConversionOutcome::Failed(error),
        }
    }

    fn try_convert(&self, source: &Path, target: &Path, quality: u8) -> Result<ConversionOutcome> {
        let source_meta = fs::metadata(source).map_err(|e| ConvertError::decode(source, e))?;
        let decoded = self
            .codec
            .decode(source)
            .map_err(|e| ConvertError::decode(source, e))?;

        let request = ConversionRequest {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            quality,
            lossless: select_mode(source, &decoded, quality).is_lossless(),
        };
        tracing::debug!(?request, "encoding");

        let bytes = self
            .codec
            .encode(&decoded.image, request.mode())
            .map_err(|e| ConvertError::encode(target, e))?;
        drop(decoded);

        let output_size = write_target(&request.target, &bytes, source_meta.permissions())?;

        Ok(ConversionOutcome::Converted {
            source_size: source_meta.len(),
            output_size,
            mode: request.mode(),
        })
    }
}

/// Writes `bytes` to a temp file beside `target`, then renames it over
/// `target`. A stale file at `target` is replaced. Returns the size on disk.
fn write_target(target: &Path, bytes: &[u8], permissions: fs::Permissions) -> Result<u64> {
    let encode_err = |e: std::io::Error| ConvertError::encode(target, e);

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".img-webpify-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(encode_err)?;
    temp.write_all(bytes).map_err(encode_err)?;
    temp.as_file().set_permissions(permissions).map_err(encode_err)?;
    temp.as_file().sync_all().map_err(encode_err)?;
    temp.persist(target)
        .map_err(|e| ConvertError::encode(target, e.error))?;

    let guard = PartialOutputGuard::new(target);
    let written = fs::metadata(target).map_err(encode_err)?.len();
    if written == 0 {
        return Err(ConvertError::encode(target, "encoder produced an empty file"));
    }
    guard.disarm();

    Ok(written)
}
