#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use img_webpify::{
    BatchEvent, CodecError, DecodedImage, EncodeMode, ImageCodec, Reporter, WebpCodec,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn opaque_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn alpha_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if (x + y) % 3 == 0 { 64 } else { 255 };
        Rgba([(x % 256) as u8, 200, (y % 256) as u8, alpha])
    })
}

pub fn write_opaque_jpeg(path: &Path) {
    opaque_image(64, 48).save(path).unwrap();
}

pub fn write_alpha_png(path: &Path) {
    alpha_image(40, 40).save(path).unwrap();
}

/// Lays out the four-file scenario: opaque JPEG, PNG with alpha, SVG, WebP.
pub fn create_mixed_directory(dir: &Path) {
    write_opaque_jpeg(&dir.join("a.jpg"));
    write_alpha_png(&dir.join("b.png"));
    fs::write(
        dir.join("c.svg"),
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#,
    )
    .unwrap();
    fs::write(dir.join("d.webp"), b"RIFF\0\0\0\0WEBP").unwrap();
}

/// Creates `count` opaque JPEGs spread over nested subdirectories.
pub fn create_nested_images(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let sub = dir.join(format!("level{}", i % 3)).join(format!("inner{}", i % 2));
            fs::create_dir_all(&sub).unwrap();
            let path = sub.join(format!("img{}.jpg", i));
            write_opaque_jpeg(&path);
            path
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Converted { source: PathBuf, mode: EncodeMode },
    Skipped(PathBuf),
    Failed(PathBuf),
    Collision(PathBuf),
    Replaced(PathBuf),
    ReplaceFailed,
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    pub fn mode_for(&self, file_name: &str) -> Option<EncodeMode> {
        self.events().into_iter().find_map(|event| match event {
            Recorded::Converted { source, mode }
                if source.file_name().and_then(|n| n.to_str()) == Some(file_name) =>
            {
                Some(mode)
            }
            _ => None,
        })
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &BatchEvent<'_>) {
        let recorded = match event {
            BatchEvent::Converted { source, mode, .. } => Recorded::Converted {
                source: source.to_path_buf(),
                mode: *mode,
            },
            BatchEvent::Skipped { path, .. } => Recorded::Skipped(path.to_path_buf()),
            BatchEvent::Failed { path, .. } => Recorded::Failed(path.to_path_buf()),
            BatchEvent::TargetCollision { path, .. } => Recorded::Collision(path.to_path_buf()),
            BatchEvent::Replaced { path } => Recorded::Replaced(path.to_path_buf()),
            BatchEvent::ReplaceFailed { .. } => Recorded::ReplaceFailed,
            _ => return,
        };
        self.events.lock().unwrap().push(recorded);
    }
}

/// Delegates to the real codec and remembers every decoded path.
#[derive(Default)]
pub struct TrackingCodec {
    decoded: Mutex<Vec<PathBuf>>,
}

impl TrackingCodec {
    pub fn decoded_paths(&self) -> Vec<PathBuf> {
        self.decoded.lock().unwrap().clone()
    }
}

impl ImageCodec for TrackingCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        self.decoded.lock().unwrap().push(path.to_path_buf());
        WebpCodec.decode(path)
    }

    fn encode(&self, image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>, CodecError> {
        WebpCodec.encode(image, mode)
    }
}

/// Decodes for real, always fails to encode.
pub struct BrokenEncoder;

impl ImageCodec for BrokenEncoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        WebpCodec.decode(path)
    }

    fn encode(&self, _image: &DynamicImage, _mode: EncodeMode) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::Webp("disk full".to_string()))
    }
}
