//! Image loading (PNG, JPEG, BMP, TIFF, WebP).
//!
//! Decodes raster images to a flat RGBA8 buffer the analyzer samples from.
//! Format is sniffed from magic bytes before decoding so unsupported inputs
//! fail with a clear error instead of a decoder backtrace.

use std::path::Path;

use thiserror::Error;

use crate::analysis::PixelBuffer;
use crate::document::ImageMeta;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unrecognized image format (expected PNG, JPEG, BMP, TIFF, or WebP)")]
    UnrecognizedFormat,

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded image ready for annotation.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Display name (file name when loaded from disk).
    pub name: String,
    /// Origin path or URL, when known.
    pub source: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Flat RGBA8 pixel data, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl LoadedImage {
    /// Decode an image from raw bytes.
    pub fn from_memory(name: impl Into<String>, data: &[u8]) -> Result<Self, LoadError> {
        if !sniff_supported(data) {
            return Err(LoadError::UnrecognizedFormat);
        }
        let img = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = img.dimensions();
        log::info!("🖼️ Decoded {}x{} image", width, height);
        Ok(Self {
            name: name.into(),
            source: None,
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Load and decode an image file.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut loaded = Self::from_memory(name, &data)?;
        loaded.source = Some(path.display().to_string());
        Ok(loaded)
    }

    /// A borrowed analyzer view over the pixel data.
    ///
    /// Infallible for images built by this module; the buffer length always
    /// matches the dimensions.
    pub fn pixels(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(&self.rgba, self.width, self.height)
            .unwrap_or_else(PixelBuffer::empty)
    }

    /// Image metadata for document export. An unknown source exports as an
    /// empty string.
    pub fn meta(&self) -> ImageMeta {
        ImageMeta {
            name: self.name.clone(),
            source: self.source.clone().unwrap_or_default(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Check the magic bytes of the supported formats.
fn sniff_supported(data: &[u8]) -> bool {
    if data.len() < 8 {
        return false;
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return true;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return true;
    }

    // BMP: 42 4D (BM)
    if data.starts_with(&[0x42, 0x4D]) {
        return true;
    }

    // TIFF: 49 49 2A 00 (little endian) or 4D 4D 00 2A (big endian)
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return true;
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(&[0x52, 0x49, 0x46, 0x46]) && &data[8..12] == b"WEBP" {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_detection_png() {
        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(sniff_supported(&png_magic));
    }

    #[test]
    fn test_magic_detection_jpeg() {
        let jpeg_magic = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert!(sniff_supported(&jpeg_magic));
    }

    #[test]
    fn test_magic_detection_invalid() {
        let random_data = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(!sniff_supported(&random_data));
        assert!(!sniff_supported(&[0x89, 0x50])); // Too short
    }

    #[test]
    fn test_unrecognized_format_is_rejected_before_decoding() {
        let err = LoadedImage::from_memory("x.bin", &[0u8; 64]).unwrap_err();
        assert!(matches!(err, LoadError::UnrecognizedFormat));
    }

    #[test]
    fn test_decode_png_roundtrip() {
        // Encode a tiny image with the image crate, then load it back.
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let loaded = LoadedImage::from_memory("tiny.png", &bytes).unwrap();
        assert_eq!(loaded.width, 4);
        assert_eq!(loaded.height, 3);
        assert_eq!(loaded.rgba.len(), 4 * 3 * 4);
        assert_eq!(&loaded.rgba[..4], &[10, 20, 30, 255]);
        assert_eq!(loaded.pixels().width(), 4);
    }
}
