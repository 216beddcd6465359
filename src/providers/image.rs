//! Image preparation: optional upscale and grayscale, re-encoded as JPEG

use crate::error::Result;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Images narrower or shorter than this are upscaled when requested
const SMALL_IMAGE_THRESHOLD: u32 = 1000;

/// Preparation steps applied before upload
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOptions {
    /// Convert to single-channel luminance
    pub grayscale: bool,
    /// Double both dimensions when either is below 1000px
    pub upscale_small: bool,
}

/// JPEG bytes ready to send, with the source dimensions
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl PreparedImage {
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.jpeg)
    }

    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.to_base64())
    }
}

/// Open a JPEG, PNG or WEBP file and prepare it for upload
pub fn prepare_image(path: &Path, options: ImageOptions) -> Result<PreparedImage> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    info!("Image {}: {}x{}", path.display(), width, height);

    let img = if options.upscale_small
        && (width < SMALL_IMAGE_THRESHOLD || height < SMALL_IMAGE_THRESHOLD)
    {
        img.resize_exact(width * 2, height * 2, FilterType::CatmullRom)
    } else {
        img
    };

    // JPEG has no alpha channel
    let img = if options.grayscale {
        DynamicImage::ImageLuma8(img.to_luma8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut jpeg = Vec::new();
    img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

    Ok(PreparedImage { width, height, jpeg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join("doc.png");
        RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 128]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_prepare_grayscale_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 40, 20);

        let prepared = prepare_image(&path, ImageOptions { grayscale: true, upscale_small: false }).unwrap();
        assert_eq!((prepared.width, prepared.height), (40, 20));

        let decoded = image::load_from_memory_with_format(&prepared.jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (40, 20));
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn test_prepare_upscales_small_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 30, 10);

        let prepared = prepare_image(&path, ImageOptions { grayscale: true, upscale_small: true }).unwrap();
        // reported dimensions are the source's
        assert_eq!((prepared.width, prepared.height), (30, 10));

        let decoded = image::load_from_memory(&prepared.jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (60, 20));
    }

    #[test]
    fn test_prepare_colour_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 8, 8);

        let prepared = prepare_image(&path, ImageOptions::default()).unwrap();
        let decoded = image::load_from_memory(&prepared.jpeg).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_data_url_prefix() {
        let prepared = PreparedImage { width: 1, height: 1, jpeg: vec![0xff, 0xd8] };
        assert_eq!(prepared.data_url(), "data:image/jpeg;base64,/9g=");
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = prepare_image(Path::new("/nonexistent/receipt.jpg"), ImageOptions::default());
        assert!(result.is_err());
    }
}
