// ============================================================================
// IMAGE I/O — decode, fit-to-edit-size, and PNG encode
// ============================================================================

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder, RgbaImage, imageops};
use std::path::Path;

use crate::record::ImageSource;

/// Longest edge the editing surface is allowed to have. Anything larger is
/// scaled down on load; smaller images are left at their native size.
pub const MAX_EDIT_DIMENSION: u32 = 512;

/// Decode a record's image source into an RGBA buffer.
pub fn decode_source(source: &ImageSource) -> Result<RgbaImage, String> {
    let dynamic = match source {
        ImageSource::Path(path) => {
            image::open(path).map_err(|e| format!("Failed to open '{}': {e}", path.display()))?
        }
        ImageSource::Bytes(bytes) => {
            image::load_from_memory(bytes).map_err(|e| format!("Failed to decode image: {e}"))?
        }
    };
    Ok(dynamic.to_rgba8())
}

/// Scale an image down so neither edge exceeds [`MAX_EDIT_DIMENSION`],
/// preserving aspect ratio. Never scales up.
pub fn fit_to_edit_size(image: RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let max = MAX_EDIT_DIMENSION as f32;
    let scale = (max / w as f32).min(max / h as f32).min(1.0);
    if scale >= 1.0 {
        return image;
    }
    let new_w = ((w as f32 * scale).round() as u32).max(1);
    let new_h = ((h as f32 * scale).round() as u32).max(1);
    imageops::resize(&image, new_w, new_h, FilterType::Triangle)
}

/// Encode a buffer as PNG into memory.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| format!("PNG encode failed: {e}"))?;
    Ok(out)
}

pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), String> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes).map_err(|e| format!("Failed to write '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_leaves_small_images_untouched() {
        let img = RgbaImage::new(300, 100);
        let fitted = fit_to_edit_size(img);
        assert_eq!(fitted.dimensions(), (300, 100));
    }

    #[test]
    fn fit_scales_the_longest_edge_to_512() {
        let img = RgbaImage::new(1024, 512);
        let fitted = fit_to_edit_size(img);
        assert_eq!(fitted.dimensions(), (512, 256));
    }

    #[test]
    fn fit_handles_portrait_orientation() {
        let img = RgbaImage::new(200, 800);
        let fitted = fit_to_edit_size(img);
        assert_eq!(fitted.dimensions(), (128, 512));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 200]));
        let bytes = encode_png(&img).unwrap();

        let decoded = decode_source(&ImageSource::Bytes(bytes)).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(1, 2), &image::Rgba([10, 20, 30, 200]));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_source(&ImageSource::Bytes(vec![0, 1, 2, 3])).unwrap_err();
        assert!(err.contains("decode"));
    }
}
