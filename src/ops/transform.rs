// ============================================================================
// TRANSFORM OPERATIONS — 90° rotation and mirroring of the whole buffer
// ============================================================================

use image::{RgbaImage, imageops};
use rayon::prelude::*;

/// Rotate 90° clockwise. Width and height swap, so a new buffer is returned
/// rather than mutating in place.
pub fn rotate_90cw(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut dst = RgbaImage::new(h, w);
    let src_raw = src.as_raw();
    let dst_stride = h as usize * 4;

    // dst(x, y) = src(y, h-1-x)
    (*dst)
        .par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(dy, row)| {
            for dx in 0..h as usize {
                let sx = dy;
                let sy = h as usize - 1 - dx;
                let si = (sy * w as usize + sx) * 4;
                row[dx * 4..dx * 4 + 4].copy_from_slice(&src_raw[si..si + 4]);
            }
        });
    dst
}

/// Rotate 90° counter-clockwise. Width and height swap.
pub fn rotate_90ccw(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut dst = RgbaImage::new(h, w);
    let src_raw = src.as_raw();
    let dst_stride = h as usize * 4;

    // dst(x, y) = src(w-1-y, x)
    (*dst)
        .par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(dy, row)| {
            for dx in 0..h as usize {
                let sx = w as usize - 1 - dy;
                let sy = dx;
                let si = (sy * w as usize + sx) * 4;
                row[dx * 4..dx * 4 + 4].copy_from_slice(&src_raw[si..si + 4]);
            }
        });
    dst
}

/// Mirror left↔right in place. Dimensions unchanged.
pub fn flip_horizontal(buffer: &mut RgbaImage) {
    imageops::flip_horizontal_in_place(buffer);
}

/// Mirror top↔bottom in place. Dimensions unchanged.
pub fn flip_vertical(buffer: &mut RgbaImage) {
    imageops::flip_vertical_in_place(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 3×2 frame with a distinct pixel per position.
    fn gradient() -> RgbaImage {
        let mut img = RgbaImage::new(3, 2);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([x as u8 * 10, y as u8 * 10, x as u8 + y as u8, 255]);
        }
        img
    }

    #[test]
    fn rotate_cw_swaps_dimensions_and_moves_corners() {
        let src = gradient();
        let dst = rotate_90cw(&src);
        assert_eq!(dst.dimensions(), (2, 3));
        // Top-left of the source ends up top-right after a CW turn
        assert_eq!(dst.get_pixel(1, 0), src.get_pixel(0, 0));
        assert_eq!(dst.get_pixel(0, 0), src.get_pixel(0, 1));
        assert_eq!(dst.get_pixel(1, 2), src.get_pixel(2, 0));
    }

    #[test]
    fn rotate_ccw_then_cw_is_identity() {
        let src = gradient();
        let back = rotate_90cw(&rotate_90ccw(&src));
        assert_eq!(back.as_raw(), src.as_raw());
    }

    #[test]
    fn rotate_cw_four_times_is_identity() {
        let src = gradient();
        let mut img = src.clone();
        for _ in 0..4 {
            img = rotate_90cw(&img);
        }
        assert_eq!(img.as_raw(), src.as_raw());
    }

    #[test]
    fn flip_horizontal_twice_is_identity() {
        let src = gradient();
        let mut img = src.clone();
        flip_horizontal(&mut img);
        assert_ne!(img.as_raw(), src.as_raw());
        flip_horizontal(&mut img);
        assert_eq!(img.as_raw(), src.as_raw());
    }

    #[test]
    fn flip_vertical_mirrors_rows() {
        let src = gradient();
        let mut img = src.clone();
        flip_vertical(&mut img);
        assert_eq!(img.get_pixel(0, 0), src.get_pixel(0, 1));
        assert_eq!(img.get_pixel(2, 1), src.get_pixel(2, 0));
    }
}
