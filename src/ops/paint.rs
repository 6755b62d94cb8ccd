// ============================================================================
// PAINT OPERATIONS — freehand stroke compositing (draw) and alpha erase
// ============================================================================

use image::{Rgba, RgbaImage};

use crate::canvas::blend_over;

/// The pixel-blend rule for a stroke.
#[derive(Clone, Copy)]
enum Compositing {
    /// Standard source-over paint in the given color.
    Over(Rgba<u8>),
    /// Removes coverage: scales destination alpha toward zero regardless of
    /// the color underneath, so erasing reveals transparency.
    Clear,
}

/// Composite one round-capped draw segment from `from` to `to`. Callers feed
/// consecutive pointer positions; overlapping circular stamps give round
/// joins between segments.
pub fn stroke_segment(
    buffer: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    size: f32,
    color: Rgba<u8>,
) {
    stamp_line(buffer, from, to, size * 0.5, Compositing::Over(color));
}

/// Composite one round-capped erase segment.
pub fn erase_segment(buffer: &mut RgbaImage, from: (f32, f32), to: (f32, f32), size: f32) {
    stamp_line(buffer, from, to, size * 0.5, Compositing::Clear);
}

/// Walk the segment stamping discs at sub-radius spacing. Both endpoints are
/// stamped, which produces the round caps.
fn stamp_line(
    buffer: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    radius: f32,
    mode: Compositing,
) {
    let radius = radius.max(0.5);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    let spacing = (radius * 0.5).max(0.5);
    let steps = (len / spacing).ceil() as u32;

    if steps == 0 {
        stamp_disc(buffer, from.0, from.1, radius, mode);
        return;
    }
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp_disc(buffer, from.0 + dx * t, from.1 + dy * t, radius, mode);
    }
}

/// Stamp a single anti-aliased disc. Coverage is 1 inside `radius - 0.5`,
/// 0 outside `radius + 0.5`, with a smoothstep edge between.
fn stamp_disc(buffer: &mut RgbaImage, cx: f32, cy: f32, radius: f32, mode: Compositing) {
    let w = buffer.width() as i32;
    let h = buffer.height() as i32;
    let x0 = ((cx - radius - 1.0).floor() as i32).max(0);
    let y0 = ((cy - radius - 1.0).floor() as i32).max(0);
    let x1 = ((cx + radius + 1.0).ceil() as i32).min(w);
    let y1 = ((cy + radius + 1.0).ceil() as i32).min(h);

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let cov = disc_coverage(dist, radius);
            if cov <= 0.0 {
                continue;
            }
            let pixel = buffer.get_pixel_mut(px as u32, py as u32);
            match mode {
                Compositing::Over(color) => blend_over(pixel, color, cov),
                Compositing::Clear => {
                    let a = pixel[3] as f32 * (1.0 - cov);
                    pixel[3] = a.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

fn disc_coverage(dist: f32, radius: f32) -> f32 {
    if dist <= radius - 0.5 {
        return 1.0;
    }
    if dist >= radius + 0.5 {
        return 0.0;
    }
    // Smoothstep across the 1px fade band
    let t = (radius + 0.5 - dist).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_paints_color_along_segment() {
        let mut buffer = RgbaImage::new(32, 32);
        let red = Rgba([255, 0, 0, 255]);
        stroke_segment(&mut buffer, (4.0, 16.0), (28.0, 16.0), 4.0, red);

        // Solid core all the way along the line
        for x in [4u32, 16, 28] {
            assert_eq!(*buffer.get_pixel(x, 16), red);
        }
        // Far from the stroke nothing changed
        assert_eq!(*buffer.get_pixel(16, 2), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_respects_brush_size() {
        let mut buffer = RgbaImage::new(32, 32);
        stroke_segment(
            &mut buffer,
            (16.0, 16.0),
            (16.0, 16.0),
            8.0,
            Rgba([0, 255, 0, 255]),
        );
        // Inside the 4px radius
        assert_eq!(buffer.get_pixel(16, 13)[3], 255);
        // Clearly outside
        assert_eq!(buffer.get_pixel(16, 22)[3], 0);
    }

    #[test]
    fn erase_clears_alpha_not_color_elsewhere() {
        let mut buffer = RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 255]));
        erase_segment(&mut buffer, (16.0, 16.0), (16.0, 16.0), 10.0);

        // Core of the eraser disc is fully transparent
        assert_eq!(buffer.get_pixel(16, 16)[3], 0);
        // Pixels outside the disc are untouched
        assert_eq!(*buffer.get_pixel(2, 2), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn stroke_clips_at_buffer_edges() {
        let mut buffer = RgbaImage::new(8, 8);
        // Segment partly outside the buffer must not panic
        stroke_segment(
            &mut buffer,
            (-4.0, 4.0),
            (12.0, 4.0),
            6.0,
            Rgba([255, 255, 255, 255]),
        );
        assert_eq!(buffer.get_pixel(0, 4)[3], 255);
    }
}
