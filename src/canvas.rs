// ============================================================================
// RASTER SURFACE — pixel buffer ownership and pointer coordinate mapping
// ============================================================================

use image::{Rgba, RgbaImage};

/// The mutable RGBA pixel grid currently being edited.
///
/// Owns the buffer and knows how large the on-screen element showing it is,
/// so incoming pointer positions (display units) can be mapped into buffer
/// pixels with an independent scale per axis.
pub struct Surface {
    pixels: RgbaImage,
    /// Display size of the element receiving pointer input. `None` means the
    /// surface is shown 1:1 (buffer units == display units).
    display_size: Option<(f32, f32)>,
}

impl Surface {
    /// Create a transparent surface of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            display_size: None,
        }
    }

    /// Wrap an already-decoded image as the surface buffer.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            display_size: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Record the on-screen size of the element the pointer coordinates are
    /// relative to. Pass the CSS-scaled size, not the buffer size.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.display_size = Some((width, height));
        } else {
            self.display_size = None;
        }
    }

    /// Map a pointer position in display units to buffer pixel coordinates.
    /// Each axis scales independently: `scale = buffer / display`.
    pub fn map_pointer(&self, x: f32, y: f32) -> (f32, f32) {
        match self.display_size {
            Some((dw, dh)) => (
                x * self.pixels.width() as f32 / dw,
                y * self.pixels.height() as f32 / dh,
            ),
            None => (x, y),
        }
    }

    /// Replace the buffer wholesale (dimension-changing operations: rotate
    /// 90°, crop, snapshot restore). The display size mapping is kept.
    pub fn replace(&mut self, pixels: RgbaImage) {
        self.pixels = pixels;
    }
}

/// Source-over blend of a straight-alpha color onto a pixel. `alpha` scales
/// the color's own alpha channel (pass 1.0 for a fully opaque stamp).
pub fn blend_over(dst: &mut Rgba<u8>, color: Rgba<u8>, alpha: f32) {
    let sa = (color[3] as f32 / 255.0) * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = color[c] as f32;
        let dc = dst[c] as f32;
        dst[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_per_axis() {
        let mut surface = Surface::new(400, 300);
        surface.set_display_size(200.0, 100.0);
        let (x, y) = surface.map_pointer(100.0, 50.0);
        assert_eq!((x, y), (200.0, 150.0));
    }

    #[test]
    fn pointer_identity_without_display_size() {
        let surface = Surface::new(64, 64);
        assert_eq!(surface.map_pointer(10.5, 3.0), (10.5, 3.0));
    }

    #[test]
    fn replace_swaps_dimensions_but_keeps_display_mapping() {
        let mut surface = Surface::new(4, 4);
        surface.set_display_size(8.0, 8.0);
        surface.replace(RgbaImage::new(8, 2));
        assert_eq!((surface.width(), surface.height()), (8, 2));
        assert_eq!(surface.map_pointer(8.0, 8.0), (8.0, 2.0));
    }

    #[test]
    fn blend_over_onto_transparent_takes_source_color() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend_over(&mut dst, Rgba([200, 100, 50, 255]), 1.0);
        assert_eq!(dst, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn blend_over_half_alpha_mixes() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend_over(&mut dst, Rgba([255, 255, 255, 255]), 0.5);
        // 50% white over opaque black
        assert_eq!(dst[3], 255);
        assert!(dst[0] >= 127 && dst[0] <= 129);
    }
}
