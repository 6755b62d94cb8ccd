// ============================================================================
// TEXT STAMP OPERATION — one-shot glyph rendering onto the buffer
// ============================================================================

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use image::RgbaImage;
use std::sync::OnceLock;

use crate::canvas::blend_over;
use crate::components::tools::TextOptions;

static DEFAULT_FONT: OnceLock<Option<FontArc>> = OnceLock::new();

/// The system sans-serif font used for stamping. Loaded once per process;
/// `None` when the platform has no usable font, in which case text stamping
/// degrades to a warning no-op.
pub fn default_font() -> Option<FontArc> {
    DEFAULT_FONT.get_or_init(load_default_font).clone()
}

fn load_default_font() -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::SansSerif], &Properties::new())
        .ok()?;
    let font_data = handle.load().ok()?;
    let bytes = font_data.copy_font_data()?;
    FontArc::try_from_vec((*bytes).clone()).ok()
}

/// Lay out a single line left-aligned at x=0. Returns the positioned glyph
/// ids (advance offsets, kerning applied) and the total advance width.
pub fn layout_line(font: &FontArc, text: &str, size: f32) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut last_glyph: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = last_glyph {
            cursor_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, cursor_x));
        cursor_x += scaled.h_advance(glyph_id);
        last_glyph = Some(glyph_id);
    }

    (glyphs, cursor_x)
}

/// Stamp `options.text` onto the buffer with its top-left corner at
/// `(x, y)`. Bold thickens coverage by doubling each pixel rightward;
/// italic shears around the baseline — the same tricks the renderer uses
/// everywhere else so no separate font variants are needed.
///
/// Empty text draws nothing; the caller decides whether that warrants a
/// user-facing warning.
pub fn stamp_text(buffer: &mut RgbaImage, font: &FontArc, options: &TextOptions, x: f32, y: f32) {
    let (glyphs, _) = layout_line(font, &options.text, options.size);
    if glyphs.is_empty() {
        return;
    }

    let scaled = font.as_scaled(options.size);
    let baseline_y = y + scaled.ascent();
    let w = buffer.width() as i32;
    let h = buffer.height() as i32;

    for &(glyph_id, gx) in &glyphs {
        let glyph = glyph_id.with_scale_and_position(options.size, point(x + gx, baseline_y));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue; // whitespace and glyphs without outlines
        };
        let bounds = outlined.px_bounds();

        outlined.draw(|px, py, cov| {
            if cov <= 0.001 {
                return;
            }
            let mut cx = bounds.min.x + px as f32;
            let cy = bounds.min.y + py as f32;
            if options.italic {
                cx += (baseline_y - cy) * 0.2;
            }
            let ix = cx.round() as i32;
            let iy = cy.round() as i32;
            if ix >= 0 && iy >= 0 && ix < w && iy < h {
                blend_over(buffer.get_pixel_mut(ix as u32, iy as u32), options.color, cov);
                if options.bold && ix + 1 < w {
                    blend_over(buffer.get_pixel_mut(ix as u32 + 1, iy as u32), options.color, cov);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn options(text: &str) -> TextOptions {
        TextOptions {
            text: text.to_string(),
            size: 32.0,
            color: Rgba([255, 0, 0, 255]),
            bold: false,
            italic: false,
        }
    }

    #[test]
    fn layout_advances_monotonically() {
        let Some(font) = default_font() else {
            return; // headless environment without system fonts
        };
        let (glyphs, width) = layout_line(&font, "Abc", 32.0);
        assert_eq!(glyphs.len(), 3);
        assert!(width > 0.0);
        assert!(glyphs[0].1 < glyphs[1].1 && glyphs[1].1 < glyphs[2].1);
    }

    #[test]
    fn stamp_paints_near_the_anchor() {
        let Some(font) = default_font() else {
            return;
        };
        let mut buffer = RgbaImage::new(128, 64);
        stamp_text(&mut buffer, &font, &options("X"), 8.0, 8.0);

        let painted = buffer.pixels().filter(|p| p[3] > 0).count();
        assert!(painted > 0, "stamping 'X' should touch pixels");
        // Everything stays within the glyph's neighborhood, not at the far edge
        assert_eq!(buffer.get_pixel(127, 63)[3], 0);
    }

    #[test]
    fn empty_text_draws_nothing() {
        let Some(font) = default_font() else {
            return;
        };
        let mut buffer = RgbaImage::new(32, 32);
        stamp_text(&mut buffer, &font, &options(""), 4.0, 4.0);
        assert!(buffer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn bold_covers_at_least_as_much_as_regular() {
        let Some(font) = default_font() else {
            return;
        };
        let mut regular = RgbaImage::new(128, 64);
        let mut bold_buf = RgbaImage::new(128, 64);
        stamp_text(&mut regular, &font, &options("T"), 8.0, 8.0);
        let mut bold = options("T");
        bold.bold = true;
        stamp_text(&mut bold_buf, &font, &bold, 8.0, 8.0);

        let count = |img: &RgbaImage| img.pixels().filter(|p| p[3] > 0).count();
        assert!(count(&bold_buf) >= count(&regular));
    }
}
