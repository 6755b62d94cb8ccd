// ============================================================================
// CROP OPERATION — interactive rectangle selection with live preview overlay
// ============================================================================

use image::{Rgba, RgbaImage, imageops};

use crate::canvas::blend_over;

/// Selections narrower or shorter than this commit as a no-op.
pub const MIN_CROP_SIZE: u32 = 5;

/// Accent color of the dashed selection border.
const BORDER_COLOR: Rgba<u8> = Rgba([124, 91, 245, 255]);
/// Dash pattern: 5 px on, 5 px off.
const DASH: u32 = 5;
/// Mask painted over the area outside the selection (50% black).
const MASK_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MASK_ALPHA: f32 = 0.5;

/// Anchor + current pointer position, in buffer coordinates. Live only while
/// the crop tool is engaged.
#[derive(Clone, Copy, Debug)]
pub struct CropSelection {
    pub anchor: (f32, f32),
    pub head: (f32, f32),
}

impl CropSelection {
    /// Begin a selection: a zero-size rectangle at the anchor point.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            anchor: (x, y),
            head: (x, y),
        }
    }

    pub fn update(&mut self, x: f32, y: f32) {
        self.head = (x, y);
    }

    /// Axis-aligned bounding box of anchor and head as `(x, y, w, h)`. Both
    /// endpoints clamp to non-negative coordinates first, so a drag that
    /// started off-canvas only spans the visible part.
    pub fn rect(&self) -> (u32, u32, u32, u32) {
        let ax = self.anchor.0.max(0.0);
        let ay = self.anchor.1.max(0.0);
        let hx = self.head.0.max(0.0);
        let hy = self.head.1.max(0.0);
        let x = ax.min(hx) as u32;
        let y = ay.min(hy) as u32;
        let w = (ax - hx).abs() as u32;
        let h = (ay - hy).abs() as u32;
        (x, y, w, h)
    }

    /// Whether the selection clears the 5×5 commit floor.
    pub fn meets_minimum(&self) -> bool {
        let (_, _, w, h) = self.rect();
        w >= MIN_CROP_SIZE && h >= MIN_CROP_SIZE
    }
}

/// Render the live preview: the committed `base` pixels with a
/// semi-transparent mask over everything outside the selection and a dashed
/// border at its edges. `base` itself is never mutated — the result replaces
/// only the visible buffer.
pub fn render_preview(base: &RgbaImage, selection: &CropSelection) -> RgbaImage {
    let mut out = base.clone();
    let (bw, bh) = out.dimensions();
    let (sx, sy, sw, sh) = selection.rect();
    let ex = (sx + sw).min(bw);
    let ey = (sy + sh).min(bh);

    for y in 0..bh {
        for x in 0..bw {
            let inside = x >= sx && x < ex && y >= sy && y < ey;
            if !inside {
                blend_over(out.get_pixel_mut(x, y), MASK_COLOR, MASK_ALPHA);
            }
        }
    }

    draw_dashed_rect(&mut out, sx, sy, ex, ey);
    out
}

/// Extract the selected region from the committed `base` pixels. Returns
/// `None` when the selection is below the minimum size, so the caller can
/// treat the whole crop as a no-op.
pub fn extract(base: &RgbaImage, selection: &CropSelection) -> Option<RgbaImage> {
    if !selection.meets_minimum() {
        return None;
    }
    let (bw, bh) = base.dimensions();
    let (sx, sy, sw, sh) = selection.rect();
    if sx >= bw || sy >= bh {
        return None;
    }
    let w = sw.min(bw - sx);
    let h = sh.min(bh - sy);
    if w < MIN_CROP_SIZE || h < MIN_CROP_SIZE {
        return None;
    }
    Some(imageops::crop_imm(base, sx, sy, w, h).to_image())
}

/// 2 px dashed border along the selection edges, 5-on/5-off, clipped to the
/// buffer.
fn draw_dashed_rect(out: &mut RgbaImage, sx: u32, sy: u32, ex: u32, ey: u32) {
    let (bw, bh) = out.dimensions();
    if ex <= sx || ey <= sy {
        return;
    }

    let mut put = |x: u32, y: u32| {
        if x < bw && y < bh {
            out.put_pixel(x, y, BORDER_COLOR);
        }
    };

    for x in sx..ex {
        if ((x - sx) / DASH) % 2 == 0 {
            for t in 0..2u32 {
                put(x, sy.saturating_sub(t));
                put(x, (ey - 1).saturating_add(t).min(bh.saturating_sub(1)));
            }
        }
    }
    for y in sy..ey {
        if ((y - sy) / DASH) % 2 == 0 {
            for t in 0..2u32 {
                put(sx.saturating_sub(t), y);
                put((ex - 1).saturating_add(t).min(bw.saturating_sub(1)), y);
            }
        }
    }
}
