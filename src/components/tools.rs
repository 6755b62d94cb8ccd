// ============================================================================
// TOOL STATE — tool variants, per-tool options, pointer event routing types
// ============================================================================

use image::Rgba;

/// The persistent tool modes. Rotate and flip are instantaneous commands on
/// the session, not tools — selecting a tool never touches history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    /// Reserved no-op tool; performs no pointer handling.
    #[default]
    Select,
    Draw,
    Erase,
    Text,
    Crop,
}

/// What happened to the pointer. `Leave` fires when the pointer exits the
/// canvas while a gesture is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

/// A pointer event in display units (the session maps them into buffer
/// pixels through the surface's per-axis scale).
#[derive(Clone, Copy, Debug)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl PointerInput {
    pub fn down(x: f32, y: f32) -> Self {
        Self { phase: PointerPhase::Down, x, y }
    }
    pub fn moved(x: f32, y: f32) -> Self {
        Self { phase: PointerPhase::Move, x, y }
    }
    pub fn up(x: f32, y: f32) -> Self {
        Self { phase: PointerPhase::Up, x, y }
    }
    pub fn leave() -> Self {
        Self { phase: PointerPhase::Leave, x: 0.0, y: 0.0 }
    }
}

/// Brush configuration for the draw and erase tools.
#[derive(Clone, Copy, Debug)]
pub struct BrushOptions {
    /// Stroke width for the draw tool, in buffer pixels.
    pub draw_size: f32,
    /// Stroke width for the erase tool, in buffer pixels.
    pub erase_size: f32,
    pub color: Rgba<u8>,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            draw_size: 4.0,
            erase_size: 10.0,
            color: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Text stamp configuration.
#[derive(Clone, Debug)]
pub struct TextOptions {
    pub text: String,
    pub size: f32,
    pub color: Rgba<u8>,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: 32.0,
            color: Rgba([255, 255, 255, 255]),
            bold: false,
            italic: false,
        }
    }
}

/// All tool parameters, passed explicitly instead of being read from UI
/// widgets at stamp time.
#[derive(Clone, Debug, Default)]
pub struct ToolOptions {
    pub brush: BrushOptions,
    pub text: TextOptions,
}

/// Transient state of an in-progress paint/erase gesture. Lives from
/// pointer-down to pointer-up; the single history commit happens when the
/// stroke ends, not per segment.
#[derive(Clone, Copy, Debug)]
pub struct StrokeState {
    /// Last pointer position in buffer coordinates; the next segment is
    /// composited from here.
    pub last: (f32, f32),
}

impl StrokeState {
    pub fn begin(x: f32, y: f32) -> Self {
        Self { last: (x, y) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tool_is_select() {
        assert_eq!(Tool::default(), Tool::Select);
    }

    #[test]
    fn brush_defaults_match_draw_and_erase_widths() {
        let brush = BrushOptions::default();
        assert_eq!(brush.draw_size, 4.0);
        assert_eq!(brush.erase_size, 10.0);
        assert_eq!(brush.color, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn text_defaults() {
        let text = TextOptions::default();
        assert!(text.text.is_empty());
        assert_eq!(text.size, 32.0);
        assert!(!text.bold && !text.italic);
    }
}
