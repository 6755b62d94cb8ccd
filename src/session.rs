// ============================================================================
// EDITING SESSION — ties surface, history, tools and adjustments together
// ============================================================================

use ab_glyph::FontArc;
use image::{RgbaImage, imageops};

use crate::canvas::Surface;
use crate::components::history::{HistoryStack, Snapshot};
use crate::components::tools::{PointerInput, PointerPhase, StrokeState, Tool, ToolOptions};
use crate::ops::adjust::{AdjustmentKind, Adjustments};
use crate::ops::crop::CropSelection;
use crate::ops::{crop, paint, text, transform};
use crate::record::{StickerRecord, StickerStore};
use crate::{io, log_err, log_info, log_warn};

/// A message for the embedding UI to surface as a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

/// Everything a live, editable image carries.
struct EditState {
    surface: Surface,
    history: HistoryStack,
    /// Pristine decoded image, kept for adjustment previews.
    source: RgbaImage,
    stroke: Option<StrokeState>,
    crop: Option<CropSelection>,
}

enum Content {
    /// Record exists but is video or animated media.
    Unsupported,
    /// No image could be loaded.
    Empty,
    Ready(Box<EditState>),
}

pub struct EditingSession {
    record_id: String,
    tool: Tool,
    options: ToolOptions,
    adjustments: Adjustments,
    notices: Vec<Notice>,
    font: Option<FontArc>,
    content: Content,
}

impl EditingSession {
    /// Open an editing session for a record. Non-image media and decode
    /// failures produce a session that ignores edits rather than an error,
    /// so the caller can still show the dialog shell.
    pub fn open(record: &StickerRecord) -> Self {
        let mut notices = Vec::new();
        let content = if !record.media_kind.is_editable() {
            log_info!(
                "Editor opened on non-image record '{}', editing disabled",
                record.id
            );
            Content::Unsupported
        } else {
            match &record.image_source {
                Some(source) => match io::decode_source(source) {
                    Ok(decoded) => {
                        let fitted = io::fit_to_edit_size(decoded);
                        let mut history = HistoryStack::new();
                        history.push(Snapshot::capture(&fitted));
                        log_info!(
                            "Editing record '{}' at {}x{}",
                            record.id,
                            fitted.width(),
                            fitted.height()
                        );
                        Content::Ready(Box::new(EditState {
                            surface: Surface::from_image(fitted.clone()),
                            history,
                            source: fitted,
                            stroke: None,
                            crop: None,
                        }))
                    }
                    Err(err) => {
                        log_err!("Could not load image for record '{}': {err}", record.id);
                        notices.push(Notice::Warning("Failed to load image".to_string()));
                        Content::Empty
                    }
                },
                None => Content::Empty,
            }
        };

        Self {
            record_id: record.id.clone(),
            tool: Tool::default(),
            options: ToolOptions::default(),
            adjustments: Adjustments::default(),
            notices,
            font: text::default_font(),
            content,
        }
    }

    // ------------------------------------------------------------------------
    // Tool selection and options
    // ------------------------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Any in-progress gesture is abandoned: the surface is
    /// restored to the last committed state and nothing reaches history.
    pub fn set_tool(&mut self, tool: Tool) {
        if let Content::Ready(state) = &mut self.content
            && (state.stroke.is_some() || state.crop.is_some())
        {
            restore_current(state);
        }
        self.tool = tool;
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ToolOptions {
        &mut self.options
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    /// Feed one pointer event, in display coordinates. Display coordinates
    /// equal buffer coordinates until [`set_display_size`] says otherwise.
    ///
    /// [`set_display_size`]: Self::set_display_size
    pub fn pointer_event(&mut self, input: PointerInput) {
        let tool = self.tool;
        let Content::Ready(state) = &mut self.content else {
            return;
        };
        let (x, y) = state.surface.map_pointer(input.x, input.y);

        match (tool, input.phase) {
            (Tool::Draw | Tool::Erase, PointerPhase::Down) => {
                state.stroke = Some(StrokeState::begin(x, y));
                stroke_to(state, tool, &self.options, x, y);
            }
            (Tool::Draw | Tool::Erase, PointerPhase::Move) => {
                if state.stroke.is_some() {
                    stroke_to(state, tool, &self.options, x, y);
                }
            }
            (Tool::Draw | Tool::Erase, PointerPhase::Up) => {
                if state.stroke.is_some() {
                    stroke_to(state, tool, &self.options, x, y);
                    state.stroke = None;
                    state.history.push(Snapshot::capture(state.surface.pixels()));
                }
            }
            (Tool::Draw | Tool::Erase, PointerPhase::Leave) => {
                // The leave position is meaningless; commit at the last
                // point the stroke reached.
                if state.stroke.take().is_some() {
                    state.history.push(Snapshot::capture(state.surface.pixels()));
                }
            }
            (Tool::Text, PointerPhase::Down) => {
                self.stamp_text_at(x, y);
            }
            (Tool::Crop, PointerPhase::Down) => {
                state.crop = Some(CropSelection::new(x, y));
                show_crop_preview(state);
            }
            (Tool::Crop, PointerPhase::Move) => {
                if let Some(selection) = &mut state.crop {
                    selection.update(x, y);
                    show_crop_preview(state);
                }
            }
            (Tool::Crop, PointerPhase::Up) => {
                if let Some(selection) = state.crop.take() {
                    finish_crop(state, &selection);
                }
            }
            (Tool::Crop, PointerPhase::Leave) => {
                // Leaving the canvas cancels the selection outright.
                if state.crop.take().is_some() {
                    restore_current(state);
                }
            }
            (Tool::Select | Tool::Text, _) => {}
        }
    }

    fn stamp_text_at(&mut self, x: f32, y: f32) {
        let Content::Ready(state) = &mut self.content else {
            return;
        };
        if self.options.text.text.trim().is_empty() {
            self.notices
                .push(Notice::Warning("Enter text first".to_string()));
            return;
        }
        let Some(font) = &self.font else {
            log_warn!("No usable system font, text tool disabled");
            self.notices
                .push(Notice::Warning("No font available".to_string()));
            return;
        };
        text::stamp_text(state.surface.pixels_mut(), font, &self.options.text, x, y);
        state.history.push(Snapshot::capture(state.surface.pixels()));
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn undo(&mut self) {
        if let Content::Ready(state) = &mut self.content {
            // An in-progress gesture has already painted the surface; wipe
            // it back to the committed entry so no uncommitted pixels
            // survive even when the cursor cannot move.
            if state.stroke.is_some() || state.crop.is_some() {
                restore_current(state);
            }
            if let Some(snapshot) = state.history.undo() {
                let restored = snapshot.to_buffer();
                state.surface.replace(restored);
            }
        }
    }

    pub fn redo(&mut self) {
        if let Content::Ready(state) = &mut self.content {
            if state.stroke.is_some() || state.crop.is_some() {
                restore_current(state);
            }
            if let Some(snapshot) = state.history.redo() {
                let restored = snapshot.to_buffer();
                state.surface.replace(restored);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(&self.content, Content::Ready(s) if s.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        matches!(&self.content, Content::Ready(s) if s.history.can_redo())
    }

    pub fn history_len(&self) -> usize {
        match &self.content {
            Content::Ready(s) => s.history.len(),
            _ => 0,
        }
    }

    // ------------------------------------------------------------------------
    // Whole-image transforms
    // ------------------------------------------------------------------------

    pub fn rotate_left(&mut self) {
        self.commit_transform(transform::rotate_90ccw);
    }

    pub fn rotate_right(&mut self) {
        self.commit_transform(transform::rotate_90cw);
    }

    pub fn flip_horizontal(&mut self) {
        self.commit_transform(|img| {
            let mut out = img.clone();
            transform::flip_horizontal(&mut out);
            out
        });
    }

    pub fn flip_vertical(&mut self) {
        self.commit_transform(|img| {
            let mut out = img.clone();
            transform::flip_vertical(&mut out);
            out
        });
    }

    fn commit_transform(&mut self, apply: impl Fn(&RgbaImage) -> RgbaImage) {
        if let Content::Ready(state) = &mut self.content {
            if state.stroke.is_some() || state.crop.is_some() {
                restore_current(state);
            }
            let transformed = apply(state.surface.pixels());
            state.surface.replace(transformed);
            state.history.push(Snapshot::capture(state.surface.pixels()));
        }
    }

    // ------------------------------------------------------------------------
    // Adjustments
    // ------------------------------------------------------------------------

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// Set one adjustment and refresh the preview. The preview always
    /// re-derives from the pristine source so repeated tweaks never
    /// compound; it becomes permanent once the next destructive edit
    /// snapshots the surface.
    pub fn set_adjustment(&mut self, kind: AdjustmentKind, value: i32) {
        self.adjustments.set(kind, value.clamp(0, 200));
        let adjustments = self.adjustments;
        if let Content::Ready(state) = &mut self.content {
            if state.stroke.is_some() || state.crop.is_some() {
                restore_current(state);
            }
            let (w, h) = (state.surface.width(), state.surface.height());
            let base = if state.source.dimensions() == (w, h) {
                state.source.clone()
            } else {
                imageops::resize(&state.source, w, h, imageops::FilterType::Triangle)
            };
            let adjusted = crate::ops::adjust::apply(&base, &adjustments);
            state.surface.replace(adjusted);
        }
    }

    /// Bake the adjustment preview into the image: the adjusted pixels
    /// become the new source and a history entry, and the sliders reset to
    /// neutral. Interactive flows never need this — the next destructive
    /// edit bakes the preview implicitly — but batch processing wants
    /// later crops and transforms to see the adjusted pixels.
    pub fn commit_adjustments(&mut self) {
        if self.adjustments.is_neutral() {
            return;
        }
        if let Content::Ready(state) = &mut self.content {
            state.source = state.surface.pixels().clone();
            state.history.push(Snapshot::capture(state.surface.pixels()));
        }
        self.adjustments.reset();
    }

    // ------------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------------

    /// Encode the current surface as PNG.
    pub fn save(&self) -> Result<Vec<u8>, String> {
        match &self.content {
            Content::Ready(state) => io::encode_png(state.surface.pixels()),
            Content::Unsupported => Err("Record is not an editable image".to_string()),
            Content::Empty => Err("No image loaded".to_string()),
        }
    }

    /// Encode and write the result back into the record store, replacing
    /// the record's thumbnail.
    pub fn save_to_store(&mut self, store: &mut StickerStore) {
        match self.save() {
            Ok(png) => {
                if store.apply_edit(&self.record_id, png) {
                    log_info!("Saved edited image for record '{}'", self.record_id);
                    self.notices
                        .push(Notice::Info("Sticker updated".to_string()));
                } else {
                    log_warn!("Record '{}' vanished before save", self.record_id);
                }
            }
            Err(err) => {
                log_warn!("Save failed for record '{}': {err}", self.record_id);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.content, Content::Ready(_))
    }

    pub fn media_unsupported(&self) -> bool {
        matches!(self.content, Content::Unsupported)
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match &self.content {
            Content::Ready(s) => Some((s.surface.width(), s.surface.height())),
            _ => None,
        }
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        match &self.content {
            Content::Ready(s) => Some(s.surface.pixels()),
            _ => None,
        }
    }

    /// Tell the session how large the canvas is drawn on screen, so pointer
    /// coordinates can be mapped back to buffer space.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        if let Content::Ready(state) = &mut self.content {
            state.surface.set_display_size(width, height);
        }
    }

    /// Drain pending toast messages for the embedding UI.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

// ============================================================================
// GESTURE HELPERS
// ============================================================================

fn stroke_to(state: &mut EditState, tool: Tool, options: &ToolOptions, x: f32, y: f32) {
    let Some(stroke) = &mut state.stroke else {
        return;
    };
    let (fx, fy) = stroke.last;
    match tool {
        Tool::Draw => paint::stroke_segment(
            state.surface.pixels_mut(),
            (fx, fy),
            (x, y),
            options.brush.draw_size,
            options.brush.color,
        ),
        Tool::Erase => paint::erase_segment(
            state.surface.pixels_mut(),
            (fx, fy),
            (x, y),
            options.brush.erase_size,
        ),
        _ => {}
    }
    stroke.last = (x, y);
}

/// Repaint the surface as the current history entry with the crop overlay
/// on top. The overlay is presentation only; the committed pixels stay in
/// history untouched.
fn show_crop_preview(state: &mut EditState) {
    let Some(selection) = &state.crop else {
        return;
    };
    let Some(base) = state.history.current() else {
        return;
    };
    let preview = crop::render_preview(&base.to_buffer(), selection);
    state.surface.replace(preview);
}

fn finish_crop(state: &mut EditState, selection: &CropSelection) {
    let Some(base) = state.history.current() else {
        return;
    };
    let base = base.to_buffer();
    match crop::extract(&base, selection) {
        Some(cropped) => {
            state.surface.replace(cropped);
            state.history.push(Snapshot::capture(state.surface.pixels()));
        }
        None => {
            // Selection too small, drop the overlay and keep the image.
            state.surface.replace(base);
        }
    }
}

/// Throw away uncommitted surface changes by restoring the entry the
/// history cursor points at.
fn restore_current(state: &mut EditState) {
    state.stroke = None;
    state.crop = None;
    if let Some(snapshot) = state.history.current() {
        let restored = snapshot.to_buffer();
        state.surface.replace(restored);
    }
}
