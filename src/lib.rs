// ============================================================================
// telesticker — raster editing engine for Telegram sticker images
// ============================================================================
//
// The engine behind the sticker editor dialog: a pixel surface capped at
// 512 px, whole-frame undo history, paint/erase/text/crop tools driven by
// pointer events, 90° transforms, and CSS-filter-compatible color
// adjustments. The `cli` module exposes the same pipeline for headless
// batch editing.

pub mod canvas;
pub mod cli;
pub mod components;
pub mod io;
pub mod logger;
pub mod ops;
pub mod record;
pub mod session;

pub use components::history::{HISTORY_CAPACITY, HistoryStack, Snapshot};
pub use components::tools::{
    BrushOptions, PointerInput, PointerPhase, TextOptions, Tool, ToolOptions,
};
pub use ops::adjust::{AdjustmentKind, Adjustments};
pub use record::{ImageSource, MediaKind, StickerRecord, StickerStore};
pub use session::{EditingSession, Notice};
