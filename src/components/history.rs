// ============================================================================
// HISTORY — bounded stack of full-frame snapshots with an undo/redo cursor
// ============================================================================

use image::RgbaImage;

/// Maximum number of snapshots retained. Beyond this, the oldest entry is
/// evicted on push.
pub const HISTORY_CAPACITY: usize = 30;

/// An immutable, full-resolution copy of the buffer. Restoring a snapshot is
/// exact: byte-identical pixels at the original dimensions, no resampling.
#[derive(Clone)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn capture(buffer: &RgbaImage) -> Self {
        Self {
            pixels: buffer.clone(),
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

    /// Materialize the snapshot as a fresh buffer.
    pub fn to_buffer(&self) -> RgbaImage {
        self.pixels.clone()
    }
}

/// Whole-frame undo/redo history.
///
/// Invariant: when non-empty, `cursor < entries.len() <= HISTORY_CAPACITY`
/// and `entries[cursor]` is the committed state currently on the surface.
/// Pushing truncates the redo branch, appends, and evicts the oldest entry
/// once capacity is exceeded — the cursor always lands on the pushed entry.
#[derive(Default)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a snapshot, closing off the redo branch.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step the cursor back and return the snapshot to restore.
    /// No-op (returns `None`) at the oldest entry or when empty.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step the cursor forward and return the snapshot to restore.
    /// No-op (returns `None`) at the newest entry or when empty.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.entries.is_empty() || self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// The snapshot at the cursor — the committed baseline for previews.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn frame(tag: u8) -> Snapshot {
        let img = RgbaImage::from_pixel(4, 4, Rgba([tag, tag, tag, 255]));
        Snapshot::capture(&img)
    }

    fn tag_of(s: &Snapshot) -> u8 {
        s.pixels().get_pixel(0, 0)[0]
    }

    #[test]
    fn push_then_undo_redo_round_trip() {
        let mut history = HistoryStack::new();
        history.push(frame(1));
        history.push(frame(2));
        history.push(frame(3));

        assert_eq!(history.len(), 3);
        assert_eq!(tag_of(history.undo().unwrap()), 2);
        assert_eq!(tag_of(history.undo().unwrap()), 1);
        assert!(history.undo().is_none());
        assert_eq!(tag_of(history.redo().unwrap()), 2);
        assert_eq!(tag_of(history.redo().unwrap()), 3);
        assert!(history.redo().is_none());
    }

    #[test]
    fn push_truncates_redo_branch() {
        let mut history = HistoryStack::new();
        history.push(frame(1));
        history.push(frame(2));
        history.push(frame(3));
        history.undo();
        history.undo();
        history.push(frame(9));

        assert_eq!(history.len(), 2);
        assert_eq!(tag_of(history.current().unwrap()), 9);
        assert!(history.redo().is_none());
        assert_eq!(tag_of(history.undo().unwrap()), 1);
    }

    #[test]
    fn capacity_evicts_oldest_and_keeps_cursor_on_latest() {
        let mut history = HistoryStack::new();
        for i in 0..=HISTORY_CAPACITY {
            history.push(frame(i as u8));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.cursor(), HISTORY_CAPACITY - 1);
        assert_eq!(tag_of(history.current().unwrap()), HISTORY_CAPACITY as u8);

        // Full undo stops at the evicted boundary: entry 0 is gone
        let mut oldest = 0;
        while let Some(snap) = history.undo() {
            oldest = tag_of(snap);
        }
        assert_eq!(oldest, 1);
    }

    #[test]
    fn restore_is_byte_identical() {
        let mut src = RgbaImage::new(3, 2);
        for (i, px) in src.pixels_mut().enumerate() {
            *px = Rgba([i as u8, (i * 7) as u8, (i * 13) as u8, 200]);
        }
        let snap = Snapshot::capture(&src);
        assert_eq!(snap.to_buffer().as_raw(), src.as_raw());
        assert_eq!((snap.width(), snap.height()), (3, 2));
    }
}
