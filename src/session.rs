//! Interactive session: the slot store plus the state the UI drives it with.
//!
//! The copy source is a plain `Option<GridSlot>` owned here. Selecting a new
//! source silently overwrites the old one and nothing ever clears it; the
//! image copied is whatever the source slot holds at paste time.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::compose::compose;
use crate::error::{CombineError, Result};
use crate::grid::{DEFAULT_EXPORT_DIMENSION, ExportSize, GridSlot};
use crate::io;
use crate::slots::SlotStore;

/// Modifier-qualified mouse gestures on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotGesture {
    /// Shift + secondary click: remember this slot as the copy source.
    SelectSource,
    /// Shift + primary click: paste the source image into this slot.
    PasteFromSource,
}

impl SlotGesture {
    /// Map a click to a gesture. Only Shift, with no other modifier, qualifies.
    pub fn from_click(primary: bool, secondary: bool, shift_only: bool) -> Option<Self> {
        if !shift_only {
            return None;
        }
        if secondary {
            Some(SlotGesture::SelectSource)
        } else if primary {
            Some(SlotGesture::PasteFromSource)
        } else {
            None
        }
    }
}

pub struct Session {
    slots: SlotStore,
    copy_source: Option<GridSlot>,
    /// Free-text export width, validated only when exporting.
    pub width_text: String,
    /// Free-text export height, validated only when exporting.
    pub height_text: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            slots: SlotStore::new(),
            copy_source: None,
            width_text: DEFAULT_EXPORT_DIMENSION.to_string(),
            height_text: DEFAULT_EXPORT_DIMENSION.to_string(),
        }
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    pub fn copy_source(&self) -> Option<GridSlot> {
        self.copy_source
    }

    /// Load a dropped file into `slot`. On any error the slot is untouched.
    pub fn drop_file(&mut self, slot: GridSlot, path: &Path) -> Result<()> {
        match io::load_png(path) {
            Ok(image) => {
                log::info!(
                    "Loaded {} ({}x{}) into {} slot",
                    path.display(),
                    image.width(),
                    image.height(),
                    slot
                );
                self.slots.set_slot(slot, image);
                Ok(())
            }
            Err(e) => {
                if e.is_silent() {
                    log::debug!("Ignored drop on {} slot: {}", slot, e);
                } else {
                    log::warn!("Drop on {} slot failed: {}", slot, e.detailed());
                }
                Err(e)
            }
        }
    }

    /// Put an already decoded image into `slot`.
    pub fn set_image(&mut self, slot: GridSlot, image: RgbaImage) {
        self.slots.set_slot(slot, image);
    }

    /// Remember `slot` as the copy source. Ignored while the slot is empty.
    pub fn select_copy_source(&mut self, slot: GridSlot) -> bool {
        if !self.slots.is_populated(slot) {
            return false;
        }
        if let Some(previous) = self.copy_source.filter(|p| *p != slot) {
            log::debug!("Copy source {} replaced by {}", previous, slot);
        }
        self.copy_source = Some(slot);
        log::info!("Copy source set to {} slot", slot);
        true
    }

    /// Copy the source slot's current image into `target`.
    pub fn paste_from_source(&mut self, target: GridSlot) -> Result<()> {
        let source = self.copy_source.ok_or(CombineError::EmptySlotCopy)?;
        if !self.slots.copy_slot(source, target) {
            return Err(CombineError::EmptySlotCopy);
        }
        log::info!("Copied {} slot into {} slot", source, target);
        Ok(())
    }

    /// Apply a gesture. Returns `true` when `slot`'s contents or the source
    /// selection changed.
    pub fn apply_gesture(&mut self, slot: GridSlot, gesture: SlotGesture) -> bool {
        match gesture {
            SlotGesture::SelectSource => self.select_copy_source(slot),
            SlotGesture::PasteFromSource => self.paste_from_source(slot).is_ok(),
        }
    }

    /// Validate the width/height fields.
    pub fn export_size(&self) -> Result<ExportSize> {
        ExportSize::parse(&self.width_text, &self.height_text)
    }

    /// Validate the size and build the composite.
    pub fn compose_export(&self) -> Result<RgbaImage> {
        let size = self.export_size()?;
        let composite = compose(&self.slots, size);
        log::info!(
            "Composed {}x{} export from {} slot(s)",
            size.width(),
            size.height(),
            self.slots.populated()
        );
        Ok(composite)
    }

    /// Compose, ask `choose_path` where to write, then write the PNG.
    ///
    /// Nothing is written unless the size is valid and a path was chosen.
    pub fn export_with<F>(&self, choose_path: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<PathBuf>,
    {
        let composite = self.compose_export()?;
        let path = match choose_path() {
            Ok(path) => path,
            Err(e) => {
                log::info!("Export aborted: {}", e);
                return Err(e);
            }
        };
        io::save_png(&composite, &path)?;
        log::info!("Exported {}", path.display());
        Ok(path)
    }

    /// Export straight to a known path.
    pub fn export_to(&self, path: &Path) -> Result<PathBuf> {
        self.export_with(|| Ok(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba(px))
    }

    #[test]
    fn defaults_to_2048_fields() {
        let session = Session::new();
        assert_eq!(session.width_text, "2048");
        assert_eq!(session.height_text, "2048");
        assert!(session.copy_source().is_none());
    }

    #[test]
    fn gesture_mapping_requires_shift_only() {
        assert_eq!(
            SlotGesture::from_click(false, true, true),
            Some(SlotGesture::SelectSource)
        );
        assert_eq!(
            SlotGesture::from_click(true, false, true),
            Some(SlotGesture::PasteFromSource)
        );
        assert_eq!(SlotGesture::from_click(true, false, false), None);
        assert_eq!(SlotGesture::from_click(false, true, false), None);
        assert_eq!(SlotGesture::from_click(false, false, true), None);
    }

    #[test]
    fn paste_without_source_is_noop() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([1, 1, 1, 255]));
        assert!(matches!(
            session.paste_from_source(GridSlot::TopRight),
            Err(CombineError::EmptySlotCopy)
        ));
        assert!(!session.slots().is_populated(GridSlot::TopRight));
    }

    #[test]
    fn empty_slot_cannot_become_source() {
        let mut session = Session::new();
        assert!(!session.select_copy_source(GridSlot::BottomLeft));
        assert!(session.copy_source().is_none());
    }

    #[test]
    fn select_then_paste_copies() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([9, 8, 7, 255]));
        assert!(session.apply_gesture(GridSlot::TopLeft, SlotGesture::SelectSource));
        assert!(session.apply_gesture(GridSlot::BottomRight, SlotGesture::PasteFromSource));
        assert_eq!(
            *session.slots().get_slot(GridSlot::BottomRight).unwrap().get_pixel(1, 1),
            Rgba([9, 8, 7, 255])
        );
        // Source stays selected for further pastes.
        assert!(session.apply_gesture(GridSlot::TopRight, SlotGesture::PasteFromSource));
        assert_eq!(session.slots().populated(), 3);
    }

    #[test]
    fn new_selection_overwrites_old() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([1, 0, 0, 255]));
        session.set_image(GridSlot::TopRight, solid([0, 1, 0, 255]));
        session.select_copy_source(GridSlot::TopLeft);
        session.select_copy_source(GridSlot::TopRight);
        assert_eq!(session.copy_source(), Some(GridSlot::TopRight));
        session.paste_from_source(GridSlot::BottomLeft).unwrap();
        assert_eq!(
            *session.slots().get_slot(GridSlot::BottomLeft).unwrap().get_pixel(0, 0),
            Rgba([0, 1, 0, 255])
        );
    }

    #[test]
    fn paste_uses_source_contents_at_paste_time() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([1, 0, 0, 255]));
        session.select_copy_source(GridSlot::TopLeft);
        session.set_image(GridSlot::TopLeft, solid([0, 0, 1, 255]));
        session.paste_from_source(GridSlot::BottomRight).unwrap();
        assert_eq!(
            *session.slots().get_slot(GridSlot::BottomRight).unwrap().get_pixel(0, 0),
            Rgba([0, 0, 1, 255])
        );
    }

    #[test]
    fn unsupported_drop_leaves_slot_alone() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([5, 5, 5, 255]));
        let err = session
            .drop_file(GridSlot::TopLeft, Path::new("picture.gif"))
            .unwrap_err();
        assert!(err.is_silent());
        assert_eq!(
            *session.slots().get_slot(GridSlot::TopLeft).unwrap().get_pixel(0, 0),
            Rgba([5, 5, 5, 255])
        );
    }

    #[test]
    fn bad_width_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut session = Session::new();
        session.width_text = "abc".into();

        let mut asked = false;
        let result = session.export_with(|| {
            asked = true;
            Ok(path.clone())
        });
        assert!(matches!(result, Err(CombineError::InvalidDimension { field: "width", .. })));
        assert!(!asked);
        assert!(!path.exists());
    }

    #[test]
    fn unallocatable_size_is_rejected_before_compose() {
        let mut session = Session::new();
        session.set_image(GridSlot::TopLeft, solid([1, 2, 3, 255]));
        session.width_text = "4294967295".into();
        session.height_text = "4294967295".into();
        assert!(matches!(
            session.compose_export(),
            Err(CombineError::InvalidDimension { field: "width", .. })
        ));
        assert!(session.slots().is_populated(GridSlot::TopLeft));
    }

    #[test]
    fn cancelled_dialog_writes_nothing() {
        let session = Session::new();
        let result = session.export_with(|| Err(CombineError::SaveCancelled));
        assert!(matches!(result, Err(CombineError::SaveCancelled)));
    }

    #[test]
    fn export_to_writes_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let mut session = Session::new();
        session.width_text = "10".into();
        session.height_text = "6".into();
        session.set_image(GridSlot::BottomLeft, solid([200, 100, 50, 255]));

        let written = session.export_to(&path).unwrap();
        let img = io::load_png(&written).unwrap();
        assert_eq!(img.dimensions(), (10, 6));
        assert_eq!(*img.get_pixel(0, 5), Rgba([200, 100, 50, 255]));
        assert_eq!(*img.get_pixel(9, 0), Rgba([0, 0, 0, 0]));
    }
}
