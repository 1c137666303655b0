//! Slot store: four optional, exclusively owned source images.

use image::RgbaImage;

use crate::grid::{GridSlot, SLOT_COUNT};

/// Holds at most one image per grid cell.
///
/// Every slot owns its buffer outright; [`SlotStore::copy_slot`] deep-copies,
/// so no two slots ever alias the same pixels.
#[derive(Debug, Clone, Default)]
pub struct SlotStore {
    slots: [Option<RgbaImage>; SLOT_COUNT],
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's image, releasing whatever it held before.
    pub fn set_slot(&mut self, slot: GridSlot, image: RgbaImage) {
        self.slots[slot.index()] = Some(image);
    }

    pub fn get_slot(&self, slot: GridSlot) -> Option<&RgbaImage> {
        self.slots[slot.index()].as_ref()
    }

    /// Mutable access to a slot's pixels.
    pub fn get_slot_mut(&mut self, slot: GridSlot) -> Option<&mut RgbaImage> {
        self.slots[slot.index()].as_mut()
    }

    pub fn clear_slot(&mut self, slot: GridSlot) -> Option<RgbaImage> {
        self.slots[slot.index()].take()
    }

    /// Copy `from` into `to`. Returns `false` (and changes nothing) when
    /// `from` is empty. `from == to` re-copies the image onto itself.
    pub fn copy_slot(&mut self, from: GridSlot, to: GridSlot) -> bool {
        match self.slots[from.index()].clone() {
            Some(image) => {
                self.slots[to.index()] = Some(image);
                true
            }
            None => false,
        }
    }

    pub fn is_populated(&self, slot: GridSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Number of slots currently holding an image.
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridSlot, Option<&RgbaImage>)> {
        GridSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.get_slot(slot)))
    }
}

impl From<[Option<RgbaImage>; SLOT_COUNT]> for SlotStore {
    fn from(slots: [Option<RgbaImage>; SLOT_COUNT]) -> Self {
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn set_replaces_previous_image() {
        let mut store = SlotStore::new();
        store.set_slot(GridSlot::TopLeft, solid(2, 2, [1, 2, 3, 255]));
        store.set_slot(GridSlot::TopLeft, solid(5, 7, [9, 9, 9, 255]));
        let held = store.get_slot(GridSlot::TopLeft).unwrap();
        assert_eq!(held.dimensions(), (5, 7));
        assert_eq!(store.populated(), 1);
    }

    #[test]
    fn copy_is_independent() {
        let mut store = SlotStore::new();
        store.set_slot(GridSlot::TopLeft, solid(3, 3, [10, 20, 30, 255]));
        assert!(store.copy_slot(GridSlot::TopLeft, GridSlot::BottomRight));

        store
            .get_slot_mut(GridSlot::TopLeft)
            .unwrap()
            .put_pixel(0, 0, Rgba([0, 0, 0, 0]));

        let copy = store.get_slot(GridSlot::BottomRight).unwrap();
        assert_eq!(*copy.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(
            *store.get_slot(GridSlot::TopLeft).unwrap().get_pixel(0, 0),
            Rgba([0, 0, 0, 0])
        );
    }

    #[test]
    fn copy_from_empty_is_noop() {
        let mut store = SlotStore::new();
        store.set_slot(GridSlot::TopRight, solid(1, 1, [7, 7, 7, 7]));
        assert!(!store.copy_slot(GridSlot::BottomLeft, GridSlot::TopRight));
        assert_eq!(
            *store.get_slot(GridSlot::TopRight).unwrap().get_pixel(0, 0),
            Rgba([7, 7, 7, 7])
        );
    }

    #[test]
    fn copy_onto_itself_keeps_image() {
        let mut store = SlotStore::new();
        store.set_slot(GridSlot::BottomLeft, solid(4, 1, [1, 1, 1, 1]));
        assert!(store.copy_slot(GridSlot::BottomLeft, GridSlot::BottomLeft));
        assert_eq!(store.get_slot(GridSlot::BottomLeft).unwrap().dimensions(), (4, 1));
    }

    #[test]
    fn clear_and_iter() {
        let mut store = SlotStore::new();
        store.set_slot(GridSlot::TopRight, solid(1, 1, [0, 0, 0, 255]));
        let flags: Vec<bool> = store.iter().map(|(_, img)| img.is_some()).collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert!(store.clear_slot(GridSlot::TopRight).is_some());
        assert_eq!(store.populated(), 0);
    }
}
