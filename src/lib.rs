//! Texture Combiner
//!
//! Drop up to four PNG images into a 2×2 grid and export them as one
//! transparent PNG at any resolution. Each image is nearest-neighbor scaled
//! to fill its quadrant exactly.
//!
//! ```no_run
//! use texture_combiner::{ExportSize, GridSlot, SlotStore, compose, io};
//!
//! # fn main() -> texture_combiner::Result<()> {
//! let mut slots = SlotStore::new();
//! slots.set_slot(GridSlot::TopLeft, io::load_png("albedo.png".as_ref())?);
//! slots.copy_slot(GridSlot::TopLeft, GridSlot::BottomRight);
//! let grid = compose(&slots, ExportSize::new(2048, 2048)?);
//! io::save_png(&grid, "atlas.png".as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod error;
pub mod grid;
pub mod io;
pub mod logger;
pub mod session;
pub mod slots;

pub use compose::{compose, compose_checked};
pub use error::{CombineError, Result};
pub use grid::{DEFAULT_EXPORT_DIMENSION, ExportSize, GridSlot, SLOT_COUNT};
pub use session::{Session, SlotGesture};
pub use slots::SlotStore;
