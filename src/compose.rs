// ============================================================================
// GRID COMPOSITOR — tile the four slots into one transparent canvas
// ============================================================================
//
// Each populated slot is nearest-neighbor resampled into its quadrant, scaled
// independently per axis so it fills the quadrant exactly. The canvas starts
// fully transparent and every quadrant is written at most once, so source
// pixels (alpha included) are copied verbatim with no blending.
//
// Rows are filled in parallel with rayon; the output is deterministic.

use image::RgbaImage;
use rayon::prelude::*;

use crate::error::Result;
use crate::grid::{ExportSize, GridSlot, SLOT_COUNT};
use crate::slots::SlotStore;

/// Precomputed source coordinates for every destination column and row of
/// one quadrant.
struct SampleMap {
    xs: Vec<u32>,
    ys: Vec<u32>,
}

impl SampleMap {
    fn new(src: &RgbaImage, quad_w: u32, quad_h: u32) -> Option<Self> {
        let (sw, sh) = src.dimensions();
        if sw == 0 || sh == 0 {
            return None;
        }
        Some(Self {
            xs: nearest_axis(sw, quad_w),
            ys: nearest_axis(sh, quad_h),
        })
    }
}

/// Map each destination index to the source index whose span contains the
/// destination pixel's center: `floor((d + 0.5) * src / dst)`, in integers.
fn nearest_axis(src_len: u32, dst_len: u32) -> Vec<u32> {
    let src = src_len as u64;
    let dst = dst_len as u64;
    (0..dst)
        .map(|d| (((2 * d + 1) * src) / (2 * dst)).min(src - 1) as u32)
        .collect()
}

/// Compose the grid at `size`. Empty slots leave their quadrant transparent.
///
/// Never mutates the slots; the returned buffer is freshly allocated.
pub fn compose(slots: &SlotStore, size: ExportSize) -> RgbaImage {
    let (width, height) = (size.width(), size.height());
    let (quad_w, quad_h) = size.quadrant();

    let mut canvas = RgbaImage::new(width, height);
    if quad_w == 0 || quad_h == 0 {
        return canvas;
    }

    let maps: [Option<SampleMap>; SLOT_COUNT] = std::array::from_fn(|i| {
        slots
            .get_slot(GridSlot::ALL[i])
            .and_then(|src| SampleMap::new(src, quad_w, quad_h))
    });

    let row_bytes = width as usize * 4;
    let buf: &mut [u8] = &mut canvas;
    buf.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let band = y / quad_h;
            // The trailing row of an odd height belongs to no quadrant.
            if band > 1 {
                return;
            }
            let local_y = (y - band * quad_h) as usize;

            for col in 0..2u32 {
                let slot = GridSlot::ALL[(band * 2 + col) as usize];
                let (Some(src), Some(map)) = (slots.get_slot(slot), &maps[slot.index()]) else {
                    continue;
                };
                let sy = map.ys[local_y];
                let x0 = (col * quad_w) as usize;
                for (dx, &sx) in map.xs.iter().enumerate() {
                    let off = (x0 + dx) * 4;
                    row[off..off + 4].copy_from_slice(&src.get_pixel(sx, sy).0);
                }
            }
        });

    log::debug!(
        "Composed {}x{} grid from {} slot(s)",
        width,
        height,
        slots.populated()
    );
    canvas
}

/// Validate raw dimensions, then [`compose`].
pub fn compose_checked(slots: &SlotStore, width: u32, height: u32) -> Result<RgbaImage> {
    Ok(compose(slots, ExportSize::new(width, height)?))
}
