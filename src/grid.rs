// ============================================================================
// GRID LAYOUT — the fixed 2×2 arrangement and the requested export size
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{CombineError, Result};

/// Number of slots in the grid.
pub const SLOT_COUNT: usize = 4;

/// Width and height pre-filled in the export fields.
pub const DEFAULT_EXPORT_DIMENSION: u32 = 2048;

/// Largest accepted width or height.
pub const MAX_EXPORT_DIMENSION: u32 = 65_535;

/// Largest accepted `W × H`: 2^28 pixels, a 1 GiB RGBA canvas.
pub const MAX_EXPORT_PIXELS: u64 = 1 << 28;

pub(crate) const NOT_A_NUMBER: &str = "expected a positive whole number";
const SIDE_TOO_LARGE: &str = "at most 65535 pixels per side";
const AREA_TOO_LARGE: &str = "at most 268435456 pixels in total";

/// One of the four cells. Index `i` sits at column `i % 2`, row `i / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSlot {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl GridSlot {
    pub const ALL: [GridSlot; SLOT_COUNT] = [
        GridSlot::TopLeft,
        GridSlot::TopRight,
        GridSlot::BottomLeft,
        GridSlot::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            GridSlot::TopLeft => 0,
            GridSlot::TopRight => 1,
            GridSlot::BottomLeft => 2,
            GridSlot::BottomRight => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn column(self) -> u32 {
        (self.index() % 2) as u32
    }

    pub fn row(self) -> u32 {
        (self.index() / 2) as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            GridSlot::TopLeft => "top-left",
            GridSlot::TopRight => "top-right",
            GridSlot::BottomLeft => "bottom-left",
            GridSlot::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for GridSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridSlot {
    type Err = String;

    /// Accepts the slot names (`top-left`, …) or a bare index `0..3`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if let Some(slot) = Self::ALL.iter().find(|slot| slot.name() == lowered) {
            return Ok(*slot);
        }
        lowered
            .parse::<usize>()
            .ok()
            .and_then(Self::from_index)
            .ok_or_else(|| format!("unknown slot '{}'", s))
    }
}

/// Validated output resolution. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize {
    width: u32,
    height: u32,
}

impl Default for ExportSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_EXPORT_DIMENSION,
            height: DEFAULT_EXPORT_DIMENSION,
        }
    }
}

impl ExportSize {
    /// Accepts sizes whose canvas can actually be allocated: both sides in
    /// `1..=MAX_EXPORT_DIMENSION` and at most `MAX_EXPORT_PIXELS` in total.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_side("width", width)?;
        check_side("height", height)?;

        let invalid_area = || CombineError::InvalidDimension {
            field: "size",
            value: format!("{}x{}", width, height),
            reason: AREA_TOO_LARGE,
        };
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .filter(|p| *p <= MAX_EXPORT_PIXELS)
            .ok_or_else(invalid_area)?;
        // Buffer length must also fit the platform's usize.
        pixels
            .checked_mul(4)
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(invalid_area)?;

        Ok(Self { width, height })
    }

    /// Parse the two free-text fields. Surrounding whitespace is tolerated;
    /// anything else that is not a positive integer is rejected.
    pub fn parse(width: &str, height: &str) -> Result<Self> {
        Self::new(
            parse_dimension("width", width)?,
            parse_dimension("height", height)?,
        )
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Size of one quadrant. Floor division: odd sizes leave the last
    /// column/row of the composite uncovered.
    pub fn quadrant(self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Top-left corner of the quadrant a slot maps to.
    pub fn quadrant_origin(self, slot: GridSlot) -> (u32, u32) {
        let (qw, qh) = self.quadrant();
        (slot.column() * qw, slot.row() * qh)
    }
}

fn check_side(field: &'static str, value: u32) -> Result<()> {
    let reason = match value {
        0 => NOT_A_NUMBER,
        v if v > MAX_EXPORT_DIMENSION => SIDE_TOO_LARGE,
        _ => return Ok(()),
    };
    Err(CombineError::InvalidDimension {
        field,
        value: value.to_string(),
        reason,
    })
}

fn parse_dimension(field: &'static str, text: &str) -> Result<u32> {
    let invalid = |reason| CombineError::InvalidDimension {
        field,
        value: text.to_string(),
        reason,
    };
    let value: i64 = text.trim().parse().map_err(|_| invalid(NOT_A_NUMBER))?;
    if value <= 0 {
        return Err(invalid(NOT_A_NUMBER));
    }
    let value = u32::try_from(value).map_err(|_| invalid(SIDE_TOO_LARGE))?;
    if value > MAX_EXPORT_DIMENSION {
        return Err(invalid(SIDE_TOO_LARGE));
    }
    Ok(value)
}
