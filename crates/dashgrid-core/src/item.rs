//! Layout item records: one widget's placement on a breakpoint's grid.
//!
//! Coordinates are grid cells, not pixels, with the origin at the top-left.
//! Positions and sizes are carried as `f64` because drag interactions arrive
//! from pixel space with fractional values; [`snap_to_grid`] integerizes them.
//!
//! # Invariants
//!
//! 1. Within one breakpoint's item set, no two items may overlap after a
//!    stabilization pass. User moves are allowed to break this; the engine's
//!    job is to restore it.
//! 2. Effective size constraints default to `min = 1`, `max = unbounded`.
//! 3. An item with non-positive width or height is zero-area and is ignored
//!    by the gap detector.
//!
//! [`snap_to_grid`]: crate::arrange::snap_to_grid

use serde::{Deserialize, Serialize};

/// One breakpoint's ordered item collection.
pub type Layout = Vec<LayoutItem>;

/// A widget's placement rectangle plus its size constraints.
///
/// The wire names (`i`, `minW`, `static`, ...) match the persisted layout
/// format so saved state from earlier builds keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Stable widget identifier, unique within a breakpoint's item set.
    #[serde(rename = "i")]
    pub id: String,
    /// Left edge in grid cells.
    pub x: f64,
    /// Top edge in grid cells.
    pub y: f64,
    /// Width in grid cells.
    pub w: f64,
    /// Height in grid cells.
    pub h: f64,
    /// Minimum width; effective default is 1.
    #[serde(rename = "minW", default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<f64>,
    /// Minimum height; effective default is 1.
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<f64>,
    /// Maximum width; unbounded when unset.
    #[serde(rename = "maxW", default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<f64>,
    /// Maximum height; unbounded when unset.
    #[serde(rename = "maxH", default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<f64>,
    /// Immovable and unresizable by user interaction or stabilization.
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl LayoutItem {
    /// Create an item with no explicit constraints.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            max_w: None,
            max_h: None,
            is_static: false,
        }
    }

    /// Set the minimum size (builder pattern).
    #[must_use]
    pub fn min_size(mut self, min_w: f64, min_h: f64) -> Self {
        self.min_w = Some(min_w);
        self.min_h = Some(min_h);
        self
    }

    /// Set the maximum size (builder pattern).
    #[must_use]
    pub fn max_size(mut self, max_w: f64, max_h: f64) -> Self {
        self.max_w = Some(max_w);
        self.max_h = Some(max_h);
        self
    }

    /// Mark the item immovable and unresizable (builder pattern).
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.is_static = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Effective constraints
// ---------------------------------------------------------------------------

impl LayoutItem {
    /// Effective minimum width (declared, else 1).
    #[must_use]
    pub fn min_width(&self) -> f64 {
        self.min_w.unwrap_or(1.0).max(1.0)
    }

    /// Effective minimum height (declared, else 1).
    #[must_use]
    pub fn min_height(&self) -> f64 {
        self.min_h.unwrap_or(1.0).max(1.0)
    }

    /// Effective maximum width (declared, else unbounded).
    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.max_w.unwrap_or(f64::INFINITY)
    }

    /// Effective maximum height (declared, else unbounded).
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.max_h.unwrap_or(f64::INFINITY)
    }

    /// Clamp a candidate width into the item's effective bounds.
    #[must_use]
    pub fn clamp_width(&self, w: f64) -> f64 {
        w.min(self.max_width()).max(self.min_width())
    }

    /// Clamp a candidate height into the item's effective bounds.
    #[must_use]
    pub fn clamp_height(&self, h: f64) -> f64 {
        h.min(self.max_height()).max(self.min_height())
    }
}

// ---------------------------------------------------------------------------
// Geometry queries
// ---------------------------------------------------------------------------

impl LayoutItem {
    /// Right edge (`x + w`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether the item has non-positive area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Whether the x-ranges of two items overlap.
    #[must_use]
    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Whether the y-ranges of two items overlap.
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Self) -> bool {
        self.y < other.bottom() && self.bottom() > other.y
    }

    /// Whether two item rectangles overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_horizontally(other) && self.overlaps_vertically(other)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
