//! Layout stabilization passes: gap detection, vertical compaction,
//! dimension optimization, snap-to-grid, and auto-fill.
//!
//! All passes are pure functions over an item slice. They never fail:
//! malformed geometry is normalized (zero-area items ignored, sizes clamped
//! into their declared bounds) rather than rejected.
//!
//! # Usage
//!
//! ```
//! use dashgrid_core::{LayoutItem, auto_arrange, has_gaps};
//!
//! let layout = vec![
//!     LayoutItem::new("a", 0.0, 0.0, 3.0, 1.0),
//!     LayoutItem::new("b", 0.0, 5.0, 3.0, 1.0),
//! ];
//! assert!(has_gaps(&layout, 3));
//!
//! let arranged = auto_arrange(&layout, 3);
//! assert_eq!(arranged[1].y, 1.0);
//! assert!(!has_gaps(&arranged, 3));
//! ```
//!
//! # Invariants
//!
//! 1. [`auto_arrange`] output has no overlapping items and is idempotent.
//! 2. [`snap_to_grid`] is a no-op on already-integer input.
//! 3. Every pass preserves `min <= size <= max` for each item's effective
//!    constraints.
//! 4. Items flagged static are treated as obstacles: never moved, never
//!    resized.
//!
//! # Failure Modes
//!
//! None. Column counts of 0 are treated as 1; a missing or nonsensical
//! configuration entry is the caller's bug, not handled here.

use crate::item::{Layout, LayoutItem};

// ---------------------------------------------------------------------------
// Gap detection
// ---------------------------------------------------------------------------

/// Whether vertical compaction could reclaim empty space.
///
/// Builds a logical occupancy grid over `[0, cols) x [0, max_row_used)` and
/// reports true iff some column has an unoccupied cell strictly between its
/// topmost and bottom-most occupied cells. Such a hole is exactly the space
/// a compaction pass can remove; empty columns and space trailing below a
/// column's last item are not reclaimable and are not gaps.
///
/// Item order does not affect the result. Zero-area items are ignored.
#[must_use]
pub fn has_gaps(layout: &[LayoutItem], cols: u32) -> bool {
    let cols = cols.max(1) as usize;
    let cells: Vec<CellBounds> = layout
        .iter()
        .filter(|it| !it.is_degenerate())
        .map(|it| CellBounds::of(it, cols))
        .collect();

    let max_row = cells.iter().map(|c| c.row_end).max().unwrap_or(0);
    if max_row == 0 {
        return false;
    }

    let mut grid = vec![false; cols * max_row];
    for c in &cells {
        for row in c.row_start..c.row_end {
            for col in c.col_start..c.col_end {
                grid[row * cols + col] = true;
            }
        }
    }

    for col in 0..cols {
        let occupied = |row: usize| grid[row * cols + col];
        let Some(top) = (0..max_row).find(|&r| occupied(r)) else {
            continue;
        };
        let Some(bottom) = (0..max_row).rfind(|&r| occupied(r)) else {
            continue;
        };
        if ((top + 1)..bottom).any(|r| !occupied(r)) {
            return true;
        }
    }
    false
}

/// Integer cell coverage of an item, clamped to the column range.
struct CellBounds {
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
}

impl CellBounds {
    fn of(item: &LayoutItem, cols: usize) -> Self {
        let col_start = item.x.max(0.0).floor() as usize;
        let col_end = (item.right().ceil().max(0.0) as usize).min(cols);
        let row_start = item.y.max(0.0).floor() as usize;
        let row_end = item.bottom().ceil().max(0.0) as usize;
        Self {
            col_start: col_start.min(col_end),
            col_end,
            row_start: row_start.min(row_end),
            row_end,
        }
    }
}

// ---------------------------------------------------------------------------
// Vertical compaction
// ---------------------------------------------------------------------------

/// Pull every item upward as far as it can go without overlap.
///
/// Static items enter the placed set first: they are obstacles for every
/// non-static item, including ones that sort before them. Non-static items
/// are then placed in (y, x) order, ties broken by original index, so the
/// result is deterministic. Each rises one row at a time while the
/// destination is free of already-placed items, then — if its starting
/// position itself collided — is pushed below the collision. Output keeps
/// the input's item order.
///
/// Sizes and positions are normalized first: width/height clamped into the
/// item's effective bounds, x clamped into `[0, cols - w]`, y raised to 0.
/// Static items keep their exact position and size.
///
/// The pass is idempotent and its output contains no overlapping items
/// (provided no two static items overlap in the input; the engine never
/// moves those).
#[must_use]
pub fn auto_arrange(layout: &[LayoutItem], cols: u32) -> Layout {
    let cols = cols.max(1) as f64;
    let mut items: Vec<LayoutItem> = layout.to_vec();
    for it in &mut items {
        if !it.is_static {
            normalize(it, cols);
        }
    }

    let mut placed: Vec<LayoutItem> = items.iter().filter(|it| it.is_static).cloned().collect();

    let mut order: Vec<usize> = (0..items.len()).filter(|&i| !items[i].is_static).collect();
    // Stable sort: equal (y, x) keeps original index order.
    order.sort_by(|&a, &b| {
        items[a]
            .y
            .total_cmp(&items[b].y)
            .then(items[a].x.total_cmp(&items[b].x))
    });

    for &idx in &order {
        let mut item = items[idx].clone();
        // Gravity: rise while the next row up is free.
        while item.y >= 1.0 {
            let candidate = LayoutItem {
                y: item.y - 1.0,
                ..item.clone()
            };
            if placed.iter().any(|p| p.overlaps(&candidate)) {
                break;
            }
            item.y = candidate.y;
        }
        // The starting position may itself have collided (a drag dropped
        // the item onto a neighbor or a static obstacle). Each step below
        // a collision strictly increases y, so this terminates.
        while let Some(hit) = placed.iter().find(|p| p.overlaps(&item)) {
            item.y = hit.bottom();
        }
        placed.push(item.clone());
        items[idx] = item;
    }
    items
}

/// Clamp an item's geometry into its constraints and the column range.
fn normalize(item: &mut LayoutItem, cols: f64) {
    item.w = item.clamp_width(item.w);
    item.h = item.clamp_height(item.h);
    item.y = item.y.max(0.0);
    if item.w <= cols {
        item.x = item.x.clamp(0.0, cols - item.w);
    } else {
        item.x = 0.0;
    }
}

// ---------------------------------------------------------------------------
// Dimension optimization
// ---------------------------------------------------------------------------

/// The largest size a freshly moved item can claim without collision.
///
/// Width grows rightward to the nearest blocking left-edge among items that
/// vertically overlap the item (never shrinking below the current width);
/// height then shrinks or keeps to the nearest item below whose x-range
/// overlaps the widened item. Both results are clamped into the item's
/// effective bounds.
///
/// Supports "auto-grow to fill empty space" after a drag: an item dropped
/// into open space expands to use it, subject to not colliding.
#[must_use]
pub fn find_optimal_dimensions(layout: &[LayoutItem], item: &LayoutItem, cols: u32) -> (f64, f64) {
    let cols = cols.max(1) as f64;
    let mut width = item.w;
    let mut height = item.h;

    let mut max_possible = cols - item.x;
    for other in layout {
        if other.id == item.id {
            continue;
        }
        let vertically_adjacent = other.y < item.bottom() && other.bottom() > item.y;
        if vertically_adjacent && other.x > item.x && other.x < item.x + max_possible {
            max_possible = max_possible.min(other.x - item.x);
        }
    }
    if max_possible > width {
        width = max_possible;
    }

    let mut next_row = f64::INFINITY;
    for other in layout {
        if other.id == item.id {
            continue;
        }
        if other.y > item.y && other.x < item.x + width && other.right() > item.x {
            next_row = next_row.min(other.y);
        }
    }
    if next_row.is_finite() {
        height = next_row - item.y;
    }

    (item.clamp_width(width), item.clamp_height(height))
}

// ---------------------------------------------------------------------------
// Snap-to-grid
// ---------------------------------------------------------------------------

/// Round every item to whole grid cells.
///
/// Positions round to the nearest cell; sizes round and are re-clamped to a
/// minimum of 1 cell. Idempotent: integer input passes through unchanged.
#[must_use]
pub fn snap_to_grid(layout: &[LayoutItem]) -> Layout {
    layout
        .iter()
        .map(|it| LayoutItem {
            x: it.x.round(),
            y: it.y.round(),
            w: it.w.round().max(1.0),
            h: it.h.round().max(1.0),
            ..it.clone()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Auto-fill
// ---------------------------------------------------------------------------

/// Expand each row's trailing item into the empty columns after it.
///
/// An item grows only when nothing in its row span sits to its right, and
/// only up to its effective maximum width. Lower priority than compaction;
/// the orchestrator applies this last, and only when explicitly enabled.
#[must_use]
pub fn auto_fill(layout: &[LayoutItem], cols: u32) -> Layout {
    let cols = cols.max(1) as f64;
    let mut out: Layout = layout.to_vec();
    for i in 0..out.len() {
        let item = &out[i];
        if item.is_static || item.is_degenerate() {
            continue;
        }
        let trailing = !layout.iter().enumerate().any(|(j, other)| {
            j != i && !other.is_degenerate() && other.overlaps_vertically(item) && other.x > item.x
        });
        if !trailing {
            continue;
        }
        let grown = item.clamp_width(cols - item.x);
        if grown > out[i].w {
            out[i].w = grown;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
