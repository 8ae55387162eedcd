#![forbid(unsafe_code)]

//! Grid geometry primitives and layout stabilization for dashboard grids.
//!
//! This crate is the pure half of dashgrid: rectangle records on an integer
//! cell grid, breakpoint classification, and the stabilization passes that
//! restore the no-overlap invariant after user interaction (gap detection,
//! vertical compaction, dimension optimization, snap-to-grid, auto-fill).
//!
//! Everything here is deterministic and side-effect free. Malformed input is
//! normalized, never rejected: items with non-positive size are treated as
//! zero-area, constraint-violating sizes are clamped on the next pass.
//!
//! The stateful side (widget catalog, presets, persistence, orchestration)
//! lives in `dashgrid-runtime`.

pub mod arrange;
pub mod breakpoint;
pub mod cache;
pub mod item;

pub use arrange::{auto_arrange, auto_fill, find_optimal_dimensions, has_gaps, snap_to_grid};
pub use breakpoint::{Breakpoint, BreakpointTable, ColumnTable};
pub use cache::GeometryCache;
pub use item::{Layout, LayoutItem};
