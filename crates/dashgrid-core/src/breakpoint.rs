//! Breakpoint tiers and the static width/column configuration tables.
//!
//! A [`Breakpoint`] names one of four viewport tiers. [`BreakpointTable`]
//! classifies a viewport width into a tier, and [`ColumnTable`] maps a tier
//! to its grid column count. Both are supplied to the orchestrator as
//! configuration; the grid engine never derives them itself.
//!
//! # Usage
//!
//! ```
//! use dashgrid_core::{Breakpoint, BreakpointTable, ColumnTable};
//!
//! let bps = BreakpointTable::DEFAULT;
//! assert_eq!(bps.classify_width(1400), Breakpoint::Lg);
//! assert_eq!(bps.classify_width(400), Breakpoint::Xs);
//!
//! let cols = ColumnTable::DEFAULT;
//! assert_eq!(cols.cols_for(Breakpoint::Lg), 3);
//! assert_eq!(cols.cols_for(Breakpoint::Xs), 1);
//! ```
//!
//! # Invariants
//!
//! 1. `Xs` matches every width below the `Sm` threshold; classification
//!    never fails.
//! 2. Thresholds are non-decreasing from `Sm` to `Lg` (enforced by
//!    [`BreakpointTable::new`] via clamping).
//! 3. Column counts are at least 1.

use serde::{Deserialize, Serialize};

/// Viewport tier, smallest to largest.
///
/// Serialized as its lowercase label, which doubles as the key of a
/// per-breakpoint layout map on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Extra-small: phones.
    Xs = 0,
    /// Small: portrait tablets.
    Sm = 1,
    /// Medium: landscape tablets, small laptops.
    Md = 2,
    /// Large: desktops.
    Lg = 3,
}

impl Breakpoint {
    /// All tiers, smallest first.
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
    ];

    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Width thresholds
// ---------------------------------------------------------------------------

/// Minimum viewport width (pixels) for each tier above `Xs`.
///
/// `Xs` implicitly starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointTable {
    /// Minimum width for `Sm`.
    pub sm: u32,
    /// Minimum width for `Md`.
    pub md: u32,
    /// Minimum width for `Lg`.
    pub lg: u32,
}

impl BreakpointTable {
    /// Default thresholds (768/996/1200).
    pub const DEFAULT: Self = Self {
        sm: 768,
        md: 996,
        lg: 1200,
    };

    /// Create a threshold table, clamping to keep thresholds non-decreasing.
    #[must_use]
    pub const fn new(sm: u32, md: u32, lg: u32) -> Self {
        let md = if md < sm { sm } else { md };
        let lg = if lg < md { md } else { lg };
        Self { sm, md, lg }
    }

    /// Classify a viewport width into a tier. Never fails.
    #[must_use]
    pub const fn classify_width(&self, width: u32) -> Breakpoint {
        if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else if width >= self.sm {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    /// The minimum width for a given tier.
    #[must_use]
    pub const fn min_width(&self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
        }
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Column counts
// ---------------------------------------------------------------------------

/// Grid column count per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTable {
    /// Counts indexed by `Breakpoint` ordinal (0=Xs .. 3=Lg).
    counts: [u32; 4],
}

impl ColumnTable {
    /// Default column counts: 1 column on `Xs`, 3 everywhere else.
    pub const DEFAULT: Self = Self {
        counts: [1, 3, 3, 3],
    };

    /// Create a column table. Counts are raised to at least 1.
    #[must_use]
    pub const fn new(xs: u32, sm: u32, md: u32, lg: u32) -> Self {
        const fn at_least_one(n: u32) -> u32 {
            if n == 0 { 1 } else { n }
        }
        Self {
            counts: [
                at_least_one(xs),
                at_least_one(sm),
                at_least_one(md),
                at_least_one(lg),
            ],
        }
    }

    /// Column count for a tier.
    #[must_use]
    pub const fn cols_for(&self, bp: Breakpoint) -> u32 {
        self.counts[bp as usize]
    }
}

impl Default for ColumnTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_default_thresholds() {
        let t = BreakpointTable::DEFAULT;
        assert_eq!(t.classify_width(0), Breakpoint::Xs);
        assert_eq!(t.classify_width(767), Breakpoint::Xs);
        assert_eq!(t.classify_width(768), Breakpoint::Sm);
        assert_eq!(t.classify_width(996), Breakpoint::Md);
        assert_eq!(t.classify_width(1199), Breakpoint::Md);
        assert_eq!(t.classify_width(1200), Breakpoint::Lg);
        assert_eq!(t.classify_width(3840), Breakpoint::Lg);
    }

    #[test]
    fn new_clamps_unordered_thresholds() {
        let t = BreakpointTable::new(800, 700, 600);
        assert_eq!(t.sm, 800);
        assert_eq!(t.md, 800);
        assert_eq!(t.lg, 800);
    }

    #[test]
    fn min_width_per_tier() {
        let t = BreakpointTable::new(500, 900, 1300);
        assert_eq!(t.min_width(Breakpoint::Xs), 0);
        assert_eq!(t.min_width(Breakpoint::Sm), 500);
        assert_eq!(t.min_width(Breakpoint::Md), 900);
        assert_eq!(t.min_width(Breakpoint::Lg), 1300);
    }

    #[test]
    fn column_table_defaults() {
        let c = ColumnTable::DEFAULT;
        assert_eq!(c.cols_for(Breakpoint::Xs), 1);
        assert_eq!(c.cols_for(Breakpoint::Sm), 3);
        assert_eq!(c.cols_for(Breakpoint::Md), 3);
        assert_eq!(c.cols_for(Breakpoint::Lg), 3);
    }

    #[test]
    fn column_table_zero_is_raised() {
        let c = ColumnTable::new(0, 2, 4, 12);
        assert_eq!(c.cols_for(Breakpoint::Xs), 1);
        assert_eq!(c.cols_for(Breakpoint::Lg), 12);
    }

    #[test]
    fn ordering_follows_size() {
        assert!(Breakpoint::Xs < Breakpoint::Sm);
        assert!(Breakpoint::Md < Breakpoint::Lg);
    }

    #[test]
    fn labels_and_display() {
        assert_eq!(Breakpoint::Xs.label(), "xs");
        assert_eq!(format!("{}", Breakpoint::Lg), "lg");
    }

    #[test]
    fn serde_lowercase_labels() {
        let json = serde_json::to_string(&Breakpoint::Md).unwrap();
        assert_eq!(json, "\"md\"");
        let back: Breakpoint = serde_json::from_str("\"xs\"").unwrap();
        assert_eq!(back, Breakpoint::Xs);
    }

    #[test]
    fn serde_as_map_key() {
        use std::collections::BTreeMap;
        let mut map: BTreeMap<Breakpoint, u32> = BTreeMap::new();
        map.insert(Breakpoint::Lg, 3);
        map.insert(Breakpoint::Xs, 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"xs":1,"lg":3}"#);
        let back: BTreeMap<Breakpoint, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
