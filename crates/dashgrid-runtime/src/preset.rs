//! Curated dashboard presets.
//!
//! A preset names a set of widgets and, optionally, a hand-tuned layout for
//! every breakpoint. Presets without explicit geometry get one synthesized
//! from catalog spans via [`synthesize_layouts`].

use dashgrid_core::{Breakpoint, ColumnTable, Layout, LayoutItem};

use crate::catalog::WidgetCatalog;
use crate::state::LayoutSet;

/// A named widget selection with optional hand-tuned geometry.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description for the preset picker.
    pub description: String,
    /// Widgets the preset shows, in synthesis order.
    pub widget_ids: Vec<String>,
    /// Explicit per-breakpoint geometry; `None` means synthesize.
    pub layouts: Option<LayoutSet>,
}

impl Preset {
    /// Resolve this preset's geometry: the hand-tuned layouts when present,
    /// otherwise a synthesized set.
    #[must_use]
    pub fn resolve_layouts(&self, catalog: &WidgetCatalog, columns: &ColumnTable) -> LayoutSet {
        match &self.layouts {
            Some(layouts) => layouts.clone(),
            None => synthesize_layouts(&self.widget_ids, catalog, columns),
        }
    }
}

/// Generate a per-breakpoint layout for a widget list.
///
/// Widgets flow left-to-right, top-to-bottom in list order. Wide widgets
/// keep their preferred column span except on the single-column breakpoint,
/// where everything stacks at full width. Heights default to two rows per
/// row span so cards have room to render. Ids unknown to the catalog are
/// skipped.
#[must_use]
pub fn synthesize_layouts(
    widget_ids: &[String],
    catalog: &WidgetCatalog,
    columns: &ColumnTable,
) -> LayoutSet {
    let mut set = LayoutSet::new();
    for &bp in &Breakpoint::ALL {
        let cols = columns.cols_for(bp);
        let mut layout = Layout::new();
        for (index, id) in widget_ids.iter().enumerate() {
            let Some(entry) = catalog.get(id) else {
                continue;
            };
            let row = (index as u32 / cols) as f64;
            let col = (index as u32 % cols) as f64;
            let width = if entry.col_span > 1 && bp != Breakpoint::Xs {
                f64::from(entry.col_span.min(cols))
            } else {
                1.0
            };
            let height = f64::from(entry.row_span.max(1));
            let x = if bp == Breakpoint::Xs { 0.0 } else { col };
            layout.push(
                LayoutItem::new(id.clone(), x, row * height, width, height * 2.0)
                    .min_size(1.0, 2.0),
            );
        }
        set.insert(bp, layout);
    }
    set
}

/// The shipped preset gallery.
///
/// `standard` and `day-trader` carry hand-tuned geometry; the rest are
/// synthesized from their widget lists at apply time.
#[must_use]
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "standard".to_string(),
            name: "Standard Dashboard".to_string(),
            description: "A balanced dashboard with all key market components".to_string(),
            widget_ids: ids(&[
                "market-overview",
                "token-search",
                "price-chart",
                "news-feed",
                "top-movers",
                "watchlist",
                "alerts",
            ]),
            layouts: Some(standard_layouts()),
        },
        Preset {
            id: "day-trader".to_string(),
            name: "Day Trader".to_string(),
            description: "Focused on short-term price movements and high-frequency trading"
                .to_string(),
            widget_ids: ids(&[
                "price-chart",
                "top-movers",
                "volume-volatility",
                "market-overview",
                "token-search",
                "alerts",
            ]),
            layouts: Some(day_trader_layouts()),
        },
        Preset {
            id: "swing-trader".to_string(),
            name: "Swing Trader".to_string(),
            description: "Optimized for medium-term trades based on market trends".to_string(),
            widget_ids: ids(&[
                "price-chart",
                "market-overview",
                "news-feed",
                "discussion-trends",
                "watchlist",
                "economic-calendar",
            ]),
            layouts: None,
        },
        Preset {
            id: "investor".to_string(),
            name: "Long-Term Investor".to_string(),
            description: "Focus on fundamental analysis and long-term market trends".to_string(),
            widget_ids: ids(&[
                "market-overview",
                "stock-financials",
                "watchlist",
                "portfolio-snapshot",
                "economic-calendar",
                "news-feed",
                "ai-insights",
            ]),
            layouts: None,
        },
        Preset {
            id: "crypto-analyst".to_string(),
            name: "Crypto Analyst".to_string(),
            description: "Deep dive into cryptocurrency metrics and social signals".to_string(),
            widget_ids: ids(&[
                "token-search",
                "market-overview",
                "price-chart",
                "volume-volatility",
                "discussion-trends",
            ]),
            layouts: None,
        },
        Preset {
            id: "minimal".to_string(),
            name: "Minimal View".to_string(),
            description: "A streamlined dashboard with just the essential components".to_string(),
            widget_ids: ids(&[
                "market-overview",
                "price-chart",
                "token-search",
                "top-movers",
                "watchlist",
            ]),
            layouts: None,
        },
    ]
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

fn item(id: &str, x: f64, y: f64, w: f64, h: f64, min_h: f64) -> LayoutItem {
    LayoutItem::new(id, x, y, w, h).min_size(1.0, min_h)
}

fn standard_layouts() -> LayoutSet {
    let wide = vec![
        item("market-overview", 0.0, 0.0, 2.0, 3.0, 2.0),
        item("token-search", 2.0, 0.0, 1.0, 2.0, 2.0),
        item("price-chart", 0.0, 3.0, 2.0, 4.0, 3.0),
        item("news-feed", 2.0, 2.0, 1.0, 3.0, 2.0),
        item("top-movers", 0.0, 7.0, 1.0, 2.0, 2.0),
        item("watchlist", 0.0, 9.0, 2.0, 3.0, 2.0),
        item("alerts", 2.0, 6.0, 1.0, 2.0, 2.0),
    ];
    let stacked_rows = [
        ("market-overview", 3.0, 2.0),
        ("token-search", 2.0, 2.0),
        ("price-chart", 4.0, 3.0),
        ("news-feed", 3.0, 2.0),
        ("top-movers", 2.0, 2.0),
        ("watchlist", 3.0, 2.0),
        ("alerts", 2.0, 2.0),
    ];
    layout_set(wide, &stacked_rows)
}

fn day_trader_layouts() -> LayoutSet {
    let wide = vec![
        item("price-chart", 0.0, 0.0, 2.0, 4.0, 3.0),
        item("top-movers", 2.0, 0.0, 1.0, 2.0, 2.0),
        item("volume-volatility", 2.0, 2.0, 1.0, 2.0, 2.0),
        item("market-overview", 0.0, 4.0, 2.0, 3.0, 2.0),
        item("token-search", 0.0, 7.0, 1.0, 2.0, 2.0),
        item("alerts", 1.0, 7.0, 2.0, 2.0, 2.0),
    ];
    let stacked_rows = [
        ("price-chart", 4.0, 3.0),
        ("top-movers", 2.0, 2.0),
        ("volume-volatility", 2.0, 2.0),
        ("market-overview", 3.0, 2.0),
        ("token-search", 2.0, 2.0),
        ("alerts", 2.0, 2.0),
    ];
    layout_set(wide, &stacked_rows)
}

/// Assemble the four breakpoint layouts: the wide layout for lg and md, a
/// full-width stack for sm, and a single-column stack for xs.
fn layout_set(wide: Layout, stacked_rows: &[(&str, f64, f64)]) -> LayoutSet {
    let mut set = LayoutSet::new();
    set.insert(Breakpoint::Lg, wide.clone());
    set.insert(Breakpoint::Md, wide);
    set.insert(Breakpoint::Sm, stacked(stacked_rows, 3.0));
    set.insert(Breakpoint::Xs, stacked(stacked_rows, 1.0));
    set
}

fn stacked(rows: &[(&str, f64, f64)], width: f64) -> Layout {
    let mut y = 0.0;
    rows.iter()
        .map(|&(id, h, min_h)| {
            let placed = item(id, 0.0, y, width, h, min_h);
            y += h;
            placed
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::has_gaps;

    fn fixtures() -> (WidgetCatalog, ColumnTable) {
        (WidgetCatalog::builtin(), ColumnTable::DEFAULT)
    }

    #[test]
    fn gallery_ids_are_unique() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 6);
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn every_preset_widget_exists_in_catalog() {
        let (catalog, _) = fixtures();
        for preset in builtin_presets() {
            for id in &preset.widget_ids {
                assert!(catalog.contains(id), "unknown widget {id} in {}", preset.id);
            }
        }
    }

    #[test]
    fn hand_tuned_layouts_cover_every_breakpoint_and_widget() {
        for preset in builtin_presets() {
            let Some(layouts) = &preset.layouts else {
                continue;
            };
            for &bp in &Breakpoint::ALL {
                let layout = layouts.get(&bp).unwrap();
                assert_eq!(layout.len(), preset.widget_ids.len(), "{} at {bp}", preset.id);
                for id in &preset.widget_ids {
                    assert!(layout.iter().any(|item| &item.id == id));
                }
            }
        }
    }

    #[test]
    fn hand_tuned_layouts_have_no_overlaps() {
        for preset in builtin_presets() {
            let Some(layouts) = &preset.layouts else {
                continue;
            };
            for (bp, layout) in layouts {
                for (i, a) in layout.iter().enumerate() {
                    for b in &layout[i + 1..] {
                        assert!(!a.overlaps(b), "{} {bp}: {} overlaps {}", preset.id, a.id, b.id);
                    }
                }
            }
        }
    }

    #[test]
    fn stacked_breakpoints_are_gap_free() {
        for preset in builtin_presets() {
            let Some(layouts) = &preset.layouts else {
                continue;
            };
            assert!(!has_gaps(&layouts[&Breakpoint::Sm], 3), "{}", preset.id);
            assert!(!has_gaps(&layouts[&Breakpoint::Xs], 1), "{}", preset.id);
        }
    }

    #[test]
    fn synthesized_layouts_stack_on_xs() {
        let (catalog, columns) = fixtures();
        let ids = ids(&["market-overview", "token-search", "price-chart"]);
        let set = synthesize_layouts(&ids, &catalog, &columns);
        let xs = &set[&Breakpoint::Xs];
        assert!(xs.iter().all(|item| item.x == 0.0 && item.w == 1.0));
    }

    #[test]
    fn synthesized_wide_widgets_keep_span_on_lg() {
        let (catalog, columns) = fixtures();
        let ids = ids(&["market-overview", "token-search"]);
        let set = synthesize_layouts(&ids, &catalog, &columns);
        let lg = &set[&Breakpoint::Lg];
        let overview = lg.iter().find(|i| i.id == "market-overview").unwrap();
        assert_eq!(overview.w, 2.0);
        assert_eq!(overview.h, 2.0);
        assert_eq!(overview.min_h, Some(2.0));
    }

    #[test]
    fn synthesized_layouts_skip_unknown_ids() {
        let (catalog, columns) = fixtures();
        let ids = ids(&["market-overview", "retired-widget"]);
        let set = synthesize_layouts(&ids, &catalog, &columns);
        assert_eq!(set[&Breakpoint::Lg].len(), 1);
    }

    #[test]
    fn resolve_prefers_hand_tuned_geometry() {
        let (catalog, columns) = fixtures();
        let presets = builtin_presets();
        let standard = presets.iter().find(|p| p.id == "standard").unwrap();
        let resolved = standard.resolve_layouts(&catalog, &columns);
        assert_eq!(&resolved, standard.layouts.as_ref().unwrap());

        let minimal = presets.iter().find(|p| p.id == "minimal").unwrap();
        let resolved = minimal.resolve_layouts(&catalog, &columns);
        assert_eq!(
            resolved,
            synthesize_layouts(&minimal.widget_ids, &catalog, &columns)
        );
    }
}
