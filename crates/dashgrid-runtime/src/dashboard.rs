//! The dashboard orchestrator.
//!
//! [`Dashboard`] owns everything above raw geometry: the widget catalog, the
//! preset gallery, per-breakpoint layout state, the arrangement cache, and
//! the debounced persistence writer. Interaction handlers (`drag_stop`,
//! `resize_stop`, `apply_preset`, `toggle_widget`) run the stabilization
//! pipeline synchronously and schedule a persistence write; the host drives
//! the writer by calling [`tick`](Dashboard::tick) from its event loop and
//! [`flush`](Dashboard::flush) on shutdown.
//!
//! # Usage
//!
//! ```
//! use std::time::Instant;
//! use dashgrid_runtime::{Dashboard, DashboardConfig, MemoryStore};
//!
//! let mut dash = Dashboard::new(DashboardConfig::default(), MemoryStore::new());
//! dash.set_viewport_width(1400.0);
//! let layout = dash.current_layout().clone();
//! dash.drag_stop(layout, "price-chart", Instant::now());
//! dash.flush();
//! ```
//!
//! # Invariants
//!
//! After any interaction handler returns, the active layout is snapped,
//! overlap-free, and compacted (per the configured passes), and a write is
//! armed. Corrupt or missing persisted state never fails construction; the
//! dashboard falls back to the standard preset.

use std::mem;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use dashgrid_core::{
    Breakpoint, BreakpointTable, ColumnTable, GeometryCache, Layout, LayoutItem, auto_arrange,
    auto_fill, find_optimal_dimensions, has_gaps, snap_to_grid,
};

use crate::catalog::WidgetCatalog;
use crate::debounce::{DEFAULT_QUIET_WINDOW, DebouncedWriter};
use crate::persist::{PersistError, StateStore};
use crate::preset::{Preset, builtin_presets};
use crate::state::{
    DashboardState, LAYOUTS_KEY, WIDGETS_KEY, decode_layouts, decode_widgets, encode_layouts,
    encode_widgets,
};

/// Which stabilization passes run and how the grid is shaped.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Viewport-width thresholds for breakpoint classification.
    pub breakpoints: BreakpointTable,
    /// Column count per breakpoint.
    pub columns: ColumnTable,
    /// Round dropped items to whole cells.
    pub snap_to_grid: bool,
    /// Grow a dropped item into adjacent free space.
    pub auto_size: bool,
    /// Compact the layout upward after every change.
    pub auto_arrange: bool,
    /// Stretch trailing items to the row end.
    pub auto_fill: bool,
    /// Report reclaimable gaps via [`Dashboard::has_gaps`].
    pub gap_detection: bool,
    /// Quiet window before persisted writes.
    pub quiet_window: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::DEFAULT,
            columns: ColumnTable::DEFAULT,
            snap_to_grid: true,
            auto_size: true,
            auto_arrange: true,
            auto_fill: false,
            gap_detection: true,
            quiet_window: DEFAULT_QUIET_WINDOW,
        }
    }
}

/// Called after every committed state change.
pub type ChangeListener = Box<dyn FnMut(&DashboardState)>;

/// The stateful dashboard driving `dashgrid-core` geometry.
pub struct Dashboard<S: StateStore> {
    config: DashboardConfig,
    catalog: WidgetCatalog,
    presets: Vec<Preset>,
    store: S,
    state: DashboardState,
    breakpoint: Breakpoint,
    active_preset: Option<String>,
    cache: GeometryCache,
    writer: DebouncedWriter,
    listeners: Vec<ChangeListener>,
}

impl<S: StateStore> Dashboard<S> {
    /// Build a dashboard, restoring state from `store` when possible.
    ///
    /// The layout and widget documents restore together or not at all: if
    /// either is missing, malformed, or stale, both fall back to the
    /// standard preset. Construction itself never fails.
    pub fn new(config: DashboardConfig, store: S) -> Self {
        let catalog = WidgetCatalog::builtin();
        let presets = builtin_presets();

        let stored_layouts = match store.get(LAYOUTS_KEY) {
            Ok(raw) => raw.and_then(|raw| decode_layouts(&raw)),
            Err(err) => {
                warn!(error = %err, "layout read failed, starting from defaults");
                None
            }
        };
        let stored_widgets = match store.get(WIDGETS_KEY) {
            Ok(raw) => raw.and_then(|raw| decode_widgets(&raw)),
            Err(err) => {
                warn!(error = %err, "widget read failed, starting from defaults");
                None
            }
        };

        let standard = presets
            .iter()
            .find(|p| p.id == "standard")
            .cloned()
            .unwrap_or_else(|| Preset {
                id: "standard".to_string(),
                name: "Standard Dashboard".to_string(),
                description: String::new(),
                widget_ids: catalog.default_visible_ids(),
                layouts: None,
            });

        // The two documents describe one state. Restoring half would pair
        // stored visibility with default geometry (or the reverse), so
        // either document failing discards both.
        let stored = match (stored_layouts, stored_widgets) {
            (Some(layouts), Some(widgets)) => Some((layouts, widgets)),
            (None, None) => None,
            _ => {
                warn!("partial persisted state, discarding both documents");
                None
            }
        };
        let restored = stored.is_some();
        let mut state = match stored {
            Some((layouts, visible)) => DashboardState::new(layouts, visible),
            None => DashboardState::new(
                standard.resolve_layouts(&catalog, &config.columns),
                standard.widget_ids.clone(),
            ),
        };
        for &bp in &Breakpoint::ALL {
            state.layouts.entry(bp).or_default();
        }

        let quiet_window = config.quiet_window;
        Self {
            config,
            catalog,
            presets,
            store,
            state,
            breakpoint: Breakpoint::Lg,
            active_preset: if restored {
                None
            } else {
                Some("standard".to_string())
            },
            cache: GeometryCache::default(),
            writer: DebouncedWriter::new(quiet_window),
            listeners: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// The active breakpoint.
    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Id of the preset the current state was produced by, until the user
    /// diverges from it.
    #[must_use]
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Columns at the active breakpoint.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.config.columns.cols_for(self.breakpoint)
    }

    /// The stored layout for the active breakpoint, hidden widgets included.
    #[must_use]
    pub fn current_layout(&self) -> &Layout {
        // Every breakpoint gets an entry at construction and stays present.
        &self.state.layouts[&self.breakpoint]
    }

    /// The renderable layout: visible widgets the catalog still knows.
    /// Hidden or retired items keep their stored geometry but are not shown.
    #[must_use]
    pub fn visible_layout(&self) -> Layout {
        self.current_layout()
            .iter()
            .filter(|item| self.state.is_visible(&item.id) && self.catalog.contains(&item.id))
            .cloned()
            .collect()
    }

    /// Whether the visible layout has reclaimable gaps. Always `false` when
    /// gap detection is disabled.
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        self.config.gap_detection && has_gaps(&self.visible_layout(), self.cols())
    }

    /// Register a listener invoked after every committed change.
    pub fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    // -----------------------------------------------------------------------
    // Interaction handlers
    // -----------------------------------------------------------------------

    /// Classify a viewport width and make that breakpoint active.
    ///
    /// Switching breakpoints only swaps which stored layout is shown; it
    /// never rewrites geometry.
    pub fn set_viewport_width(&mut self, width: f64) -> Breakpoint {
        // `as` saturates, so negative or huge widths classify sanely.
        let bp = self.config.breakpoints.classify_width(width as u32);
        self.set_breakpoint(bp);
        bp
    }

    /// Make `bp` the active breakpoint.
    pub fn set_breakpoint(&mut self, bp: Breakpoint) {
        if bp != self.breakpoint {
            debug!(from = %self.breakpoint, to = %bp, "breakpoint change");
            self.breakpoint = bp;
        }
    }

    /// Finish a drag: the host passes the full layout as dropped, naming the
    /// moved item. Runs snap, dimension optimization for the moved item,
    /// compaction, and fill, then commits.
    pub fn drag_stop(&mut self, layout: Layout, moved_id: &str, now: Instant) {
        let mut layout = self.snap(layout);
        if self.config.auto_size {
            self.optimize_item(&mut layout, moved_id);
        }
        let layout = self.arrange_and_fill(layout);
        self.commit(layout, now);
    }

    /// Finish a resize. Same pipeline as a drag minus dimension
    /// optimization, which would fight the size the user just chose.
    pub fn resize_stop(&mut self, layout: Layout, now: Instant) {
        let layout = self.snap(layout);
        let layout = self.arrange_and_fill(layout);
        self.commit(layout, now);
    }

    /// Re-run the configured stabilization passes over the active layout,
    /// e.g. after the host toggles a config flag.
    pub fn stabilize(&mut self, now: Instant) {
        let layout = self.current_layout().clone();
        let layout = self.snap(layout);
        let layout = self.arrange_and_fill(layout);
        self.commit(layout, now);
    }

    /// Replace state with a preset's widgets and geometry.
    ///
    /// Returns `false` (and changes nothing) for an unknown preset id.
    pub fn apply_preset(&mut self, id: &str, now: Instant) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.id == id).cloned() else {
            warn!(preset = id, "ignoring unknown preset");
            return false;
        };
        let mut layouts = preset.resolve_layouts(&self.catalog, &self.config.columns);
        for (&bp, layout) in &mut layouts {
            let cols = self.config.columns.cols_for(bp);
            let snapped = snap_to_grid(layout);
            *layout = auto_arrange(&snapped, cols);
        }
        for &bp in &Breakpoint::ALL {
            layouts.entry(bp).or_default();
        }
        self.state.layouts = layouts;
        self.state.visible = preset.widget_ids.clone();
        self.active_preset = Some(preset.id.clone());
        self.cache.invalidate_all();
        self.schedule_and_notify(now);
        true
    }

    /// Show or hide one widget, returning its new visibility. Unknown ids
    /// are refused. Toggling marks the state as diverged from any preset.
    pub fn toggle_widget(&mut self, id: &str, now: Instant) -> bool {
        if !self.catalog.contains(id) {
            warn!(widget = id, "ignoring toggle for unknown widget");
            return false;
        }
        let visible = if self.state.is_visible(id) {
            self.state.visible.retain(|v| v != id);
            false
        } else {
            self.state.visible.push(id.to_string());
            self.place_if_new(id);
            true
        };
        self.active_preset = None;
        self.schedule_and_notify(now);
        visible
    }

    /// Discard customizations and return to the standard preset. The
    /// pending-write timer is re-armed so the reset itself persists.
    pub fn reset(&mut self, now: Instant) {
        self.apply_preset("standard", now);
    }

    // -----------------------------------------------------------------------
    // Persistence driving
    // -----------------------------------------------------------------------

    /// Advance the debounce timer; writes state once the quiet window has
    /// elapsed. Call this from the host event loop. Storage failures are
    /// logged, not raised, and the state stays dirty in memory only.
    pub fn tick(&mut self, now: Instant) {
        if self.writer.poll(now) {
            if let Err(err) = self.persist_now() {
                warn!(error = %err, "debounced state write failed");
            }
        }
    }

    /// Write any pending state immediately. Call on shutdown.
    pub fn flush(&mut self) {
        if self.writer.flush() {
            if let Err(err) = self.persist_now() {
                warn!(error = %err, "final state write failed");
            }
        }
    }

    /// Whether a persistence write is armed but not yet performed.
    #[must_use]
    pub fn write_pending(&self) -> bool {
        self.writer.is_pending()
    }

    /// Consume the dashboard, returning its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist_now(&mut self) -> Result<(), PersistError> {
        let layouts = encode_layouts(&self.state.layouts)?;
        let widgets = encode_widgets(&self.state.visible)?;
        self.store.put(LAYOUTS_KEY, &layouts)?;
        self.store.put(WIDGETS_KEY, &widgets)?;
        debug!("dashboard state persisted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pipeline internals
    // -----------------------------------------------------------------------

    fn snap(&self, layout: Layout) -> Layout {
        if self.config.snap_to_grid {
            snap_to_grid(&layout)
        } else {
            layout
        }
    }

    fn optimize_item(&self, layout: &mut Layout, moved_id: &str) {
        let Some(index) = layout.iter().position(|item| item.id == moved_id) else {
            return;
        };
        if layout[index].is_static {
            return;
        }
        let (w, h) = find_optimal_dimensions(layout, &layout[index], self.cols());
        layout[index].w = w;
        layout[index].h = h;
    }

    fn arrange_and_fill(&mut self, layout: Layout) -> Layout {
        let cols = self.cols();
        let layout = if self.config.auto_arrange {
            self.cache.arrange(&layout, cols)
        } else {
            layout
        };
        if self.config.auto_fill {
            auto_fill(&layout, cols)
        } else {
            layout
        }
    }

    fn commit(&mut self, layout: Layout, now: Instant) {
        self.state.layouts.insert(self.breakpoint, layout);
        self.schedule_and_notify(now);
    }

    fn schedule_and_notify(&mut self, now: Instant) {
        self.writer.schedule(now);
        // Listeners may call accessors, so they run with the listener list
        // temporarily detached.
        let mut listeners = mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(&self.state);
        }
        self.listeners = listeners;
    }

    /// First time a widget becomes visible it gets a slot at the bottom of
    /// every breakpoint layout; widgets hidden and re-shown keep their old
    /// geometry.
    fn place_if_new(&mut self, id: &str) {
        let Some(entry) = self.catalog.get(id).cloned() else {
            return;
        };
        for (&bp, layout) in &mut self.state.layouts {
            if layout.iter().any(|item| item.id == id) {
                continue;
            }
            let cols = self.config.columns.cols_for(bp);
            let bottom = layout.iter().map(LayoutItem::bottom).fold(0.0, f64::max);
            let w = if entry.col_span > 1 && bp != Breakpoint::Xs {
                f64::from(entry.col_span.min(cols))
            } else {
                1.0
            };
            let h = f64::from(entry.row_span.max(1)) * 2.0;
            layout.push(LayoutItem::new(id, 0.0, bottom, w, h).min_size(1.0, 2.0));
        }
    }
}

impl<S: StateStore + std::fmt::Debug> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("breakpoint", &self.breakpoint)
            .field("active_preset", &self.active_preset)
            .field("visible", &self.state.visible.len())
            .field("write_pending", &self.writer.is_pending())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;

    fn dash() -> Dashboard<MemoryStore> {
        Dashboard::new(DashboardConfig::default(), MemoryStore::new())
    }

    fn overlap_free(layout: &[LayoutItem]) -> bool {
        layout
            .iter()
            .enumerate()
            .all(|(i, a)| layout[i + 1..].iter().all(|b| !a.overlaps(b)))
    }

    #[test]
    fn fresh_dashboard_starts_on_the_standard_preset() {
        let dash = dash();
        assert_eq!(dash.active_preset(), Some("standard"));
        assert_eq!(dash.breakpoint(), Breakpoint::Lg);
        assert!(dash.state().is_visible("price-chart"));
        assert!(!dash.current_layout().is_empty());
    }

    #[test]
    fn corrupt_persisted_state_falls_back_to_defaults() {
        let store = MemoryStore::new()
            .with_entry(LAYOUTS_KEY, "{definitely not json")
            .with_entry(WIDGETS_KEY, "42");
        let dash = Dashboard::new(DashboardConfig::default(), store);
        assert_eq!(dash.active_preset(), Some("standard"));
        assert!(dash.state().is_visible("market-overview"));
    }

    #[test]
    fn half_corrupt_state_discards_both_documents() {
        // A valid widget list next to a corrupt layout document must not
        // pair stored visibility with default geometry.
        let store = MemoryStore::new()
            .with_entry(LAYOUTS_KEY, "{broken")
            .with_entry(WIDGETS_KEY, &encode_widgets(&["alerts".to_string()]).unwrap());
        let dash = Dashboard::new(DashboardConfig::default(), store);
        assert_eq!(dash.active_preset(), Some("standard"));
        assert!(dash.state().is_visible("market-overview"));
        assert!(dash.state().visible.len() > 1);
    }

    #[test]
    fn missing_widget_document_discards_stored_layouts() {
        let mut layouts = crate::state::LayoutSet::new();
        layouts.insert(
            Breakpoint::Lg,
            vec![LayoutItem::new("alerts", 0.0, 0.0, 1.0, 2.0)],
        );
        let store =
            MemoryStore::new().with_entry(LAYOUTS_KEY, &encode_layouts(&layouts).unwrap());
        let dash = Dashboard::new(DashboardConfig::default(), store);
        assert_eq!(dash.active_preset(), Some("standard"));
        assert!(dash.current_layout().len() > 1);
    }

    #[test]
    fn valid_persisted_state_is_restored() {
        let mut layouts = crate::state::LayoutSet::new();
        layouts.insert(
            Breakpoint::Lg,
            vec![LayoutItem::new("alerts", 0.0, 0.0, 1.0, 2.0)],
        );
        let store = MemoryStore::new()
            .with_entry(LAYOUTS_KEY, &encode_layouts(&layouts).unwrap())
            .with_entry(WIDGETS_KEY, &encode_widgets(&["alerts".to_string()]).unwrap());
        let dash = Dashboard::new(DashboardConfig::default(), store);
        assert_eq!(dash.active_preset(), None);
        assert_eq!(dash.state().visible, vec!["alerts"]);
        assert_eq!(dash.current_layout().len(), 1);
    }

    #[test]
    fn viewport_width_maps_to_breakpoints() {
        let mut dash = dash();
        assert_eq!(dash.set_viewport_width(1400.0), Breakpoint::Lg);
        assert_eq!(dash.set_viewport_width(1000.0), Breakpoint::Md);
        assert_eq!(dash.set_viewport_width(800.0), Breakpoint::Sm);
        assert_eq!(dash.set_viewport_width(320.0), Breakpoint::Xs);
        assert_eq!(dash.cols(), 1);
    }

    #[test]
    fn breakpoint_switch_does_not_rewrite_geometry() {
        let mut dash = dash();
        let lg_before = dash.current_layout().clone();
        dash.set_breakpoint(Breakpoint::Xs);
        dash.set_breakpoint(Breakpoint::Lg);
        assert_eq!(dash.current_layout(), &lg_before);
    }

    #[test]
    fn drag_stop_snaps_arranges_and_commits() {
        let mut dash = dash();
        let mut layout = dash.current_layout().clone();
        let idx = layout.iter().position(|i| i.id == "alerts").unwrap();
        layout[idx].x = 2.2;
        layout[idx].y = 11.7;
        dash.drag_stop(layout, "alerts", Instant::now());

        let committed = dash.current_layout();
        assert!(committed.iter().all(|i| i.x.fract() == 0.0 && i.y.fract() == 0.0));
        assert!(overlap_free(committed));
        assert!(dash.write_pending());
    }

    #[test]
    fn drag_stop_grows_the_moved_item_into_free_space() {
        let mut dash = dash();
        // Two stacked unit items leave the rest of the row free.
        let layout = vec![
            LayoutItem::new("market-overview", 0.0, 0.0, 1.0, 2.0),
            LayoutItem::new("alerts", 0.0, 2.0, 1.0, 2.0),
        ];
        dash.drag_stop(layout, "market-overview", Instant::now());
        let moved = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "market-overview")
            .unwrap();
        assert_eq!(moved.w, 3.0);
    }

    #[test]
    fn resize_stop_respects_the_chosen_size() {
        let mut dash = dash();
        let layout = vec![
            LayoutItem::new("market-overview", 0.0, 0.0, 1.0, 2.0),
            LayoutItem::new("alerts", 0.0, 2.0, 1.0, 2.0),
        ];
        dash.resize_stop(layout, Instant::now());
        let item = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "market-overview")
            .unwrap();
        assert_eq!(item.w, 1.0);
    }

    #[test]
    fn apply_preset_switches_widgets_and_layouts() {
        let mut dash = dash();
        assert!(dash.apply_preset("day-trader", Instant::now()));
        assert_eq!(dash.active_preset(), Some("day-trader"));
        assert!(dash.state().is_visible("volume-volatility"));
        assert!(!dash.state().is_visible("watchlist"));
        for &bp in &Breakpoint::ALL {
            let layout = &dash.state().layouts[&bp];
            assert!(overlap_free(layout), "{bp}");
        }
    }

    #[test]
    fn apply_preset_synthesizes_missing_geometry() {
        let mut dash = dash();
        assert!(dash.apply_preset("minimal", Instant::now()));
        let layout = dash.visible_layout();
        assert_eq!(layout.len(), 5);
        assert!(overlap_free(&layout));
    }

    #[test]
    fn unknown_preset_is_refused() {
        let mut dash = dash();
        assert!(!dash.apply_preset("no-such-preset", Instant::now()));
        assert_eq!(dash.active_preset(), Some("standard"));
    }

    #[test]
    fn toggle_hides_and_reshows_without_losing_geometry() {
        let mut dash = dash();
        let before = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "alerts")
            .cloned()
            .unwrap();
        assert!(!dash.toggle_widget("alerts", Instant::now()));
        assert!(!dash.visible_layout().iter().any(|i| i.id == "alerts"));
        assert!(dash.toggle_widget("alerts", Instant::now()));
        let after = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "alerts")
            .cloned()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn toggling_a_new_widget_places_it_at_the_bottom() {
        let mut dash = dash();
        let bottom_before = dash
            .current_layout()
            .iter()
            .map(LayoutItem::bottom)
            .fold(0.0, f64::max);
        assert!(dash.toggle_widget("ai-insights", Instant::now()));
        let placed = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "ai-insights")
            .unwrap();
        assert_eq!(placed.y, bottom_before);
        assert_eq!(dash.active_preset(), None);
    }

    #[test]
    fn toggle_refuses_unknown_widgets() {
        let mut dash = dash();
        assert!(!dash.toggle_widget("retired-widget", Instant::now()));
        assert!(!dash.state().is_visible("retired-widget"));
    }

    #[test]
    fn retired_ids_are_kept_in_state_but_not_rendered() {
        let mut layouts = crate::state::LayoutSet::new();
        layouts.insert(
            Breakpoint::Lg,
            vec![
                LayoutItem::new("alerts", 0.0, 0.0, 1.0, 2.0),
                LayoutItem::new("retired-widget", 1.0, 0.0, 1.0, 2.0),
            ],
        );
        let store = MemoryStore::new()
            .with_entry(LAYOUTS_KEY, &encode_layouts(&layouts).unwrap())
            .with_entry(
                WIDGETS_KEY,
                &encode_widgets(&["alerts".to_string(), "retired-widget".to_string()]).unwrap(),
            );
        let dash = Dashboard::new(DashboardConfig::default(), store);
        assert_eq!(dash.current_layout().len(), 2);
        assert_eq!(dash.visible_layout().len(), 1);
    }

    #[test]
    fn debounced_write_lands_after_the_quiet_window() {
        let mut dash = dash();
        let t0 = Instant::now();
        let layout = dash.current_layout().clone();
        dash.drag_stop(layout, "alerts", t0);
        dash.tick(t0 + Duration::from_millis(100));
        assert!(dash.write_pending());
        dash.tick(t0 + DEFAULT_QUIET_WINDOW);
        assert!(!dash.write_pending());
        let store = dash.into_store();
        assert!(store.get(LAYOUTS_KEY).unwrap().is_some());
        assert!(store.get(WIDGETS_KEY).unwrap().is_some());
    }

    #[test]
    fn burst_of_changes_writes_once_with_the_last_state() {
        let mut dash = dash();
        let t0 = Instant::now();
        for step in 0u32..5 {
            let mut layout = dash.current_layout().clone();
            let idx = layout.iter().position(|i| i.id == "alerts").unwrap();
            layout[idx].y = f64::from(step) + 20.0;
            let at = t0 + Duration::from_millis(u64::from(step) * 100);
            dash.drag_stop(layout, "alerts", at);
            dash.tick(at);
        }
        // Quiet window measured from the last change, not the first.
        assert!(dash.write_pending());
        dash.tick(t0 + Duration::from_millis(400) + DEFAULT_QUIET_WINDOW);
        assert!(!dash.write_pending());

        let expected = encode_layouts(&dash.state().layouts).unwrap();
        let store = dash.into_store();
        assert_eq!(store.get(LAYOUTS_KEY).unwrap().as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn flush_writes_immediately() {
        let mut dash = dash();
        let layout = dash.current_layout().clone();
        dash.drag_stop(layout, "alerts", Instant::now());
        dash.flush();
        assert!(!dash.write_pending());
        assert!(dash.into_store().get(LAYOUTS_KEY).unwrap().is_some());
    }

    #[test]
    fn listeners_observe_every_commit() {
        let mut dash = dash();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        dash.on_change(Box::new(move |_| counter.set(counter.get() + 1)));
        let layout = dash.current_layout().clone();
        dash.drag_stop(layout, "alerts", Instant::now());
        dash.toggle_widget("ai-insights", Instant::now());
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn gap_detection_can_be_disabled() {
        let mut config = DashboardConfig::default();
        config.gap_detection = false;
        let dash = Dashboard::new(config, MemoryStore::new());
        assert!(!dash.has_gaps());
    }

    #[test]
    fn stabilize_compacts_the_active_layout() {
        let mut dash = dash();
        dash.state.layouts.insert(
            Breakpoint::Lg,
            vec![
                LayoutItem::new("market-overview", 0.0, 0.0, 3.0, 2.0),
                LayoutItem::new("alerts", 0.0, 5.0, 1.0, 2.0),
            ],
        );
        assert!(dash.has_gaps());
        dash.stabilize(Instant::now());
        assert!(!dash.has_gaps());
        let alerts = dash
            .current_layout()
            .iter()
            .find(|i| i.id == "alerts")
            .unwrap();
        assert_eq!(alerts.y, 2.0);
    }
}
