//! End-to-end flows across the orchestrator, codec, and stores.

use std::time::{Duration, Instant};

use dashgrid_core::{Breakpoint, LayoutItem};
use dashgrid_runtime::{
    Dashboard, DashboardConfig, DEFAULT_QUIET_WINDOW, FileStore, LAYOUTS_KEY, MemoryStore,
    StateStore, WIDGETS_KEY,
};

fn init_tracing() {
    use tracing_subscriber::util::SubscriberInitExt;
    let _ = tracing_subscriber::registry().try_init();
}

#[test]
fn customize_persist_and_restore() {
    init_tracing();
    let mut dash = Dashboard::new(DashboardConfig::default(), MemoryStore::new());
    let t0 = Instant::now();

    // Customize: switch preset, hide a widget, drag another.
    assert!(dash.apply_preset("day-trader", t0));
    assert!(!dash.toggle_widget("alerts", t0));
    let mut layout = dash.current_layout().clone();
    let idx = layout.iter().position(|i| i.id == "top-movers").unwrap();
    layout[idx].x = 0.4;
    layout[idx].y = 9.6;
    dash.drag_stop(layout, "top-movers", t0);

    // Nothing hits the store until the quiet window elapses.
    let store_view = dash.state().clone();
    dash.tick(t0 + Duration::from_millis(100));
    assert!(dash.write_pending());
    dash.tick(t0 + DEFAULT_QUIET_WINDOW);
    assert!(!dash.write_pending());

    // A second dashboard over the same store sees the customized state.
    let restored = Dashboard::new(DashboardConfig::default(), dash.into_store());
    assert_eq!(restored.active_preset(), None);
    assert_eq!(restored.state(), &store_view);
    assert!(!restored.state().is_visible("alerts"));
}

#[test]
fn corrupt_store_yields_a_working_default_dashboard() {
    init_tracing();
    let store = MemoryStore::new()
        .with_entry(LAYOUTS_KEY, "\u{1}garbage\u{2}")
        .with_entry(WIDGETS_KEY, r#"{"schema_version":99,"widgets":[]}"#);
    let mut dash = Dashboard::new(DashboardConfig::default(), store);

    assert_eq!(dash.active_preset(), Some("standard"));
    assert!(!dash.visible_layout().is_empty());

    // The default dashboard is fully usable: interactions still commit.
    let layout = dash.current_layout().clone();
    dash.drag_stop(layout, "price-chart", Instant::now());
    assert!(dash.write_pending());
}

#[test]
fn file_store_round_trips_a_session() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let t0 = Instant::now();

    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut dash = Dashboard::new(DashboardConfig::default(), store);
        dash.apply_preset("crypto-analyst", t0);
        // Shutdown before the quiet window: flush must not lose the change.
        dash.flush();
    }

    let store = FileStore::open(dir.path()).unwrap();
    assert!(store.get(LAYOUTS_KEY).unwrap().is_some());
    let dash = Dashboard::new(DashboardConfig::default(), store);
    assert!(dash.state().is_visible("discussion-trends"));
    assert!(!dash.state().is_visible("alerts"));
}

#[test]
fn per_breakpoint_layouts_stay_independent() {
    init_tracing();
    let mut dash = Dashboard::new(DashboardConfig::default(), MemoryStore::new());
    let t0 = Instant::now();

    dash.set_viewport_width(1400.0);
    let mut layout = dash.current_layout().clone();
    let idx = layout.iter().position(|i| i.id == "alerts").unwrap();
    layout[idx].y = 30.0;
    dash.drag_stop(layout, "alerts", t0);
    let lg_after = dash.current_layout().clone();

    // The single-column layout never saw the drag.
    dash.set_viewport_width(320.0);
    assert_eq!(dash.breakpoint(), Breakpoint::Xs);
    assert!(dash.current_layout().iter().all(|i| i.x == 0.0));

    dash.set_viewport_width(1400.0);
    assert_eq!(dash.current_layout(), &lg_after);
}

#[test]
fn toggled_widget_round_trips_through_the_store() {
    init_tracing();
    let mut dash = Dashboard::new(DashboardConfig::default(), MemoryStore::new());
    let t0 = Instant::now();
    assert!(dash.toggle_widget("developer-activity", t0));
    dash.flush();

    let restored = Dashboard::new(DashboardConfig::default(), dash.into_store());
    assert!(restored.state().is_visible("developer-activity"));
    let placed = restored
        .current_layout()
        .iter()
        .find(|i| i.id == "developer-activity")
        .unwrap();
    assert!(placed.y > 0.0);
    assert_eq!(placed, &LayoutItem::new("developer-activity", 0.0, placed.y, 1.0, 2.0).min_size(1.0, 2.0));
}
