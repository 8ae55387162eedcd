//! Persisted dashboard state and its JSON codec.
//!
//! Two documents survive a restart: the per-breakpoint layout map and the
//! list of visible widget ids. Both are wrapped in a schema-versioned
//! envelope so a future format change can be detected instead of
//! misinterpreted.
//!
//! # Failure Modes
//!
//! Decoding is deliberately forgiving: malformed JSON, an unknown schema
//! version, or a payload that fails validation all decode to `None` (with a
//! `tracing` warning) rather than an error. Callers fall back to defaults,
//! so a corrupted store never takes the dashboard down.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use dashgrid_core::{Breakpoint, Layout};

/// One stored layout per breakpoint.
pub type LayoutSet = BTreeMap<Breakpoint, Layout>;

/// Bumped whenever the persisted shape changes incompatibly.
pub const STATE_SCHEMA_VERSION: u16 = 1;

/// Store key for the layout map document.
pub const LAYOUTS_KEY: &str = "dashboard.layouts";

/// Store key for the visible-widget document.
pub const WIDGETS_KEY: &str = "dashboard.widgets";

/// In-memory dashboard state: what is shown, and where.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Per-breakpoint item geometry.
    pub layouts: LayoutSet,
    /// Ids of widgets the user has visible, in insertion order.
    pub visible: Vec<String>,
}

impl DashboardState {
    #[must_use]
    pub fn new(layouts: LayoutSet, visible: Vec<String>) -> Self {
        Self { layouts, visible }
    }

    /// Whether a widget id is currently visible.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedLayouts {
    schema_version: u16,
    layouts: LayoutSet,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedWidgets {
    schema_version: u16,
    widgets: Vec<String>,
}

/// Serialize a layout set into its persisted envelope.
pub fn encode_layouts(layouts: &LayoutSet) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedLayouts {
        schema_version: STATE_SCHEMA_VERSION,
        layouts: layouts.clone(),
    })
}

/// Decode a persisted layout document, or `None` if it cannot be trusted.
#[must_use]
pub fn decode_layouts(raw: &str) -> Option<LayoutSet> {
    let doc: PersistedLayouts = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(error = %err, "discarding malformed layout document");
            return None;
        }
    };
    if doc.schema_version != STATE_SCHEMA_VERSION {
        warn!(
            found = doc.schema_version,
            expected = STATE_SCHEMA_VERSION,
            "discarding layout document with unknown schema version"
        );
        return None;
    }
    if let Err(reason) = validate_layouts(&doc.layouts) {
        warn!(%reason, "discarding layout document that failed validation");
        return None;
    }
    Some(doc.layouts)
}

/// Serialize the visible-widget list into its persisted envelope.
pub fn encode_widgets(widgets: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedWidgets {
        schema_version: STATE_SCHEMA_VERSION,
        widgets: widgets.to_vec(),
    })
}

/// Decode a persisted widget list, or `None` if it cannot be trusted.
#[must_use]
pub fn decode_widgets(raw: &str) -> Option<Vec<String>> {
    let doc: PersistedWidgets = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(error = %err, "discarding malformed widget document");
            return None;
        }
    };
    if doc.schema_version != STATE_SCHEMA_VERSION {
        warn!(
            found = doc.schema_version,
            expected = STATE_SCHEMA_VERSION,
            "discarding widget document with unknown schema version"
        );
        return None;
    }
    Some(doc.widgets)
}

/// Reject layout payloads that would corrupt downstream geometry.
fn validate_layouts(layouts: &LayoutSet) -> Result<(), String> {
    for (bp, layout) in layouts {
        for item in layout {
            if item.id.is_empty() {
                return Err(format!("{bp}: item with empty id"));
            }
            let coords = [item.x, item.y, item.w, item.h];
            if coords.iter().any(|v| !v.is_finite()) {
                return Err(format!("{bp}: item {} has non-finite geometry", item.id));
            }
            if item.w <= 0.0 || item.h <= 0.0 {
                return Err(format!("{bp}: item {} has degenerate size", item.id));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::LayoutItem;

    fn sample() -> LayoutSet {
        let mut set = LayoutSet::new();
        set.insert(
            Breakpoint::Lg,
            vec![LayoutItem::new("a", 0.0, 0.0, 2.0, 3.0).min_size(1.0, 2.0)],
        );
        set.insert(Breakpoint::Xs, vec![LayoutItem::new("a", 0.0, 0.0, 1.0, 3.0)]);
        set
    }

    #[test]
    fn layouts_survive_encode_decode() {
        let encoded = encode_layouts(&sample()).unwrap();
        assert_eq!(decode_layouts(&encoded), Some(sample()));
    }

    #[test]
    fn widgets_survive_encode_decode() {
        let widgets = vec!["price-chart".to_string(), "alerts".to_string()];
        let encoded = encode_widgets(&widgets).unwrap();
        assert_eq!(decode_widgets(&encoded), Some(widgets));
    }

    #[test]
    fn layout_envelope_uses_wire_names() {
        let encoded = encode_layouts(&sample()).unwrap();
        assert!(encoded.contains("\"schema_version\":1"));
        assert!(encoded.contains("\"lg\""));
        assert!(encoded.contains("\"minW\":1.0"));
    }

    #[test]
    fn malformed_json_decodes_to_none() {
        assert_eq!(decode_layouts("{not json"), None);
        assert_eq!(decode_widgets("[1,2,3]"), None);
    }

    #[test]
    fn unknown_schema_version_is_discarded() {
        let raw = r#"{"schema_version":99,"layouts":{}}"#;
        assert_eq!(decode_layouts(raw), None);
        let raw = r#"{"schema_version":99,"widgets":[]}"#;
        assert_eq!(decode_widgets(raw), None);
    }

    #[test]
    fn degenerate_geometry_is_discarded() {
        let raw = r#"{"schema_version":1,"layouts":{"lg":[{"i":"a","x":0,"y":0,"w":0,"h":1}]}}"#;
        assert_eq!(decode_layouts(raw), None);
    }

    #[test]
    fn empty_id_is_discarded() {
        let raw = r#"{"schema_version":1,"layouts":{"lg":[{"i":"","x":0,"y":0,"w":1,"h":1}]}}"#;
        assert_eq!(decode_layouts(raw), None);
    }

    #[test]
    fn visibility_lookup() {
        let state = DashboardState::new(LayoutSet::new(), vec!["alerts".to_string()]);
        assert!(state.is_visible("alerts"));
        assert!(!state.is_visible("watchlist"));
    }
}
