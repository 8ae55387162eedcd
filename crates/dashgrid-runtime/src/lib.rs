#![forbid(unsafe_code)]

//! The stateful half of dashgrid: widget catalog, dashboard presets,
//! persisted layout state, debounced writes, and the orchestrator that
//! drives the `dashgrid-core` geometry in response to user interaction.
//!
//! Execution model: single-threaded and event-driven. Every mutation runs
//! synchronously inside one interaction callback; the only deliberately
//! delayed effect is the debounced persistence write, and the last mutation
//! before the quiet period always wins.

pub mod catalog;
pub mod dashboard;
pub mod debounce;
pub mod persist;
pub mod preset;
pub mod provider;
pub mod slot;
pub mod state;

pub use catalog::{WidgetCatalog, WidgetEntry};
pub use dashboard::{Dashboard, DashboardConfig};
pub use debounce::{DEFAULT_QUIET_WINDOW, DebouncedWriter};
pub use persist::{FileStore, MemoryStore, PersistError, StateStore};
pub use preset::{Preset, builtin_presets, synthesize_layouts};
pub use provider::{ChainExhausted, Completion, Provider, ProviderChain, ProviderError};
pub use slot::{RequestSlot, Ticket};
pub use state::{DashboardState, LAYOUTS_KEY, LayoutSet, STATE_SCHEMA_VERSION, WIDGETS_KEY};
