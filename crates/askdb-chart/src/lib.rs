//! Chart adaptation: wire visualization payloads to drawable data.
//!
//! The backend declares charts as `{chart_type, meta, data}` payloads with
//! loosely typed series records. [`adapt`] turns one payload into a
//! [`ChartRenderData`] a front-end can draw directly, applying the palette,
//! label, and fallback rules in [`format`] and never failing.

pub mod adapt;
pub mod format;
pub mod types;

pub use adapt::adapt;
pub use format::{abbreviate_tick, group_thousands, palette_color, percent_label, PALETTE};
pub use types::{ChartRenderData, HistogramBar, LinePoint, PieSlice, ScatterPoint};
