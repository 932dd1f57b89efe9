//! Binder Module - Form-Schema Binder
//!
//! Feature order + schema -> widgets -> input record -> classifier row.

pub mod form;
pub mod predict;
pub mod record;


// Re-export common types
pub use form::{
    apply_edit, apply_raw_edit, render_inputs, validate_edit, Control, RadioChoice, RenderedForm,
    StickyValues, Widget, COLUMN_COUNT,
};
pub use predict::{predict, PredictionResult, ResultPanel};
pub use record::{InputRecord, RecordField};
