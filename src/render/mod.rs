//! Render Module - HTML surface
//!
//! All user-facing text passes through [`escape_html`] before output.

pub mod escape;
pub mod gauge;
pub mod page;

pub use escape::escape_html;
pub use gauge::GaugeSpec;
pub use page::{render_page, PageBody};
