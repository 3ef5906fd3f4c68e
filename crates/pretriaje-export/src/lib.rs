//! pretriaje-export
//!
//! Printable HTML reports rendered from Tera templates.

pub mod error;
pub mod render;
pub mod report;

pub use report::render_report_html;
