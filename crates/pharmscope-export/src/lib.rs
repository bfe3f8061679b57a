//! Byte-blob exports of stored analyses.
//!
//! Both renderers take the persisted records and return encoded bytes; the
//! request handler decides how to surface failures.

mod excel;
mod pdf;

pub use excel::render_excel;
pub use pdf::render_pdf;

/// Suggested download filename for a PDF export.
pub fn pdf_filename(therapy_area: &str) -> String {
    format!("{}_analysis.pdf", therapy_area.replace(' ', "_"))
}

/// Suggested download filename for an Excel export.
pub fn excel_filename(therapy_area: &str) -> String {
    format!("{}_model.xlsx", therapy_area.replace(' ', "_"))
}
