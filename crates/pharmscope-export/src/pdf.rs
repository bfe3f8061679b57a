//! PDF report generation via `printpdf`.
//!
//! Fixed section ordering: title, executive summary (500 chars), the five
//! analysis sections (1000 chars each), up to 5 competitor bullets, risk
//! bullets. Layout is a simple falling cursor with page breaks.

use std::io::BufWriter;

use printpdf::*;

use pharmscope_core::text::excerpt;
use pharmscope_core::{Error, Result, TherapyAreaAnalysis};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP_MARGIN: Mm = Mm(280.0);
const BOTTOM_MARGIN: Mm = Mm(20.0);
const WRAP_COLUMNS: usize = 90;

struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageCursor {
    fn line(&mut self, text: &str, size: f64, x: Mm, font: &IndirectFontRef, advance: Mm) {
        if self.y.0 < BOTTOM_MARGIN.0 {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MARGIN;
        }
        self.layer.use_text(text, size as f32, x, self.y, font);
        self.y -= advance;
    }

    fn paragraph(&mut self, text: &str, size: f64, x: Mm, font: &IndirectFontRef) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.line(&line, size, x, font, Mm(4.5));
        }
    }

    fn gap(&mut self, space: Mm) {
        self.y -= space;
    }
}

/// Render a stored analysis to PDF bytes.
pub fn render_pdf(analysis: &TherapyAreaAnalysis) -> Result<Vec<u8>> {
    let title = format!("Pharma Analysis Report: {}", analysis.therapy_area);
    let (doc, page1, layer1) = PdfDocument::new(&title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Export(format!("PDF font error: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Export(format!("PDF font error: {}", e)))?;

    let mut cursor = PageCursor {
        doc,
        layer,
        y: TOP_MARGIN,
    };

    // Title
    cursor.line(&title, 16.0, Mm(20.0), &bold, Mm(12.0));

    // Executive summary
    cursor.line("Executive Summary", 12.0, Mm(20.0), &bold, Mm(7.0));
    cursor.paragraph(&excerpt(&analysis.disease_summary, 500), 9.0, Mm(20.0), &font);
    cursor.gap(Mm(6.0));

    // Analysis sections
    let sections = [
        ("Disease Overview", &analysis.disease_summary),
        ("Staging Information", &analysis.staging),
        ("Biomarkers", &analysis.biomarkers),
        ("Treatment Algorithm", &analysis.treatment_algorithm),
        ("Patient Journey", &analysis.patient_journey),
    ];
    for (section_title, content) in sections {
        if content.is_empty() {
            continue;
        }
        cursor.line(section_title, 11.0, Mm(20.0), &bold, Mm(6.0));
        cursor.paragraph(&excerpt(content, 1000), 9.0, Mm(20.0), &font);
        cursor.gap(Mm(5.0));
    }

    // Competitive landscape
    if let Some(landscape) = &analysis.competitive_landscape {
        cursor.line("Competitive Landscape", 12.0, Mm(20.0), &bold, Mm(7.0));
        for comp in landscape.competitors.iter().take(5) {
            let bullet = format!("\u{2022} {}: {}", comp.name, comp.strengths);
            cursor.paragraph(&bullet, 9.0, Mm(25.0), &font);
        }
        cursor.gap(Mm(6.0));
    }

    // Risk assessment
    if let Some(risk) = &analysis.risk_assessment {
        cursor.line("Risk Assessment", 12.0, Mm(20.0), &bold, Mm(7.0));
        for (category, entry) in &risk.categories {
            let label = format!("\u{2022} {}: {}", pretty_category(category), entry.level);
            cursor.line(&label, 9.0, Mm(25.0), &font, Mm(4.5));
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    cursor
        .doc
        .save(&mut buf)
        .map_err(|e| Error::Export(format!("PDF save error: {}", e)))?;
    buf.into_inner()
        .map_err(|e| Error::Export(format!("PDF buffer error: {}", e)))
}

/// `clinical_risk` -> `Clinical Risk`.
fn pretty_category(category: &str) -> String {
    category
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
