//! Excel forecasting-model export via `rust_xlsxwriter`.
//!
//! Three fixed sheets: analysis summary text, the funnel stage table, and
//! the scenario projection table (years 2024-2029).

use rust_xlsxwriter::{Format, Workbook};

use pharmscope_core::text::excerpt;
use pharmscope_core::{Error, PatientFlowFunnel, Result, TherapyAreaAnalysis};

const FIRST_YEAR: i32 = 2024;
const YEAR_COLUMNS: u16 = 6;

fn export_err(e: rust_xlsxwriter::XlsxError) -> Error {
    Error::Export(e.to_string())
}

/// Render a stored analysis (and its funnel, when present) to xlsx bytes.
pub fn render_excel(
    analysis: &TherapyAreaAnalysis,
    funnel: Option<&PatientFlowFunnel>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    // Sheet 1: analysis summary
    let summary = workbook.add_worksheet();
    summary.set_name("Analysis Summary").map_err(export_err)?;
    summary
        .write_string_with_format(
            0,
            0,
            &format!("Therapy Area Analysis: {}", analysis.therapy_area),
            &bold,
        )
        .map_err(export_err)?;

    let sections = [
        ("Disease Summary", excerpt(&analysis.disease_summary, 500)),
        ("Key Biomarkers", excerpt(&analysis.biomarkers, 300)),
        ("Treatment Algorithm", excerpt(&analysis.treatment_algorithm, 300)),
    ];
    let mut row = 2;
    for (title, content) in sections {
        summary
            .write_string_with_format(row, 0, title, &bold)
            .map_err(export_err)?;
        summary.write_string(row, 1, &content).map_err(export_err)?;
        row += 2;
    }

    // Sheet 2: funnel stage table
    let funnel_sheet = workbook.add_worksheet();
    funnel_sheet
        .set_name("Patient Flow Funnel")
        .map_err(export_err)?;
    for (col, header) in ["Stage", "Percentage", "Description"].iter().enumerate() {
        funnel_sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(export_err)?;
    }
    if let Some(funnel) = funnel {
        for (i, stage) in funnel.funnel_stages.iter().enumerate() {
            let row = (i + 1) as u32;
            funnel_sheet
                .write_string(row, 0, &stage.stage)
                .map_err(export_err)?;
            funnel_sheet
                .write_string(row, 1, &stage.percentage)
                .map_err(export_err)?;
            funnel_sheet
                .write_string(row, 2, &stage.description)
                .map_err(export_err)?;
        }
    }

    // Sheet 3: scenario projections
    let scenario_sheet = workbook.add_worksheet();
    scenario_sheet
        .set_name("Scenario Models")
        .map_err(export_err)?;
    scenario_sheet
        .write_string_with_format(0, 0, "Scenario", &bold)
        .map_err(export_err)?;
    for col in 0..YEAR_COLUMNS {
        scenario_sheet
            .write_string_with_format(0, col + 1, &(FIRST_YEAR + col as i32).to_string(), &bold)
            .map_err(export_err)?;
    }
    if let Some(models) = &analysis.scenario_models {
        for (i, (name, model)) in models.iter().enumerate() {
            let row = (i + 1) as u32;
            scenario_sheet
                .write_string(row, 0, &title_case(name))
                .map_err(export_err)?;
            for (col, projection) in model
                .projections
                .iter()
                .take(YEAR_COLUMNS as usize)
                .enumerate()
            {
                scenario_sheet
                    .write_number(row, (col + 1) as u16, *projection)
                    .map_err(export_err)?;
            }
        }
    }

    workbook.save_to_buffer().map_err(export_err)
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
