//! A4 PDF rendition of a submitted report.
//!
//! `layout` decides where everything goes, `render` paints it with printpdf.

pub mod layout;
pub mod render;

use tracing::{debug, info};

use crate::error::ReportError;
use crate::lab_profile::LabProfile;
use crate::models::ReportData;

pub use layout::{layout_report, DrawOp, FontWeight, PageLayout, PdfColor, ReportLayout};

/// Lay out and render `report`. Returns the PDF bytes.
pub fn generate_report_pdf(report: &ReportData, lab: &LabProfile) -> Result<Vec<u8>, ReportError> {
    let layout = layout_report(report, lab);
    debug!(
        report_id = %report.report_id(),
        pages = layout.page_count(),
        rows = report.test_results().len(),
        "Report laid out"
    );

    let title = format!("Pathology Report {}", report.report_id());
    let bytes = render::render_pdf(&layout, report.signature(), &title)?;
    info!(report_id = %report.report_id(), size = bytes.len(), "PDF generated");
    Ok(bytes)
}
