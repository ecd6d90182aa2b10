pub mod report;

pub use report::{download_report_pdf, edit_report, submit_report, PDF_ERROR_ALERT};
