//! Report workflow commands.
//!
//! Three commands:
//! - `submit_report`: validate the form and return the preview
//! - `edit_report`: go back to the form, refilled from the report
//! - `download_report_pdf`: render the PDF and save it

use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::form::ReportForm;
use crate::preview::ReportPreview;
use crate::session::ReportSession;

/// Shown for any failure while building or saving the PDF.
pub const PDF_ERROR_ALERT: &str = "Error generating PDF. Please try again.";

/// Submits the draft. Validation problems come back as their own message.
pub fn submit_report(session: &mut ReportSession) -> Result<ReportPreview, String> {
    session.submit().map_err(|e| {
        tracing::warn!(error = %e, "Report submission rejected");
        match e {
            ReportError::Validation(v) => v.to_string(),
            other => other.to_string(),
        }
    })?;
    session.preview().map_err(|e| e.to_string())
}

/// Returns to the form. The returned draft holds the last submitted values.
pub fn edit_report(session: &mut ReportSession) -> Result<ReportForm, String> {
    session.back_to_form();
    Ok(session.form().clone())
}

/// Generates the PDF for the current report and writes it into `dir`.
pub fn download_report_pdf(session: &ReportSession, dir: &Path) -> Result<PathBuf, String> {
    session.download(dir).map_err(|e| {
        match &e {
            ReportError::NoReport => tracing::error!("PDF requested before a report was submitted"),
            _ => tracing::error!(error = %e, "PDF generation failed"),
        }
        PDF_ERROR_ALERT.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use crate::lab_profile::LabProfile;
    use crate::session::View;

    fn session_with(name: &str) -> ReportSession {
        let mut session = ReportSession::new(LabProfile::default());
        let form = session.form_mut();
        form.set_field(FormField::PatientName, name).unwrap();
        form.set_field(FormField::Age, "45").unwrap();
        form.set_field(FormField::DoctorName, "Dr. S. Iyer").unwrap();
        form.set_field(FormField::TestType, "Liver Function Test").unwrap();
        session
    }

    #[test]
    fn submit_returns_preview() {
        let mut session = session_with("Nikhil Rao");
        let preview = submit_report(&mut session).unwrap();
        assert_eq!(preview.test_type, "Liver Function Test");
        assert_eq!(session.view(), View::Preview);
    }

    #[test]
    fn submit_reports_the_missing_field() {
        let mut session = session_with("");
        let err = submit_report(&mut session).unwrap_err();
        assert_eq!(err, "Patient name is required");
        assert_eq!(session.view(), View::Form);
    }

    #[test]
    fn edit_returns_the_submitted_draft() {
        let mut session = session_with("Nikhil Rao");
        submit_report(&mut session).unwrap();
        let form = edit_report(&mut session).unwrap();
        assert_eq!(form.patient_name, "Nikhil Rao");
        assert_eq!(session.view(), View::Form);
    }

    #[test]
    fn download_without_report_shows_alert() {
        let dir = tempfile::tempdir().unwrap();
        let session = ReportSession::new(LabProfile::default());
        assert_eq!(download_report_pdf(&session, dir.path()).unwrap_err(), PDF_ERROR_ALERT);
    }

    #[test]
    fn download_failure_shows_alert() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let mut session = session_with("Nikhil Rao");
        submit_report(&mut session).unwrap();
        assert_eq!(download_report_pdf(&session, &blocker).unwrap_err(), PDF_ERROR_ALERT);
    }

    #[test]
    fn download_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with("Nikhil Rao");
        submit_report(&mut session).unwrap();
        let path = download_report_pdf(&session, dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_Nikhil_Rao.pdf"));
    }
}
