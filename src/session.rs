//! Form/preview round trip for one operator.
//!
//! The session owns the draft form and the most recently submitted report.
//! `submit` moves to the preview, `back_to_form` returns to editing with the
//! draft refilled from that report.

use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::export;
use crate::form::ReportForm;
use crate::lab_profile::LabProfile;
use crate::models::ReportData;
use crate::pdf;
use crate::preview::{self, ReportPreview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Preview,
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    view: View,
    form: ReportForm,
    report: Option<ReportData>,
    lab: LabProfile,
}

impl ReportSession {
    pub fn new(lab: LabProfile) -> Self {
        Self::with_form(ReportForm::new(), lab)
    }

    /// Start editing an existing draft, e.g. one loaded from disk.
    pub fn with_form(form: ReportForm, lab: LabProfile) -> Self {
        Self {
            view: View::Form,
            form,
            report: None,
            lab,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn form(&self) -> &ReportForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ReportForm {
        &mut self.form
    }

    pub fn report(&self) -> Option<&ReportData> {
        self.report.as_ref()
    }

    /// Validate the draft and switch to the preview. On error the view and
    /// any previously submitted report are left untouched.
    pub fn submit(&mut self) -> Result<&ReportData, ReportError> {
        let report = self.form.submit()?;
        self.view = View::Preview;
        Ok(&*self.report.insert(report))
    }

    pub fn back_to_form(&mut self) {
        if let Some(report) = &self.report {
            self.form = ReportForm::from(report);
        }
        self.view = View::Form;
    }

    pub fn preview(&self) -> Result<ReportPreview, ReportError> {
        let report = self.current_report()?;
        Ok(preview::build_preview(report, &self.lab))
    }

    pub fn generate_pdf(&self) -> Result<GeneratedReport, ReportError> {
        let report = self.current_report()?;
        let bytes = pdf::generate_report_pdf(report, &self.lab)?;
        Ok(GeneratedReport {
            filename: export::report_filename(report.report_id(), report.patient_name()),
            bytes,
        })
    }

    /// Generate the PDF and save it under `dir`.
    pub fn download(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        let generated = self.generate_pdf()?;
        export::write_report(&generated.bytes, &generated.filename, dir)
    }

    fn current_report(&self) -> Result<&ReportData, ReportError> {
        self.report.as_ref().ok_or(ReportError::NoReport)
    }
}
