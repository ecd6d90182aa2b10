//! Editable report draft and its submission into an immutable `ReportData`.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ValidationError};
use crate::models::report::ReportFields;
use crate::models::{ReportData, ReportId, Sex, TestResult};
use crate::signature::Signature;

const MAX_NAME_CHARS: usize = 200;
const MAX_NOTES_CHARS: usize = 5000;
const MAX_AGE_YEARS: u32 = 150;

/// Top-level form inputs addressable by `ReportForm::set_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    PatientName,
    Age,
    Sex,
    TestDate,
    DoctorName,
    TestType,
    Notes,
}

/// Editable cells of a results row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestColumn {
    TestName,
    Result,
    ReferenceRange,
    Unit,
}

/// Draft state of the report form. Values are kept as typed until submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub patient_name: String,
    pub age: String,
    pub sex: Sex,
    /// YYYY-MM-DD
    pub test_date: String,
    pub doctor_name: String,
    pub test_type: String,
    pub notes: String,
    pub test_results: Vec<TestResult>,
    pub signature: Option<Signature>,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            age: String::new(),
            sex: Sex::Male,
            test_date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            doctor_name: String::new(),
            test_type: String::new(),
            notes: String::new(),
            test_results: default_test_rows(),
            signature: None,
        }
    }
}

/// CBC rows every new form starts with.
fn default_test_rows() -> Vec<TestResult> {
    vec![
        TestResult::new("Hemoglobin", "", "12.0-16.0", "g/dL"),
        TestResult::new("White Blood Cells", "", "4,000-11,000", "/µL"),
        TestResult::new("Platelets", "", "150,000-450,000", "/µL"),
    ]
}

impl ReportForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a draft saved as JSON. Missing keys take the form defaults.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReportError::FormLoad(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| ReportError::FormLoad(path.display().to_string(), e.to_string()))
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ReportError> {
        match field {
            FormField::PatientName => self.patient_name = value.into(),
            FormField::Age => self.age = value.into(),
            FormField::Sex => self.sex = value.parse()?,
            FormField::TestDate => self.test_date = value.into(),
            FormField::DoctorName => self.doctor_name = value.into(),
            FormField::TestType => self.test_type = value.into(),
            FormField::Notes => self.notes = value.into(),
        }
        Ok(())
    }

    /// Append an empty row and return its id.
    pub fn add_test_row(&mut self) -> String {
        let row = TestResult::blank();
        let id = row.id.clone();
        self.test_results.push(row);
        id
    }

    pub fn remove_test_row(&mut self, id: &str) -> Result<TestResult, ValidationError> {
        let index = self
            .test_results
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| ValidationError::UnknownTestRow(id.into()))?;
        Ok(self.test_results.remove(index))
    }

    pub fn update_test_row(
        &mut self,
        id: &str,
        column: TestColumn,
        value: &str,
    ) -> Result<(), ValidationError> {
        let row = self
            .test_results
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| ValidationError::UnknownTestRow(id.into()))?;
        let cell = match column {
            TestColumn::TestName => &mut row.test_name,
            TestColumn::Result => &mut row.result,
            TestColumn::ReferenceRange => &mut row.reference_range,
            TestColumn::Unit => &mut row.unit,
        };
        *cell = value.into();
        Ok(())
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    /// Validate and freeze the draft, stamped with the current time.
    pub fn submit(&self) -> Result<ReportData, ReportError> {
        self.submit_at(Local::now())
    }

    pub fn submit_at(&self, now: DateTime<Local>) -> Result<ReportData, ReportError> {
        let fields = self.validate()?;
        let report_id = ReportId::generate(now);
        tracing::info!(
            report_id = %report_id,
            rows = fields.test_results.len(),
            has_signature = fields.signature.is_some(),
            "Report submitted"
        );
        Ok(ReportData::new(fields, report_id, now))
    }

    fn validate(&self) -> Result<ReportFields, ValidationError> {
        let patient_name = required(&self.patient_name, "Patient name")?;
        check_length(patient_name, "Patient name", MAX_NAME_CHARS)?;

        let age_text = required(&self.age, "Age")?;
        let age = age_text
            .parse::<u32>()
            .ok()
            .filter(|age| *age <= MAX_AGE_YEARS)
            .ok_or_else(|| ValidationError::InvalidAge(age_text.into()))?;

        let date_text = required(&self.test_date, "Test date")?;
        let test_date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_text.into()))?;

        let doctor_name = required(&self.doctor_name, "Doctor name")?;
        check_length(doctor_name, "Doctor name", MAX_NAME_CHARS)?;

        let test_type = required(&self.test_type, "Test type")?;
        check_length(test_type, "Test type", MAX_NAME_CHARS)?;

        check_length(&self.notes, "Notes", MAX_NOTES_CHARS)?;

        Ok(ReportFields {
            patient_name: patient_name.into(),
            age,
            sex: self.sex,
            test_date,
            doctor_name: doctor_name.into(),
            test_type: test_type.into(),
            test_results: self.test_results.clone(),
            notes: self.notes.trim().into(),
            signature: self.signature.clone(),
        })
    }
}

/// Re-open a submitted report for editing.
impl From<&ReportData> for ReportForm {
    fn from(report: &ReportData) -> Self {
        Self {
            patient_name: report.patient_name().into(),
            age: report.age().to_string(),
            sex: report.sex(),
            test_date: report.test_date().format("%Y-%m-%d").to_string(),
            doctor_name: report.doctor_name().into(),
            test_type: report.test_type().into(),
            notes: report.notes().into(),
            test_results: report.test_results().to_vec(),
            signature: report.signature().cloned(),
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

fn check_length(value: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_form() -> ReportForm {
        let mut form = ReportForm::new();
        form.set_field(FormField::PatientName, "Rahul Deshmukh").unwrap();
        form.set_field(FormField::Age, "45").unwrap();
        form.set_field(FormField::TestDate, "2025-06-02").unwrap();
        form.set_field(FormField::DoctorName, "Dr. S. Joshi").unwrap();
        form.set_field(FormField::TestType, "Complete Blood Count (CBC)").unwrap();
        form
    }

    fn submitted_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).single().unwrap()
    }

    #[test]
    fn new_form_has_seeded_rows_and_defaults() {
        let form = ReportForm::new();
        assert_eq!(form.sex, Sex::Male);
        assert_eq!(form.test_results.len(), 3);
        assert_eq!(form.test_results[0].test_name, "Hemoglobin");
        assert!(form.test_results.iter().all(|r| r.result.is_empty()));
        assert!(NaiveDate::parse_from_str(&form.test_date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn submit_keeps_every_row_in_order() {
        let mut form = filled_form();
        let extra = form.add_test_row();
        form.update_test_row(&extra, TestColumn::TestName, "ESR").unwrap();

        let report = form.submit_at(submitted_at()).unwrap();
        assert_eq!(report.test_results().len(), form.test_results.len());
        let names: Vec<&str> = report.test_results().iter().map(|r| r.test_name.as_str()).collect();
        assert_eq!(names, vec!["Hemoglobin", "White Blood Cells", "Platelets", "ESR"]);
    }

    #[test]
    fn blank_rows_are_not_dropped() {
        let mut form = filled_form();
        form.add_test_row();
        form.add_test_row();
        let report = form.submit_at(submitted_at()).unwrap();
        assert_eq!(report.test_results().len(), 5);
    }

    #[test]
    fn submit_populates_typed_fields() {
        let mut form = filled_form();
        form.set_field(FormField::Sex, "Other").unwrap();
        let report = form.submit_at(submitted_at()).unwrap();
        assert_eq!(report.patient_name(), "Rahul Deshmukh");
        assert_eq!(report.age(), 45);
        assert_eq!(report.sex(), Sex::Other);
        assert_eq!(report.test_date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(report.report_id().as_str().starts_with("BR-"));
        assert_eq!(report.generated_at(), submitted_at());
    }

    #[test]
    fn each_required_field_is_reported_by_name() {
        let cases: [(FormField, &str); 5] = [
            (FormField::PatientName, "Patient name"),
            (FormField::Age, "Age"),
            (FormField::TestDate, "Test date"),
            (FormField::DoctorName, "Doctor name"),
            (FormField::TestType, "Test type"),
        ];
        for (field, name) in cases {
            let mut form = filled_form();
            form.set_field(field, "   ").unwrap();
            let err = form.submit_at(submitted_at()).unwrap_err();
            assert!(
                matches!(err, ReportError::Validation(ValidationError::MissingField(f)) if f == name),
                "field {name}: {err}"
            );
        }
    }

    #[test]
    fn age_must_be_whole_and_plausible() {
        for bad in ["forty", "-3", "12.5", "151"] {
            let mut form = filled_form();
            form.set_field(FormField::Age, bad).unwrap();
            let err = form.submit_at(submitted_at()).unwrap_err();
            assert!(matches!(err, ReportError::Validation(ValidationError::InvalidAge(_))), "{bad}");
        }
    }

    #[test]
    fn test_date_must_be_iso() {
        let mut form = filled_form();
        form.set_field(FormField::TestDate, "02/06/2025").unwrap();
        let err = form.submit_at(submitted_at()).unwrap_err();
        assert!(matches!(err, ReportError::Validation(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn overlong_fields_rejected() {
        let mut form = filled_form();
        form.set_field(FormField::PatientName, &"x".repeat(201)).unwrap();
        let err = form.submit_at(submitted_at()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::FieldTooLong { field: "Patient name", max: 200 })
        ));
    }

    #[test]
    fn invalid_sex_rejected_at_entry() {
        let mut form = ReportForm::new();
        assert!(form.set_field(FormField::Sex, "F").is_err());
        assert_eq!(form.sex, Sex::Male);
    }

    #[test]
    fn remove_and_update_unknown_rows() {
        let mut form = ReportForm::new();
        let first = form.test_results[0].id.clone();
        let removed = form.remove_test_row(&first).unwrap();
        assert_eq!(removed.test_name, "Hemoglobin");
        assert_eq!(form.test_results.len(), 2);

        assert_eq!(
            form.remove_test_row(&first).unwrap_err(),
            ValidationError::UnknownTestRow(first.clone())
        );
        assert!(form.update_test_row(&first, TestColumn::Result, "1").is_err());
    }

    #[test]
    fn signature_set_and_cleared() {
        let mut form = filled_form();
        let sig = Signature::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        form.set_signature(sig.clone());
        let report = form.submit_at(submitted_at()).unwrap();
        assert_eq!(report.signature(), Some(&sig));

        form.clear_signature();
        let report = form.submit_at(submitted_at()).unwrap();
        assert!(report.signature().is_none());
    }

    #[test]
    fn reopening_a_report_restores_the_draft() {
        let mut form = filled_form();
        form.set_field(FormField::Notes, "Fasting sample").unwrap();
        let report = form.submit_at(submitted_at()).unwrap();
        let reopened = ReportForm::from(&report);
        assert_eq!(reopened, form);
    }

    #[test]
    fn load_reads_a_saved_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        let saved = filled_form();
        std::fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();
        assert_eq!(ReportForm::load(&path).unwrap(), saved);

        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(ReportForm::load(&path), Err(ReportError::FormLoad(..))));
    }

    #[test]
    fn partial_json_uses_form_defaults() {
        let form: ReportForm =
            serde_json::from_str(r#"{"patient_name":"Meera","age":"29","sex":"Female"}"#).unwrap();
        assert_eq!(form.patient_name, "Meera");
        assert_eq!(form.sex, Sex::Female);
        assert_eq!(form.test_results.len(), 3);
    }
}
