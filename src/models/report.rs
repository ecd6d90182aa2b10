use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use super::enums::Sex;
use super::test_result::TestResult;
use crate::signature::Signature;

/// Highest millisecond value handed out as a report id in this process.
static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// `BR-<unix millis>` of the submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Id for a submission at `now`. Never repeats within a process: a
    /// second submission in the same millisecond takes the next one.
    pub fn generate(now: DateTime<Local>) -> Self {
        let wanted = now.timestamp_millis();
        let mut current = LAST_ISSUED_MILLIS.load(Ordering::Relaxed);
        loop {
            let next = wanted.max(current + 1);
            match LAST_ISSUED_MILLIS.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self::from_millis(next),
                Err(actual) => current = actual,
            }
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(format!("BR-{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submitted report. Built once by `ReportForm::submit`, read-only after.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    patient_name: String,
    age: u32,
    sex: Sex,
    test_date: NaiveDate,
    doctor_name: String,
    test_type: String,
    test_results: Vec<TestResult>,
    notes: String,
    signature: Option<Signature>,
    report_id: ReportId,
    generated_at: DateTime<Local>,
}

/// Validated form values handed to `ReportData::new`.
pub(crate) struct ReportFields {
    pub patient_name: String,
    pub age: u32,
    pub sex: Sex,
    pub test_date: NaiveDate,
    pub doctor_name: String,
    pub test_type: String,
    pub test_results: Vec<TestResult>,
    pub notes: String,
    pub signature: Option<Signature>,
}

impl ReportData {
    pub(crate) fn new(fields: ReportFields, report_id: ReportId, generated_at: DateTime<Local>) -> Self {
        Self {
            patient_name: fields.patient_name,
            age: fields.age,
            sex: fields.sex,
            test_date: fields.test_date,
            doctor_name: fields.doctor_name,
            test_type: fields.test_type,
            test_results: fields.test_results,
            notes: fields.notes,
            signature: fields.signature,
            report_id,
            generated_at,
        }
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn test_date(&self) -> NaiveDate {
        self.test_date
    }

    pub fn doctor_name(&self) -> &str {
        &self.doctor_name
    }

    pub fn test_type(&self) -> &str {
        &self.test_type
    }

    pub fn test_results(&self) -> &[TestResult] {
        &self.test_results
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn report_id(&self) -> &ReportId {
        &self.report_id
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// DD/MM/YYYY
    pub fn test_date_display(&self) -> String {
        self.test_date.format("%d/%m/%Y").to_string()
    }

    pub fn age_display(&self) -> String {
        format!("{} Years", self.age)
    }

    pub fn generated_at_display(&self) -> String {
        self.generated_at.format("%d/%m/%Y, %H:%M:%S").to_string()
    }

    /// Fixture for rendering tests: three CBC rows, one of each flag.
    #[cfg(test)]
    pub(crate) fn sample() -> Self {
        use chrono::TimeZone;

        let generated_at = Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single().unwrap();
        Self::new(
            ReportFields {
                patient_name: "Asha Patil".into(),
                age: 34,
                sex: Sex::Female,
                test_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                doctor_name: "Dr. R. Kulkarni".into(),
                test_type: "Complete Blood Count (CBC)".into(),
                test_results: vec![
                    TestResult::new("Hemoglobin", "10.9", "12.0-16.0", "g/dL"),
                    TestResult::new("White Blood Cells", "7,800", "4,000-11,000", "/µL"),
                    TestResult::new("Platelets", "480,000", "150,000-450,000", "/µL"),
                ],
                notes: "Mild anemia. Repeat CBC after 4 weeks.".into(),
                signature: None,
            },
            ReportId::from_millis(1_741_924_800_000),
            generated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flag;
    use chrono::TimeZone;

    #[test]
    fn report_id_has_prefix_and_millis() {
        assert_eq!(ReportId::from_millis(1_700_000_000_123).as_str(), "BR-1700000000123");
    }

    #[test]
    fn same_millisecond_yields_distinct_ids() {
        let now = Local.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().unwrap();
        let a = ReportId::generate(now);
        let b = ReportId::generate(now);
        assert_ne!(a, b);
    }

    #[test]
    fn generated_id_is_at_least_submission_time() {
        let now = Local::now();
        let id = ReportId::generate(now);
        let millis: i64 = id.as_str().trim_start_matches("BR-").parse().unwrap();
        assert!(millis >= now.timestamp_millis());
    }

    #[test]
    fn display_helpers() {
        let report = ReportData::sample();
        assert_eq!(report.test_date_display(), "14/03/2025");
        assert_eq!(report.age_display(), "34 Years");
        assert_eq!(report.generated_at_display(), "14/03/2025, 09:30:00");
    }

    #[test]
    fn flags_are_derived_from_rows() {
        let report = ReportData::sample();
        let flags: Vec<Flag> = report.test_results().iter().map(TestResult::flag).collect();
        assert_eq!(flags, vec![Flag::Low, Flag::Normal, Flag::High]);
    }

    #[test]
    fn serializes_report_id_as_string() {
        let json = serde_json::to_value(ReportData::sample()).unwrap();
        assert_eq!(json["report_id"], "BR-1741924800000");
        assert_eq!(json["sex"], "Female");
    }
}
