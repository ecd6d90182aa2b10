//! On-screen preview of a submitted report.
//!
//! `build_preview` assembles a serializable view model; `render_text` lays it
//! out for a terminal. Flags are recomputed from each row, same as the PDF.

use std::fmt::Write as _;

use serde::Serialize;

use crate::lab_profile::{LabProfile, QualityEntry};
use crate::models::{Flag, ReportData};

const TEXT_WIDTH: usize = 78;

#[derive(Debug, Clone, Serialize)]
pub struct Letterhead {
    pub lab_name: String,
    pub tagline: String,
    pub address: String,
    pub contact: String,
    pub phones: String,
    pub mobiles: String,
    pub accreditation: String,
    pub certification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewRow {
    pub parameter: String,
    pub result: String,
    pub unit: String,
    pub reference_range: String,
    pub flag: Flag,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathologistBlock {
    pub name: String,
    pub credentials: String,
    pub digitally_signed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPreview {
    pub report_id: String,
    pub letterhead: Letterhead,
    pub title: String,
    pub test_type: String,
    pub patient_details: Vec<PreviewField>,
    pub results: Vec<PreviewRow>,
    pub notes: Option<String>,
    pub quality_assurance: Vec<QualityEntry>,
    pub pathologist: PathologistBlock,
    pub important_notes: Vec<String>,
    pub contact_footer: Vec<String>,
    pub generated_line: String,
}

pub fn build_preview(report: &ReportData, lab: &LabProfile) -> ReportPreview {
    let letterhead = Letterhead {
        lab_name: lab.name.clone(),
        tagline: lab.tagline.clone(),
        address: lab.address.clone(),
        contact: lab.contact_line(),
        phones: format!("Phone : {}", lab.phones),
        mobiles: format!("Mobile : {}", lab.mobiles),
        accreditation: lab.accreditation.clone(),
        certification: lab.certification.clone(),
    };

    let patient_details = vec![
        PreviewField { label: "LAB NO.", value: lab.lab_number.clone() },
        PreviewField { label: "DATE", value: report.test_date_display() },
        PreviewField { label: "REPORT ID", value: report.report_id().to_string() },
        PreviewField { label: "PATIENT NAME", value: report.patient_name().into() },
        PreviewField { label: "REF. BY DR.", value: report.doctor_name().into() },
        PreviewField { label: "SAMPLE COLL. AT", value: lab.sample_collection_site.clone() },
        PreviewField { label: "SEX", value: report.sex().to_string() },
        PreviewField { label: "AGE", value: report.age_display() },
    ];

    let results = report
        .test_results()
        .iter()
        .map(|row| PreviewRow {
            parameter: row.test_name.clone(),
            result: row.result.clone(),
            unit: row.unit.clone(),
            reference_range: row.reference_range.clone(),
            flag: row.flag(),
        })
        .collect();

    let notes = Some(report.notes().trim())
        .filter(|n| !n.is_empty())
        .map(String::from);

    ReportPreview {
        report_id: report.report_id().to_string(),
        letterhead,
        title: "PATHOLOGY REPORT".into(),
        test_type: report.test_type().into(),
        patient_details,
        results,
        notes,
        quality_assurance: lab.quality_assurance.clone(),
        pathologist: PathologistBlock {
            name: report.doctor_name().into(),
            credentials: lab.pathologist_credentials.clone(),
            digitally_signed: report.signature().is_some(),
        },
        important_notes: lab.important_notes.clone(),
        contact_footer: vec![
            format!("24/7 Helpline: {}", lab.helpline),
            format!("Email: {}", lab.reports_email),
            format!("Website: {}", lab.website),
        ],
        generated_line: format!(
            "This is a computer generated report and does not require physical signature. Report generated on {}",
            report.generated_at_display()
        ),
    }
}

impl ReportPreview {
    pub fn abnormal_count(&self) -> usize {
        self.results.iter().filter(|r| r.flag.is_abnormal()).count()
    }

    /// Plain-text rendition for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(TEXT_WIDTH);
        let thin = "-".repeat(TEXT_WIDTH);
        let lh = &self.letterhead;

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}  [{}]", lh.lab_name, lh.accreditation);
        let _ = writeln!(out, "{}  ({})", lh.tagline, lh.certification);
        for line in wrap_words(&lh.address, TEXT_WIDTH) {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out, "{}", lh.contact);
        let _ = writeln!(out, "{} | {}", lh.phones, lh.mobiles);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^width$}", self.title, width = TEXT_WIDTH);
        let _ = writeln!(out, "{:^width$}", self.test_type, width = TEXT_WIDTH);
        let _ = writeln!(out, "{thin}");

        for field in &self.patient_details {
            let _ = writeln!(out, "{:<16} {}", format!("{}:", field.label), field.value);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "LABORATORY RESULTS");
        let _ = writeln!(
            out,
            "{:<24} {:>10} {:<8} {:<18} {:<6}",
            "Parameter", "Result", "Units", "Reference Range", "Flag"
        );
        let _ = writeln!(out, "{thin}");
        for row in &self.results {
            let _ = writeln!(
                out,
                "{:<24} {:>10} {:<8} {:<18} {:<6}",
                row.parameter, row.result, row.unit, row.reference_range, row.flag
            );
        }

        if let Some(notes) = &self.notes {
            let _ = writeln!(out);
            let _ = writeln!(out, "CLINICAL NOTES");
            for line in notes.lines().flat_map(|l| wrap_words(l, TEXT_WIDTH)) {
                let _ = writeln!(out, "  {line}");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{thin}");
        for entry in &self.quality_assurance {
            let _ = writeln!(out, "{}: {}", entry.heading, entry.lines.join(", "));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Consultant Pathologist");
        let _ = writeln!(out, "  {}", self.pathologist.name);
        let _ = writeln!(out, "  {}", self.pathologist.credentials);
        if self.pathologist.digitally_signed {
            let _ = writeln!(out, "  [Digitally Signed]");
        }

        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "Important Notes:");
        for note in &self.important_notes {
            let _ = writeln!(out, "  * {note}");
        }
        let _ = writeln!(out, "Contact Information:");
        for line in &self.contact_footer {
            let _ = writeln!(out, "  {line}");
        }
        for line in wrap_words(&self.generated_line, TEXT_WIDTH) {
            let _ = writeln!(out, "{line}");
        }
        let _ = write!(out, "{rule}");
        out
    }
}

/// Greedy word wrap on character count. Words longer than a line are split
/// into `max_chars` pieces so no character is dropped. Always yields at
/// least one line.
pub(crate) fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(max_chars).map(|c| c.iter().collect::<String>()).peekable();
            while let Some(piece) = pieces.next() {
                if pieces.peek().is_some() {
                    lines.push(piece);
                } else {
                    current = piece;
                }
            }
            continue;
        }

        let needed = current.chars().count() + word_len + 1;
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
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
