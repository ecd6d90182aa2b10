//! Output filename and on-disk delivery of generated PDFs.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ReportError;
use crate::models::ReportId;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `Pathology_Report_<id>_<patient name with whitespace runs as "_">.pdf`.
///
/// Path separators and NUL are dropped so the name never escapes the
/// output directory.
pub fn report_filename(report_id: &ReportId, patient_name: &str) -> String {
    let name: String = patient_name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .collect();
    let name = WHITESPACE_RUN.replace_all(&name, "_");
    format!("Pathology_Report_{report_id}_{name}.pdf")
}

/// Write `bytes` to `dir/filename`, creating `dir` first. Returns the file path.
pub fn write_report(bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), size = bytes.len(), "Report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_replaces_whitespace_runs() {
        let id = ReportId::from_millis(1_700_000_000_000);
        assert_eq!(
            report_filename(&id, "Asha  Patil"),
            "Pathology_Report_BR-1700000000000_Asha_Patil.pdf"
        );
        assert_eq!(
            report_filename(&id, "Ravi\tK  Menon"),
            "Pathology_Report_BR-1700000000000_Ravi_K_Menon.pdf"
        );
    }

    #[test]
    fn filename_is_deterministic() {
        let id = ReportId::from_millis(42);
        assert_eq!(report_filename(&id, "A B"), report_filename(&id, "A B"));
    }

    #[test]
    fn filename_strips_path_separators() {
        let id = ReportId::from_millis(1);
        let name = report_filename(&id, "../../etc/passwd");
        assert!(!name.contains('/'));
        assert_eq!(name, "Pathology_Report_BR-1_....etcpasswd.pdf");

        let name = report_filename(&id, "a\\b\0c");
        assert_eq!(name, "Pathology_Report_BR-1_abc.pdf");
    }

    #[test]
    fn write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2025");
        let path = write_report(b"%PDF-1.3 test", "r.pdf", &nested).unwrap();
        assert_eq!(path, nested.join("r.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3 test");
    }
}
