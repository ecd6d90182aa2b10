use thiserror::Error;

/// Form validation failures. Messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Age must be a whole number between 0 and 150 (got \"{0}\")")]
    InvalidAge(String),

    #[error("Invalid test date \"{0}\". Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{field} too long (max {max} chars)")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("No test row with id {0}")]
    UnknownTestRow(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Failed to load lab profile from {0}: {1}")]
    LabProfileLoad(String, String),

    #[error("Failed to parse lab profile {0}: {1}")]
    LabProfileParse(String, String),

    #[error("Failed to read report form {0}: {1}")]
    FormLoad(String, String),

    #[error("No report has been submitted")]
    NoReport,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let err = ValidationError::MissingField("Patient name");
        assert_eq!(err.to_string(), "Patient name is required");
    }

    #[test]
    fn validation_converts_into_report_error() {
        let err: ReportError = ValidationError::InvalidDate("31/12/2025".into()).into();
        assert!(matches!(err, ReportError::Validation(_)));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
