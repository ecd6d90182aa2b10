use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Pathology Report";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the application data directory when set.
pub const HOME_ENV_VAR: &str = "PATHOLOGY_REPORT_HOME";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "pathology_report_lib=info,pathology_report=info"
}

/// Get the application data directory.
/// `$PATHOLOGY_REPORT_HOME` if set, else ~/PathologyReports/.
pub fn app_data_dir() -> PathBuf {
    resolve_app_data_dir(std::env::var_os(HOME_ENV_VAR).map(PathBuf::from))
}

fn resolve_app_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("PathologyReports"),
    }
}

/// Default directory generated PDFs are written to.
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

/// Lab letterhead overrides, read if present.
pub fn lab_profile_path() -> PathBuf {
    app_data_dir().join("lab_profile.json")
}
