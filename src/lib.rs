pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod lab_profile;
pub mod models;
pub mod pdf;
pub mod preview;
pub mod reference_range;
pub mod session;
pub mod signature;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::form::ReportForm;
use crate::lab_profile::LabProfile;
use crate::session::ReportSession;
use crate::signature::Signature;

/// Command-line arguments of the `pathology-report` binary.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "pathology-report",
    version,
    about = "Submit a saved report form, print its preview and save the PDF"
)]
pub struct CliArgs {
    /// Saved report form (JSON)
    pub form_path: PathBuf,

    /// Directory for the PDF; defaults to the app's reports directory
    pub output_dir: Option<PathBuf>,

    /// Doctor's signature image (PNG or JPEG)
    #[arg(long)]
    pub signature: Option<PathBuf>,
}

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let lab = LabProfile::load_or_default(&config::lab_profile_path());
    match generate(&args, &lab) {
        Ok(path) => println!("Saved {}", path.display()),
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// Load the draft, submit it, print the preview and save the PDF.
fn generate(args: &CliArgs, lab: &LabProfile) -> Result<PathBuf, String> {
    let mut form = ReportForm::load(&args.form_path).map_err(|e| e.to_string())?;
    if let Some(path) = &args.signature {
        form.set_signature(Signature::from_file(path).map_err(|e| e.to_string())?);
    }

    let mut session = ReportSession::with_form(form, lab.clone());

    let preview = commands::submit_report(&mut session)?;
    println!("{}", preview.render_text());
    match preview.abnormal_count() {
        0 => println!("All results within reference range"),
        n => println!("{n} result(s) outside reference range"),
    }

    let dir = args.output_dir.clone().unwrap_or_else(config::reports_dir);
    commands::download_report_pdf(&session, &dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("pathology-report").chain(list.iter().copied()))
    }

    fn form_args(form_path: PathBuf, output_dir: PathBuf) -> CliArgs {
        CliArgs {
            form_path,
            output_dir: Some(output_dir),
            signature: None,
        }
    }

    #[test]
    fn parses_positional_and_signature() {
        let parsed = cli(&["form.json", "out", "--signature", "sig.png"]).unwrap();
        assert_eq!(parsed.form_path, PathBuf::from("form.json"));
        assert_eq!(parsed.output_dir, Some(PathBuf::from("out")));
        assert_eq!(parsed.signature, Some(PathBuf::from("sig.png")));
    }

    #[test]
    fn signature_flag_may_come_first() {
        let parsed = cli(&["--signature", "sig.png", "form.json"]).unwrap();
        assert_eq!(parsed.form_path, PathBuf::from("form.json"));
        assert_eq!(parsed.output_dir, None);
        assert_eq!(parsed.signature, Some(PathBuf::from("sig.png")));
    }

    #[test]
    fn output_dir_is_optional() {
        let parsed = cli(&["form.json"]).unwrap();
        assert_eq!(parsed.output_dir, None);
        assert_eq!(parsed.signature, None);
    }

    #[test]
    fn rejects_missing_or_extra_arguments() {
        assert!(cli(&[]).is_err());
        assert!(cli(&["a", "b", "c"]).is_err());
        assert!(cli(&["a", "--signature"]).is_err());
        assert!(cli(&["a", "--stamp", "x"]).is_err());
    }

    #[test]
    fn generate_writes_pdf_from_form_file() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.json");
        std::fs::write(
            &form_path,
            r#"{"patient_name":"Anil Pawar","age":"61","sex":"Male","test_date":"2025-04-01",
                "doctor_name":"Dr. V. Kale","test_type":"Lipid Profile"}"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let path = generate(&form_args(form_path, out.clone()), &LabProfile::default()).unwrap();
        assert!(path.starts_with(&out));
        assert!(path.to_string_lossy().ends_with("_Anil_Pawar.pdf"));
    }

    #[test]
    fn generate_reports_validation_message() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.json");
        std::fs::write(&form_path, r#"{"patient_name":"Anil Pawar"}"#).unwrap();

        let err = generate(&form_args(form_path, dir.path().to_path_buf()), &LabProfile::default())
            .unwrap_err();
        assert_eq!(err, "Age is required");
    }
}
