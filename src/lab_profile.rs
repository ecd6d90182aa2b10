//! Letterhead and fixed wording of the issuing laboratory.
//!
//! Every key is optional in `lab_profile.json`; missing keys fall back to the
//! built-in Vaishnavi Pathology Laboratory values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One column of the quality-assurance block ("Tested By", "Method", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEntry {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabProfile {
    pub name: String,
    pub tagline: String,
    pub address: String,
    pub email: String,
    pub website: String,
    pub phones: String,
    pub mobiles: String,
    pub accreditation: String,
    pub certification: String,
    pub lab_number: String,
    pub sample_collection_site: String,
    /// Printed under the consultant's name.
    pub pathologist_credentials: String,
    pub helpline: String,
    pub reports_email: String,
    pub disclaimer: String,
    pub important_notes: Vec<String>,
    pub quality_assurance: Vec<QualityEntry>,
}

impl Default for LabProfile {
    fn default() -> Self {
        Self {
            name: "Vaishnavi Pathology Laboratory".into(),
            tagline: "CONSULTING, DEVELOPMENT, SUPPORT".into(),
            address: "Near Aasra Bridge, Shop No 3, Ashok Nagar, Vijapur Road Near Sushil Kumar Shinde Building, Solapur-413004".into(),
            email: "contact@vaishnavipathology.com".into(),
            website: "www.vaishnavipathology.com".into(),
            phones: "022-21022438 / 21021849 / 65883968".into(),
            mobiles: "9820373936 / 9920548030".into(),
            accreditation: "NABL VERIFIED".into(),
            certification: "NSIC-CRISIL: SE3C".into(),
            lab_number: "5".into(),
            sample_collection_site: "VAISHNAVI LAB".into(),
            pathologist_credentials: "MD (Pathology), Reg. No: MCI-12345".into(),
            helpline: "+91-9876543210".into(),
            reports_email: "reports@vaishnavipathology.com".into(),
            disclaimer: "This is a computer generated report. Results are based on sample provided.".into(),
            important_notes: vec![
                "This report is valid only with authorized signature".into(),
                "Results are based on sample provided".into(),
                "Please correlate with clinical findings".into(),
            ],
            quality_assurance: vec![
                QualityEntry {
                    heading: "Tested By".into(),
                    lines: vec!["Lab Technician".into(), "Reg. No: LT-2024-001".into()],
                },
                QualityEntry {
                    heading: "Verified By".into(),
                    lines: vec!["Senior Technologist".into(), "Reg. No: ST-2024-005".into()],
                },
                QualityEntry {
                    heading: "Method".into(),
                    lines: vec!["Automated Analyzer".into(), "Sysmex XN-1000".into()],
                },
            ],
        }
    }
}

impl LabProfile {
    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReportError::LabProfileLoad(path.display().to_string(), e.to_string())
        })?;
        serde_json::from_str(&json).map_err(|e| {
            ReportError::LabProfileParse(path.display().to_string(), e.to_string())
        })
    }

    /// Load `path` if it exists, otherwise (or on any error) the built-in profile.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No lab profile file, using built-in letterhead");
            return Self::default();
        }
        match Self::load(path) {
            Ok(profile) => {
                tracing::info!(lab = %profile.name, "Loaded lab profile");
                profile
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to built-in lab profile");
                Self::default()
            }
        }
    }

    /// "E-mail: ... | www..." line used on the PDF letterhead.
    pub fn contact_line(&self) -> String {
        format!("E-mail: {} | {}", self.email, self.website)
    }

    pub fn footer_contact_line(&self) -> String {
        format!("24/7 Helpline: {} | Email: {}", self.helpline, self.reports_email)
    }
}
