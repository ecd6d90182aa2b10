//! Page layout for the PDF report.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of an
//! A4 page. Layout is pure: it turns a report into draw operations per page
//! and never touches the PDF library, so positions can be asserted in tests.

use crate::lab_profile::LabProfile;
use crate::models::{Flag, ReportData, TestResult};
use crate::preview::wrap_words;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 50.0;

/// Lowest point body content may reach; the footer lives below it.
const CONTENT_FLOOR: f32 = 80.0;

const TABLE_WIDTH: f32 = 480.0;
const COLUMN_OFFSETS: [f32; 5] = [0.0, 140.0, 220.0, 280.0, 400.0];
const COLUMN_WIDTHS: [f32; 5] = [140.0, 80.0, 60.0, 120.0, 80.0];
const TABLE_HEADERS: [&str; 5] = ["Parameter", "Result", "Units", "Reference Range", "Flag"];
const ROW_HEIGHT: f32 = 18.0;
const NOTES_WRAP_CHARS: usize = 80;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl PdfColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }
}

pub const PRIMARY_RED: PdfColor = PdfColor::rgb(0.8, 0.2, 0.2);
pub const DARK_GRAY: PdfColor = PdfColor::gray(0.2);
pub const LIGHT_GRAY: PdfColor = PdfColor::gray(0.5);
pub const BLACK: PdfColor = PdfColor::gray(0.0);
pub const WHITE: PdfColor = PdfColor::gray(1.0);
pub const SECTION_TEAL: PdfColor = PdfColor::rgb(0.047, 0.525, 0.533);
const TABLE_HEADER_FILL: PdfColor = PdfColor::gray(0.95);
const ZEBRA_FILL: PdfColor = PdfColor::gray(0.98);

pub fn flag_color(flag: Flag) -> PdfColor {
    match flag {
        Flag::High => PdfColor::rgb(0.8, 0.2, 0.2),
        Flag::Low => PdfColor::rgb(0.2, 0.4, 0.8),
        Flag::Normal => PdfColor::rgb(0.2, 0.6, 0.2),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        color: PdfColor,
    },
    /// Filled rectangle, (x, y) is the bottom-left corner.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: PdfColor,
    },
    /// Signature image anchored at its bottom-left corner. `scale` maps image
    /// pixels to points; the result is shrunk further to fit the box.
    Signature {
        x: f32,
        y: f32,
        scale: f32,
        max_width: f32,
        max_height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// First text op whose content equals `needle`.
    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(PageLayout::texts)
    }
}

/// Lay out `report` on as many A4 pages as it needs.
pub fn layout_report(report: &ReportData, lab: &LabProfile) -> ReportLayout {
    let mut builder = LayoutBuilder::new(report, lab);
    builder.letterhead();
    builder.title();
    builder.patient_details();
    builder.results_table();
    builder.clinical_notes();
    builder.signature_block();
    builder.finish()
}

struct LayoutBuilder<'a> {
    report: &'a ReportData,
    lab: &'a LabProfile,
    finished: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
}

impl<'a> LayoutBuilder<'a> {
    fn new(report: &'a ReportData, lab: &'a LabProfile) -> Self {
        Self {
            report,
            lab,
            finished: Vec::new(),
            current: PageLayout::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    // ── Primitives ──────────────────────────────────────────

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, weight: FontWeight, color: PdfColor) {
        if text.is_empty() {
            return;
        }
        self.current.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            weight,
            color,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: PdfColor) {
        self.current.ops.push(DrawOp::Rect { x, y, width, height, color });
    }

    /// Start a new page if the cursor cannot drop by `needed` without
    /// entering the footer. Returns true when a page break happened.
    fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y - needed >= CONTENT_FLOOR {
            return false;
        }
        self.continuation_page();
        true
    }

    /// Vertical gap before a section, skipped when the section moves to a new page.
    fn section_gap(&mut self, gap: f32, needed_after: f32) {
        if !self.ensure_space(gap + needed_after) {
            self.y -= gap;
        }
    }

    fn continuation_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;

        let heading = format!("{} | PATHOLOGY REPORT (continued)", self.lab.name);
        let subheading = format!(
            "Patient: {} | Report ID: {}",
            self.report.patient_name(),
            self.report.report_id()
        );
        self.text(&heading, MARGIN, self.y, 10.0, FontWeight::Bold, DARK_GRAY);
        self.text(&subheading, MARGIN, self.y - 14.0, 9.0, FontWeight::Regular, LIGHT_GRAY);
        self.y -= 40.0;
    }

    // ── Sections ────────────────────────────────────────────

    fn letterhead(&mut self) {
        let lab = self.lab;
        let content_width = PAGE_WIDTH - 2.0 * MARGIN;

        self.rect(0.0, PAGE_HEIGHT - 120.0, PAGE_WIDTH, 120.0, PRIMARY_RED);
        self.text(
            &fit_text(&lab.address, content_width, 8.0),
            MARGIN,
            PAGE_HEIGHT - 25.0,
            8.0,
            FontWeight::Regular,
            BLACK,
        );
        self.text(&lab.contact_line(), MARGIN, PAGE_HEIGHT - 37.0, 8.0, FontWeight::Regular, BLACK);
        self.text(&lab.name, MARGIN, PAGE_HEIGHT - 70.0, 18.0, FontWeight::Bold, WHITE);
        self.text(&lab.tagline, MARGIN, PAGE_HEIGHT - 90.0, 10.0, FontWeight::Regular, WHITE);
        self.text(
            &format!("Phone: {}", lab.phones),
            PAGE_WIDTH - 250.0,
            PAGE_HEIGHT - 110.0,
            8.0,
            FontWeight::Regular,
            WHITE,
        );
    }

    fn title(&mut self) {
        let title_y = PAGE_HEIGHT - 150.0;
        self.text("PATHOLOGY REPORT", PAGE_WIDTH / 2.0 - 80.0, title_y, 18.0, FontWeight::Bold, DARK_GRAY);

        let test_type = fit_text(self.report.test_type(), PAGE_WIDTH - 2.0 * MARGIN, 11.0);
        let x = centered_x(&test_type, 11.0);
        self.text(&test_type, x, title_y - 20.0, 11.0, FontWeight::Regular, LIGHT_GRAY);

        self.y = title_y - 50.0;
    }

    fn patient_details(&mut self) {
        let report = self.report;
        let rows = [
            ("LAB NO.:", self.lab.lab_number.clone()),
            ("REPORT ID:", report.report_id().to_string()),
            ("PATIENT NAME:", report.patient_name().to_string()),
            ("REF. BY DR.:", report.doctor_name().to_string()),
            ("SAMPLE COLL. AT:", self.lab.sample_collection_site.clone()),
            ("DATE:", report.test_date_display()),
            ("SEX:", report.sex().to_string()),
            ("AGE:", report.age_display()),
        ];

        self.text("PATIENT DETAILS", MARGIN, self.y, 14.0, FontWeight::Bold, SECTION_TEAL);
        self.y -= 25.0;

        let value_width = PAGE_WIDTH - 2.0 * MARGIN - 100.0;
        for (label, value) in rows {
            self.text(label, MARGIN, self.y, 10.0, FontWeight::Bold, DARK_GRAY);
            self.text(&fit_text(&value, value_width, 10.0), MARGIN + 100.0, self.y, 10.0, FontWeight::Regular, BLACK);
            self.y -= ROW_HEIGHT;
        }

        self.y -= 20.0;
    }

    fn results_table(&mut self) {
        // Heading, column header and at least one row stay together.
        self.ensure_space(30.0 + 25.0 + ROW_HEIGHT);
        self.text("LABORATORY RESULTS", MARGIN, self.y, 14.0, FontWeight::Bold, SECTION_TEAL);
        self.y -= 30.0;
        self.table_header();

        let report = self.report;
        for (index, row) in report.test_results().iter().enumerate() {
            if self.ensure_space(ROW_HEIGHT) {
                self.table_header();
            }
            self.table_row(index, row);
        }
    }

    fn table_header(&mut self) {
        self.rect(MARGIN - 5.0, self.y - 15.0, TABLE_WIDTH, 20.0, TABLE_HEADER_FILL);
        for (header, offset) in TABLE_HEADERS.iter().zip(COLUMN_OFFSETS) {
            self.text(header, MARGIN + offset, self.y - 5.0, 9.0, FontWeight::Bold, DARK_GRAY);
        }
        self.y -= 25.0;
    }

    fn table_row(&mut self, index: usize, row: &TestResult) {
        if index % 2 == 0 {
            self.rect(MARGIN - 5.0, self.y - 12.0, TABLE_WIDTH, 16.0, ZEBRA_FILL);
        }

        let flag = row.flag();
        let cells = [
            row.test_name.as_str(),
            row.result.as_str(),
            row.unit.as_str(),
            row.reference_range.as_str(),
            flag.as_str(),
        ];
        for (column, cell) in cells.iter().enumerate() {
            let color = if column == 4 { flag_color(flag) } else { BLACK };
            let clipped = fit_text(cell, COLUMN_WIDTHS[column] - 4.0, 9.0);
            self.text(&clipped, MARGIN + COLUMN_OFFSETS[column], self.y - 5.0, 9.0, FontWeight::Regular, color);
        }
        self.y -= ROW_HEIGHT;
    }

    fn clinical_notes(&mut self) {
        let lines: Vec<String> = self
            .report
            .notes()
            .lines()
            .flat_map(|line| wrap_words(line, NOTES_WRAP_CHARS))
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return;
        }

        self.section_gap(30.0, 25.0 + 15.0);
        self.text("CLINICAL NOTES", MARGIN, self.y, 14.0, FontWeight::Bold, SECTION_TEAL);
        self.y -= 25.0;

        for line in &lines {
            self.ensure_space(15.0);
            self.text(line, MARGIN, self.y, 10.0, FontWeight::Regular, DARK_GRAY);
            self.y -= 15.0;
        }
    }

    fn signature_block(&mut self) {
        if self.report.signature().is_none() {
            return;
        }

        self.section_gap(30.0, 100.0);
        let top = self.y;
        self.text("CONSULTANT PATHOLOGIST", MARGIN, top, 12.0, FontWeight::Bold, DARK_GRAY);
        self.current.ops.push(DrawOp::Signature {
            x: PAGE_WIDTH - 200.0,
            y: top - 80.0,
            scale: 0.5,
            max_width: 150.0,
            max_height: 70.0,
        });
        let doctor = self.report.doctor_name().to_string();
        self.text(&doctor, MARGIN, top - 40.0, 12.0, FontWeight::Bold, BLACK);
        let credentials = self.lab.pathologist_credentials.clone();
        self.text(&credentials, MARGIN, top - 55.0, 10.0, FontWeight::Regular, LIGHT_GRAY);
        self.y -= 100.0;
    }

    /// Close the last page and stamp footers on every page.
    fn finish(mut self) -> ReportLayout {
        self.finished.push(std::mem::take(&mut self.current));
        let total = self.finished.len();
        let disclaimer = self.lab.disclaimer.clone();
        let contact = self.lab.footer_contact_line();

        for (index, page) in self.finished.iter_mut().enumerate() {
            let mut footer = vec![
                footer_text(&disclaimer, MARGIN, 60.0, 8.0),
                footer_text(&contact, MARGIN, 45.0, 8.0),
                footer_text(&format!("Page {} of {}", index + 1, total), PAGE_WIDTH - MARGIN - 45.0, 45.0, 8.0),
            ];
            if index + 1 == total {
                footer.push(footer_text(
                    "------------ end of report ---------------",
                    PAGE_WIDTH / 2.0 - 100.0,
                    25.0,
                    10.0,
                ));
            }
            page.ops.extend(footer);
        }

        ReportLayout { pages: self.finished }
    }
}

fn footer_text(text: &str, x: f32, y: f32, size: f32) -> DrawOp {
    DrawOp::Text {
        text: text.into(),
        x,
        y,
        size,
        weight: FontWeight::Regular,
        color: LIGHT_GRAY,
    }
}

fn estimated_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM
}

fn centered_x(text: &str, size: f32) -> f32 {
    ((PAGE_WIDTH - estimated_width(text, size)) / 2.0).max(MARGIN)
}

/// Clip `text` with a trailing "..." so it fits `max_width` points.
fn fit_text(text: &str, max_width: f32, size: f32) -> String {
    if estimated_width(text, size) <= max_width {
        return text.to_string();
    }
    let max_chars = (max_width / (size * AVG_GLYPH_EM)).floor() as usize;
    let keep = max_chars.saturating_sub(3);
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str("...");
    clipped
}
