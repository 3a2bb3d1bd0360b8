// 📄 Report Renderer - one record → one-page PDF report card
//
// Three steps, each usable on its own:
//   1. ReportCard::from_record  - textual content (what goes on the page)
//   2. layout                   - fixed positions, auto page break safeguard
//   3. render_pdf               - PDF bytes via printpdf
//
// Download handles (`ReportFile`) are backed by a temp file that disappears
// when the handle is dropped.

use crate::error::ReportError;
use crate::grading::format_percentage;
use crate::record::StudentRecord;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use sha2::{Digest, Sha256};
use std::fs;
use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// MIME type served with every report download
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";

pub const REPORT_TITLE: &str = "Student Report Card";

// A4 portrait, margins and line height in millimetres
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const SECTION_GAP_MM: f32 = 10.0;
const TITLE_CELL_WIDTH_MM: f32 = 200.0;
const PT_TO_MM: f32 = 0.3528;

// ============================================================================
// CONTENT MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Bold 16pt, centered
    Title,
    /// Bold 12pt
    Bold,
    /// Regular 12pt
    Body,
}

impl LineStyle {
    pub fn font_size(&self) -> f32 {
        match self {
            LineStyle::Title => 16.0,
            LineStyle::Bold | LineStyle::Body => 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub style: LineStyle,
    /// Vertical gap inserted before this line
    pub gap_before_mm: f32,
}

impl ReportLine {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        ReportLine {
            text: text.into(),
            style,
            gap_before_mm: 0.0,
        }
    }

    fn after_gap(mut self) -> Self {
        self.gap_before_mm = SECTION_GAP_MM;
        self
    }
}

/// Everything printed on a report card, in page order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCard {
    pub student_name: String,
    pub lines: Vec<ReportLine>,
}

impl ReportCard {
    pub fn from_record(record: &StudentRecord) -> Self {
        let mut lines = vec![
            ReportLine::new(REPORT_TITLE, LineStyle::Title),
            ReportLine::new(format!("Name: {}", record.name), LineStyle::Bold).after_gap(),
            ReportLine::new(format!("Roll Number: {}", record.roll_number), LineStyle::Bold),
            ReportLine::new(format!("Total Marks: {}", record.total_marks), LineStyle::Bold),
            ReportLine::new(
                format!("Percentage: {}%", format_percentage(record.percentage)),
                LineStyle::Bold,
            ),
            ReportLine::new(format!("Grade: {}", record.grade), LineStyle::Bold),
            ReportLine::new("Subject Wise Marks:", LineStyle::Bold).after_gap(),
        ];

        for (subject, mark) in record.marks.iter() {
            lines.push(ReportLine::new(format!("{}: {}", subject, mark), LineStyle::Body));
        }

        ReportCard {
            student_name: record.name.clone(),
            lines,
        }
    }

    /// Plain-text rendition, one line per printed line
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// SHA-256 of the textual content; equal for equal content
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text());
        format!("{:x}", hasher.finalize())
    }

    pub fn file_name(&self) -> String {
        suggested_filename(&self.student_name)
    }
}

/// `"{StudentName}_Report_Card.pdf"`
pub fn suggested_filename(student_name: &str) -> String {
    format!("{}_Report_Card.pdf", student_name)
}

/// Filename safe to create on disk: path separators and control characters replaced
fn disk_filename(student_name: &str) -> String {
    let cleaned: String = student_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    suggested_filename(&cleaned)
}

// ============================================================================
// LAYOUT
// ============================================================================

/// A line placed on a page. `y_mm` is the baseline measured from the page bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub page: usize,
    pub x_mm: f32,
    pub y_mm: f32,
    pub text: String,
    pub style: LineStyle,
}

/// Assign every line a page and position. Lines that would cross the bottom
/// margin start a new page.
pub fn layout(card: &ReportCard) -> Vec<PlacedLine> {
    let mut placed = Vec::with_capacity(card.lines.len());
    let mut page = 0;
    let mut cursor_from_top = MARGIN_MM;

    for line in &card.lines {
        cursor_from_top += line.gap_before_mm;
        if cursor_from_top + LINE_HEIGHT_MM > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            page += 1;
            cursor_from_top = MARGIN_MM;
        }

        let x_mm = match line.style {
            LineStyle::Title => centered_x(&line.text, line.style.font_size()),
            LineStyle::Bold | LineStyle::Body => MARGIN_MM,
        };

        placed.push(PlacedLine {
            page,
            x_mm,
            // baseline sits in the lower part of the cell
            y_mm: PAGE_HEIGHT_MM - cursor_from_top - LINE_HEIGHT_MM * 0.7,
            text: line.text.clone(),
            style: line.style,
        });

        cursor_from_top += LINE_HEIGHT_MM;
    }

    placed
}

/// Approximate centering within the title cell; Helvetica glyphs average ~0.55em
fn centered_x(text: &str, font_size: f32) -> f32 {
    let width = text.chars().count() as f32 * font_size * 0.55 * PT_TO_MM;
    (MARGIN_MM + (TITLE_CELL_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}

pub fn page_count(placed: &[PlacedLine]) -> usize {
    placed.iter().map(|p| p.page + 1).max().unwrap_or(1)
}

// ============================================================================
// PDF OUTPUT
// ============================================================================

pub fn render_pdf(card: &ReportCard) -> Result<Vec<u8>, ReportError> {
    let placed = layout(card);

    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let bold: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let regular: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..page_count(&placed) {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for line in &placed {
        let font = match line.style {
            LineStyle::Title | LineStyle::Bold => &bold,
            LineStyle::Body => &regular,
        };
        layers[line.page].use_text(
            line.text.clone(),
            line.style.font_size(),
            Mm(line.x_mm),
            Mm(line.y_mm),
            font,
        );
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    debug!(
        student = %card.student_name,
        pages = page_count(&placed),
        bytes = bytes.len(),
        "rendered report PDF"
    );

    Ok(bytes)
}

// ============================================================================
// DOWNLOAD HANDLES
// ============================================================================

/// A rendered report ready for download
pub struct ReportFile {
    file: NamedTempFile,
    pub file_name: String,
    pub content_type: &'static str,
}

impl ReportFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, ReportError> {
        Ok(fs::read(self.file.path())?)
    }
}

impl std::fmt::Debug for ReportFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportFile")
            .field("path", &self.file.path())
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Render a record into a temp file handle
pub fn write_temp_report(record: &StudentRecord) -> Result<ReportFile, ReportError> {
    let card = ReportCard::from_record(record);
    let bytes = render_pdf(&card)?;

    let mut file = tempfile::Builder::new()
        .prefix("report-card-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;

    info!(student = %record.name, path = ?file.path(), "report ready for download");

    Ok(ReportFile {
        file,
        file_name: card.file_name(),
        content_type: REPORT_CONTENT_TYPE,
    })
}

// Upper bound on `Name_Report_Card (n).pdf` candidates tried in one directory
const MAX_SAVE_ATTEMPTS: usize = 10_000;

/// Render a record into `dir`, creating it if needed. Returns the written path.
///
/// Never overwrites: when `Sara_Report_Card.pdf` already exists the report
/// goes to `Sara_Report_Card (2).pdf`, then `(3)`, and so on.
pub fn save_report(record: &StudentRecord, dir: &Path) -> Result<PathBuf, ReportError> {
    let card = ReportCard::from_record(record);
    let bytes = render_pdf(&card)?;

    fs::create_dir_all(dir)?;
    let base = disk_filename(&record.name);

    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let path = dir.join(numbered_filename(&base, attempt));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = ?path, "report file exists, trying next name");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&bytes)?;
        file.flush()?;

        info!(student = %record.name, path = ?path, "report saved");
        return Ok(path);
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for {} in {}", base, dir.display()),
    )
    .into())
}

/// `Ali_Report_Card.pdf` for the first attempt, `Ali_Report_Card (n).pdf` after
fn numbered_filename(base: &str, attempt: usize) -> String {
    if attempt <= 1 {
        return base.to_string();
    }
    match base.strip_suffix(".pdf") {
        Some(stem) => format!("{} ({}).pdf", stem, attempt),
        None => format!("{} ({})", base, attempt),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Marks;

    fn ali() -> StudentRecord {
        StudentRecord::new("Ali", "12", Marks::new([90, 85, 70, 88, 95]))
    }

    #[test]
    fn test_report_content_in_fixed_order() {
        let card = ReportCard::from_record(&ali());
        let texts: Vec<&str> = card.lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "Student Report Card",
                "Name: Ali",
                "Roll Number: 12",
                "Total Marks: 428",
                "Percentage: 85.6%",
                "Grade: A+",
                "Subject Wise Marks:",
                "Math: 90",
                "Physics: 85",
                "Urdu: 70",
                "English: 88",
                "Computer: 95",
            ]
        );
        assert_eq!(card.lines[0].style, LineStyle::Title);
        assert_eq!(card.lines[7].style, LineStyle::Body);
    }

    #[test]
    fn test_rendering_is_idempotent_in_content() {
        let record = ali();
        let first = ReportCard::from_record(&record);
        let second = ReportCard::from_record(&record);

        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());

        let other = ReportCard::from_record(&StudentRecord::new(
            "Ali",
            "12",
            Marks::new([90, 85, 70, 88, 94]),
        ));
        assert_ne!(first.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("Ali"), "Ali_Report_Card.pdf");
        assert_eq!(suggested_filename(""), "_Report_Card.pdf");
        assert_eq!(disk_filename("a/b"), "a_b_Report_Card.pdf");
    }

    #[test]
    fn test_layout_fits_one_page() {
        let placed = layout(&ReportCard::from_record(&ali()));

        assert_eq!(page_count(&placed), 1);
        assert!(placed.iter().all(|p| p.y_mm > BOTTOM_MARGIN_MM));
        // top to bottom
        assert!(placed.windows(2).all(|w| w[0].y_mm > w[1].y_mm));
        assert!(placed[0].x_mm > MARGIN_MM);
        assert_eq!(placed[1].x_mm, MARGIN_MM);
    }

    #[test]
    fn test_layout_breaks_long_content_onto_new_page() {
        let mut card = ReportCard::from_record(&ali());
        for i in 0..30 {
            card.lines.push(ReportLine::new(format!("Extra {}", i), LineStyle::Body));
        }

        let placed = layout(&card);
        assert_eq!(page_count(&placed), 2);
        assert!(placed.iter().all(|p| p.y_mm > BOTTOM_MARGIN_MM - LINE_HEIGHT_MM));
    }

    #[test]
    fn test_render_pdf_produces_pdf_bytes() {
        let bytes = render_pdf(&ReportCard::from_record(&ali())).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_temp_report_handle() {
        let file = write_temp_report(&ali()).unwrap();

        assert_eq!(file.file_name, "Ali_Report_Card.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert!(file.path().exists());
        assert!(file.read_bytes().unwrap().starts_with(b"%PDF"));

        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_report_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");

        let path = save_report(&ali(), &out).unwrap();
        assert_eq!(path, out.join("Ali_Report_Card.pdf"));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_report_keeps_same_named_reports() {
        let dir = tempfile::tempdir().unwrap();
        let first = StudentRecord::new("Sara", "7", Marks::new([90, 90, 90, 90, 90]));
        let second = StudentRecord::new("Sara", "8", Marks::new([30, 30, 30, 30, 30]));

        let first_path = save_report(&first, dir.path()).unwrap();
        let second_path = save_report(&second, dir.path()).unwrap();

        assert_eq!(first_path, dir.path().join("Sara_Report_Card.pdf"));
        assert_eq!(second_path, dir.path().join("Sara_Report_Card (2).pdf"));

        let saved = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(saved, 2);
        assert_ne!(fs::read(&first_path).unwrap(), fs::read(&second_path).unwrap());
    }

    #[test]
    fn test_numbered_filename() {
        assert_eq!(numbered_filename("Ali_Report_Card.pdf", 1), "Ali_Report_Card.pdf");
        assert_eq!(numbered_filename("Ali_Report_Card.pdf", 3), "Ali_Report_Card (3).pdf");
    }
}
