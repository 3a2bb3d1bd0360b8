// ⚠️ Error Types - Record boundary + report rendering failures
//
// Library code returns these; binaries wrap them in anyhow with context.

use thiserror::Error;

/// Errors raised while turning form input into a record.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    /// A mark fell outside the 0-100 range accepted by the entry form.
    #[error("{subject} mark {value} is out of range (0-100)")]
    MarkOutOfRange { subject: String, value: i64 },

    /// A subject name that is not one of the five fixed subjects.
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// A payload did not provide a mark for every subject.
    #[error("missing mark for {0}")]
    MissingSubject(String),

    /// A comma-separated mark list could not be parsed.
    #[error("malformed marks '{input}': {reason}")]
    MalformedMarks { input: String, reason: String },
}

/// Errors raised while rendering or exporting documents.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The PDF writer failed to serialize the document.
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}
