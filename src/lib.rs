// Student Report Card - Core Library
// Exposes all modules for use in the TUI, the HTTP server, and tests

pub mod error;
pub mod grading;
pub mod record;
pub mod store;
pub mod report;
pub mod form;
pub mod session;
pub mod config;
pub mod logging;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use error::{RecordError, ReportError};
pub use grading::{compute, Grade, GradeSummary, Marks, Subject};
pub use record::{StudentRecord, TABLE_COLUMNS};
pub use store::{SearchQuery, SelectionOption, SessionStore};
pub use report::{
    render_pdf, save_report, suggested_filename, write_temp_report,
    ReportCard, ReportFile, REPORT_CONTENT_TYPE,
};
pub use form::{EntryForm, FormField, MarkInput};
pub use session::Session;
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
