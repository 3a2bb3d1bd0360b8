// 🗂️ Session Store - append-only, insertion-ordered records for one session
//
// Owned by whoever runs the session (TUI app, HTTP server state, tests).
// Never a global. No delete, no update, no uniqueness check.

use crate::error::ReportError;
use crate::record::{StudentRecord, TABLE_COLUMNS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use tracing::debug;

// ============================================================================
// SEARCH
// ============================================================================

/// Search-by-name / search-by-roll fields of the form.
///
/// Case-insensitive substring match; blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "roll")]
    pub roll_number: String,
}

impl SearchQuery {
    pub fn new(name: impl Into<String>, roll_number: impl Into<String>) -> Self {
        SearchQuery {
            name: name.into(),
            roll_number: roll_number.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.roll_number.trim().is_empty()
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        contains_ignore_case(&record.name, &self.name)
            && contains_ignore_case(&record.roll_number, &self.roll_number)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ============================================================================
// SELECTION LIST
// ============================================================================

/// One entry of the "select a student" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub id: String,
    pub label: String,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    records: Vec<StudentRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            records: Vec::new(),
        }
    }

    /// Append a record; visible to `list_all` immediately
    pub fn append(&mut self, record: StudentRecord) {
        debug!(id = %record.id, name = %record.name, "appending record");
        self.records.push(record);
    }

    /// All records in submission order
    pub fn list_all(&self) -> &[StudentRecord] {
        &self.records
    }

    /// First record whose name matches exactly
    pub fn find_by_name(&self, name: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<&StudentRecord> {
        self.records.iter().filter(|r| query.matches(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selection list in submission order.
    ///
    /// Names submitted more than once get the roll number and an occurrence
    /// counter appended, e.g. `Sara (Roll 7) #2`.
    pub fn selection_options(&self) -> Vec<SelectionOption> {
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *name_counts.entry(record.name.as_str()).or_insert(0) += 1;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.records
            .iter()
            .map(|record| {
                let display_name = if record.name.is_empty() {
                    "(unnamed)"
                } else {
                    record.name.as_str()
                };

                let label = if name_counts[record.name.as_str()] > 1 {
                    let occurrence = seen.entry(record.name.as_str()).or_insert(0);
                    *occurrence += 1;
                    format!("{} (Roll {}) #{}", display_name, record.roll_number, occurrence)
                } else {
                    display_name.to_string()
                };

                SelectionOption {
                    id: record.id.clone(),
                    label,
                }
            })
            .collect()
    }

    /// Write the display table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        write_records_csv(self.records.iter(), writer)
    }
}

/// Write any sequence of records as the display table in CSV form
pub fn write_records_csv<'a, I, W>(records: I, writer: W) -> Result<(), ReportError>
where
    I: IntoIterator<Item = &'a StudentRecord>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TABLE_COLUMNS)?;
    for record in records {
        csv_writer.write_record(record.table_row())?;
    }
    csv_writer.flush()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
