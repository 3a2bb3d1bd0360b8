// 🧑‍🏫 Session - one user's session: the store plus submit/download actions
//
// Each action runs to completion before the next one. Downloads never
// render when the selected record is absent.

use crate::error::ReportError;
use crate::record::StudentRecord;
use crate::report::{self, ReportFile};
use crate::store::{SearchQuery, SelectionOption, SessionStore};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Shown when the table has nothing to display
pub const EMPTY_TABLE_MESSAGE: &str = "No student records available.";

#[derive(Debug, Default)]
pub struct Session {
    store: SessionStore,
}

impl Session {
    pub fn new() -> Self {
        Session {
            store: SessionStore::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Append a submitted record and return it
    pub fn submit(&mut self, record: StudentRecord) -> &StudentRecord {
        info!(
            name = %record.name,
            roll_number = %record.roll_number,
            total = record.total_marks,
            grade = %record.grade,
            "record submitted"
        );
        self.store.append(record);
        let records = self.store.list_all();
        &records[records.len() - 1]
    }

    /// Rows for the display table, narrowed by the search fields
    pub fn table(&self, query: &SearchQuery) -> Vec<&StudentRecord> {
        self.store.search(query)
    }

    pub fn selection_options(&self) -> Vec<SelectionOption> {
        self.store.selection_options()
    }

    /// Render the selected record for download; `None` if nothing matches
    pub fn report_for_id(&self, id: &str) -> Result<Option<ReportFile>, ReportError> {
        match self.store.find_by_id(id) {
            Some(record) => report::write_temp_report(record).map(Some),
            None => {
                warn!(id, "download requested for unknown record");
                Ok(None)
            }
        }
    }

    /// Render the first record with this exact name; `None` if nothing matches
    pub fn report_for_name(&self, name: &str) -> Result<Option<ReportFile>, ReportError> {
        match self.store.find_by_name(name) {
            Some(record) => report::write_temp_report(record).map(Some),
            None => {
                warn!(name, "download requested for unknown student");
                Ok(None)
            }
        }
    }

    /// Save the selected record's report into `dir`; `None` if nothing matches
    pub fn save_report_for_id(
        &self,
        id: &str,
        dir: &Path,
    ) -> Result<Option<PathBuf>, ReportError> {
        match self.store.find_by_id(id) {
            Some(record) => report::save_report(record, dir).map(Some),
            None => Ok(None),
        }
    }
}

/// Confirmation shown after a successful submit
pub fn success_message(record: &StudentRecord) -> String {
    format!("Record of {} inserted successfully!", record.name)
}
