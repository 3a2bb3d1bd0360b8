// 🎓 Student Record - one submitted form, derived fields fixed at creation
//
// Total, percentage and grade are computed once in `StudentRecord::new` and
// never touched again. There is no edit path.

use crate::grading::{self, Grade, Marks, Subject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Table column headers, in display order
pub const TABLE_COLUMNS: [&str; 10] = [
    "Name",
    "Roll Number",
    "Total Marks",
    "Percentage",
    "Grade",
    "Math",
    "Physics",
    "Urdu",
    "English",
    "Computer",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    /// Session-local identity, used to tell apart records sharing a name.
    /// Not a uniqueness constraint.
    pub id: String,

    // ========================================================================
    // FORM FIELDS
    // ========================================================================
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Roll Number")]
    pub roll_number: String,

    #[serde(rename = "Marks")]
    pub marks: Marks,

    // ========================================================================
    // DERIVED (computed once)
    // ========================================================================
    #[serde(rename = "Total Marks")]
    pub total_marks: u32,

    #[serde(rename = "Percentage")]
    pub percentage: f64,

    #[serde(rename = "Grade")]
    pub grade: Grade,

    pub created_at: DateTime<Utc>,
}

impl StudentRecord {
    /// Create a record from form input. Empty name/roll number are accepted.
    pub fn new(name: impl Into<String>, roll_number: impl Into<String>, marks: Marks) -> Self {
        let summary = grading::compute(&marks);

        StudentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            roll_number: roll_number.into(),
            marks,
            total_marks: summary.total_marks,
            percentage: summary.percentage,
            grade: summary.grade,
            created_at: Utc::now(),
        }
    }

    pub fn mark(&self, subject: Subject) -> u32 {
        self.marks.get(subject)
    }

    /// Cell values matching `TABLE_COLUMNS`
    pub fn table_row(&self) -> Vec<String> {
        let mut row = vec![
            self.name.clone(),
            self.roll_number.clone(),
            self.total_marks.to_string(),
            grading::format_percentage(self.percentage),
            self.grade.to_string(),
        ];
        row.extend(self.marks.iter().map(|(_, mark)| mark.to_string()));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_derives_fields_at_creation() {
        let record = StudentRecord::new("Ali", "12", Marks::new([90, 85, 70, 88, 95]));

        assert_eq!(record.total_marks, 428);
        assert_eq!(record.percentage, 85.6);
        assert_eq!(record.grade, Grade::APlus);
        assert_eq!(record.mark(Subject::English), 88);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_records_with_same_fields_get_distinct_ids() {
        let marks = Marks::new([50, 50, 50, 50, 50]);
        let a = StudentRecord::new("Sara", "1", marks);
        let b = StudentRecord::new("Sara", "1", marks);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_name_and_roll_allowed() {
        let record = StudentRecord::new("", "", Marks::default());
        assert_eq!(record.name, "");
        assert_eq!(record.grade, Grade::Fail);
    }

    #[test]
    fn test_table_row_matches_columns() {
        let record = StudentRecord::new("Ali", "12", Marks::new([90, 85, 70, 88, 95]));
        let row = record.table_row();

        assert_eq!(row.len(), TABLE_COLUMNS.len());
        assert_eq!(
            row,
            vec!["Ali", "12", "428", "85.6", "A+", "90", "85", "70", "88", "95"]
        );
    }

    #[test]
    fn test_serializes_with_column_names() {
        let record = StudentRecord::new("Ali", "12", Marks::new([90, 85, 70, 88, 95]));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["Name"], "Ali");
        assert_eq!(json["Roll Number"], "12");
        assert_eq!(json["Total Marks"], 428);
        assert_eq!(json["Grade"], "A+");
        assert_eq!(json["Marks"]["Computer"], 95);
    }
}
