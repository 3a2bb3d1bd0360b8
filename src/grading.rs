// 🧮 Grade Calculator - Marks → total, percentage, grade tier
//
// Pure computation: no UI, no I/O, no validation. Range enforcement happens
// at the boundary (entry form / HTTP payload) before marks reach this module.

use crate::error::RecordError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Highest mark the entry form accepts for any subject
pub const MAX_MARK: u32 = 100;

// ============================================================================
// SUBJECTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Math,
    Physics,
    Urdu,
    English,
    Computer,
}

impl Subject {
    /// Fixed subject order used by the form, the table and the report
    pub const ALL: [Subject; 5] = [
        Subject::Math,
        Subject::Physics,
        Subject::Urdu,
        Subject::English,
        Subject::Computer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Physics => "Physics",
            Subject::Urdu => "Urdu",
            Subject::English => "English",
            Subject::Computer => "Computer",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Subject> {
        let wanted = name.trim();
        Subject::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Position in `Subject::ALL`
    pub(crate) fn index(&self) -> usize {
        match self {
            Subject::Math => 0,
            Subject::Physics => 1,
            Subject::Urdu => 2,
            Subject::English => 3,
            Subject::Computer => 4,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MARKS
// ============================================================================

/// One mark per subject, always held in `Subject::ALL` order.
///
/// Serializes as a map keyed by subject name (`{"Math": 90, ...}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "HashMap<String, i64>")]
pub struct Marks {
    values: [u32; 5],
}

impl Marks {
    /// Build from marks already known to be in range
    pub fn new(values: [u32; 5]) -> Self {
        Marks { values }
    }

    /// Build from untrusted values, rejecting anything outside 0-100
    pub fn try_from_values(values: [i64; 5]) -> Result<Self, RecordError> {
        let mut checked = [0u32; 5];
        for (subject, (slot, value)) in Subject::ALL.iter().zip(checked.iter_mut().zip(values)) {
            *slot = check_range(*subject, value)?;
        }
        Ok(Marks { values: checked })
    }

    /// Parse a comma-separated list such as `90,85,70,88,95`
    pub fn parse_list(input: &str) -> Result<Self, RecordError> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != Subject::ALL.len() {
            return Err(RecordError::MalformedMarks {
                input: input.to_string(),
                reason: format!("expected {} marks, got {}", Subject::ALL.len(), parts.len()),
            });
        }

        let mut values = [0i64; 5];
        for (slot, part) in values.iter_mut().zip(parts) {
            *slot = part.parse::<i64>().map_err(|e| RecordError::MalformedMarks {
                input: input.to_string(),
                reason: format!("'{}': {}", part, e),
            })?;
        }

        Marks::try_from_values(values)
    }

    pub fn get(&self, subject: Subject) -> u32 {
        self.values[subject.index()]
    }

    /// (subject, mark) pairs in fixed subject order
    pub fn iter(&self) -> impl Iterator<Item = (Subject, u32)> + '_ {
        Subject::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }
}

fn check_range(subject: Subject, value: i64) -> Result<u32, RecordError> {
    if (0..=MAX_MARK as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(RecordError::MarkOutOfRange {
            subject: subject.as_str().to_string(),
            value,
        })
    }
}

impl TryFrom<HashMap<String, i64>> for Marks {
    type Error = RecordError;

    fn try_from(raw: HashMap<String, i64>) -> Result<Self, Self::Error> {
        let mut values: [Option<i64>; 5] = [None; 5];
        for (name, value) in raw {
            let subject = Subject::from_name(&name).ok_or(RecordError::UnknownSubject(name))?;
            values[subject.index()] = Some(value);
        }

        let mut checked = [0i64; 5];
        for (subject, (slot, value)) in Subject::ALL.iter().zip(checked.iter_mut().zip(values)) {
            *slot = value.ok_or_else(|| RecordError::MissingSubject(subject.as_str().to_string()))?;
        }

        Marks::try_from_values(checked)
    }
}

impl Serialize for Marks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Subject::ALL.len()))?;
        for (subject, mark) in self.iter() {
            map.serialize_entry(subject.as_str(), &mark)?;
        }
        map.end()
    }
}

// ============================================================================
// GRADE
// ============================================================================

/// Grade tier, highest first.
///
/// `F` (40-49) and `Fail` (below 40) are distinct tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    F,
    Fail,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Grade::APlus
        } else if percentage >= 70.0 {
            Grade::A
        } else if percentage >= 60.0 {
            Grade::B
        } else if percentage >= 50.0 {
            Grade::C
        } else if percentage >= 40.0 {
            Grade::F
        } else {
            Grade::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
            Grade::Fail => "Fail",
        }
    }

    pub fn from_label(label: &str) -> Option<Grade> {
        match label {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "F" => Some(Grade::F),
            "Fail" => Some(Grade::Fail),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Grade::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown grade: {}", label)))
    }
}

// ============================================================================
// CALCULATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeSummary {
    pub total_marks: u32,
    /// Rounded to 2 decimals
    pub percentage: f64,
    pub grade: Grade,
}

/// Compute total, percentage and grade for one set of marks.
///
/// The grade is picked from the unrounded percentage.
pub fn compute(marks: &Marks) -> GradeSummary {
    let total_marks = marks.total();
    let percentage = total_marks as f64 / Subject::ALL.len() as f64;

    GradeSummary {
        total_marks,
        percentage: round_to_2dp(percentage),
        grade: Grade::from_percentage(percentage),
    }
}

pub fn round_to_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a percentage the way a rounded float prints: `85.6`, `85.0`, `85.25`
pub fn format_percentage(value: f64) -> String {
    let rounded = round_to_2dp(value);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_scenario_marks() {
        let marks = Marks::new([90, 85, 70, 88, 95]);
        let summary = compute(&marks);

        assert_eq!(summary.total_marks, 428);
        assert_eq!(summary.percentage, 85.6);
        assert_eq!(summary.grade, Grade::APlus);
    }

    #[test]
    fn test_total_and_percentage_consistent_across_range() {
        let steps = [0u32, 25, 50, 75, 100];
        for a in steps {
            for b in steps {
                for c in steps {
                    for d in [0u32, 33, 100] {
                        for e in [1u32, 99] {
                            let marks = Marks::new([a, b, c, d, e]);
                            let summary = compute(&marks);
                            let total = a + b + c + d + e;

                            assert_eq!(summary.total_marks, total);
                            assert_eq!(summary.percentage, round_to_2dp(total as f64 / 5.0));
                            assert_eq!((summary.percentage * 5.0).round() as u32, total);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_grade_boundaries() {
        let cases = [
            (80.0, "A+"),
            (79.99, "A"),
            (70.0, "A"),
            (69.99, "B"),
            (60.0, "B"),
            (59.99, "C"),
            (50.0, "C"),
            (49.99, "F"),
            (40.0, "F"),
            (39.99, "Fail"),
            (0.0, "Fail"),
        ];

        for (percentage, label) in cases {
            assert_eq!(
                Grade::from_percentage(percentage).as_str(),
                label,
                "percentage {}",
                percentage
            );
        }
    }

    #[test]
    fn test_f_and_fail_are_distinct_tiers() {
        assert_ne!(Grade::F, Grade::Fail);
        assert!(Grade::F < Grade::Fail);
        assert_eq!(compute(&Marks::new([45, 45, 45, 45, 45])).grade, Grade::F);
        assert_eq!(compute(&Marks::new([39, 39, 39, 39, 39])).grade, Grade::Fail);
    }

    #[test]
    fn test_marks_reject_out_of_range() {
        let err = Marks::try_from_values([90, 101, 70, 88, 95]).unwrap_err();
        assert_eq!(
            err,
            RecordError::MarkOutOfRange {
                subject: "Physics".to_string(),
                value: 101
            }
        );

        assert!(Marks::try_from_values([-1, 0, 0, 0, 0]).is_err());
        assert!(Marks::try_from_values([0, 0, 0, 0, 100]).is_ok());
    }

    #[test]
    fn test_index_matches_fixed_order() {
        for (i, subject) in Subject::ALL.iter().enumerate() {
            assert_eq!(subject.index(), i);
        }
    }

    #[test]
    fn test_parse_list() {
        let marks = Marks::parse_list("90, 85,70,88 ,95").unwrap();
        assert_eq!(marks.get(Subject::Urdu), 70);
        assert_eq!(marks.get(Subject::Computer), 95);

        assert!(matches!(
            Marks::parse_list("90,85"),
            Err(RecordError::MalformedMarks { .. })
        ));
        assert!(matches!(
            Marks::parse_list("90,85,x,88,95"),
            Err(RecordError::MalformedMarks { .. })
        ));
    }

    #[test]
    fn test_marks_json_map() {
        let marks: Marks = serde_json::from_str(
            r#"{"Math":90,"physics":85,"Urdu":70,"English":88,"Computer":95}"#,
        )
        .unwrap();
        assert_eq!(marks.total(), 428);

        let json = serde_json::to_string(&marks).unwrap();
        assert_eq!(
            json,
            r#"{"Math":90,"Physics":85,"Urdu":70,"English":88,"Computer":95}"#
        );

        let missing = serde_json::from_str::<Marks>(r#"{"Math":90}"#);
        assert!(missing.is_err());

        let unknown = serde_json::from_str::<Marks>(
            r#"{"Math":90,"Physics":85,"Urdu":70,"English":88,"Computer":95,"Art":1}"#,
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(85.6), "85.6");
        assert_eq!(format_percentage(85.0), "85.0");
        assert_eq!(format_percentage(85.25), "85.25");
        assert_eq!(format_percentage(0.0), "0.0");
    }
}
