// 📝 Entry Form - framework-independent form state
//
// The form is the boundary: mark steppers keep every value inside 0-100, so
// the calculator never sees an out-of-range mark. Rendering lives in ui.rs.

use crate::grading::{Marks, Subject, MAX_MARK};
use crate::record::StudentRecord;
use crate::store::SearchQuery;

// ============================================================================
// MARK STEPPER
// ============================================================================

/// Integer input limited to 0-100, step 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkInput {
    value: u32,
}

impl MarkInput {
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn increment(&mut self) {
        self.value = (self.value + 1).min(MAX_MARK);
    }

    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Append a typed digit. Rejected (returns false) if the result would exceed 100.
    pub fn push_digit(&mut self, digit: char) -> bool {
        let Some(d) = digit.to_digit(10) else {
            return false;
        };
        let next = self.value * 10 + d;
        if next > MAX_MARK {
            return false;
        }
        self.value = next;
        true
    }

    pub fn backspace(&mut self) {
        self.value /= 10;
    }
}

// ============================================================================
// FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    SearchName,
    SearchRoll,
    Name,
    RollNumber,
    Mark(Subject),
}

impl FormField {
    /// Focus order, top to bottom
    pub const ORDER: [FormField; 9] = [
        FormField::SearchName,
        FormField::SearchRoll,
        FormField::Name,
        FormField::RollNumber,
        FormField::Mark(Subject::Math),
        FormField::Mark(Subject::Physics),
        FormField::Mark(Subject::Urdu),
        FormField::Mark(Subject::English),
        FormField::Mark(Subject::Computer),
    ];

    pub fn label(&self) -> String {
        match self {
            FormField::SearchName => "Search by Name".to_string(),
            FormField::SearchRoll => "Search by Roll Number".to_string(),
            FormField::Name => "Enter Student Name".to_string(),
            FormField::RollNumber => "Enter Roll Number".to_string(),
            FormField::Mark(subject) => format!("Enter {} marks", subject),
        }
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, FormField::Mark(_))
    }
}

// ============================================================================
// FORM
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub name: String,
    pub roll_number: String,
    pub search: SearchQuery,
    marks: [MarkInput; 5],
    focus: usize,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> FormField {
        FormField::ORDER[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ORDER.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = if self.focus == 0 {
            FormField::ORDER.len() - 1
        } else {
            self.focus - 1
        };
    }

    pub fn mark_input(&self, subject: Subject) -> &MarkInput {
        &self.marks[subject.index()]
    }

    fn mark_input_mut(&mut self, subject: Subject) -> &mut MarkInput {
        &mut self.marks[subject.index()]
    }

    pub fn set_mark(&mut self, subject: Subject, value: u32) {
        self.mark_input_mut(subject).value = value.min(MAX_MARK);
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        match self.focused() {
            FormField::SearchName => self.search.name.push(c),
            FormField::SearchRoll => self.search.roll_number.push(c),
            FormField::Name => self.name.push(c),
            FormField::RollNumber => self.roll_number.push(c),
            FormField::Mark(subject) => match c {
                '+' => self.mark_input_mut(subject).increment(),
                '-' => self.mark_input_mut(subject).decrement(),
                _ => {
                    self.mark_input_mut(subject).push_digit(c);
                }
            },
        }
    }

    pub fn backspace(&mut self) {
        match self.focused() {
            FormField::SearchName => {
                self.search.name.pop();
            }
            FormField::SearchRoll => {
                self.search.roll_number.pop();
            }
            FormField::Name => {
                self.name.pop();
            }
            FormField::RollNumber => {
                self.roll_number.pop();
            }
            FormField::Mark(subject) => self.mark_input_mut(subject).backspace(),
        }
    }

    /// Step the focused mark up; no-op on text fields
    pub fn increment(&mut self) {
        if let FormField::Mark(subject) = self.focused() {
            self.mark_input_mut(subject).increment();
        }
    }

    pub fn decrement(&mut self) {
        if let FormField::Mark(subject) = self.focused() {
            self.mark_input_mut(subject).decrement();
        }
    }

    pub fn marks(&self) -> Marks {
        let mut values = [0u32; 5];
        for (slot, input) in values.iter_mut().zip(self.marks.iter()) {
            *slot = input.value();
        }
        Marks::new(values)
    }

    /// Value shown for a field
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::SearchName => self.search.name.clone(),
            FormField::SearchRoll => self.search.roll_number.clone(),
            FormField::Name => self.name.clone(),
            FormField::RollNumber => self.roll_number.clone(),
            FormField::Mark(subject) => self.mark_input(subject).value().to_string(),
        }
    }

    /// Build a record from the current field values. Fields keep their values.
    pub fn submit(&self) -> StudentRecord {
        StudentRecord::new(self.name.trim(), self.roll_number.trim(), self.marks())
    }
}

// ============================================================================
// TESTS
// ============================================================================
