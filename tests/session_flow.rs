// End-to-end session scenarios through the public library API

use report_card::{
    report, EntryForm, Grade, Marks, ReportCard, Session, StudentRecord, Subject,
    TABLE_COLUMNS,
};

fn form_with(name: &str, roll: &str, marks: [u32; 5]) -> EntryForm {
    let mut form = EntryForm::new();
    form.name = name.to_string();
    form.roll_number = roll.to_string();
    for (subject, mark) in Subject::ALL.iter().zip(marks) {
        form.set_mark(*subject, mark);
    }
    form
}

#[test]
fn test_submit_select_and_download_ali() {
    let mut session = Session::new();
    let form = form_with("Ali", "12", [90, 85, 70, 88, 95]);

    let stored = session.submit(form.submit()).clone();
    assert_eq!(stored.total_marks, 428);
    assert_eq!(stored.percentage, 85.6);
    assert_eq!(stored.grade, Grade::APlus);

    // table shows one row
    let rows = session.table(&form.search);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].table_row().len(), TABLE_COLUMNS.len());

    // selection list offers Ali, download yields a PDF with the computed content
    let options = session.selection_options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, "Ali");

    let file = session
        .report_for_name("Ali")
        .unwrap()
        .expect("Ali should be downloadable");
    assert_eq!(file.file_name, "Ali_Report_Card.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert!(file.read_bytes().unwrap().starts_with(b"%PDF"));

    let text = ReportCard::from_record(&stored).text();
    for expected in [
        "Total Marks: 428",
        "Percentage: 85.6%",
        "Grade: A+",
        "Math: 90",
        "Physics: 85",
        "Urdu: 70",
        "English: 88",
        "Computer: 95",
    ] {
        assert!(text.contains(expected), "missing '{}' in:\n{}", expected, text);
    }
}

#[test]
fn test_downloaded_pdf_shows_computed_results() {
    let mut session = Session::new();
    session.submit(form_with("Ali", "12", [90, 85, 70, 88, 95]).submit());

    let file = session.report_for_name("Ali").unwrap().unwrap();
    let bytes = file.read_bytes().unwrap();

    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), 1);

    let page_text = document.extract_text(&[1]).unwrap();
    for expected in [
        "Student Report Card",
        "Name: Ali",
        "Roll Number: 12",
        "Total Marks: 428",
        "Percentage: 85.6%",
        "Grade: A+",
        "Math: 90",
        "Physics: 85",
        "Urdu: 70",
        "English: 88",
        "Computer: 95",
    ] {
        assert!(
            page_text.contains(expected),
            "missing '{}' in page text:\n{}",
            expected,
            page_text
        );
    }
}

#[test]
fn test_duplicate_names_both_listed() {
    let mut session = Session::new();
    let first = session
        .submit(StudentRecord::new("Sara", "7", Marks::new([80; 5])))
        .clone();
    let second = session
        .submit(StudentRecord::new("Sara", "9", Marks::new([30; 5])))
        .clone();

    let all = session.store().list_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);

    // by name: first match
    let by_name = session.store().find_by_name("Sara").unwrap();
    assert_eq!(by_name.id, first.id);

    // by selection: each duplicate reachable
    let options = session.selection_options();
    assert_eq!(options[0].label, "Sara (Roll 7) #1");
    assert_eq!(options[1].label, "Sara (Roll 9) #2");

    let file = session.report_for_id(&options[1].id).unwrap().unwrap();
    assert_eq!(file.file_name, "Sara_Report_Card.pdf");
}

#[test]
fn test_rendering_same_record_twice_matches() {
    let record = StudentRecord::new("Ali", "12", Marks::new([90, 85, 70, 88, 95]));

    let first = ReportCard::from_record(&record);
    let second = ReportCard::from_record(&record);
    assert_eq!(first.text(), second.text());
    assert_eq!(first.fingerprint(), second.fingerprint());

    let a = report::render_pdf(&first).unwrap();
    let b = report::render_pdf(&second).unwrap();
    assert!(a.starts_with(b"%PDF") && b.starts_with(b"%PDF"));
}

#[test]
fn test_sessions_are_independent() {
    let mut one = Session::new();
    let two = Session::new();

    one.submit(StudentRecord::new("Ali", "12", Marks::default()));

    assert_eq!(one.store().len(), 1);
    assert!(two.store().is_empty());
    assert!(two.report_for_name("Ali").unwrap().is_none());
}
