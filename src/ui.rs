use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use report_card::form::{EntryForm, FormField};
use report_card::grading::{self, Grade};
use report_card::record::{StudentRecord, TABLE_COLUMNS};
use report_card::session::{self, Session, EMPTY_TABLE_MESSAGE};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AddStudent,
    ReportCards,
    Download,
    About,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::AddStudent => Page::ReportCards,
            Page::ReportCards => Page::Download,
            Page::Download => Page::About,
            Page::About => Page::AddStudent,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::AddStudent => Page::About,
            Page::ReportCards => Page::AddStudent,
            Page::Download => Page::ReportCards,
            Page::About => Page::Download,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::AddStudent => "Add Student",
            Page::ReportCards => "Report Cards",
            Page::Download => "Download",
            Page::About => "About",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

pub struct App {
    pub session: Session,
    pub form: EntryForm,
    pub state: TableState,
    pub download_state: ListState,
    pub current_page: Page,
    pub show_detail: bool,
    pub status: Option<StatusMessage>,
    pub output_dir: PathBuf,
}

impl App {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            session: Session::new(),
            form: EntryForm::new(),
            state: TableState::default(),
            download_state: ListState::default(),
            current_page: Page::AddStudent,
            show_detail: false,
            status: None,
            output_dir,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Rows shown in the report card table (narrowed by the search fields)
    pub fn visible_records(&self) -> Vec<&StudentRecord> {
        self.session.table(&self.form.search)
    }

    pub fn selected_record(&self) -> Option<&StudentRecord> {
        let records = self.visible_records();
        self.state.selected().and_then(|i| records.get(i).copied())
    }

    pub fn submit(&mut self) {
        let record = self.form.submit();
        let message = session::success_message(self.session.submit(record));
        self.set_status(message, StatusKind::Success);

        if self.state.selected().is_none() {
            self.state.select(Some(0));
        }
        if self.download_state.selected().is_none() {
            self.download_state.select(Some(0));
        }
    }

    /// Save the report of the student highlighted on the Download page
    pub fn download_selected(&mut self) {
        let options = self.session.selection_options();
        let Some(option) = self.download_state.selected().and_then(|i| options.get(i)) else {
            self.set_status(EMPTY_TABLE_MESSAGE, StatusKind::Info);
            return;
        };

        match self.session.save_report_for_id(&option.id, &self.output_dir) {
            Ok(Some(path)) => {
                self.set_status(format!("Saved {}", path.display()), StatusKind::Success)
            }
            Ok(None) => self.set_status(EMPTY_TABLE_MESSAGE, StatusKind::Info),
            Err(e) => {
                error!("Error saving report for {}: {}", option.label, e);
                self.set_status(format!("Could not save report: {}", e), StatusKind::Error);
            }
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.clamp_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.clamp_selection();
    }

    /// Keep the table cursor inside the (possibly narrowed) row set
    fn clamp_selection(&mut self) {
        let len = self.visible_records().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(20),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn next_option(&mut self) {
        let len = self.session.store().len();
        if len == 0 {
            return;
        }
        let i = self.download_state.selected().map_or(0, |i| (i + 1) % len);
        self.download_state.select(Some(i));
    }

    pub fn previous_option(&mut self) {
        let len = self.session.store().len();
        if len == 0 {
            return;
        }
        let i = self
            .download_state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.download_state.select(Some(i));
    }

    /// Apply one key press. Returns false when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return false;
        }

        match key.code {
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
                return true;
            }
            KeyCode::BackTab => {
                self.previous_page();
                return true;
            }
            _ => {}
        }

        match self.current_page {
            Page::AddStudent => self.handle_form_key(key),
            Page::ReportCards => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Enter => self.toggle_detail(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::PageDown => self.page_down(),
                KeyCode::PageUp => self.page_up(),
                KeyCode::Home => self.state.select(Some(0)),
                KeyCode::End => {
                    let len = self.visible_records().len();
                    if len > 0 {
                        self.state.select(Some(len - 1));
                    }
                }
                _ => {}
            },
            Page::Download => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Down | KeyCode::Char('j') => self.next_option(),
                KeyCode::Up | KeyCode::Char('k') => self.previous_option(),
                KeyCode::Enter | KeyCode::Char('d') => self.download_selected(),
                _ => {}
            },
            Page::About => {
                if key.code == KeyCode::Char('q') {
                    return false;
                }
            }
        }

        true
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Up => self.form.focus_previous(),
            KeyCode::Right => self.form.increment(),
            KeyCode::Left => self.form.decrement(),
            KeyCode::Backspace => {
                self.form.backspace();
                self.clamp_selection();
            }
            KeyCode::Char(c) => {
                self.form.input_char(c);
                self.clamp_selection();
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, event::read);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Terminal UI failed")
}

fn run_app<B, E>(terminal: &mut Terminal<B>, app: &mut App, mut next_event: E) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    E: FnMut() -> io::Result<Event>,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = next_event()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::ReportCards {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::AddStudent => render_form(f, chunks[1], app),
            Page::ReportCards => render_table(f, chunks[1], app),
            Page::Download => render_download(f, chunks[1], app),
            Page::About => render_about(f, chunks[1]),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::APlus | Grade::A => Color::Green,
        Grade::B | Grade::C => Color::Yellow,
        Grade::F => Color::LightRed,
        Grade::Fail => Color::Red,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::AddStudent, Page::ReportCards, Page::Download, Page::About];

    let mut tab_spans = vec![Span::styled(
        "🎓 Student Report Card  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Records: {}", app.session.store().len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let focused = app.form.focused();
    let mut lines = vec![Line::from("")];

    for field in FormField::ORDER {
        if field == FormField::SearchName {
            lines.push(section_heading("  🔍 Search Existing Report Card"));
        }
        if field == FormField::Name {
            lines.push(Line::from(""));
            lines.push(section_heading("  📝 Add New Student"));
        }

        let is_focused = field == focused;
        let marker = if is_focused {
            Span::styled("→ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("  ")
        };
        let value = app.form.display_value(field);
        let value_span = if field.is_mark() {
            Span::styled(
                format!("◀ {:>3} ▶", value),
                Style::default().fg(if is_focused { Color::Yellow } else { Color::White }),
            )
        } else {
            Span::styled(
                if is_focused { format!("{}█", value) } else { value },
                Style::default().fg(if is_focused { Color::Yellow } else { Color::White }),
            )
        };

        lines.push(Line::from(vec![
            Span::raw("  "),
            marker,
            Span::styled(
                format!("{:<24}", field.label()),
                Style::default().fg(Color::Cyan),
            ),
            value_span,
        ]));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Student Form "),
    );
    f.render_widget(form, chunks[0]);

    // Live preview of what Enter would submit
    let summary = grading::compute(&app.form.marks());
    let preview = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total Marks: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(summary.total_marks.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Percentage: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}%", grading::format_percentage(summary.percentage))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Grade: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                summary.grade.to_string(),
                Style::default()
                    .fg(grade_color(summary.grade))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────"),
        Line::from(""),
        hint_line("  ↑/↓", " field   "),
        hint_line("  ←/→ +/-", " marks   "),
        hint_line("  Enter", " add student"),
    ];

    let preview_panel = Paragraph::new(preview).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Preview "),
    );
    f.render_widget(preview_panel, chunks[1]);
}

fn section_heading(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )])
}

fn hint_line(key: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" 📄 All Student Report Cards ");

    let records: Vec<StudentRecord> = app.visible_records().into_iter().cloned().collect();
    if records.is_empty() {
        let text = if app.session.store().is_empty() {
            EMPTY_TABLE_MESSAGE
        } else {
            "No records match the search fields."
        };
        f.render_widget(Paragraph::new(format!("\n  {}", text)).block(block), area);
        return;
    }

    let header_cells = TABLE_COLUMNS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = records.iter().map(|record| {
        let color = grade_color(record.grade);
        let mut cells: Vec<Cell> = record.table_row().into_iter().map(Cell::from).collect();
        cells[0] = Cell::from(truncate(&record.name, 20));
        cells[4] = Cell::from(record.grade.to_string()).style(Style::default().fg(color));
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Report Card ");

    let Some(record) = app.selected_record() else {
        f.render_widget(Paragraph::new("No student selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Name: ", label), Span::raw(record.name.clone())]),
        Line::from(vec![
            Span::styled("  Roll Number: ", label),
            Span::raw(record.roll_number.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Total Marks: ", label),
            Span::raw(record.total_marks.to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Percentage: ", label),
            Span::raw(format!("{}%", grading::format_percentage(record.percentage))),
        ]),
        Line::from(vec![
            Span::styled("  Grade: ", label),
            Span::styled(
                record.grade.to_string(),
                Style::default().fg(grade_color(record.grade)),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  SUBJECT WISE MARKS",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];

    for (subject, mark) in record.marks.iter() {
        content.push(Line::from(vec![
            Span::styled(format!("  {:<10}", subject.as_str()), label),
            Span::raw(mark.to_string()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_download(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" 📥 Download Report Card ");

    let options = app.session.selection_options();
    if options.is_empty() {
        f.render_widget(
            Paragraph::new(format!("\n  {}", EMPTY_TABLE_MESSAGE)).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = options
        .iter()
        .map(|o| ListItem::new(format!("  {}", o.label)))
        .collect();

    let list = List::new(items)
        .block(
            block.title(
                Title::from(format!(" Enter/d saves to {} ", app.output_dir.display()))
                    .position(Position::Bottom),
            ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.download_state);
}

fn render_about(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        section_heading("  📌 About this App"),
        Line::from(""),
        Line::from("  Manages student academic records for the current session."),
        Line::from(""),
        Line::from("  • Add student records with subject-wise marks."),
        Line::from("  • Total marks, percentage and grade are calculated automatically."),
        Line::from("  • Search existing records by name or roll number."),
        Line::from("  • Save PDF report cards."),
        Line::from(""),
        Line::from("  Grades: A+ ≥ 80, A ≥ 70, B ≥ 60, C ≥ 50, F ≥ 40, otherwise Fail."),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Records are kept in memory only and are lost on exit.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" About "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if app.current_page == Page::ReportCards {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.visible_records().len()),
            Style::default().fg(Color::Cyan),
        ));
        if !app.form.search.is_empty() {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled("Search active", Style::default().fg(Color::Green)));
        }
        status_spans.push(Span::raw(" | "));
    }

    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => Color::White,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        status_spans.push(Span::styled(format!(" {} ", status.text), Style::default().fg(color)));
        status_spans.push(Span::raw(" | "));
    }

    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use report_card::grading::Subject;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App, name: &str, roll: &str, marks: [u32; 5]) {
        app.form.name = name.to_string();
        app.form.roll_number = roll.to_string();
        for (subject, mark) in Subject::ALL.iter().zip(marks) {
            app.form.set_mark(*subject, mark);
        }
    }

    #[test]
    fn test_page_cycle() {
        let mut page = Page::AddStudent;
        for _ in 0..4 {
            page = page.next();
        }
        assert_eq!(page, Page::AddStudent);
        assert_eq!(Page::AddStudent.previous(), Page::About);
    }

    #[test]
    fn test_enter_on_form_submits_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        fill_form(&mut app, "Ali", "12", [90, 85, 70, 88, 95]);

        assert!(press(&mut app, KeyCode::Enter));

        let records = app.session.store().list_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_marks, 428);
        assert_eq!(
            app.status.as_ref().unwrap().text,
            "Record of Ali inserted successfully!"
        );
    }

    #[test]
    fn test_q_is_text_on_form_but_quits_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());

        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.search.name, "q");

        app.current_page = Page::ReportCards;
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(!press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_search_fields_narrow_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        fill_form(&mut app, "Ali", "12", [50; 5]);
        app.submit();
        fill_form(&mut app, "Sara", "7", [50; 5]);
        app.submit();

        type_text(&mut app, "sar");
        assert_eq!(app.visible_records().len(), 1);
        assert_eq!(app.selected_record().unwrap().name, "Sara");
    }

    #[test]
    fn test_download_with_empty_store_does_not_render() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cards");
        let mut app = App::new(out.clone());
        app.current_page = Page::Download;

        press(&mut app, KeyCode::Enter);

        assert!(!out.exists());
        assert_eq!(app.status.as_ref().unwrap().text, EMPTY_TABLE_MESSAGE);
    }

    #[test]
    fn test_download_saves_highlighted_student() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        fill_form(&mut app, "Sara", "7", [90; 5]);
        app.submit();
        fill_form(&mut app, "Ali", "12", [40; 5]);
        app.submit();

        app.current_page = Page::Download;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Success);
        assert!(dir.path().join("Ali_Report_Card.pdf").exists());
    }

    #[test]
    fn test_event_loop_quits_on_esc() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        let mut events = vec![
            Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
        ];
        let result = run_app(&mut terminal, &mut app, || {
            events
                .pop()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
        });

        assert!(result.is_ok());
        assert_eq!(app.form.search.name, "a");
    }

    #[test]
    fn test_event_loop_propagates_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        let result = run_app(&mut terminal, &mut app, || {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        });

        let err = result.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long student name", 10), "a very ...");
    }
}
