use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap};
use ratatui::{Frame, Terminal};
use tracing::warn;

use crate::db::SqliteCatalog;
use crate::error::WorkflowError;
use crate::models::{Book, BookStatus};
use crate::workflow::CheckoutWorkflow;

use super::dialogs::ModalPrompter;
use super::forms::{BookField, BookForm};
use super::helpers::{book_row, TABLE_COLUMNS};

/// Rows taken by the entry form: five fields plus the border.
const FORM_HEIGHT: u16 = 7;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown in the table.
const PAGE_STEP: isize = 5;

/// Which half of the screen receives plain key presses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Focus {
    Form,
    Table,
}

/// Holds the footer message text plus its severity.
pub(crate) struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Everything the screen shows. Kept apart from the workflow so modal
/// dialogs can redraw it while the workflow is mid-operation.
pub(crate) struct View {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: Option<usize>,
    pub(crate) form: BookForm,
    pub(crate) focus: Focus,
    status: Option<StatusMessage>,
}

impl View {
    fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            selected: None,
            form: BookForm::default(),
            focus: Focus::Form,
            status: None,
        }
    }

    /// Replace the table contents, keeping the selection in range.
    pub(crate) fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
        self.selected = match self.selected {
            Some(_) if self.books.is_empty() => None,
            Some(index) => Some(index.min(self.books.len() - 1)),
            None => None,
        };
    }

    /// Id of the highlighted table row, if any.
    pub(crate) fn selected_id(&self) -> Option<String> {
        self.selected
            .and_then(|index| self.books.get(index))
            .map(|book| book.book_id.clone())
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.books.len() as isize - 1;
        let next = match self.selected {
            Some(index) => (index as isize + offset).clamp(0, last),
            None if offset < 0 => last,
            None => 0,
        };
        self.selected = Some(next as usize);
    }

    pub(crate) fn select_first(&mut self) {
        if !self.books.is_empty() {
            self.selected = Some(0);
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.books.is_empty() {
            self.selected = Some(self.books.len() - 1);
        }
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = None;
    }

    /// Full frame including the form cursor.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let form_area = self.draw_content(frame);

        if self.focus == Focus::Form {
            if let Some(offset) = self.form.cursor_offset() {
                let inner = Block::default().borders(Borders::ALL).inner(form_area);
                frame.set_cursor_position((inner.x + offset, inner.y + self.form.active_row()));
            }
        }
    }

    /// Form, table and footer without touching the cursor. Dialogs draw on
    /// top of this. Returns the form area for cursor placement.
    pub(crate) fn draw_content(&self, frame: &mut Frame) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_form(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
        chunks[0]
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.form.editing {
            Some(book_id) => format!("Library Management System • Editing {book_id}"),
            None => "Library Management System • New Book".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_style(self.focus == Focus::Form));

        let focused = self.focus == Focus::Form;
        let lines: Vec<Line> = BookForm::fields()
            .into_iter()
            .map(|field| self.form.build_line(field, focused))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Inventory ({})", self.books.len()))
            .borders(Borders::ALL)
            .border_style(focus_style(self.focus == Focus::Table));

        if self.books.is_empty() {
            let message = Paragraph::new("No books yet. Fill in the form and press Ctrl-A.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(TABLE_COLUMNS.to_vec())
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ];
        let table = Table::new(self.books.iter().map(book_row), widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(self.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let keys = match self.focus {
            Focus::Form => "↑/↓ field • Space/←/→ status • Tab table",
            Focus::Table => "↑/↓ select • Enter edit • Esc deselect • Tab form",
        };
        Line::from(Span::styled(
            format!(
                "{keys} • ^A add • ^U update • ^D delete • ^T toggle • ^L clear form • ^X clear inventory • ^Q quit"
            ),
            Style::default().fg(Color::Gray),
        ))
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Central application state: the checkout workflow plus what is on screen.
pub struct App {
    workflow: CheckoutWorkflow<SqliteCatalog>,
    view: View,
}

impl App {
    /// Build the app and populate the table from the store.
    pub fn new(workflow: CheckoutWorkflow<SqliteCatalog>) -> Result<Self> {
        let books = workflow.list_all()?;
        Ok(Self {
            workflow,
            view: View::new(books),
        })
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        self.view.draw(frame);
    }

    /// Handle a plain key press. Returns `true` when the app should exit.
    pub(crate) fn handle_key<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        code: KeyCode,
    ) -> Result<bool> {
        if matches!(code, KeyCode::Tab | KeyCode::BackTab) {
            self.view.focus = match self.view.focus {
                Focus::Form => Focus::Table,
                Focus::Table => Focus::Form,
            };
            return Ok(false);
        }

        match self.view.focus {
            Focus::Form => self.handle_form_key(code),
            Focus::Table => return self.handle_table_key(terminal, code),
        }
        Ok(false)
    }

    /// Handle a Ctrl-modified key press. Returns `true` when the app should
    /// exit.
    pub(crate) fn handle_ctrl<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        code: KeyCode,
    ) -> Result<bool> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('a') => self.add_book(terminal)?,
            KeyCode::Char('u') => self.update_book(terminal)?,
            KeyCode::Char('d') => self.remove_book(terminal)?,
            KeyCode::Char('t') => self.toggle_availability(terminal)?,
            KeyCode::Char('l') => {
                self.view.form.clear();
                self.view.clear_status();
            }
            KeyCode::Char('x') => self.clear_inventory(terminal)?,
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let form = &mut self.view.form;
        match code {
            KeyCode::Up => form.move_focus(-1),
            KeyCode::Down | KeyCode::Enter => form.move_focus(1),
            KeyCode::Left | KeyCode::Right if form.active == BookField::Status => {
                form.toggle_status()
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Esc => self.view.focus = Focus::Table,
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_table_key<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        code: KeyCode,
    ) -> Result<bool> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => self.view.move_selection(-1),
            KeyCode::Down => self.view.move_selection(1),
            KeyCode::PageUp => self.view.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.view.move_selection(PAGE_STEP),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            KeyCode::Esc => self.view.selected = None,
            KeyCode::Enter => self.load_selected(terminal)?,
            _ => {}
        }
        Ok(false)
    }

    fn load_selected<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let selected = self.view.selected_id();
        let result = self.workflow.load_for_edit(selected.as_deref());
        let notice = self.after_load(result)?;
        self.show_notice(terminal, notice)
    }

    fn add_book<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let draft = self.view.form.draft();
        let result = {
            let mut prompts = ModalPrompter::new(terminal, &self.view);
            self.workflow.add_record(&mut prompts, draft)
        };
        let notice = self.after_add(result)?;
        self.show_notice(terminal, notice)
    }

    fn update_book<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let Some(selected_id) = self.view.form.editing.clone() else {
            let notice = self.reject(WorkflowError::NoSelection("update"))?;
            return self.show_notice(terminal, notice);
        };

        let draft = self.view.form.draft();
        let result = {
            let mut prompts = ModalPrompter::new(terminal, &self.view);
            self.workflow.update_record(&mut prompts, &selected_id, draft)
        };
        let notice = self.after_update(&selected_id, result)?;
        self.show_notice(terminal, notice)
    }

    fn remove_book<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let selected = self.view.selected_id();
        let result = self.workflow.remove_record(selected.as_deref());
        let notice = self.after_remove(selected.as_deref(), result)?;
        self.show_notice(terminal, notice)
    }

    fn clear_inventory<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let result = {
            let mut prompts = ModalPrompter::new(terminal, &self.view);
            self.workflow.clear_inventory(&mut prompts)
        };
        let notice = self.after_clear(result)?;
        self.show_notice(terminal, notice)
    }

    fn toggle_availability<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let selected = self.view.selected_id();
        let result = {
            let mut prompts = ModalPrompter::new(terminal, &self.view);
            self.workflow.toggle_status(&mut prompts, selected.as_deref())
        };
        let notice = self.after_toggle(selected.as_deref(), result)?;
        self.show_notice(terminal, notice)
    }

    // The `after_*` steps apply a workflow result to the view. Each returns
    // the failure still to be shown as a notice, if any.

    fn after_load(
        &mut self,
        result: Result<Book, WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        match result {
            Ok(book) => {
                self.view.form = BookForm::from_book(&book);
                self.view.focus = Focus::Form;
                self.view
                    .set_status(format!("Editing {book}. Ctrl-U saves."), StatusKind::Info);
                Ok(None)
            }
            Err(err) => self.reject(err),
        }
    }

    /// A failed add keeps the form so the entry can be corrected.
    fn after_add(
        &mut self,
        result: Result<Book, WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        match result {
            Ok(_) => {
                self.refresh()?;
                self.view.form.clear();
                self.view
                    .set_status("Book record added successfully!", StatusKind::Info);
                Ok(None)
            }
            Err(WorkflowError::ActionDenied(message)) => {
                self.view.set_status(message, StatusKind::Info);
                Ok(None)
            }
            Err(err) => self.reject(err),
        }
    }

    /// The table is refreshed and the form cleared whatever the outcome.
    fn after_update(
        &mut self,
        selected_id: &str,
        result: Result<Book, WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        let notice = match result {
            Ok(_) => {
                self.view
                    .set_status(format!("Book {selected_id} updated."), StatusKind::Info);
                None
            }
            Err(err) => self.reject(err)?,
        };
        self.refresh()?;
        self.view.form.clear();
        Ok(notice)
    }

    fn after_remove(
        &mut self,
        selected_id: Option<&str>,
        result: Result<(), WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        match result {
            Ok(()) => {
                self.refresh()?;
                self.view.set_status(
                    format!("Book {} removed.", selected_id.unwrap_or_default()),
                    StatusKind::Info,
                );
                Ok(None)
            }
            Err(err) => self.reject(err),
        }
    }

    fn after_clear(
        &mut self,
        result: Result<(), WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        match result {
            Ok(()) => {
                self.refresh()?;
                self.view.selected = None;
                self.view.set_status("Inventory cleared.", StatusKind::Info);
                Ok(None)
            }
            Err(WorkflowError::ActionDenied(message)) => {
                self.view.set_status(message, StatusKind::Info);
                Ok(None)
            }
            Err(err) => self.reject(err),
        }
    }

    /// The table is refreshed whether or not the transition went through.
    fn after_toggle(
        &mut self,
        selected_id: Option<&str>,
        result: Result<BookStatus, WorkflowError>,
    ) -> Result<Option<WorkflowError>> {
        let notice = match result {
            Ok(status) => {
                self.view.set_status(
                    format!("Book {} is now {status}.", selected_id.unwrap_or_default()),
                    StatusKind::Info,
                );
                None
            }
            Err(err) => self.reject(err)?,
        };
        self.refresh()?;
        Ok(notice)
    }

    fn refresh(&mut self) -> Result<()> {
        let books = self.workflow.list_all()?;
        self.view.set_books(books);
        Ok(())
    }

    /// Record a workflow failure in the footer and hand it back for a
    /// notice. A `Prompt` failure means the terminal itself is broken, so no
    /// dialog can be drawn: it is returned as an error and ends the session.
    fn reject(&mut self, err: WorkflowError) -> Result<Option<WorkflowError>> {
        if let WorkflowError::Prompt(io_err) = err {
            return Err(io_err.into());
        }

        warn!(error = %err, "action rejected");
        self.view.set_status(err.to_string(), StatusKind::Error);
        Ok(Some(err))
    }

    /// Block on a notice for the failure, if there is one.
    fn show_notice<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        notice: Option<WorkflowError>,
    ) -> Result<()> {
        if let Some(err) = notice {
            ModalPrompter::new(terminal, &self.view).notify(err.title(), &err.to_string(), true)?;
        }
        Ok(())
    }
}
