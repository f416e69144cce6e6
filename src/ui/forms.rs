use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, BookStatus};

/// Column width reserved for the field labels.
const LABEL_WIDTH: usize = 12;

/// Internal representation of the book entry form.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) book_id: String,
    pub(crate) author: String,
    pub(crate) status: BookStatus,
    pub(crate) issuer_id: String,
    pub(crate) active: BookField,
    /// Id of the record loaded for editing. While set, the Book ID field is
    /// read-only and updates are keyed by this value.
    pub(crate) editing: Option<String>,
}

/// Fields in the entry form, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    BookId,
    Author,
    Status,
    IssuerId,
}

impl BookField {
    const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::BookId,
        BookField::Author,
        BookField::Status,
        BookField::IssuerId,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Book Title",
            BookField::BookId => "Book ID",
            BookField::Author => "Author",
            BookField::Status => "Status",
            BookField::IssuerId => "Issuer ID",
        }
    }

    fn index(self) -> usize {
        BookField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl BookForm {
    /// Populate the form from a stored record and lock its id.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            book_id: book.book_id.clone(),
            author: book.author.clone(),
            status: book.status,
            issuer_id: book.issuer_id.clone(),
            active: BookField::Title,
            editing: Some(book.book_id.clone()),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Reset every field, defaulting the status to Available and unlocking
    /// the id.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot of the current input as a record draft.
    pub(crate) fn draft(&self) -> Book {
        Book {
            title: self.title.trim().to_string(),
            book_id: self.book_id.trim().to_string(),
            author: self.author.trim().to_string(),
            status: self.status,
            issuer_id: self.issuer_id.trim().to_string(),
        }
    }

    /// Move focus forward or backward, skipping the locked id field.
    pub(crate) fn move_focus(&mut self, offset: isize) {
        let len = BookField::ALL.len() as isize;
        let mut index = self.active.index() as isize;
        loop {
            index = (index + offset).rem_euclid(len);
            let field = BookField::ALL[index as usize];
            if !self.is_locked(field) {
                self.active = field;
                return;
            }
        }
    }

    pub(crate) fn is_locked(&self, field: BookField) -> bool {
        field == BookField::BookId && self.is_editing()
    }

    pub(crate) fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    /// Feed a typed character to the active field. On the status selector a
    /// space cycles the value; other characters are ignored there.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::BookId if self.is_editing() => return false,
            BookField::BookId => self.book_id.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Status => {
                if ch != ' ' {
                    return false;
                }
                self.toggle_status();
            }
            BookField::IssuerId => self.issuer_id.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::BookId => {
                if !self.is_editing() {
                    self.book_id.pop();
                }
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Status => {}
            BookField::IssuerId => {
                self.issuer_id.pop();
            }
        }
    }

    fn value(&self, field: BookField) -> String {
        match field {
            BookField::Title => self.title.clone(),
            BookField::BookId => self.book_id.clone(),
            BookField::Author => self.author.clone(),
            BookField::Status => format!("< {} >", self.status),
            BookField::IssuerId => self.issuer_id.clone(),
        }
    }

    /// Render one form row. Focus highlighting only applies while the form
    /// itself has focus.
    pub(crate) fn build_line(&self, field: BookField, focused: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = focused && self.active == field;

        let display = if value.is_empty() {
            "<empty>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if self.is_locked(field) {
            Style::default().fg(Color::Gray)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(format!("{:<LABEL_WIDTH$}", format!("{}:", field.label()))),
            Span::styled(display, style),
        ];
        if self.is_locked(field) {
            spans.push(Span::styled(" (locked)", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    }

    /// Cursor column offset for text fields; `None` for the status selector.
    pub(crate) fn cursor_offset(&self) -> Option<u16> {
        if self.active == BookField::Status {
            return None;
        }
        Some(LABEL_WIDTH as u16 + self.value(self.active).chars().count() as u16)
    }

    pub(crate) fn active_row(&self) -> u16 {
        self.active.index() as u16
    }

    pub(crate) fn fields() -> [BookField; 5] {
        BookField::ALL
    }
}
