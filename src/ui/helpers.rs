use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Cell, Row};

use crate::models::Book;

/// Column headers of the inventory table, mirroring the `Books` columns.
pub(crate) const TABLE_COLUMNS: [&str; 5] = ["Title", "Book_ID", "Author", "Status", "Issuer_ID"];

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// One table row per record, all five fields in column order.
pub(crate) fn book_row(book: &Book) -> Row<'static> {
    Row::new(vec![
        Cell::from(book.title.clone()),
        Cell::from(book.book_id.clone()),
        Cell::from(book.author.clone()),
        Cell::from(book.status.as_str()),
        Cell::from(book.issuer_id.clone()),
    ])
}
