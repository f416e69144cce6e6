//! Checkout rules layered over the catalog store.
//!
//! The workflow owns the store and receives a [`Prompter`] per call. Prompts
//! are blocking: the TUI runs a modal dialog until the user answers, and
//! tests hand in a scripted implementation.

use std::io;

use tracing::{info, warn};

use crate::db::CatalogStore;
use crate::error::WorkflowError;
use crate::models::{Book, BookStatus, ISSUER_SENTINEL};

/// Synchronous modal dialogs needed by the workflow.
pub trait Prompter {
    /// Free-text prompt. `None` means the dialog was cancelled.
    fn ask_text(&mut self, title: &str, prompt: &str) -> io::Result<Option<String>>;

    /// Yes/no question; `true` only on an explicit yes.
    fn confirm(&mut self, title: &str, prompt: &str) -> io::Result<bool>;
}

/// Business rules for adding, editing and checking books in and out.
pub struct CheckoutWorkflow<S> {
    store: S,
}

impl<S: CatalogStore> CheckoutWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current contents of the catalog, used to refresh the table.
    pub fn list_all(&self) -> Result<Vec<Book>, WorkflowError> {
        Ok(self.store.list_all()?)
    }

    /// Capture the issuer for issued drafts, confirm, then insert. On success
    /// the stored record is returned so the caller can report it.
    pub fn add_record(
        &mut self,
        prompts: &mut impl Prompter,
        draft: Book,
    ) -> Result<Book, WorkflowError> {
        if draft.book_id.trim().is_empty() {
            return Err(WorkflowError::InvalidEntry(
                "Book ID cannot be empty!".to_string(),
            ));
        }

        let book = with_checked_issuer(prompts, draft)?;

        if !prompts.confirm("Confirm Entry", "Are you sure you want to add this record?")? {
            return Err(WorkflowError::ActionDenied(
                "The record was not added.".to_string(),
            ));
        }

        self.store.insert(&book)?;
        info!(book_id = %book.book_id, status = %book.status, "book added");
        Ok(book)
    }

    /// Overwrite the record keyed by `selected_id` with the draft's fields.
    ///
    /// Issued drafts always re-prompt for the issuer, even when the record was
    /// already issued to someone. A missing id is a silent no-op.
    pub fn update_record(
        &mut self,
        prompts: &mut impl Prompter,
        selected_id: &str,
        draft: Book,
    ) -> Result<Book, WorkflowError> {
        let mut book = with_checked_issuer(prompts, draft)?;
        book.book_id = selected_id.to_string();

        self.store.update(selected_id, &book)?;
        info!(book_id = selected_id, status = %book.status, "book updated");
        Ok(book)
    }

    pub fn remove_record(&mut self, selected_id: Option<&str>) -> Result<(), WorkflowError> {
        let book_id = selected_id.ok_or(WorkflowError::NoSelection("delete"))?;
        self.store.delete(book_id)?;
        info!(book_id, "book removed");
        Ok(())
    }

    pub fn clear_inventory(&mut self, prompts: &mut impl Prompter) -> Result<(), WorkflowError> {
        if !prompts.confirm(
            "Confirm Deletion",
            "Are you sure you want to delete the entire inventory?",
        )? {
            return Err(WorkflowError::ActionDenied(
                "The inventory was left unchanged.".to_string(),
            ));
        }

        self.store.delete_all()?;
        info!("inventory cleared");
        Ok(())
    }

    /// Drive the Available/Issued transition for the selected record and
    /// return the status it ends up in.
    pub fn toggle_status(
        &mut self,
        prompts: &mut impl Prompter,
        selected_id: Option<&str>,
    ) -> Result<BookStatus, WorkflowError> {
        const ACTION: &str = "update";

        let book_id = selected_id.ok_or(WorkflowError::NoSelection(ACTION))?;
        let mut book = self
            .store
            .find(book_id)?
            .ok_or(WorkflowError::NoSelection(ACTION))?;

        if book.is_issued() {
            if !prompts.confirm("Return Confirmation", "Has the book been returned?")? {
                warn!(book_id, "return not confirmed");
                return Err(WorkflowError::ActionDenied(
                    "Cannot mark the book as available until it is returned.".to_string(),
                ));
            }
            book.issuer_id = ISSUER_SENTINEL.to_string();
        } else {
            book.issuer_id = capture_issuer(prompts)?;
        }
        book.status = book.status.toggled();

        self.store.update(book_id, &book)?;
        info!(book_id, status = %book.status, "availability toggled");
        Ok(book.status)
    }

    /// Fetch the selected record so the form can be filled for editing.
    pub fn load_for_edit(&self, selected_id: Option<&str>) -> Result<Book, WorkflowError> {
        let book_id = selected_id.ok_or(WorkflowError::NoSelection("view"))?;
        self.store
            .find(book_id)?
            .ok_or(WorkflowError::NoSelection("view"))
    }
}

/// Ask for the borrower's card id. Blank or cancelled answers abort the
/// transition.
fn capture_issuer(prompts: &mut impl Prompter) -> Result<String, WorkflowError> {
    let answer = prompts.ask_text("Issuer Card", "Please enter the Issuer's Card ID:")?;
    match answer.as_deref().map(str::trim) {
        Some(issuer) if !issuer.is_empty() => Ok(issuer.to_string()),
        _ => {
            warn!("issuer card id missing");
            Err(WorkflowError::InvalidEntry(
                "Issuer Card ID cannot be empty!".to_string(),
            ))
        }
    }
}

/// Enforce the issuer invariant on a draft about to be written.
fn with_checked_issuer(prompts: &mut impl Prompter, mut draft: Book) -> Result<Book, WorkflowError> {
    draft.issuer_id = match draft.status {
        BookStatus::Issued => capture_issuer(prompts)?,
        BookStatus::Available => ISSUER_SENTINEL.to_string(),
    };
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::db::SqliteCatalog;

    /// Replays canned answers and records which dialogs were shown.
    #[derive(Default)]
    struct Scripted {
        texts: VecDeque<Option<String>>,
        confirms: VecDeque<bool>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn then_text(mut self, answer: Option<&str>) -> Self {
            self.texts.push_back(answer.map(str::to_string));
            self
        }

        fn then_confirm(mut self, answer: bool) -> Self {
            self.confirms.push_back(answer);
            self
        }
    }

    impl Prompter for Scripted {
        fn ask_text(&mut self, title: &str, _prompt: &str) -> io::Result<Option<String>> {
            self.asked.push(title.to_string());
            Ok(self.texts.pop_front().expect("unexpected text prompt"))
        }

        fn confirm(&mut self, title: &str, _prompt: &str) -> io::Result<bool> {
            self.asked.push(title.to_string());
            Ok(self.confirms.pop_front().expect("unexpected confirmation"))
        }
    }

    fn workflow() -> CheckoutWorkflow<SqliteCatalog> {
        CheckoutWorkflow::new(SqliteCatalog::open_in_memory().unwrap())
    }

    fn dune() -> Book {
        Book::available("Dune", "B1", "Herbert")
    }

    fn seeded() -> CheckoutWorkflow<SqliteCatalog> {
        let mut wf = workflow();
        wf.add_record(&mut Scripted::default().then_confirm(true), dune())
            .unwrap();
        wf
    }

    fn issued_draft(book: &Book) -> Book {
        Book {
            status: BookStatus::Issued,
            ..book.clone()
        }
    }

    fn assert_issuer_invariant(wf: &CheckoutWorkflow<SqliteCatalog>) {
        for book in wf.list_all().unwrap() {
            assert_eq!(
                book.status == BookStatus::Available,
                book.issuer_id == ISSUER_SENTINEL,
                "{book:?}"
            );
        }
    }

    #[test]
    fn add_confirmed_available_book() {
        let mut wf = workflow();
        let mut prompts = Scripted::default().then_confirm(true);

        let stored = wf.add_record(&mut prompts, dune()).unwrap();

        assert_eq!(stored, dune());
        assert_eq!(prompts.asked, ["Confirm Entry"]);
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn add_forces_sentinel_for_available_drafts() {
        let mut wf = workflow();
        let draft = Book {
            issuer_id: "C7".into(),
            ..dune()
        };

        let stored = wf
            .add_record(&mut Scripted::default().then_confirm(true), draft)
            .unwrap();

        assert_eq!(stored.issuer_id, ISSUER_SENTINEL);
        assert_issuer_invariant(&wf);
    }

    #[test]
    fn add_issued_book_captures_issuer_before_confirming() {
        let mut wf = workflow();
        let mut prompts = Scripted::default().then_text(Some(" C42 ")).then_confirm(true);

        let stored = wf.add_record(&mut prompts, issued_draft(&dune())).unwrap();

        assert_eq!(prompts.asked, ["Issuer Card", "Confirm Entry"]);
        assert_eq!(stored.issuer_id, "C42");
        assert_eq!(wf.list_all().unwrap(), vec![stored]);
    }

    #[test]
    fn add_issued_without_issuer_is_invalid_and_skips_confirmation() {
        let mut wf = workflow();
        let mut prompts = Scripted::default().then_text(None);

        let err = wf
            .add_record(&mut prompts, issued_draft(&dune()))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidEntry(_)));
        assert_eq!(prompts.asked, ["Issuer Card"]);
        assert!(wf.list_all().unwrap().is_empty());
    }

    #[test]
    fn add_declined_leaves_store_empty() {
        let mut wf = workflow();

        let err = wf
            .add_record(&mut Scripted::default().then_confirm(false), dune())
            .unwrap_err();

        assert!(matches!(err, WorkflowError::ActionDenied(_)));
        assert!(wf.list_all().unwrap().is_empty());
    }

    #[test]
    fn add_rejects_blank_book_id() {
        let mut wf = workflow();
        let mut prompts = Scripted::default();

        let err = wf
            .add_record(&mut prompts, Book::available("Dune", "  ", "Herbert"))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidEntry(_)));
        assert!(prompts.asked.is_empty());
    }

    #[test]
    fn add_duplicate_reports_and_keeps_existing_record() {
        let mut wf = seeded();
        let clash = Book::available("Emma", "B1", "Austen");

        let err = wf
            .add_record(&mut Scripted::default().then_confirm(true), clash)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::DuplicateKey(ref id) if id == "B1"));
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn update_to_issued_prompts_and_writes_issuer() {
        let mut wf = seeded();
        let mut prompts = Scripted::default().then_text(Some("C42"));

        wf.update_record(&mut prompts, "B1", issued_draft(&dune()))
            .unwrap();

        let stored = wf.store().find("B1").unwrap().unwrap();
        assert_eq!(stored.status, BookStatus::Issued);
        assert_eq!(stored.issuer_id, "C42");
        assert_eq!(prompts.asked, ["Issuer Card"]);
    }

    #[test]
    fn update_of_already_issued_record_prompts_again() {
        let mut wf = seeded();
        wf.update_record(
            &mut Scripted::default().then_text(Some("C42")),
            "B1",
            issued_draft(&dune()),
        )
        .unwrap();

        let mut draft = wf.load_for_edit(Some("B1")).unwrap();
        draft.title = "Dune (1965)".into();
        let mut prompts = Scripted::default().then_text(Some("C43"));
        wf.update_record(&mut prompts, "B1", draft).unwrap();

        assert_eq!(prompts.asked, ["Issuer Card"]);
        let stored = wf.store().find("B1").unwrap().unwrap();
        assert_eq!(stored.title, "Dune (1965)");
        assert_eq!(stored.issuer_id, "C43");
    }

    #[test]
    fn update_with_empty_issuer_leaves_record_unchanged() {
        let mut wf = seeded();

        let err = wf
            .update_record(
                &mut Scripted::default().then_text(Some("")),
                "B1",
                issued_draft(&dune()),
            )
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidEntry(_)));
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn update_is_keyed_by_selection_and_ignores_draft_id() {
        let mut wf = seeded();
        let draft = Book::available("Dune Messiah", "OTHER", "Herbert");

        let stored = wf
            .update_record(&mut Scripted::default(), "B1", draft)
            .unwrap();

        assert_eq!(stored.book_id, "B1");
        assert_eq!(
            wf.list_all().unwrap(),
            vec![Book::available("Dune Messiah", "B1", "Herbert")]
        );
    }

    #[test]
    fn update_of_missing_record_is_silent() {
        let mut wf = seeded();

        wf.update_record(&mut Scripted::default(), "B404", dune())
            .unwrap();

        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn update_back_to_available_resets_issuer() {
        let mut wf = seeded();
        wf.update_record(
            &mut Scripted::default().then_text(Some("C42")),
            "B1",
            issued_draft(&dune()),
        )
        .unwrap();

        let mut draft = wf.load_for_edit(Some("B1")).unwrap();
        draft.status = BookStatus::Available;
        wf.update_record(&mut Scripted::default(), "B1", draft)
            .unwrap();

        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn remove_requires_selection() {
        let mut wf = seeded();

        let err = wf.remove_record(None).unwrap_err();

        assert!(matches!(err, WorkflowError::NoSelection(_)));
        assert_eq!(wf.list_all().unwrap().len(), 1);
    }

    #[test]
    fn remove_deletes_selected_record() {
        let mut wf = seeded();

        wf.remove_record(Some("B1")).unwrap();

        assert!(wf.list_all().unwrap().is_empty());
    }

    #[test]
    fn clear_inventory_confirmed_empties_store() {
        let mut wf = seeded();
        wf.add_record(
            &mut Scripted::default().then_confirm(true),
            Book::available("Emma", "B2", "Austen"),
        )
        .unwrap();

        wf.clear_inventory(&mut Scripted::default().then_confirm(true))
            .unwrap();

        assert!(wf.list_all().unwrap().is_empty());
    }

    #[test]
    fn clear_inventory_declined_keeps_everything() {
        let mut wf = seeded();

        let err = wf
            .clear_inventory(&mut Scripted::default().then_confirm(false))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::ActionDenied(_)));
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn toggle_round_trip_restores_original_record() {
        let mut wf = seeded();

        let status = wf
            .toggle_status(&mut Scripted::default().then_text(Some("C100")), Some("B1"))
            .unwrap();
        assert_eq!(status, BookStatus::Issued);
        assert_eq!(wf.store().find("B1").unwrap().unwrap().issuer_id, "C100");
        assert_issuer_invariant(&wf);

        let status = wf
            .toggle_status(&mut Scripted::default().then_confirm(true), Some("B1"))
            .unwrap();
        assert_eq!(status, BookStatus::Available);
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn toggle_with_empty_issuer_is_invalid() {
        let mut wf = seeded();

        let err = wf
            .toggle_status(&mut Scripted::default().then_text(Some("   ")), Some("B1"))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidEntry(_)));
        assert_eq!(wf.list_all().unwrap(), vec![dune()]);
    }

    #[test]
    fn toggle_return_declined_keeps_book_issued() {
        let mut wf = seeded();
        wf.toggle_status(&mut Scripted::default().then_text(Some("C100")), Some("B1"))
            .unwrap();

        let mut prompts = Scripted::default().then_confirm(false);
        let err = wf.toggle_status(&mut prompts, Some("B1")).unwrap_err();

        assert!(matches!(err, WorkflowError::ActionDenied(_)));
        assert_eq!(prompts.asked, ["Return Confirmation"]);
        let stored = wf.store().find("B1").unwrap().unwrap();
        assert_eq!(stored.status, BookStatus::Issued);
        assert_eq!(stored.issuer_id, "C100");
    }

    #[test]
    fn toggle_requires_an_existing_selection() {
        let mut wf = seeded();

        assert!(matches!(
            wf.toggle_status(&mut Scripted::default(), None),
            Err(WorkflowError::NoSelection(_))
        ));
        assert!(matches!(
            wf.toggle_status(&mut Scripted::default(), Some("B404")),
            Err(WorkflowError::NoSelection(_))
        ));
    }

    #[test]
    fn load_for_edit_returns_stored_record() {
        let wf = seeded();

        assert_eq!(wf.load_for_edit(Some("B1")).unwrap(), dune());
        assert!(matches!(
            wf.load_for_edit(None),
            Err(WorkflowError::NoSelection("view"))
        ));
    }
}
