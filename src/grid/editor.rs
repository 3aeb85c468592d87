//! The grid editor: one state machine shared by manual entry, bulk delete and
//! bulk edit. Key handling only mutates local state; anything that touches the
//! store goes through [`GridEditor::commit`], which the caller runs when
//! `handle_key` answers [`GridAction::Commit`].

use crate::error::{BudgieError, Result};
use crate::grid::nav::{GridNav, ViewMode};
use crate::grid::selection::Selection;
use crate::grid::tracker::{CellStatus, RowCheck, Tracker};
use crate::models::{EditableRow, Field, SearchCriteria, Transaction, FIELD_COUNT};
use crate::store::TransactionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Insert,
    Delete,
    Edit,
}

impl Mode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Insert => "Enter transactions",
            Self::Delete => "Delete transactions",
            Self::Edit => "Edit transactions",
        }
    }

    fn confirm_label(self) -> &'static str {
        match self {
            Self::Insert => "Submit",
            Self::Delete => "Delete selected",
            Self::Edit => "Save selected",
        }
    }

    fn has_select_column(self) -> bool {
        !matches!(self, Self::Insert)
    }

    fn editable(self) -> bool {
        !matches!(self, Self::Delete)
    }
}

/// Abstract input, already decoupled from the terminal's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Advance,
    Retreat,
    NextPage,
    PrevPage,
    ToggleView,
    ToggleSelect,
    Activate,
    Input(char),
    Erase,
    Back,
}

pub enum GridAction {
    Continue,
    Close,
    /// The user confirmed; the caller should run [`GridEditor::commit`].
    Commit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Nothing was written; the prompt says why.
    Blocked,
    Inserted(Vec<Transaction>),
    Updated(Vec<Transaction>),
    Deleted(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Normal,
    Active,
    Error,
    Modified,
    Marked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCell {
    pub text: String,
    pub style: CellStyle,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct RenderModel {
    pub title: &'static str,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<RenderCell>>,
    pub page_label: String,
    pub prompt: String,
    pub confirm_label: &'static str,
    pub view: ViewMode,
}

pub struct GridEditor {
    mode: Mode,
    rows: Vec<EditableRow>,
    /// Transactions as loaded; empty in insert mode.
    baseline: Vec<Transaction>,
    tracker: Tracker,
    nav: GridNav,
    selection: Selection,
    criteria: Option<SearchCriteria>,
    prompt: String,
}

impl GridEditor {
    pub fn for_insert(row_count: usize, page_size: usize) -> Self {
        let mut editor = Self::build(Mode::Insert, Vec::new(), None, page_size);
        editor.rows = vec![EditableRow::default(); row_count];
        editor.reload_state();
        editor.prompt = "Type to fill cells; Tab moves on, Enter on Submit saves.".into();
        editor
    }

    pub fn for_delete(results: Vec<Transaction>, criteria: SearchCriteria, page_size: usize) -> Self {
        let mut editor = Self::build(Mode::Delete, results, Some(criteria), page_size);
        editor.prompt = editor.found_prompt();
        editor
    }

    pub fn for_edit(results: Vec<Transaction>, criteria: SearchCriteria, page_size: usize) -> Self {
        let mut editor = Self::build(Mode::Edit, results, Some(criteria), page_size);
        editor.prompt = editor.found_prompt();
        editor
    }

    fn build(mode: Mode, baseline: Vec<Transaction>, criteria: Option<SearchCriteria>, page_size: usize) -> Self {
        let columns = match mode {
            // Delete rows are read-only: the cursor only picks a row.
            Mode::Delete => 1,
            Mode::Edit => FIELD_COUNT + 1,
            Mode::Insert => FIELD_COUNT,
        };
        let rows = baseline.iter().map(EditableRow::from).collect::<Vec<_>>();
        let count = rows.len();
        Self {
            mode,
            rows,
            baseline,
            tracker: Tracker::new(count),
            nav: GridNav::new(count, page_size, columns),
            selection: Selection::new(count),
            criteria,
            prompt: String::new(),
        }
    }

    /// Size every piece of derived state to the current rows.
    fn reload_state(&mut self) {
        let count = self.rows.len();
        self.tracker.reset(count);
        self.nav.reset(count);
        self.selection.reset(count);
    }

    fn found_prompt(&self) -> String {
        match self.rows.len() {
            0 => "No transactions found.".to_string(),
            1 => "Found 1 transaction.".to_string(),
            n => format!("Found {n} transactions."),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[EditableRow] {
        &self.rows
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn cursor_field(&self) -> Option<Field> {
        if self.mode == Mode::Delete {
            return None;
        }
        Field::from_index(self.nav.cursor.field)
    }

    fn on_select_column(&self) -> bool {
        self.mode == Mode::Edit && self.nav.cursor.field == FIELD_COUNT
    }

    pub fn handle_key(&mut self, intent: Intent) -> GridAction {
        match intent {
            Intent::Back => return GridAction::Close,
            Intent::MoveUp => self.nav.move_up(),
            Intent::MoveDown => self.nav.move_down(),
            Intent::MoveLeft | Intent::Retreat => self.nav.move_left(),
            Intent::MoveRight | Intent::Advance => self.nav.move_right(),
            Intent::NextPage => self.nav.next_page(),
            Intent::PrevPage => self.nav.prev_page(),
            Intent::ToggleView => self.nav.toggle_view(),
            Intent::ToggleSelect => self.toggle_current(),
            Intent::Activate => return self.activate(),
            Intent::Input(c) => self.type_char(c),
            Intent::Erase => self.erase_char(),
        }
        GridAction::Continue
    }

    fn activate(&mut self) -> GridAction {
        if self.nav.view == ViewMode::Confirm {
            return GridAction::Commit;
        }
        match self.mode {
            Mode::Delete => self.toggle_current(),
            Mode::Edit if self.on_select_column() => self.toggle_current(),
            Mode::Edit | Mode::Insert => self.nav.move_right(),
        }
        GridAction::Continue
    }

    fn toggle_current(&mut self) {
        if self.nav.view != ViewMode::Table || self.mode == Mode::Insert {
            return;
        }
        self.selection.toggle(self.nav.absolute_row());
    }

    fn type_char(&mut self, c: char) {
        if !self.mode.editable() || self.nav.view != ViewMode::Table {
            return;
        }
        let Some(field) = self.cursor_field() else {
            return;
        };
        let idx = self.nav.absolute_row();
        if let Some(row) = self.rows.get_mut(idx) {
            if row.push_char(field, c) {
                self.tracker.refresh_modified(idx, row, self.baseline.get(idx));
            }
        }
    }

    fn erase_char(&mut self) {
        if !self.mode.editable() || self.nav.view != ViewMode::Table {
            return;
        }
        let Some(field) = self.cursor_field() else {
            return;
        };
        let idx = self.nav.absolute_row();
        if let Some(row) = self.rows.get_mut(idx) {
            row.pop_char(field);
            self.tracker.refresh_modified(idx, row, self.baseline.get(idx));
        }
    }

    fn block(&mut self, msg: &str) -> Result<CommitOutcome> {
        tracing::warn!(mode = ?self.mode, reason = msg, "commit blocked");
        self.prompt = msg.to_string();
        self.nav.view = ViewMode::Table;
        Ok(CommitOutcome::Blocked)
    }

    /// Validate and persist the grid. Backend failures are returned as-is;
    /// rows written before the failure stay written.
    pub fn commit(&mut self, store: &dyn TransactionStore) -> Result<CommitOutcome> {
        match self.mode {
            Mode::Insert => self.commit_insert(store),
            Mode::Delete => self.commit_delete(store),
            Mode::Edit => self.commit_edit(store),
        }
    }

    fn commit_insert(&mut self, store: &dyn TransactionStore) -> Result<CommitOutcome> {
        let checks = self.tracker.validate_all(&self.rows, &[]);
        if checks.iter().any(|c| c.has_error()) {
            return self.block("Fix highlighted errors before submitting.");
        }
        let txns: Vec<Transaction> = checks
            .into_iter()
            .filter(|c| !c.is_blank())
            .map(|c| c.transaction)
            .collect();
        if txns.is_empty() {
            return self.block("Nothing to submit: every row is blank.");
        }
        let written = store.insert_many(&txns)?;
        tracing::info!(written, "inserted transactions");
        Ok(CommitOutcome::Inserted(txns))
    }

    fn commit_delete(&mut self, store: &dyn TransactionStore) -> Result<CommitOutcome> {
        let targets = self.selection.selected_rows(&self.baseline);
        if targets.is_empty() {
            return self.block("Select at least one row to delete.");
        }
        let ids = targets
            .iter()
            .map(|t| t.id.ok_or(BudgieError::MissingId))
            .collect::<Result<Vec<_>>>()?;
        for id in &ids {
            store.delete_by_id(*id)?;
        }
        tracing::info!(deleted = ids.len(), "deleted transactions");

        let criteria = self.criteria.clone().unwrap_or_default();
        self.baseline = store.find(&criteria)?;
        self.rows = self.baseline.iter().map(EditableRow::from).collect();
        self.reload_state();
        self.prompt = format!("Deleted {}. {}", ids.len(), self.found_prompt());
        Ok(CommitOutcome::Deleted(ids.len()))
    }

    fn commit_edit(&mut self, store: &dyn TransactionStore) -> Result<CommitOutcome> {
        let checks = self.tracker.validate_all(&self.rows, &self.baseline);
        let chosen: Vec<(usize, &RowCheck)> = checks
            .iter()
            .enumerate()
            .filter(|(row, _)| self.selection.is_selected(*row))
            .collect();
        if chosen.is_empty() {
            return self.block("Select at least one row to save.");
        }
        if let Some((row, _)) = chosen.iter().find(|(_, c)| c.is_blank()) {
            let msg = format!("Row {} is blank; deselect it or restore its values.", row + 1);
            return self.block(&msg);
        }
        if chosen.iter().any(|(_, c)| !c.is_usable()) {
            return self.block("Fix highlighted errors in the selected rows.");
        }
        let txns: Vec<Transaction> = chosen.into_iter().map(|(_, c)| c.transaction.clone()).collect();
        for txn in &txns {
            let id = txn.id.ok_or(BudgieError::MissingId)?;
            store.update_by_id(id, txn)?;
        }
        tracing::info!(updated = txns.len(), "updated transactions");
        Ok(CommitOutcome::Updated(txns))
    }

    fn cell_style(&self, abs: usize, field: Field, cursor_here: bool) -> CellStyle {
        if cursor_here {
            CellStyle::Active
        } else if self.tracker.status(abs, field) == CellStatus::Error {
            CellStyle::Error
        } else if self.tracker.is_modified(abs, field) {
            CellStyle::Modified
        } else if self.selection.is_selected(abs) {
            CellStyle::Marked
        } else {
            CellStyle::Normal
        }
    }

    pub fn render(&self) -> RenderModel {
        let mut header: Vec<&'static str> = Field::ALL.iter().map(|f| f.label()).collect();
        if self.mode.has_select_column() {
            header.push("Select");
        }

        let in_table = self.nav.view == ViewMode::Table;
        let range = self.nav.page_range();
        let start = range.start;
        let rows = self.rows[range]
            .iter()
            .enumerate()
            .map(|(rel, row)| {
                let abs = start + rel;
                let on_row = in_table && rel == self.nav.cursor.row;
                let mut cells: Vec<RenderCell> = Field::ALL
                    .iter()
                    .map(|&field| {
                        let cursor_here = on_row
                            && (self.mode == Mode::Delete || self.nav.cursor.field == field.index());
                        RenderCell {
                            text: row.get(field).to_string(),
                            style: self.cell_style(abs, field, cursor_here),
                        }
                    })
                    .collect();
                if self.mode.has_select_column() {
                    let selected = self.selection.is_selected(abs);
                    let cursor_here = on_row
                        && (self.mode == Mode::Delete || self.nav.cursor.field == FIELD_COUNT);
                    cells.push(RenderCell {
                        text: if selected { "[X]" } else { "[ ]" }.to_string(),
                        style: if cursor_here {
                            CellStyle::Active
                        } else if selected {
                            CellStyle::Marked
                        } else {
                            CellStyle::Normal
                        },
                    });
                }
                cells
            })
            .collect();

        RenderModel {
            title: self.mode.title(),
            header,
            rows,
            page_label: format!("Page {}/{}", self.nav.page + 1, self.nav.page_count()),
            prompt: self.prompt.clone(),
            confirm_label: self.mode.confirm_label(),
            view: self.nav.view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{Call, MemoryStore};

    fn stored(id: i64, year: i32, description: &str, debit: f64) -> Transaction {
        Transaction {
            id: Some(id),
            year,
            month: 5,
            day: 4,
            description: description.to_string(),
            debit,
            credit: 0.0,
            is_valid: true,
        }
    }

    fn type_text(editor: &mut GridEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(Intent::Input(c));
        }
    }

    fn confirm(editor: &mut GridEditor) -> GridAction {
        editor.handle_key(Intent::ToggleView);
        editor.handle_key(Intent::Activate)
    }

    #[test]
    fn test_insert_commits_single_filled_row() {
        let store = MemoryStore::default();
        let mut editor = GridEditor::for_insert(10, 10);
        for text in ["2024", "Jan", "15", "Coffee", "4.50"] {
            type_text(&mut editor, text);
            editor.handle_key(Intent::Advance);
        }
        // cursor now on credit; leave it blank and jump to the confirm view
        editor.nav.view = ViewMode::Confirm;
        assert!(matches!(editor.handle_key(Intent::Activate), GridAction::Commit));

        let outcome = editor.commit(&store).unwrap();
        let expected = Transaction {
            id: None,
            year: 2024,
            month: 1,
            day: 15,
            description: "Coffee".into(),
            debit: 4.5,
            credit: 0.0,
            is_valid: true,
        };
        assert_eq!(outcome, CommitOutcome::Inserted(vec![expected.clone()]));
        assert_eq!(store.calls(), vec![Call::InsertMany(vec![expected])]);
    }

    #[test]
    fn test_insert_with_partial_row_is_blocked() {
        let store = MemoryStore::default();
        let mut editor = GridEditor::for_insert(3, 10);
        editor.nav.cursor.field = Field::Description.index();
        type_text(&mut editor, "Lunch");
        editor.nav.view = ViewMode::Confirm;

        let outcome = editor.commit(&store).unwrap();
        assert_eq!(outcome, CommitOutcome::Blocked);
        assert!(store.calls().is_empty());
        assert_eq!(editor.nav.view, ViewMode::Table);
        assert!(editor.prompt.contains("Fix highlighted errors"));

        let model = editor.render();
        assert_eq!(model.rows[0][Field::Year.index()].style, CellStyle::Error);
        assert_eq!(model.rows[0][Field::Debit.index()].style, CellStyle::Normal);
    }

    #[test]
    fn test_insert_all_blank_is_blocked() {
        let store = MemoryStore::default();
        let mut editor = GridEditor::for_insert(3, 10);
        assert_eq!(editor.commit(&store).unwrap(), CommitOutcome::Blocked);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_input_respects_width_cap() {
        let mut editor = GridEditor::for_insert(1, 10);
        type_text(&mut editor, "1234567");
        assert_eq!(editor.rows()[0].year, "12345");
        editor.handle_key(Intent::Erase);
        assert_eq!(editor.rows()[0].year, "1234");
    }

    #[test]
    fn test_insert_last_cell_advance_flips_to_confirm() {
        let mut editor = GridEditor::for_insert(2, 10);
        editor.nav.cursor.row = 1;
        editor.nav.cursor.field = Field::Credit.index();
        editor.handle_key(Intent::Advance);
        assert_eq!(editor.nav.view, ViewMode::Confirm);
    }

    #[test]
    fn test_edit_flags_only_changed_cell() {
        let store = MemoryStore::with_rows(vec![stored(7, 2023, "Taxi", 20.0)]);
        let results = store.find(&SearchCriteria::default()).unwrap();
        let mut editor = GridEditor::for_edit(results, SearchCriteria::default(), 10);

        for _ in 0..4 {
            editor.handle_key(Intent::Erase);
        }
        type_text(&mut editor, "2024");
        assert!(editor.tracker.is_modified(0, Field::Year));
        for field in &Field::ALL[1..] {
            assert!(!editor.tracker.is_modified(0, *field));
        }

        editor.nav.cursor.field = FIELD_COUNT;
        editor.handle_key(Intent::Activate);
        assert!(editor.selection().is_selected(0));
        assert!(matches!(confirm(&mut editor), GridAction::Commit));

        let outcome = editor.commit(&store).unwrap();
        let expected = Transaction {
            year: 2024,
            ..stored(7, 2023, "Taxi", 20.0)
        };
        assert_eq!(outcome, CommitOutcome::Updated(vec![expected.clone()]));
        let updates: Vec<Call> = store
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .collect();
        assert_eq!(updates, vec![Call::Update(7, expected)]);
    }

    #[test]
    fn test_edit_restoring_text_clears_modified() {
        let mut editor =
            GridEditor::for_edit(vec![stored(1, 2023, "Taxi", 20.0)], SearchCriteria::default(), 10);
        editor.handle_key(Intent::Erase);
        assert!(editor.tracker.is_modified(0, Field::Year));
        editor.handle_key(Intent::Input('3'));
        assert!(Field::ALL.iter().all(|f| !editor.tracker.is_modified(0, *f)));
    }

    #[test]
    fn test_edit_without_selection_is_blocked() {
        let store = MemoryStore::with_rows(vec![stored(1, 2023, "Taxi", 20.0)]);
        let mut editor =
            GridEditor::for_edit(vec![stored(1, 2023, "Taxi", 20.0)], SearchCriteria::default(), 10);
        assert_eq!(editor.commit(&store).unwrap(), CommitOutcome::Blocked);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_edit_selected_row_with_error_is_blocked() {
        let store = MemoryStore::with_rows(vec![stored(1, 2023, "Taxi", 20.0)]);
        let mut editor =
            GridEditor::for_edit(vec![stored(1, 2023, "Taxi", 20.0)], SearchCriteria::default(), 10);
        editor.nav.cursor.field = Field::Month.index();
        editor.handle_key(Intent::Input('x'));
        editor.handle_key(Intent::ToggleSelect);
        assert_eq!(editor.commit(&store).unwrap(), CommitOutcome::Blocked);
        assert_eq!(editor.tracker.status(0, Field::Month), CellStatus::Error);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_edit_selected_blank_row_names_the_row() {
        let rows = vec![stored(1, 2023, "Taxi", 20.0), stored(2, 2023, "Bus", 2.5)];
        let store = MemoryStore::with_rows(rows.clone());
        let mut editor = GridEditor::for_edit(rows, SearchCriteria::default(), 10);
        editor.rows[1] = EditableRow::default();
        editor.selection.toggle(1);
        assert_eq!(editor.commit(&store).unwrap(), CommitOutcome::Blocked);
        assert_eq!(editor.prompt, "Row 2 is blank; deselect it or restore its values.");
        assert!(Field::ALL.iter().all(|f| editor.tracker.status(1, *f) == CellStatus::Inactive));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_delete_selected_rows_then_refresh() {
        let rows = vec![
            stored(1, 2024, "Coffee", 3.0),
            stored(2, 2024, "Tea", 2.0),
            stored(3, 2024, "Cake", 5.0),
        ];
        let store = MemoryStore::with_rows(rows.clone());
        let criteria = SearchCriteria {
            year: Some(2024),
            ..Default::default()
        };
        let mut editor = GridEditor::for_delete(rows, criteria.clone(), 10);

        editor.handle_key(Intent::ToggleSelect);
        editor.handle_key(Intent::MoveDown);
        editor.handle_key(Intent::MoveDown);
        editor.handle_key(Intent::ToggleSelect);
        assert_eq!(editor.selection().selected_count(), 2);
        assert!(matches!(confirm(&mut editor), GridAction::Commit));

        let outcome = editor.commit(&store).unwrap();
        assert_eq!(outcome, CommitOutcome::Deleted(2));
        assert_eq!(
            store.calls(),
            vec![Call::Delete(1), Call::Delete(3), Call::Find(criteria)]
        );
        assert_eq!(editor.selection().len(), 1);
        assert_eq!(editor.selection().selected_count(), 0);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].description, "Tea");
        assert_eq!(editor.nav.view, ViewMode::Table);
        assert_eq!(editor.nav.cursor.row, 0);
    }

    #[test]
    fn test_delete_ignores_typed_text() {
        let mut editor =
            GridEditor::for_delete(vec![stored(1, 2024, "Coffee", 3.0)], SearchCriteria::default(), 10);
        editor.handle_key(Intent::Input('9'));
        editor.handle_key(Intent::Erase);
        assert_eq!(editor.rows()[0].description, "Coffee");
        assert_eq!(editor.rows()[0].year, "2024");
    }

    #[test]
    fn test_toggle_select_uses_absolute_row() {
        let rows: Vec<Transaction> = (1..=15).map(|i| stored(i, 2024, "Row", 1.0)).collect();
        let mut editor = GridEditor::for_delete(rows, SearchCriteria::default(), 10);
        editor.handle_key(Intent::NextPage);
        editor.handle_key(Intent::MoveDown);
        editor.handle_key(Intent::ToggleSelect);
        assert!(editor.selection().is_selected(11));
        assert_eq!(editor.selection().selected_count(), 1);
    }

    #[test]
    fn test_backend_failure_is_returned() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut editor =
            GridEditor::for_delete(vec![stored(1, 2024, "Coffee", 3.0)], SearchCriteria::default(), 10);
        editor.handle_key(Intent::ToggleSelect);
        assert!(editor.commit(&store).is_err());
        assert_eq!(editor.rows().len(), 1);
    }

    #[test]
    fn test_empty_results_render_without_confirm() {
        let mut editor = GridEditor::for_edit(Vec::new(), SearchCriteria::default(), 10);
        editor.handle_key(Intent::ToggleView);
        let model = editor.render();
        assert!(model.rows.is_empty());
        assert_eq!(model.view, ViewMode::Table);
        assert_eq!(model.prompt, "No transactions found.");
        assert_eq!(model.page_label, "Page 1/1");
    }

    #[test]
    fn test_render_marks_cursor_and_selection() {
        let rows = vec![stored(1, 2024, "Coffee", 3.0), stored(2, 2024, "Tea", 2.0)];
        let mut editor = GridEditor::for_edit(rows, SearchCriteria::default(), 10);
        editor.nav.cursor = crate::grid::nav::GridCursor { row: 1, field: FIELD_COUNT };
        editor.handle_key(Intent::Activate);
        let model = editor.render();
        assert_eq!(model.header.last(), Some(&"Select"));
        assert_eq!(model.rows[0][0].style, CellStyle::Normal);
        assert_eq!(model.rows[1][FIELD_COUNT].text, "[X]");
        assert_eq!(model.rows[1][FIELD_COUNT].style, CellStyle::Active);
        assert_eq!(model.rows[1][0].style, CellStyle::Marked);
        assert_eq!(model.rows[1][Field::Debit.index()].text, "2.00");
    }
}
