use std::ops::Range;

/// Which half of a grid screen has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Confirm,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Table => Self::Confirm,
            Self::Confirm => Self::Table,
        }
    }
}

/// `row` is relative to the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub row: usize,
    pub field: usize,
}

#[derive(Debug, Clone)]
pub struct GridNav {
    pub cursor: GridCursor,
    pub view: ViewMode,
    pub page: usize,
    page_size: usize,
    row_count: usize,
    /// Navigable columns: the data fields plus the select cell where the grid has one.
    columns: usize,
}

impl GridNav {
    pub fn new(row_count: usize, page_size: usize, columns: usize) -> Self {
        Self {
            cursor: GridCursor::default(),
            view: ViewMode::Table,
            page: 0,
            page_size: page_size.max(1),
            row_count,
            columns: columns.max(1),
        }
    }

    /// Back to the first cell of the first page for a freshly loaded row set.
    pub fn reset(&mut self, row_count: usize) {
        *self = Self::new(row_count, self.page_size, self.columns);
    }

    pub fn page_count(&self) -> usize {
        self.row_count.div_ceil(self.page_size).max(1)
    }

    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.row_count);
        let end = (start + self.page_size).min(self.row_count);
        start..end
    }

    pub fn rows_on_page(&self) -> usize {
        self.page_range().len()
    }

    pub fn absolute_row(&self) -> usize {
        self.page * self.page_size + self.cursor.row
    }

    pub fn move_up(&mut self) {
        match self.view {
            ViewMode::Confirm => self.view = ViewMode::Table,
            ViewMode::Table => self.cursor.row = self.cursor.row.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        if self.view != ViewMode::Table || self.rows_on_page() == 0 {
            return;
        }
        if self.cursor.row + 1 < self.rows_on_page() {
            self.cursor.row += 1;
        } else {
            self.view = ViewMode::Confirm;
        }
    }

    /// Wraps to the last column of the previous row; stops at the first cell.
    pub fn move_left(&mut self) {
        if self.view != ViewMode::Table {
            return;
        }
        if self.cursor.field > 0 {
            self.cursor.field -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.field = self.columns - 1;
        }
    }

    /// Wraps to the first column of the next row; past the last cell focus
    /// moves to the confirm view.
    pub fn move_right(&mut self) {
        if self.view != ViewMode::Table || self.rows_on_page() == 0 {
            return;
        }
        if self.cursor.field + 1 < self.columns {
            self.cursor.field += 1;
        } else if self.cursor.row + 1 < self.rows_on_page() {
            self.cursor.row += 1;
            self.cursor.field = 0;
        } else {
            self.view = ViewMode::Confirm;
        }
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.cursor.row = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.cursor.row = 0;
        }
    }

    /// An empty grid has nothing to confirm, so focus stays on the table.
    pub fn toggle_view(&mut self) {
        if self.row_count == 0 {
            self.view = ViewMode::Table;
        } else {
            self.view = self.view.toggled();
        }
    }
}
