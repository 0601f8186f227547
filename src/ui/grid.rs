use std::collections::BTreeSet;

use crate::config::{DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS};
use crate::models::Record;

/// In-memory view state over the current record batch: title filter, local
/// paginator, row cursor and checkbox selection.
///
/// Rows are addressed by their position in the batch, so the selection is
/// always derivable from the batch it was made on. Rebinding a new batch
/// clears it.
#[derive(Debug, Clone)]
pub struct GridState {
    rows_per_page: usize,
    page: usize,
    cursor: usize,
    filter: Option<String>,
    filtered: Vec<usize>,
    selection: BTreeSet<usize>,
}

impl GridState {
    pub fn new(rows_per_page: usize) -> Self {
        let rows_per_page = if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            rows_per_page
        } else {
            DEFAULT_ROWS_PER_PAGE
        };
        Self {
            rows_per_page,
            page: 0,
            cursor: 0,
            filter: None,
            filtered: Vec::new(),
            selection: BTreeSet::new(),
        }
    }

    /// Bind a freshly loaded batch. The filter survives, everything else resets.
    pub fn rebind(&mut self, records: &[Record]) {
        self.selection.clear();
        self.page = 0;
        self.cursor = 0;
        self.apply_filter(records);
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn set_filter(&mut self, filter: Option<String>, records: &[Record]) {
        self.filter = filter.filter(|query| !query.trim().is_empty());
        self.page = 0;
        self.cursor = 0;
        self.apply_filter(records);
    }

    /// Case-insensitive "starts with" match on the title, mirroring a plain
    /// column text filter.
    fn apply_filter(&mut self, records: &[Record]) {
        let query = self
            .filter
            .as_ref()
            .map(|query| query.trim_start().to_lowercase());
        self.filtered = records
            .iter()
            .enumerate()
            .filter(|(_, record)| match &query {
                Some(query) => record.title().to_lowercase().starts_with(query.as_str()),
                None => true,
            })
            .map(|(position, _)| position)
            .collect();
        self.clamp();
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Step through 5 → 10 → 20 → 5, keeping the first visible row on screen.
    pub fn cycle_rows_per_page(&mut self) -> usize {
        let index = ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&size| size == self.rows_per_page)
            .unwrap_or(0);
        let next = ROWS_PER_PAGE_OPTIONS[(index + 1) % ROWS_PER_PAGE_OPTIONS.len()];
        let first_visible = self.page * self.rows_per_page;
        self.rows_per_page = next;
        self.page = first_visible / next;
        self.cursor = 0;
        self.clamp();
        next
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.rows_per_page).max(1)
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 >= self.page_count() {
            return false;
        }
        self.page += 1;
        self.cursor = 0;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        self.cursor = 0;
        true
    }

    /// Batch positions shown on the current grid page.
    pub fn visible(&self) -> &[usize] {
        let start = (self.page * self.rows_per_page).min(self.filtered.len());
        let end = (start + self.rows_per_page).min(self.filtered.len());
        &self.filtered[start..end]
    }

    /// Number of rows passing the filter.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// 1-based inclusive range of rows on screen, `None` when nothing is shown.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let visible = self.visible().len();
        if visible == 0 {
            return None;
        }
        let first = self.page * self.rows_per_page + 1;
        Some((first, first + visible - 1))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let target = (self.cursor as isize + offset).clamp(0, len as isize - 1);
        self.cursor = target as usize;
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.visible().len().saturating_sub(1);
    }

    /// Batch position under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.visible().get(self.cursor).copied()
    }

    /// Flip the checkbox under the cursor. Returns the new checked state.
    pub fn toggle_current(&mut self) -> Option<bool> {
        let position = self.current()?;
        Some(self.toggle(position))
    }

    pub fn toggle(&mut self, position: usize) -> bool {
        if self.selection.remove(&position) {
            false
        } else {
            self.selection.insert(position);
            true
        }
    }

    /// Header checkbox: select every filtered row, or clear them if they are
    /// all selected already. Returns whether rows ended up selected.
    pub fn toggle_all(&mut self) -> bool {
        let all_selected = !self.filtered.is_empty()
            && self
                .filtered
                .iter()
                .all(|position| self.selection.contains(position));
        if all_selected {
            for position in &self.filtered {
                self.selection.remove(position);
            }
            false
        } else {
            self.selection.extend(self.filtered.iter().copied());
            !self.filtered.is_empty()
        }
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selection.contains(&position)
    }

    /// Selected batch positions in batch order.
    pub fn selection(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    fn clamp(&mut self) {
        let last_page = self.page_count() - 1;
        if self.page > last_page {
            self.page = last_page;
        }
        let visible = self.visible().len();
        if visible == 0 {
            self.cursor = 0;
        } else if self.cursor >= visible {
            self.cursor = visible - 1;
        }
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}
