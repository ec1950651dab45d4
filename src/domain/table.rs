//! Column-driven filtering and pagination shared by every list page.

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn css(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: &'static str,
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn new(key: &'static str, header: impl Into<String>) -> Self {
        Self {
            key,
            header: header.into(),
            align: Align::Left,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    View,
    Edit,
    Delete,
    Custom,
}

/// A per-row button. The table reports `(key, row_key)` when one is pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct RowAction {
    pub key: &'static str,
    pub label: String,
    pub kind: ActionKind,
}

impl RowAction {
    pub fn view() -> Self {
        Self::new("view", "View", ActionKind::View)
    }

    pub fn edit() -> Self {
        Self::new("edit", "Edit", ActionKind::Edit)
    }

    pub fn delete() -> Self {
        Self::new("delete", "Delete", ActionKind::Delete)
    }

    pub fn custom(key: &'static str, label: impl Into<String>) -> Self {
        Self::new(key, label, ActionKind::Custom)
    }

    fn new(key: &'static str, label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            ActionKind::View => "#2563eb",
            ActionKind::Edit => "#d97706",
            ActionKind::Delete => "#dc2626",
            ActionKind::Custom => "#4b5563",
        }
    }
}

/// A row that exposes its cells by column key.
pub trait TableRow {
    fn row_key(&self) -> String;

    /// Raw value used for searching. `None` never matches.
    fn cell_value(&self, key: &str) -> Option<String>;

    /// Display text; defaults to the raw value.
    fn render_cell(&self, key: &str) -> String {
        self.cell_value(key).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    filter: String,
    page: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changing the filter always returns to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.page = 1;
    }

    pub fn filtered<'a, T: TableRow>(&self, rows: &'a [T], columns: &[Column]) -> Vec<&'a T> {
        let needle = self.filter.to_lowercase();
        rows.iter()
            .filter(|row| {
                needle.is_empty()
                    || columns.iter().any(|col| {
                        row.cell_value(col.key)
                            .filter(|v| !v.is_empty())
                            .is_some_and(|v| v.to_lowercase().contains(&needle))
                    })
            })
            .collect()
    }

    pub fn total_pages(&self, filtered_count: usize) -> usize {
        filtered_count.div_ceil(self.page_size)
    }

    /// Current page, clamped into the range the filtered set allows.
    pub fn current_page(&self, filtered_count: usize) -> usize {
        self.page.clamp(1, self.total_pages(filtered_count).max(1))
    }

    pub fn go_to(&mut self, page: usize, filtered_count: usize) {
        self.page = page.clamp(1, self.total_pages(filtered_count).max(1));
    }

    pub fn next_page(&mut self, filtered_count: usize) {
        let page = self.current_page(filtered_count) + 1;
        self.go_to(page, filtered_count);
    }

    pub fn prev_page(&mut self, filtered_count: usize) {
        let page = self.current_page(filtered_count).saturating_sub(1);
        self.go_to(page, filtered_count);
    }

    pub fn page_rows<'a, T>(&self, filtered: &[&'a T]) -> Vec<&'a T> {
        let start = (self.current_page(filtered.len()) - 1) * self.page_size;
        filtered
            .iter()
            .skip(start)
            .take(self.page_size)
            .copied()
            .collect()
    }

    /// "Showing a to b of n entries"; `None` for an empty set.
    pub fn summary(&self, filtered_count: usize) -> Option<String> {
        if filtered_count == 0 {
            return None;
        }
        let start = (self.current_page(filtered_count) - 1) * self.page_size;
        let end = (start + self.page_size).min(filtered_count);
        Some(format!(
            "Showing {} to {} of {} entries",
            start + 1,
            end,
            filtered_count
        ))
    }

    /// Pagination controls only appear when there is more than one page.
    pub fn needs_pagination(&self, filtered_count: usize) -> bool {
        self.total_pages(filtered_count) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: u32,
        name: &'static str,
        note: Option<&'static str>,
    }

    impl TableRow for Item {
        fn row_key(&self) -> String {
            self.id.to_string()
        }

        fn cell_value(&self, key: &str) -> Option<String> {
            match key {
                "id" => Some(self.id.to_string()),
                "name" => Some(self.name.to_string()),
                "note" => self.note.map(str::to_string),
                _ => None,
            }
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID").align(Align::Right),
            Column::new("name", "Name"),
            Column::new("note", "Note"),
        ]
    }

    fn items(n: u32) -> Vec<Item> {
        (1..=n)
            .map(|id| Item {
                id,
                name: if id % 2 == 0 { "Even" } else { "Odd" },
                note: (id == 3).then_some("special"),
            })
            .collect()
    }

    #[test]
    fn test_filter_any_column_case_insensitive() {
        let rows = items(6);
        let mut state = TableState::default();
        state.set_filter("SPECIAL");
        let hits = state.filtered(&rows, &columns());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);

        state.set_filter("even");
        assert_eq!(state.filtered(&rows, &columns()).len(), 3);
    }

    #[test]
    fn test_filter_resets_page() {
        let rows = items(25);
        let mut state = TableState::default();
        state.go_to(3, rows.len());
        assert_eq!(state.current_page(rows.len()), 3);
        state.set_filter("odd");
        assert_eq!(state.current_page(13), 1);
    }

    #[test]
    fn test_page_math() {
        let rows = items(25);
        let mut state = TableState::default();
        let filtered = state.filtered(&rows, &columns());
        assert_eq!(state.total_pages(filtered.len()), 3);

        state.go_to(99, filtered.len());
        assert_eq!(state.current_page(filtered.len()), 3);
        assert_eq!(state.page_rows(&filtered).len(), 5);
        assert_eq!(
            state.summary(filtered.len()).as_deref(),
            Some("Showing 21 to 25 of 25 entries")
        );

        state.go_to(0, filtered.len());
        assert_eq!(state.current_page(filtered.len()), 1);
        state.prev_page(filtered.len());
        assert_eq!(state.current_page(filtered.len()), 1);
    }

    #[test]
    fn test_empty_set() {
        let state = TableState::default();
        assert_eq!(state.total_pages(0), 0);
        assert_eq!(state.current_page(0), 1);
        assert!(state.summary(0).is_none());
        assert!(!state.needs_pagination(0));
    }

    #[test]
    fn test_render_defaults_to_raw() {
        let item = Item {
            id: 1,
            name: "Odd",
            note: None,
        };
        assert_eq!(item.render_cell("name"), "Odd");
        assert_eq!(item.render_cell("note"), "");
    }
}
