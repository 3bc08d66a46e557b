//! Declarative row/section model driving every list-based screen
//!
//! Screens never patch individual rows. They rebuild the full section
//! sequence from current state and swap it in wholesale, so indices can
//! never go stale between data changes and redraws.

/// A single renderable row inside a section
///
/// The group identifier is a string tag that selects how the row is
/// rendered and what selecting it does. The payload carries whatever
/// data the owning screen needs back when the row is activated.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRow<P> {
    /// Tag selecting the renderer/behavior for this row
    pub group: &'static str,
    /// Primary display text, if any
    pub text: Option<String>,
    /// Arbitrary data attached by the owning screen
    pub payload: Option<P>,
    /// Height override in terminal rows (default height when None)
    pub height: Option<u16>,
}

impl<P> ContentRow<P> {
    pub fn new(group: &'static str) -> Self {
        Self {
            group,
            text: None,
            payload: None,
            height: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }
}

/// An ordered group of rows with an optional title and footer
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSection<P> {
    pub title: Option<String>,
    pub footer: Option<String>,
    pub rows: Vec<ContentRow<P>>,
}

impl<P> ContentSection<P> {
    pub fn new(rows: Vec<ContentRow<P>>) -> Self {
        Self {
            title: None,
            footer: None,
            rows,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Sections plus a flat cursor over their rows
///
/// The only mutation is `replace_sections`; the flat index is rebuilt with
/// the sections and the cursor is clamped into the new index space.
#[derive(Debug, Default)]
pub struct ContentList<P> {
    sections: Vec<ContentSection<P>>,
    /// Flat (section, row) pairs in display order
    index: Vec<(usize, usize)>,
    cursor: Option<usize>,
}

impl<P> ContentList<P> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            index: Vec::new(),
            cursor: None,
        }
    }

    /// Swap in a freshly built section sequence
    ///
    /// Keeps the cursor position where possible, clamps to the last row
    /// when the list shrank, clears it when the list is empty.
    pub fn replace_sections(&mut self, sections: Vec<ContentSection<P>>) {
        self.sections = sections;
        self.index = self
            .sections
            .iter()
            .enumerate()
            .flat_map(|(s, section)| (0..section.rows.len()).map(move |r| (s, r)))
            .collect();

        self.cursor = match (self.cursor, self.index.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(c), len) => Some(c.min(len - 1)),
        };
    }

    pub fn sections(&self) -> &[ContentSection<P>] {
        &self.sections
    }

    /// Total number of rows across all sections
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// O(1) row lookup by (section, row)
    pub fn row_at(&self, section: usize, row: usize) -> Option<&ContentRow<P>> {
        self.sections.get(section)?.rows.get(row)
    }

    /// Currently selected (section, row) pair
    pub fn selected(&self) -> Option<(usize, usize)> {
        self.cursor.map(|c| self.index[c])
    }

    pub fn selected_row(&self) -> Option<&ContentRow<P>> {
        let (s, r) = self.selected()?;
        self.row_at(s, r)
    }

    /// Flat position of the cursor, for renderers
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Move selection down, wrapping at the end
    pub fn select_next(&mut self) {
        if self.index.is_empty() {
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(c) if c + 1 < self.index.len() => c + 1,
            _ => 0,
        });
    }

    /// Move selection up, wrapping at the start
    pub fn select_previous(&mut self) {
        if self.index.is_empty() {
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(c) if c > 0 => c - 1,
            _ => self.index.len() - 1,
        });
    }

    pub fn select_first(&mut self) {
        if !self.index.is_empty() {
            self.cursor = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.index.is_empty() {
            self.cursor = Some(self.index.len() - 1);
        }
    }

    /// Move the cursor to the first row with the given group tag
    pub fn select_group(&mut self, group: &str) {
        let found = self.index.iter().position(|&(s, r)| {
            self.sections[s].rows[r].group == group
        });
        if found.is_some() {
            self.cursor = found;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(n: usize) -> ContentSection<u32> {
        let rows = (0..n)
            .map(|i| ContentRow::new("item").with_payload(i as u32))
            .collect();
        ContentSection::new(rows)
    }

    #[test]
    fn test_rebuild_matches_input_shape() {
        let mut list = ContentList::new();
        list.replace_sections(vec![section(2), section(3), section(1)]);

        assert_eq!(list.sections().len(), 3);
        assert_eq!(list.row_count(), 6);
        assert_eq!(list.sections()[1].rows.len(), 3);

        // Every supplied (section, row) pair resolves, one past the end does not
        assert!(list.row_at(1, 2).is_some());
        assert!(list.row_at(1, 3).is_none());
        assert!(list.row_at(3, 0).is_none());
    }

    #[test]
    fn test_rebuild_clamps_cursor() {
        let mut list = ContentList::new();
        list.replace_sections(vec![section(5)]);
        list.select_last();
        assert_eq!(list.selected(), Some((0, 4)));

        // Shrinking rebuild clamps to the new last row
        list.replace_sections(vec![section(2)]);
        assert_eq!(list.selected(), Some((0, 1)));

        // Emptying rebuild clears the selection
        list.replace_sections(vec![]);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut list = ContentList::new();
        list.replace_sections(vec![section(2), section(1)]);

        assert_eq!(list.selected(), Some((0, 0)));
        list.select_next();
        assert_eq!(list.selected(), Some((0, 1)));
        list.select_next();
        assert_eq!(list.selected(), Some((1, 0)));
        list.select_next();
        assert_eq!(list.selected(), Some((0, 0)));

        list.select_previous();
        assert_eq!(list.selected(), Some((1, 0)));
    }

    #[test]
    fn test_navigation_on_empty_list() {
        let mut list: ContentList<u32> = ContentList::new();
        list.select_next();
        list.select_previous();
        list.select_first();
        list.select_last();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_select_group() {
        let mut list: ContentList<u32> = ContentList::new();
        let rows = vec![
            ContentRow::new("photo"),
            ContentRow::new("map"),
            ContentRow::new("title"),
        ];
        list.replace_sections(vec![ContentSection::new(rows)]);

        list.select_group("title");
        assert_eq!(list.selected_row().map(|r| r.group), Some("title"));

        // Unknown group leaves the cursor alone
        list.select_group("nope");
        assert_eq!(list.selected_row().map(|r| r.group), Some("title"));
    }

    #[test]
    fn test_row_builder() {
        let row: ContentRow<u32> = ContentRow::new("note")
            .with_text("A note")
            .with_height(6);
        assert_eq!(row.group, "note");
        assert_eq!(row.text.as_deref(), Some("A note"));
        assert_eq!(row.height, Some(6));
        assert!(row.payload.is_none());
    }
}
