/// Rows marked for a bulk action, indexed by absolute row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    flags: Vec<bool>,
}

impl Selection {
    pub fn new(rows: usize) -> Self {
        Self {
            flags: vec![false; rows],
        }
    }

    /// All rows cleared, sized to a replaced row collection.
    pub fn reset(&mut self, rows: usize) {
        self.flags.clear();
        self.flags.resize(rows, false);
    }

    pub fn toggle(&mut self, row: usize) {
        if let Some(flag) = self.flags.get_mut(row) {
            *flag = !*flag;
        }
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.flags.get(row).copied().unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// The selected subsequence of `rows`, in order.
    pub fn selected_rows<'a, T>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter()
            .zip(&self.flags)
            .filter(|(_, selected)| **selected)
            .map(|(row, _)| row)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_count() {
        let mut sel = Selection::new(4);
        sel.toggle(1);
        sel.toggle(3);
        assert_eq!(sel.selected_count(), 2);
        sel.toggle(1);
        assert_eq!(sel.selected_count(), 1);
        assert!(sel.is_selected(3));
        assert!(!sel.is_selected(1));
    }

    #[test]
    fn test_toggle_out_of_range_is_ignored() {
        let mut sel = Selection::new(2);
        sel.toggle(5);
        assert_eq!(sel.selected_count(), 0);
        assert!(!sel.is_selected(5));
    }

    #[test]
    fn test_selected_rows_preserves_order() {
        let rows = ["a", "b", "c", "d"];
        let mut sel = Selection::new(rows.len());
        sel.toggle(2);
        sel.toggle(0);
        assert_eq!(sel.selected_rows(&rows), vec![&"a", &"c"]);
    }

    #[test]
    fn test_reset_clears_and_resizes() {
        let mut sel = Selection::new(3);
        sel.toggle(0);
        sel.reset(5);
        assert_eq!(sel.len(), 5);
        assert_eq!(sel.selected_count(), 0);
    }
}
