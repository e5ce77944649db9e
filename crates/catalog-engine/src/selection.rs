//! Filtering and selection of sheet items

use crate::types::CatalogItem;
use std::collections::HashSet;

/// Criteria an item must meet to be offered for selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemFilter {
    pub active_only: bool,
    pub require_image: bool,
    /// Stock must be strictly greater than this
    pub min_stock: f64,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            active_only: true,
            require_image: true,
            min_stock: -1.0,
        }
    }
}

impl ItemFilter {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        (!self.active_only || item.active)
            && (!self.require_image || item.has_image())
            && item.stock_balance > self.min_stock
    }

    /// Items passing the filter, in sheet order
    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Selected items keyed by code, in selection order
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: Vec<CatalogItem>,
    codes: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Add `item` unless an item with the same code is already selected.
    ///
    /// Returns whether the item was added.
    pub fn insert(&mut self, item: CatalogItem) -> bool {
        if !self.codes.insert(item.code.clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, code: &str) -> Option<CatalogItem> {
        if !self.codes.remove(code) {
            return None;
        }
        let index = self.items.iter().position(|item| item.code == code)?;
        Some(self.items.remove(index))
    }

    /// Select `item` if unselected, deselect it otherwise.
    ///
    /// Returns whether the item is selected afterwards.
    pub fn toggle(&mut self, item: &CatalogItem) -> bool {
        if self.remove(&item.code).is_some() {
            false
        } else {
            self.insert(item.clone())
        }
    }

    /// Select every visible item, or clear the selection when all of them are
    /// already selected
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a CatalogItem>) {
        let visible: Vec<&CatalogItem> = visible.into_iter().collect();
        let all_selected =
            !visible.is_empty() && visible.iter().all(|item| self.contains(&item.code));

        if all_selected {
            self.clear();
        } else {
            for item in visible {
                self.insert(item.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CatalogItem> {
        self.items
    }
}

impl FromIterator<CatalogItem> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        let mut selection = SelectionSet::new();
        for item in iter {
            selection.insert(item);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str) -> CatalogItem {
        CatalogItem::new(code, format!("Item {}", code)).with_image(format!("{}.jpg", code))
    }

    #[test]
    fn test_default_filter() {
        let filter = ItemFilter::default();
        assert!(filter.matches(&item("1")));
        assert!(filter.matches(&item("1").with_stock(-0.5)));
        assert!(!filter.matches(&item("1").with_stock(-1.0)));
        assert!(!filter.matches(&item("1").with_active(false)));
        assert!(!filter.matches(&CatalogItem::new("1", "no image")));
    }

    #[test]
    fn test_relaxed_filter() {
        let filter = ItemFilter {
            active_only: false,
            require_image: false,
            min_stock: 5.0,
        };
        assert!(filter.matches(&CatalogItem::new("1", "x").with_active(false).with_stock(6.0)));
        assert!(!filter.matches(&CatalogItem::new("1", "x").with_stock(5.0)));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut selection = SelectionSet::new();
        assert!(selection.insert(item("A")));
        assert!(!selection.insert(item("A")));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(&item("A")));
        assert!(selection.contains("A"));
        assert!(!selection.toggle(&item("A")));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut selection: SelectionSet = ["A", "B", "C"].into_iter().map(item).collect();
        selection.remove("B");
        let codes: Vec<&str> = selection.items().iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "C"]);
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let visible = vec![item("A"), item("B")];
        let mut selection = SelectionSet::new();
        selection.toggle(&visible[0]);

        selection.toggle_all(&visible);
        assert_eq!(selection.len(), 2);

        selection.toggle_all(&visible);
        assert!(selection.is_empty());
    }
}
