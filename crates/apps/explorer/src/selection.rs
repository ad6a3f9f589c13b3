//! Click-driven multi-selection over the visible listing.

use std::collections::BTreeSet;

use platform_host::FsEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Modifier held during a click.
pub enum ClickModifier {
    /// Plain click: select only the clicked item.
    #[default]
    None,
    /// Ctrl/Cmd click: toggle the clicked item.
    Toggle,
    /// Shift click: select the range from the anchor to the clicked item.
    Range,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Selected item names plus the anchor index used for range selection.
pub struct Selection {
    names: BTreeSet<String>,
    anchor: Option<usize>,
}

impl Selection {
    /// Applies a click on `items[index]`. Out-of-range indexes are ignored.
    pub fn click(&mut self, items: &[&FsEntry], index: usize, modifier: ClickModifier) {
        let Some(clicked) = items.get(index) else {
            return;
        };
        match (modifier, self.anchor) {
            (ClickModifier::Range, Some(anchor)) => {
                let (start, end) = (anchor.min(index), anchor.max(index));
                self.names = items
                    .iter()
                    .take(end + 1)
                    .skip(start)
                    .map(|entry| entry.name.clone())
                    .collect();
            }
            (ClickModifier::Toggle, _) => {
                if !self.names.remove(&clicked.name) {
                    self.names.insert(clicked.name.clone());
                }
                self.anchor = Some(index);
            }
            _ => {
                self.names = BTreeSet::from([clicked.name.clone()]);
                self.anchor = Some(index);
            }
        }
    }

    /// Selects exactly `name`, anchored at `index`.
    pub fn select_only(&mut self, name: impl Into<String>, index: Option<usize>) {
        self.names = BTreeSet::from([name.into()]);
        self.anchor = index;
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.names.clear();
        self.anchor = None;
    }

    /// Returns `true` when `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of selected names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of the last plain or toggle click.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Selected names in `items` order.
    pub fn ordered_names(&self, items: &[FsEntry]) -> Vec<String> {
        items
            .iter()
            .filter(|entry| self.names.contains(&entry.name))
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Drops names that no longer appear in `items`.
    pub fn retain_present(&mut self, items: &[FsEntry]) {
        self.names
            .retain(|name| items.iter().any(|entry| &entry.name == name));
        if self.names.is_empty() {
            self.anchor = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::FsNode;
    use pretty_assertions::assert_eq;

    use super::*;

    fn listing(names: &[&str]) -> Vec<FsEntry> {
        names
            .iter()
            .map(|name| FsEntry::from_node(*name, format!("/{name}"), &FsNode::text_file("", 0)))
            .collect()
    }

    #[test]
    fn plain_toggle_and_range_clicks() {
        let entries = listing(&["a", "b", "c", "d"]);
        let items: Vec<&FsEntry> = entries.iter().collect();
        let mut selection = Selection::default();

        selection.click(&items, 1, ClickModifier::None);
        assert_eq!(selection.ordered_names(&entries), ["b"]);

        selection.click(&items, 3, ClickModifier::Range);
        assert_eq!(selection.ordered_names(&entries), ["b", "c", "d"]);
        assert_eq!(selection.anchor(), Some(1));

        selection.click(&items, 0, ClickModifier::Range);
        assert_eq!(selection.ordered_names(&entries), ["a", "b"]);

        selection.click(&items, 3, ClickModifier::Toggle);
        selection.click(&items, 0, ClickModifier::Toggle);
        assert_eq!(selection.ordered_names(&entries), ["b", "d"]);
        assert_eq!(selection.anchor(), Some(0));
    }

    #[test]
    fn range_without_anchor_acts_as_plain_click() {
        let entries = listing(&["a", "b"]);
        let items: Vec<&FsEntry> = entries.iter().collect();
        let mut selection = Selection::default();
        selection.click(&items, 1, ClickModifier::Range);
        assert_eq!(selection.ordered_names(&entries), ["b"]);
        selection.click(&items, 9, ClickModifier::None);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn retain_present_forgets_vanished_names() {
        let entries = listing(&["a", "b"]);
        let items: Vec<&FsEntry> = entries.iter().collect();
        let mut selection = Selection::default();
        selection.click(&items, 0, ClickModifier::None);
        selection.retain_present(&listing(&["b"]));
        assert!(selection.is_empty());
        assert_eq!(selection.anchor(), None);
    }
}
