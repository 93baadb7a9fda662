//! Row selection for the inventory table.

use std::collections::BTreeSet;

use super::VariantRow;
use crate::types::VariantId;

/// Selected rows of the current page.
///
/// Built from the ids a request asks for, keeping only ids that are
/// actually on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<VariantId>,
    total: usize,
}

impl Selection {
    /// Keep the requested ids that match a row.
    pub fn from_requested<I, S>(requested: I, rows: &[VariantRow]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = requested
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .collect();

        let ids = rows
            .iter()
            .filter(|row| wanted.contains(row.id.as_str()))
            .map(|row| row.id.clone())
            .collect();

        Self {
            ids,
            total: rows.len(),
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &VariantId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Every row on the page is selected (and the page is not empty).
    #[must_use]
    pub fn all_selected(&self) -> bool {
        self.total > 0 && self.ids.len() == self.total
    }

    /// Header text for the selection count: `All` or the number.
    #[must_use]
    pub fn label(&self) -> String {
        if self.all_selected() {
            "All".to_string()
        } else {
            self.ids.len().to_string()
        }
    }

    /// Selected ids in stable order.
    pub fn ids(&self) -> impl Iterator<Item = &VariantId> {
        self.ids.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::super::flatten_variants;
    use super::super::tests::{product, variant};
    use super::*;

    fn rows() -> Vec<VariantRow> {
        flatten_variants(
            &[product(
                1,
                "P",
                "ACTIVE",
                vec![variant(1, "a", Some(1)), variant(2, "b", Some(2))],
            )],
            &[],
        )
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let rows = rows();
        let selection = Selection::from_requested(
            ["gid://shopify/ProductVariant/1", "gid://shopify/ProductVariant/99"],
            &rows,
        );
        assert_eq!(selection.count(), 1);
        assert!(selection.is_selected(&rows[0].id));
        assert!(!selection.is_selected(&rows[1].id));
        assert_eq!(selection.label(), "1");
    }

    #[test]
    fn test_all_selected_label() {
        let rows = rows();
        let selection = Selection::from_requested(
            ["gid://shopify/ProductVariant/1", "gid://shopify/ProductVariant/2"],
            &rows,
        );
        assert!(selection.all_selected());
        assert_eq!(selection.label(), "All");
    }

    #[test]
    fn test_empty_page_is_never_all_selected() {
        let selection = Selection::from_requested(Vec::<String>::new(), &[]);
        assert!(!selection.all_selected());
        assert_eq!(selection.label(), "0");
    }

    #[test]
    fn test_duplicates_count_once() {
        let rows = rows();
        let selection = Selection::from_requested(
            ["gid://shopify/ProductVariant/2", "gid://shopify/ProductVariant/2"],
            &rows,
        );
        assert_eq!(selection.count(), 1);
    }
}
