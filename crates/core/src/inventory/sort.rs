//! Column sorting for the inventory table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::VariantRow;

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Product,
    Variant,
    #[serde(rename = "quantity")]
    InventoryQuantity,
    Status,
}

impl SortColumn {
    /// Every column, in table order.
    pub const ALL: [Self; 4] = [
        Self::Product,
        Self::Variant,
        Self::InventoryQuantity,
        Self::Status,
    ];

    /// Query-string spelling.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Variant => "variant",
            Self::InventoryQuantity => "quantity",
            Self::Status => "status",
        }
    }

    /// Parse the query-string spelling.
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_param() == s)
    }

    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Variant => "Variant",
            Self::InventoryQuantity => "Inventory Quantity",
            Self::Status => "Status",
        }
    }

    fn compare(self, a: &VariantRow, b: &VariantRow) -> Ordering {
        match self {
            Self::Product => compare_text(&a.product_title, &b.product_title),
            Self::Variant => compare_text(&a.title, &b.title),
            Self::InventoryQuantity => a.inventory_quantity.cmp(&b.inventory_quantity),
            Self::Status => compare_text(a.product_status.as_str(), b.product_status.as_str()),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Query-string spelling, also valid for `aria-sort`.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "ascending" | "asc" => Some(Self::Ascending),
            "descending" | "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// The table's single sort key and direction.
///
/// With no column chosen the table uses the page default: status, then
/// product title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Build from query parameters, ignoring unknown values.
    #[must_use]
    pub fn from_params(sort: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            column: sort.and_then(SortColumn::from_param),
            direction: direction
                .and_then(SortDirection::from_param)
                .unwrap_or_default(),
        }
    }

    /// State after clicking `column`'s heading.
    ///
    /// Clicking the active column flips the direction; clicking another
    /// column makes it active and keeps the current direction.
    #[must_use]
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == Some(column) {
            Self {
                column: self.column,
                direction: self.direction.flip(),
            }
        } else {
            Self {
                column: Some(column),
                direction: self.direction,
            }
        }
    }

    /// `aria-sort` value for a column heading.
    #[must_use]
    pub fn aria_sort(self, column: SortColumn) -> &'static str {
        if self.column == Some(column) {
            self.direction.as_param()
        } else {
            "none"
        }
    }

    /// Compare two rows under this state.
    #[must_use]
    pub fn compare(self, a: &VariantRow, b: &VariantRow) -> Ordering {
        let (a, b) = match self.direction {
            SortDirection::Ascending => (a, b),
            SortDirection::Descending => (b, a),
        };
        match self.column {
            Some(column) => column.compare(a, b),
            None => compare_text(a.product_status.as_str(), b.product_status.as_str())
                .then_with(|| compare_text(&a.product_title, &b.product_title)),
        }
    }

    /// Sort rows in place (stable).
    pub fn apply(self, rows: &mut [VariantRow]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Case-insensitive comparison with a byte-order tiebreak, so that "apple"
/// sorts next to "Apple" but the order stays total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
