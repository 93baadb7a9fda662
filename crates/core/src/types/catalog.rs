//! Product catalog records in the Admin API edge/node shape.
//!
//! These mirror the response of the inventory products query field for
//! field, so the loader can hand them to clients verbatim.

use serde::{Deserialize, Serialize};

use super::{ProductId, ProductStatus, VariantId};

/// `products` connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConnection {
    pub edges: Vec<ProductEdge>,
}

/// One edge of the `products` connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEdge {
    pub node: ProductNode,
}

/// A product with its first page of variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductNode {
    pub id: ProductId,
    pub title: String,
    pub status: ProductStatus,
    pub variants: VariantConnection,
}

/// `variants` connection of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConnection {
    pub edges: Vec<VariantEdge>,
}

/// One edge of the `variants` connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEdge {
    pub node: VariantNode,
}

/// A product variant with its stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: VariantId,
    pub title: String,
    /// Total quantity across locations; `null` when the variant is not tracked.
    pub inventory_quantity: Option<i64>,
}

impl ProductNode {
    /// Iterate over the product's variants.
    pub fn variants(&self) -> impl Iterator<Item = &VariantNode> {
        self.variants.edges.iter().map(|edge| &edge.node)
    }
}
