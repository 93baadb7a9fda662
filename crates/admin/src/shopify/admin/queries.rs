//! GraphQL query definitions for Shopify Admin API.
//!
//! Each query is a unit struct implementing [`GraphQLQuery`], with its
//! variables and response types in a snake_case module of the same name.
//! Response types reuse the catalog shapes from `inventory_manager_core` so
//! the loader can hand them to the page unchanged.

use graphql_client::{GraphQLQuery, QueryBody};

/// Products per page load.
pub const PRODUCTS_FIRST: i64 = 10;

/// Variants per product.
pub const VARIANTS_FIRST: i64 = 5;

// =============================================================================
// Inventory queries
// =============================================================================

/// First page of products with their first variants.
pub struct InventoryProducts;

pub mod inventory_products {
    use inventory_manager_core::ProductConnection;
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "InventoryProducts";
    pub const QUERY: &str = include_str!("../../../graphql/admin/queries/inventory.graphql");

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub variants_first: i64,
    }

    impl Default for Variables {
        fn default() -> Self {
            Self {
                first: super::PRODUCTS_FIRST,
                variants_first: super::VARIANTS_FIRST,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }
}

// Written by hand: there is no Admin API schema file to derive from.
impl GraphQLQuery for InventoryProducts {
    type Variables = inventory_products::Variables;
    type ResponseData = inventory_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: inventory_products::QUERY,
            operation_name: inventory_products::OPERATION_NAME,
        }
    }
}
