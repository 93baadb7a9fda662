//! Newtype IDs for Shopify global IDs.
//!
//! Shopify identifies every resource with a GID of the form
//! `gid://shopify/<Resource>/<number>`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent mixing IDs from different resources.

/// Errors that can occur when parsing a Shopify GID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input does not name the expected resource.
    #[error("expected a gid://shopify/{expected}/<id> identifier")]
    WrongResource {
        /// Resource name the id should carry.
        expected: &'static str,
    },
    /// The trailing segment is not a number.
    #[error("id must end with a numeric identifier")]
    NotNumeric,
}

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` which checks the `gid://shopify/<Resource>/<n>` shape
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use inventory_manager_core::define_gid;
/// define_gid!(LocationId, "Location");
///
/// let id = LocationId::parse("gid://shopify/Location/42").unwrap();
/// assert_eq!(id.numeric_id(), 42);
/// assert!(LocationId::parse("gid://shopify/Product/42").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name carried in the GID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a GID, checking that it names this resource.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty, names another
            /// resource, or does not end with a number.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::GidError> {
                let s = s.trim();
                if s.is_empty() {
                    return Err($crate::types::id::GidError::Empty);
                }
                let prefix = concat!("gid://shopify/", $resource, "/");
                let tail = s
                    .strip_prefix(prefix)
                    .ok_or($crate::types::id::GidError::WrongResource {
                        expected: $resource,
                    })?;
                // Some GIDs carry a query suffix (e.g. `?inventory_item_id=...`)
                let number = tail.split('?').next().unwrap_or_default();
                if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                    return Err($crate::types::id::GidError::NotNumeric);
                }
                Ok(Self(s.to_owned()))
            }

            /// Wrap a GID without validation (database and API values).
            #[must_use]
            pub fn new_unchecked(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the GID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the trailing numeric identifier, or 0 if it cannot be read.
            #[must_use]
            pub fn numeric_id(&self) -> u64 {
                self.0
                    .rsplit('/')
                    .next()
                    .and_then(|tail| tail.split('?').next())
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
