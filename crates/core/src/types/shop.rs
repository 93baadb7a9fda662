//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input is not a `*.myshopify.com` host.
    #[error("shop domain must end with {suffix}")]
    WrongSuffix {
        /// Required host suffix.
        suffix: &'static str,
    },
    /// The store handle contains characters Shopify does not allow.
    #[error("shop handle may only contain letters, digits and hyphens")]
    InvalidHandle,
}

/// A Shopify shop domain such as `my-store.myshopify.com`.
///
/// Settings rows and stored access tokens are scoped by this value.
///
/// ## Constraints
///
/// - Lowercased on parse, surrounding whitespace ignored
/// - Must end with `.myshopify.com`
/// - The handle before the suffix must start with a letter or digit and
///   contain only letters, digits and hyphens
///
/// ## Examples
///
/// ```
/// use inventory_manager_core::ShopDomain;
///
/// let shop = ShopDomain::parse("My-Store.myshopify.com").unwrap();
/// assert_eq!(shop.as_str(), "my-store.myshopify.com");
/// assert_eq!(shop.handle(), "my-store");
///
/// assert!(ShopDomain::parse("example.com").is_err());
/// assert!(ShopDomain::parse("evil.com/.myshopify.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Host suffix of every Shopify admin domain.
    pub const SUFFIX: &'static str = ".myshopify.com";

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a `myshopify.com`
    /// host, or the handle contains invalid characters.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        let handle = s
            .strip_suffix(Self::SUFFIX)
            .ok_or(ShopDomainError::WrongSuffix {
                suffix: Self::SUFFIX,
            })?;

        let mut bytes = handle.bytes();
        let valid_first = bytes.next().is_some_and(|b| b.is_ascii_alphanumeric());
        if !valid_first || !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(ShopDomainError::InvalidHandle);
        }

        Ok(Self(s))
    }

    /// Returns the shop domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the store handle (the part before `.myshopify.com`).
    #[must_use]
    pub fn handle(&self) -> &str {
        self.0.strip_suffix(Self::SUFFIX).unwrap_or(&self.0)
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShopDomain {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShopDomain {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShopDomain {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_domains() {
        assert!(ShopDomain::parse("store.myshopify.com").is_ok());
        assert!(ShopDomain::parse("my-store-2.myshopify.com").is_ok());
        assert!(ShopDomain::parse("  STORE.myshopify.com ").is_ok());
    }

    #[test]
    fn test_parse_lowercases() {
        let shop = ShopDomain::parse("Store.MyShopify.com").unwrap();
        assert_eq!(shop.as_str(), "store.myshopify.com");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ShopDomain::parse(""), Err(ShopDomainError::Empty));
    }

    #[test]
    fn test_parse_wrong_suffix() {
        assert!(matches!(
            ShopDomain::parse("store.example.com"),
            Err(ShopDomainError::WrongSuffix { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_handle() {
        assert_eq!(
            ShopDomain::parse(".myshopify.com"),
            Err(ShopDomainError::InvalidHandle)
        );
        assert_eq!(
            ShopDomain::parse("-store.myshopify.com"),
            Err(ShopDomainError::InvalidHandle)
        );
        assert_eq!(
            ShopDomain::parse("a.b.myshopify.com"),
            Err(ShopDomainError::InvalidHandle)
        );
        assert_eq!(
            ShopDomain::parse("evil.com/x.myshopify.com"),
            Err(ShopDomainError::InvalidHandle)
        );
    }

    #[test]
    fn test_handle() {
        let shop = ShopDomain::parse("pineapple.myshopify.com").unwrap();
        assert_eq!(shop.handle(), "pineapple");
    }

    #[test]
    fn test_serde_roundtrip() {
        let shop = ShopDomain::parse("store.myshopify.com").unwrap();
        let json = serde_json::to_string(&shop).unwrap();
        assert_eq!(json, "\"store.myshopify.com\"");
        let parsed: ShopDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, shop);
    }
}
