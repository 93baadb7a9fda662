//! Minimum stock threshold type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Threshold applied when a variant has no stored setting.
///
/// This is the single source for the default: new settings rows are seeded
/// with it, the low-stock count falls back to it, and the quantity tone uses
/// it for unseeded variants. Deployments may override it through
/// configuration.
pub const DEFAULT_MIN_STOCK: MinStock = MinStock(5);

/// Errors that can occur when parsing a [`MinStock`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MinStockError {
    /// The input string is empty.
    #[error("minimum stock is required")]
    Empty,
    /// The input is not a whole number.
    #[error("minimum stock must be a whole number (got {0:?})")]
    NotANumber(String),
    /// The input is below zero.
    #[error("minimum stock cannot be negative (got {0})")]
    Negative(i64),
    /// The input does not fit the stored column.
    #[error("minimum stock must be at most {max}")]
    TooLarge {
        /// Maximum allowed value.
        max: i32,
    },
}

/// A per-variant low-stock threshold.
///
/// A variant is low on stock when its inventory quantity is strictly below
/// this value.
///
/// ## Constraints
///
/// - Whole number, no sign other than a leading `-` (which is rejected)
/// - `0..=i32::MAX`
/// - Surrounding whitespace is ignored
///
/// ## Examples
///
/// ```
/// use inventory_manager_core::MinStock;
///
/// assert_eq!(MinStock::parse("10").unwrap().get(), 10);
/// assert_eq!(MinStock::parse(" 0 ").unwrap().get(), 0);
///
/// assert!(MinStock::parse("").is_err());     // empty
/// assert!(MinStock::parse("abc").is_err());  // not a number
/// assert!(MinStock::parse("2.5").is_err());  // fractional
/// assert!(MinStock::parse("-1").is_err());   // negative
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct MinStock(i32);

impl MinStock {
    /// Largest accepted threshold.
    pub const MAX: i32 = i32::MAX;

    /// Parse a threshold from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or only whitespace
    /// - Is not a whole number
    /// - Is negative
    /// - Does not fit in a 32-bit column
    pub fn parse(s: &str) -> Result<Self, MinStockError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MinStockError::Empty);
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MinStockError::NotANumber(s.to_owned()));
        }

        match s.parse::<i64>() {
            Ok(value) => Self::try_from(value),
            // All digits but out of i64 range
            Err(_) if s.starts_with('-') => Err(MinStockError::Negative(i64::MIN)),
            Err(_) => Err(MinStockError::TooLarge { max: Self::MAX }),
        }
    }

    /// Create a threshold from a known non-negative value.
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        if value < 0 { Self(0) } else { Self(value) }
    }

    /// Returns the threshold value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether `quantity` is strictly below this threshold.
    #[must_use]
    pub fn exceeds(self, quantity: i64) -> bool {
        quantity < i64::from(self.0)
    }
}

impl Default for MinStock {
    fn default() -> Self {
        DEFAULT_MIN_STOCK
    }
}

impl TryFrom<i64> for MinStock {
    type Error = MinStockError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(MinStockError::Negative(value));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| MinStockError::TooLarge { max: Self::MAX })
    }
}

impl From<MinStock> for i32 {
    fn from(value: MinStock) -> Self {
        value.0
    }
}

impl fmt::Display for MinStock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MinStock {
    type Err = MinStockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MinStock {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MinStock {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let value = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Column carries a CHECK (min_stock >= 0)
        Ok(Self::new(value))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MinStock {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five() {
        assert_eq!(DEFAULT_MIN_STOCK.get(), 5);
        assert_eq!(MinStock::default(), DEFAULT_MIN_STOCK);
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(MinStock::parse("0").unwrap().get(), 0);
        assert_eq!(MinStock::parse("12").unwrap().get(), 12);
        assert_eq!(MinStock::parse("  7\n").unwrap().get(), 7);
        assert_eq!(MinStock::parse("2147483647").unwrap().get(), i32::MAX);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            MinStock::parse("abc"),
            Err(MinStockError::NotANumber("abc".to_string()))
        );
        assert!(matches!(
            MinStock::parse("12abc"),
            Err(MinStockError::NotANumber(_))
        ));
        assert!(matches!(
            MinStock::parse("2.5"),
            Err(MinStockError::NotANumber(_))
        ));
        assert!(matches!(
            MinStock::parse("+3"),
            Err(MinStockError::NotANumber(_))
        ));
        assert!(matches!(
            MinStock::parse("-"),
            Err(MinStockError::NotANumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(MinStock::parse(""), Err(MinStockError::Empty));
        assert_eq!(MinStock::parse("   "), Err(MinStockError::Empty));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(MinStock::parse("-4"), Err(MinStockError::Negative(-4)));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            MinStock::parse("2147483648"),
            Err(MinStockError::TooLarge { .. })
        ));
        assert!(matches!(
            MinStock::parse("99999999999999999999999"),
            Err(MinStockError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_exceeds() {
        let threshold = MinStock::new(10);
        assert!(threshold.exceeds(3));
        assert!(threshold.exceeds(-1));
        assert!(!threshold.exceeds(10));
        assert!(!threshold.exceeds(11));
    }

    #[test]
    fn test_new_clamps_negative() {
        assert_eq!(MinStock::new(-3).get(), 0);
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&MinStock::new(8)).unwrap();
        assert_eq!(json, "8");
        let parsed: MinStock = serde_json::from_str("8").unwrap();
        assert_eq!(parsed.get(), 8);
        assert!(serde_json::from_str::<MinStock>("-1").is_err());
    }
}
