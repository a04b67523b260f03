//! Type-safe price representation using decimal arithmetic.
//!
//! The store sells in a single currency, so a [`Price`] is just a
//! non-negative amount held at exactly two decimal places. It serializes as a
//! string (`"19.90"`) so that JSON consumers never see a float.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of decimal places every stored amount carries.
pub const PRICE_SCALE: u32 = 2;

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount could not be parsed as a decimal.
    #[error("Price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("Price must not be negative")]
    Negative,
    /// The amount has more than two fractional digits.
    #[error("Price must have exactly two decimal places")]
    TooPrecise,
}

/// Round half-up (midpoint away from zero) to two decimal places.
///
/// The result always has a scale of exactly 2, so `5` becomes `5.00`.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// A non-negative monetary amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price (`0.00`).
    #[must_use]
    pub fn zero() -> Self {
        Self(round2(Decimal::ZERO))
    }

    /// Build a price from an arbitrary decimal, rounding half-up to cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(round2(amount)))
    }

    /// Build a price that must already be expressed in whole cents.
    ///
    /// This is the strict form used when validating user input: `"9.999"` is
    /// rejected rather than silently rounded.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooPrecise`] if more than two fractional digits
    /// are significant, or [`PriceError::Negative`] for amounts below zero.
    pub fn exact(amount: Decimal) -> Result<Self, PriceError> {
        if amount.normalize().scale() > PRICE_SCALE {
            return Err(PriceError::TooPrecise);
        }
        Self::new(amount)
    }

    /// Build a price from whole cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), PRICE_SCALE))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::exact(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Wire forms accepted for a price: `"12.50"` or `12.5`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let price = match PriceRepr::deserialize(deserializer)? {
            PriceRepr::Text(text) => text.parse(),
            PriceRepr::Number(number) => Decimal::try_from(number)
                .map_err(|_| PriceError::NotANumber)
                .and_then(Self::exact),
        };
        price.map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
