//! Payment method selection.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Payment methods a customer can pick at checkout.
///
/// Only the choice is recorded; no payment is processed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    PayPal,
    Stripe,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Every accepted method, in display order.
    pub const ALL: [Self; 3] = [Self::PayPal, Self::Stripe, Self::CashOnDelivery];

    /// Stable identifier stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PayPal => "PayPal",
            Self::Stripe => "Stripe",
            Self::CashOnDelivery => "CashOnDelivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown payment method name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid payment method")]
pub struct UnknownPaymentMethod;

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s.trim())
            .ok_or(UnknownPaymentMethod)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!("Bitcoin".parse::<PaymentMethod>(), Err(UnknownPaymentMethod));
    }
}
