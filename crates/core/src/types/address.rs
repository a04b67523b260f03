//! Shipping address captured on the user profile and snapshotted into orders.

use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;

const MIN_FIELD_LENGTH: usize = 3;

/// A postal shipping address.
///
/// Stored as JSONB on the user row and copied verbatim into each order, so a
/// later profile edit never rewrites the address of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl ShippingAddress {
    /// Check every field, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns all violations found.
    pub fn validate(mut self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (value, label) in [
            (&mut self.full_name, "Name"),
            (&mut self.street_address, "Address"),
            (&mut self.city, "City"),
            (&mut self.postal_code, "Postal code"),
            (&mut self.country, "Country"),
        ] {
            *value = value.trim().to_owned();
            if value.chars().count() < MIN_FIELD_LENGTH {
                errors.push(format!(
                    "{label} must be at least {MIN_FIELD_LENGTH} characters"
                ));
            }
        }

        errors.into_result().map(|()| self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Jane Doe".to_owned(),
            street_address: "123 Main St".to_owned(),
            city: "Springfield".to_owned(),
            postal_code: "12345".to_owned(),
            country: "USA".to_owned(),
            lat: None,
            lng: None,
        }
    }

    #[test]
    fn test_valid_address_is_trimmed() {
        let mut raw = address();
        raw.city = "  Springfield ".to_owned();
        assert_eq!(raw.validate().unwrap().city, "Springfield");
    }

    #[test]
    fn test_short_fields_are_all_reported() {
        let mut raw = address();
        raw.city = "LA".to_owned();
        raw.country = " ".to_owned();
        let err = raw.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "City must be at least 3 characters. Country must be at least 3 characters"
        );
    }
}
