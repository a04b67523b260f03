//! JSON envelopes returned by storefront actions.

use serde::Serialize;

/// Outcome of a cart or account action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of placing an order.
///
/// `redirect_to` tells the client where to go next: the new order on
/// success, or the checkout step that still needs input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl OrderActionResponse {
    #[must_use]
    pub fn placed(redirect_to: String) -> Self {
        Self {
            success: true,
            message: Some("Order created successfully".to_owned()),
            redirect_to: Some(redirect_to),
        }
    }

    #[must_use]
    pub fn incomplete(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            redirect_to: Some(redirect_to.into()),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            redirect_to: None,
        }
    }
}
