//! API Response types
//!
//! Envelopes used by the card API.

use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Success envelope
///
/// ```json
/// {
///     "success": true,
///     "data": { ... },
///     "message": "Pokemon card retrieved successfully."
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// True unless the server explicitly said otherwise
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Error body
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": { "name": ["The name field is required."] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiErrorBody {
    /// First message per field
    pub fn field_errors(&self) -> Option<FieldErrors> {
        let errors = self.errors.as_ref()?;
        let flattened: FieldErrors = errors
            .iter()
            .filter_map(|(field, messages)| {
                messages.first().map(|m| (field.clone(), m.clone()))
            })
            .collect();
        (!flattened.is_empty()).then_some(flattened)
    }
}
