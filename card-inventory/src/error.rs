//! Inventory error types

use card_client::ClientError;
use shared::error::{ErrorInfo, ErrorKind, FieldErrors};
use shared::models::CardId;
use thiserror::Error;

/// Failure of an inventory operation
///
/// Local precondition failures never reached the server; `Remote` carries
/// whatever the transport reported.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Remote(#[from] ClientError),

    /// Payload rejected before sending
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Card is not in the local snapshot
    #[error("Card {0} is not in the inventory, reload and try again")]
    UnknownCard(CardId),

    /// Every copy is checked out
    #[error("This card is no longer available")]
    Unavailable(CardId),

    #[error("All copies of this card have already been returned")]
    NothingCheckedOut(CardId),
}

impl InventoryError {
    /// Normalize into the record kept as `last_error`
    pub fn info(&self) -> ErrorInfo {
        match self {
            Self::Remote(err) => err.to_info(),
            Self::Validation(fields) => ErrorInfo::from_field_errors(fields.clone()),
            other => ErrorInfo::conflict(other.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(err) => err.kind(),
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownCard(_) | Self::Unavailable(_) | Self::NothingCheckedOut(_) => {
                ErrorKind::Conflict
            }
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Single-field validation failure
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.into());
        Self::Validation(fields)
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
