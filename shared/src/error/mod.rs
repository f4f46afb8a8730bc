//! Normalized error taxonomy
//!
//! - [`ErrorKind`]: how a failure is recovered from (validation, conflict,
//!   transport, auth)
//! - [`ErrorInfo`]: the renderable record kept as the inventory's last error
//! - [`FieldErrors`]: per-field messages for form display
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorInfo, ErrorKind};
//!
//! let err = ErrorInfo::validation("The given data was invalid.")
//!     .with_field_error("name", "The name field is required.");
//! assert_eq!(err.kind, ErrorKind::Validation);
//! assert_eq!(err.field_error("name"), Some("The name field is required."));
//! ```

mod kind;
mod types;

pub use kind::ErrorKind;
pub use types::{ErrorInfo, FieldErrors};
