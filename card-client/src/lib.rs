//! Card Client - HTTP transport for the card API
//!
//! Provides the [`CardStore`] remote interface consumed by the inventory core,
//! its reqwest implementation, the auth endpoints and session providers.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpTransport;
pub use session::{FileSession, MemorySession, SessionProvider};
pub use store::{CardStore, HttpCardStore};

// Re-export shared types for convenience
pub use shared::client::Session;
pub use shared::models::{Card, CardId, CardPayload};
