//! Auth API
//!
//! Login stores the returned session through the transport's
//! [`SessionProvider`](crate::SessionProvider); logout only clears it.

use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::Value;
use shared::client::{LoginRequest, RegisterRequest, ResetPasswordRequest, Session};

use crate::{ClientError, ClientResult, HttpTransport};

/// Auth endpoints over the shared transport
#[derive(Debug, Clone)]
pub struct AuthClient {
    transport: HttpTransport,
}

impl AuthClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Log in and persist the session
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<Session> {
        let form = Form::new()
            .text("email", request.email.clone())
            .text("password", request.password.clone());
        let req = self.transport.request(Method::POST, "login").multipart(form);
        let body: Value = self.transport.send(req).await?;

        let session = session_from_login(&body).ok_or_else(|| {
            ClientError::InvalidResponse("Missing token in login response".into())
        })?;
        self.transport.session().store(session.clone())?;
        tracing::info!(email = %request.email, "Logged in");
        Ok(session)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.transport.session().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.transport.session().session()
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Value> {
        let req = self.transport.request(Method::POST, "register").json(request);
        self.transport.send(req).await
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<Value> {
        let form = Form::new().text("email", email.to_string());
        let req = self
            .transport
            .request(Method::POST, "forgot_password")
            .multipart(form);
        self.transport.send(req).await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<Value> {
        let form = Form::new()
            .text("email", request.email.clone())
            .text("token", request.token.clone())
            .text("password", request.password.clone())
            .text("c_password", request.c_password.clone());
        let req = self
            .transport
            .request(Method::POST, "reset_password")
            .multipart(form);
        self.transport.send(req).await
    }
}

/// The token may sit at `data.token`, `token` or `results.token`
///
/// `send` has already unwrapped a `data` envelope, so `body` is either the
/// user object itself or the outer object.
fn session_from_login(body: &Value) -> Option<Session> {
    let user = [Some(body), body.get("data"), body.get("results")]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.get("token").and_then(Value::as_str).is_some())?;

    let text = |key: &str| user.get(key).and_then(Value::as_str).map(str::to_string);
    Some(Session {
        token: text("token")?,
        name: text("name"),
        email: text("email"),
    })
}
