//! HTTP transport for network-based API calls

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{CardPayload, ImageChange};
use shared::response::{ApiEnvelope, ApiErrorBody};

use crate::{ClientConfig, ClientError, ClientResult, SessionProvider};

/// Shared reqwest client plus base URL and session lookup
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL without the trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the bearer header, if a session exists
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Sending request");
        let req = self.client.request(method, url);
        match self.session.session() {
            Some(session) => req.header(reqwest::header::AUTHORIZATION, session.bearer()),
            None => req,
        }
    }

    /// Send and decode the `data` of a success envelope (or a bare body)
    pub async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let text = Self::check_status(response).await?;
        decode_body(&text)
    }

    /// Send and ignore the success body
    pub async fn send_empty(&self, req: RequestBuilder) -> ClientResult<()> {
        let response = req.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Return the body text on success, a classified error otherwise
    async fn check_status(response: reqwest::Response) -> ClientResult<String> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }

        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| (!text.is_empty()).then(|| text.clone()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        tracing::warn!(status = status.as_u16(), %message, "Request rejected");

        Err(match status {
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => ClientError::Validation {
                field_errors: body.field_errors().unwrap_or_default(),
                message,
            },
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Status { status, message },
        })
    }
}

/// Decode `{ "data": T }`, falling back to a bare `T`
fn decode_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<T>>(text) {
        if !envelope.is_success() {
            return Err(ClientError::InvalidResponse(
                envelope.message.unwrap_or_else(|| "Request was not successful".into()),
            ));
        }
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    serde_json::from_str::<T>(text)
        .map_err(|e| ClientError::InvalidResponse(format!("unexpected body: {e}")))
}

/// Build the multipart form for create/update
///
/// Updates are sent as POST with `_method=PUT` so the server accepts files.
pub fn card_form(payload: &CardPayload, method_override: Option<&'static str>) -> ClientResult<Form> {
    let mut form = Form::new();
    for (key, value) in payload.form_fields() {
        form = form.text(key, value);
    }
    if let Some(method) = method_override {
        form = form.text("_method", method);
    }
    if let ImageChange::Upload(image) = &payload.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("card_image", part);
    }
    Ok(form)
}
