//! Remote card store interface and its HTTP implementation

use async_trait::async_trait;
use reqwest::Method;
use shared::models::{Card, CardId, CardPayload};

use crate::http::{HttpTransport, card_form};
use crate::{ClientError, ClientResult};

const CARDS_PATH: &str = "pokemon-cards";

/// Remote store of cards consumed by the inventory core
///
/// Implementations surface server rejections as typed [`ClientError`]s:
/// validation (field errors), conflict (stock exhausted or already
/// returned), auth, or transport failures.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Card>>;

    async fn get(&self, id: &CardId) -> ClientResult<Card>;

    async fn create(&self, payload: &CardPayload) -> ClientResult<Card>;

    /// `payload.image == ImageChange::Keep` keeps the existing image
    async fn update(&self, id: &CardId, payload: &CardPayload) -> ClientResult<Card>;

    /// Deleting an already deleted card succeeds
    async fn delete(&self, id: &CardId) -> ClientResult<()>;

    async fn checkout(&self, id: &CardId) -> ClientResult<Card>;

    async fn return_card(&self, id: &CardId) -> ClientResult<Card>;
}

/// Card store backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpCardStore {
    transport: HttpTransport,
}

impl HttpCardStore {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    fn card_path(id: &CardId) -> String {
        format!("{CARDS_PATH}/{id}")
    }
}

#[async_trait]
impl CardStore for HttpCardStore {
    async fn list(&self) -> ClientResult<Vec<Card>> {
        let req = self.transport.request(Method::GET, CARDS_PATH);
        self.transport.send(req).await
    }

    async fn get(&self, id: &CardId) -> ClientResult<Card> {
        let req = self.transport.request(Method::GET, &Self::card_path(id));
        self.transport.send(req).await
    }

    async fn create(&self, payload: &CardPayload) -> ClientResult<Card> {
        let form = card_form(payload, None)?;
        let req = self.transport.request(Method::POST, CARDS_PATH).multipart(form);
        self.transport.send(req).await
    }

    async fn update(&self, id: &CardId, payload: &CardPayload) -> ClientResult<Card> {
        let form = card_form(payload, Some("PUT"))?;
        let req = self
            .transport
            .request(Method::POST, &Self::card_path(id))
            .multipart(form);
        self.transport.send(req).await
    }

    async fn delete(&self, id: &CardId) -> ClientResult<()> {
        let req = self.transport.request(Method::DELETE, &Self::card_path(id));
        match self.transport.send_empty(req).await {
            Err(ClientError::NotFound(_)) => {
                tracing::debug!(card_id = %id, "Card already deleted on server");
                Ok(())
            }
            other => other,
        }
    }

    async fn checkout(&self, id: &CardId) -> ClientResult<Card> {
        let path = format!("{}/checkout", Self::card_path(id));
        let req = self
            .transport
            .request(Method::PATCH, &path)
            .json(&serde_json::json!({}));
        self.transport.send(req).await
    }

    async fn return_card(&self, id: &CardId) -> ClientResult<Card> {
        let path = format!("{}/return", Self::card_path(id));
        let req = self
            .transport
            .request(Method::PATCH, &path)
            .json(&serde_json::json!({}));
        self.transport.send(req).await
    }
}
