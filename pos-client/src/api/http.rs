//! HTTP implementation of [`PosApi`] over reqwest

use super::PosApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use shared::models::{
    DiningTable, MenuItem, Order, OrderClosed, OrderCreate, OrderItemInput, PaymentInput,
    PaymentRecord, TableUpdate,
};
use shared::response::{Envelope, ErrorBody};
use std::time::Duration;

/// REST client for the POS backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Build a client from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { http, config })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Decode a response into the envelope's data payload.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
        let status = resp.status();
        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status.as_u16(),
                body.message,
                body.errors,
            ));
        }
        let envelope: Envelope<T> = resp.json().await?;
        if !envelope.success {
            return Err(ClientError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing data field".to_string()))
    }

    /// Decode a response whose data payload is irrelevant.
    async fn decode_empty(resp: reqwest::Response) -> ClientResult<()> {
        let status = resp.status();
        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status.as_u16(),
                body.message,
                body.errors,
            ));
        }
        let envelope: Envelope<serde_json::Value> = resp.json().await?;
        if !envelope.success {
            return Err(ClientError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PosApi for HttpApi {
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        let resp = self.request(Method::GET, "/tables").send().await?;
        Self::decode(resp).await
    }

    async fn update_table(&self, id: i64, update: TableUpdate) -> ClientResult<DiningTable> {
        let resp = self
            .request(Method::PUT, &format!("/tables/{}", id))
            .json(&update)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let resp = self.request(Method::GET, "/orders").send().await?;
        Self::decode(resp).await
    }

    async fn create_order(&self, payload: OrderCreate) -> ClientResult<Order> {
        let resp = self
            .request(Method::POST, "/orders")
            .json(&payload)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete_order(&self, id: i64) -> ClientResult<()> {
        let resp = self
            .request(Method::DELETE, &format!("/orders/{}", id))
            .send()
            .await?;
        Self::decode_empty(resp).await
    }

    async fn add_item(&self, order_id: i64, item: OrderItemInput) -> ClientResult<Order> {
        let resp = self
            .request(Method::POST, &format!("/orders/{}/items", order_id))
            .json(&item)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn update_item(
        &self,
        order_id: i64,
        item_id: i64,
        quantity: i32,
        note: Option<String>,
    ) -> ClientResult<Order> {
        let body = serde_json::json!({ "quantity": quantity, "note": note });
        let resp = self
            .request(Method::PUT, &format!("/orders/{}/items/{}", order_id, item_id))
            .json(&body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn remove_item(&self, order_id: i64, item_id: i64) -> ClientResult<Order> {
        let resp = self
            .request(
                Method::DELETE,
                &format!("/orders/{}/items/{}", order_id, item_id),
            )
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn complete_order(&self, id: i64) -> ClientResult<Order> {
        let resp = self
            .request(Method::POST, &format!("/orders/{}/complete", id))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn cancel_order(&self, id: i64, reason: Option<String>) -> ClientResult<Order> {
        let body = serde_json::json!({ "reason": reason });
        let resp = self
            .request(Method::POST, &format!("/orders/{}/cancel", id))
            .json(&body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn close_order(&self, id: i64, payment: PaymentInput) -> ClientResult<OrderClosed> {
        let resp = self
            .request(Method::POST, &format!("/orders/{}/close", id))
            .json(&payment)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn list_menu(&self) -> ClientResult<Vec<MenuItem>> {
        let resp = self.request(Method::GET, "/menu-items").send().await?;
        Self::decode(resp).await
    }

    async fn list_payments(&self) -> ClientResult<Vec<PaymentRecord>> {
        let resp = self.request(Method::GET, "/payments").send().await?;
        Self::decode(resp).await
    }

    async fn download_receipt(&self, order_id: i64) -> ClientResult<Vec<u8>> {
        let resp = self
            .request(Method::GET, &format!("/orders/{}/receipt", order_id))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status.as_u16(),
                body.message,
                body.errors,
            ));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
