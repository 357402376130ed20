use serde::de::DeserializeOwned;
use uuid::Uuid;

use stockflow_catalog::{Company, Product};
use stockflow_core::{CompanyId, LineItemId, OrderId, UserId};
use stockflow_orders::{
    CreateOrder, LineItem, LineItemUpdate, NewLineItem, PurchaseOrder, PurchaseOrderStatus,
    ReceiptLine, UpdateOrder,
};

use crate::error::ClientError;

/// Server-side filter for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub company_id: Option<CompanyId>,
    pub status: Option<PurchaseOrderStatus>,
}

/// Client for the order-management REST API.
///
/// Holds the base URL and an optional bearer token; one instance is shared
/// for the lifetime of a session. Every request carries a fresh
/// `x-request-id` for correlation in the service's logs.
#[derive(Debug, Clone)]
pub struct OrderServiceClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl OrderServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decorate(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("x-request-id", Uuid::now_v7().to_string());
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and map non-OK statuses to [`ClientError::Status`], extracting
    /// the service's `message` field when the error body carries one.
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .decorate(req)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        self.execute(req)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<PurchaseOrder>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(company) = filter.company_id {
            query.push(("companyId", company.to_string()));
        }
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }

        tracing::debug!(?filter, "listing purchase orders");
        self.json(self.http.get(self.url("/purchase-orders")).query(&query))
            .await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<PurchaseOrder, ClientError> {
        tracing::debug!(%id, "fetching purchase order");
        self.json(self.http.get(self.url(&format!("/purchase-orders/{id}"))))
            .await
    }

    pub async fn create_order(&self, order: &CreateOrder) -> Result<PurchaseOrder, ClientError> {
        tracing::info!(po_number = %order.po_number, "creating purchase order");
        self.json(self.http.post(self.url("/purchase-orders")).json(order))
            .await
    }

    pub async fn update_order(
        &self,
        id: OrderId,
        update: &UpdateOrder,
    ) -> Result<PurchaseOrder, ClientError> {
        tracing::info!(%id, "updating purchase order");
        self.json(
            self.http
                .put(self.url(&format!("/purchase-orders/{id}")))
                .json(update),
        )
        .await
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<(), ClientError> {
        tracing::info!(%id, "deleting purchase order");
        self.execute(self.http.delete(self.url(&format!("/purchase-orders/{id}"))))
            .await?;
        Ok(())
    }

    pub async fn add_item(
        &self,
        order: OrderId,
        item: &NewLineItem,
    ) -> Result<LineItem, ClientError> {
        tracing::info!(%order, "adding line item");
        self.json(
            self.http
                .post(self.url(&format!("/purchase-orders/{order}/items")))
                .json(item),
        )
        .await
    }

    pub async fn update_item(
        &self,
        item: LineItemId,
        update: &LineItemUpdate,
    ) -> Result<LineItem, ClientError> {
        tracing::info!(%item, "updating line item");
        self.json(
            self.http
                .put(self.url(&format!("/purchase-orders/items/{item}")))
                .json(update),
        )
        .await
    }

    pub async fn delete_item(&self, item: LineItemId) -> Result<(), ClientError> {
        tracing::info!(%item, "removing line item");
        self.execute(
            self.http
                .delete(self.url(&format!("/purchase-orders/items/{item}"))),
        )
        .await?;
        Ok(())
    }

    /// Submit a receipt batch. The service updates each item's received
    /// quantity, flips the order to received when fully satisfied, and
    /// responds with the updated order.
    pub async fn receive_inventory(
        &self,
        order: OrderId,
        lines: &[ReceiptLine],
    ) -> Result<PurchaseOrder, ClientError> {
        tracing::info!(%order, lines = lines.len(), "receiving inventory");
        self.json(
            self.http
                .post(self.url(&format!("/purchase-orders/{order}/receive-inventory")))
                .json(&lines),
        )
        .await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.json(self.http.get(self.url("/products"))).await
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.json(self.http.get(self.url("/companies"))).await
    }

    /// Companies the user belongs to, for defaulting the company picker.
    pub async fn user_companies(&self, user: UserId) -> Result<Vec<Company>, ClientError> {
        self.json(self.http.get(self.url(&format!("/users/{user}/companies"))))
            .await
    }
}
