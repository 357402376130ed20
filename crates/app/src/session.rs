//! One user's working session: the viewed order, its staged edits, and the
//! receiving workflow, driven by explicit commands.
//!
//! Every mutation follows the same path: local validation in the domain
//! crates, a client call, then a refresh of the store from the order
//! service's canonical response.

use rust_decimal::Decimal;
use thiserror::Error;

use stockflow_catalog::Catalog;
use stockflow_client::{ClientError, OrderFilter, OrderServiceClient};
use stockflow_core::{DomainError, LineItemId, OrderId, ProductId};
use stockflow_identity::IdentityContext;
use stockflow_orders::{PurchaseOrder, PurchaseOrderStore, SubmitOrder};
use stockflow_receiving::{ReceivingError, ReceivingState, ReceivingWorkflow};

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Receiving(#[from] ReceivingError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SessionError {
    /// Rejections the user can act on (local pre-checks or the server's
    /// business-rule refusals), as opposed to infrastructure failures.
    pub fn is_business_rule(&self) -> bool {
        match self {
            SessionError::Domain(DomainError::BusinessRule(_)) => true,
            SessionError::Client(err) => err.is_business_rule(),
            _ => false,
        }
    }
}

/// Session state for one authenticated user.
///
/// Only one order is viewed and at most one receiving workflow runs at a
/// time; there is no concurrent multi-order editing.
pub struct Session<I> {
    client: OrderServiceClient,
    identity: I,
    catalog: Catalog,
    store: PurchaseOrderStore,
    receiving: Option<ReceivingWorkflow>,
    orders: Vec<PurchaseOrder>,
    fetch_gen: u64,
}

impl<I: IdentityContext> Session<I> {
    pub fn new(config: &AppConfig, identity: I) -> Self {
        let client = match &config.token {
            Some(token) => OrderServiceClient::with_token(config.api_url.as_str(), token.as_str()),
            None => OrderServiceClient::new(config.api_url.as_str()),
        };

        Self {
            client,
            identity,
            catalog: Catalog::default(),
            store: PurchaseOrderStore::new(),
            receiving: None,
            orders: Vec::new(),
            fetch_gen: 0,
        }
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &PurchaseOrderStore {
        &self.store
    }

    /// Mutable store access for form field edits; staged items still go
    /// through [`Session::stage_item`].
    pub fn store_mut(&mut self) -> &mut PurchaseOrderStore {
        &mut self.store
    }

    pub fn orders(&self) -> &[PurchaseOrder] {
        &self.orders
    }

    pub fn receiving(&self) -> Option<&ReceivingWorkflow> {
        self.receiving.as_ref()
    }

    /// Load the product and company reference data used to build orders.
    pub async fn load_reference_data(&mut self) -> Result<&Catalog, SessionError> {
        let products = self.client.list_products().await?;
        let companies = self.client.list_companies().await?;
        self.catalog = Catalog::new(products, companies);
        Ok(&self.catalog)
    }

    /// Default listing filter: the identity's company, any status.
    pub fn company_filter(&self) -> OrderFilter {
        OrderFilter {
            company_id: Some(self.identity.company_id()),
            status: None,
        }
    }

    pub async fn load_orders(&mut self, filter: OrderFilter) -> Result<&[PurchaseOrder], SessionError> {
        self.orders = self.client.list_orders(filter).await?;
        Ok(&self.orders)
    }

    /// Stamp a new view fetch. Latest fetch wins: a snapshot may only be
    /// applied under the stamp this returned, and only while no newer fetch
    /// has started.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_gen += 1;
        self.fetch_gen
    }

    /// Apply a fetched snapshot if `fetch` is still the newest stamp.
    /// Returns whether the snapshot was taken; stale responses are dropped.
    pub fn apply_viewed(&mut self, fetch: u64, order: PurchaseOrder) -> bool {
        if fetch != self.fetch_gen {
            tracing::debug!(
                stale = fetch,
                current = self.fetch_gen,
                order = %order.id,
                "discarding stale order fetch"
            );
            return false;
        }
        self.store.set_viewing(order);
        true
    }

    /// Fetch one order and make it the viewed order.
    ///
    /// Returns `None` when the response lost the race against a newer fetch
    /// that was started while this one was in flight.
    pub async fn view_order(&mut self, id: OrderId) -> Result<Option<&PurchaseOrder>, SessionError> {
        let fetch = self.begin_fetch();
        let order = self.client.get_order(id).await?;
        if self.apply_viewed(fetch, order) {
            Ok(self.store.viewing())
        } else {
            Ok(None)
        }
    }

    /// Leave the order view, discarding any staged form or receipt state.
    pub fn close_order(&mut self) {
        self.store.close_form();
        self.store.clear_viewing();
        self.receiving = None;
    }

    pub fn open_create(&mut self) {
        self.store.open_create();
    }

    pub fn open_edit(&mut self) -> Result<(), SessionError> {
        self.store.open_edit()?;
        Ok(())
    }

    /// Stage a line item on the open form, resolving the product through
    /// the catalog.
    pub fn stage_item(
        &mut self,
        product: ProductId,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<(), SessionError> {
        let product = self
            .catalog
            .product(product)
            .ok_or_else(DomainError::not_found)?;
        self.store.stage_item(product, quantity, unit_price)?;
        Ok(())
    }

    pub fn remove_staged_item(&mut self, index: usize) {
        self.store.remove_staged_item(index);
    }

    /// Submit the open form: create for a new draft, fields-only update for
    /// an existing order. On success the form closes and the store takes
    /// the server's canonical snapshot.
    pub async fn save_form(&mut self) -> Result<&PurchaseOrder, SessionError> {
        let payload = self.store.submit_payload(self.identity.user_id())?;
        let saved = match payload {
            SubmitOrder::Create(create) => self.client.create_order(&create).await?,
            SubmitOrder::Update(id, update) => self.client.update_order(id, &update).await?,
        };
        self.store.close_form();
        self.upsert_listed(&saved);
        Ok(self.store.apply_refresh(saved))
    }

    /// Delete the viewed order. The order service arbitrates the
    /// pending-only rule; its refusal surfaces as a business-rule error.
    pub async fn delete_order(&mut self) -> Result<(), SessionError> {
        let id = self.store.delete_order_id()?;
        self.client.delete_order(id).await?;
        self.store.clear_viewing();
        self.orders.retain(|order| order.id != id);
        Ok(())
    }

    pub async fn add_item(
        &mut self,
        product: ProductId,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<(), SessionError> {
        let product = self
            .catalog
            .product(product)
            .ok_or_else(DomainError::not_found)?;
        let (order_id, payload) = self.store.add_item_payload(product, quantity, unit_price)?;
        self.client.add_item(order_id, &payload).await?;
        self.refresh_viewing().await
    }

    pub async fn edit_item(
        &mut self,
        item: LineItemId,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<(), SessionError> {
        let update = self.store.edit_item_payload(item, quantity, unit_price)?;
        self.client.update_item(item, &update).await?;
        self.refresh_viewing().await
    }

    pub async fn delete_item(&mut self, item: LineItemId) -> Result<(), SessionError> {
        let item = self.store.delete_item_check(item)?;
        self.client.delete_item(item).await?;
        self.refresh_viewing().await
    }

    /// Re-fetch the viewed order so item totals match the server again.
    async fn refresh_viewing(&mut self) -> Result<(), SessionError> {
        let id = self
            .store
            .viewing()
            .map(|order| order.id)
            .ok_or_else(DomainError::not_found)?;
        let refreshed = self.client.get_order(id).await?;
        self.upsert_listed(&refreshed);
        self.store.apply_refresh(refreshed);
        Ok(())
    }

    fn upsert_listed(&mut self, order: &PurchaseOrder) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => *slot = order.clone(),
            None => self.orders.push(order.clone()),
        }
    }

    /// Start receiving against the viewed order.
    pub fn begin_receiving(&mut self) -> Result<(), SessionError> {
        let order = self.store.viewing().ok_or_else(DomainError::not_found)?;
        let workflow = ReceivingWorkflow::begin(order)?;
        self.receiving = Some(workflow);
        Ok(())
    }

    fn receiving_mut(&mut self) -> Result<&mut ReceivingWorkflow, ReceivingError> {
        self.receiving
            .as_mut()
            .ok_or(ReceivingError::InvalidState(ReceivingState::Idle))
    }

    pub fn set_receive_quantity(
        &mut self,
        item: LineItemId,
        quantity: i64,
    ) -> Result<(), SessionError> {
        self.receiving_mut()?.set_quantity(item, quantity)?;
        Ok(())
    }

    /// Submit the staged receipt batch.
    ///
    /// On success the workflow completes and the store takes the updated
    /// order from the response. On failure the workflow falls back to
    /// prepared with its staged quantities intact, so the user may retry.
    pub async fn submit_receipt(&mut self) -> Result<(), SessionError> {
        let workflow = self
            .receiving
            .as_mut()
            .ok_or(ReceivingError::InvalidState(ReceivingState::Idle))?;
        let batch = workflow.submit()?;
        let order_id = workflow.order_id();

        match self.client.receive_inventory(order_id, &batch).await {
            Ok(refreshed) => {
                workflow.complete()?;
                self.receiving = None;
                self.upsert_listed(&refreshed);
                self.store.apply_refresh(refreshed);
                Ok(())
            }
            Err(err) => {
                workflow.fail()?;
                Err(err.into())
            }
        }
    }

    pub fn cancel_receiving(&mut self) -> Result<(), SessionError> {
        self.receiving_mut()?.cancel()?;
        self.receiving = None;
        Ok(())
    }
}
