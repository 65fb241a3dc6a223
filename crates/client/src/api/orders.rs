//! Order endpoints: customer history and checkout, plus the manager-facing
//! store order dashboard.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use mealdash_core::{OrderStatus, StoreId};

use super::types::{OrderDto, OrderRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    // =========================================================================
    // Customer
    // =========================================================================

    /// List the current user's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<OrderDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/orders/history"))
            .await
    }

    /// Get a single order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order(&self, order_id: &str) -> Result<OrderDto, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/orders/{order_id}")))
            .await
    }

    /// Place an order from the checkout flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(store_id = %request.store_id))]
    pub async fn place_order(&self, request: &OrderRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/orders").json(request))
            .await
    }

    // =========================================================================
    // Manager
    // =========================================================================

    /// List incoming orders for the manager's own store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn store_orders(&self) -> Result<Vec<OrderDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/orders/store"))
            .await
    }

    /// List incoming orders for a specific store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn store_orders_for(&self, store_id: StoreId) -> Result<Vec<OrderDto>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/orders/store/{store_id}")))
            .await
    }

    /// Advance an order's status (manager dashboard).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::PATCH, &format!("/api/orders/{order_id}"))
                .json(&json!({ "status": status })),
        )
        .await
    }
}
