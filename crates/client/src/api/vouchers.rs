//! Voucher endpoints: customer lookup/apply plus admin CRUD.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use mealdash_core::VoucherId;

use super::types::{VoucherDto, VoucherRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    // =========================================================================
    // Customer
    // =========================================================================

    /// List every voucher visible to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vouchers(&self) -> Result<Vec<VoucherDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/vouchers"))
            .await
    }

    /// List vouchers currently available to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn available_vouchers(&self) -> Result<Vec<VoucherDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/vouchers/available"))
            .await
    }

    /// List active vouchers (admin overview).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn active_vouchers(&self) -> Result<Vec<VoucherDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/vouchers/active"))
            .await
    }

    /// Look up a voucher by code (checkout entry field).
    ///
    /// # Errors
    ///
    /// Returns an error if the code is unknown or the API request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn voucher_by_code(&self, code: &str) -> Result<VoucherDto, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/vouchers/code/{code}")))
            .await
    }

    /// Apply a voucher code to the pending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is invalid/expired or the request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn apply_voucher(&self, code: &str) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::POST, "/api/vouchers/apply")
                .json(&json!({ "code": code })),
        )
        .await
    }

    /// Get a voucher by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the voucher is not found or the request fails.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn voucher(&self, voucher_id: VoucherId) -> Result<VoucherDto, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/vouchers/{voucher_id}")))
            .await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Create a voucher.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create_voucher(&self, request: &VoucherRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/vouchers").json(request))
            .await
    }

    /// Update a voucher.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(voucher_id = %voucher_id))]
    pub async fn update_voucher(
        &self,
        voucher_id: VoucherId,
        request: &VoucherRequest,
    ) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::PUT, &format!("/api/vouchers/{voucher_id}"))
                .json(request),
        )
        .await
    }

    /// Delete a voucher.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn delete_voucher(&self, voucher_id: VoucherId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/api/vouchers/{voucher_id}")))
            .await
    }
}
