//! Delivery address endpoints.

use reqwest::Method;
use tracing::instrument;

use mealdash_core::AddressId;

use super::types::{AddressDto, AddressRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// List the current user's delivery addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn addresses(&self) -> Result<Vec<AddressDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/addresses"))
            .await
    }

    /// Get a single address by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not found or the API request fails.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn address(&self, address_id: AddressId) -> Result<AddressDto, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/addresses/{address_id}")))
            .await
    }

    /// Create a new delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_address(&self, request: &AddressRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/addresses").json(request))
            .await
    }

    /// Update an existing delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        address_id: AddressId,
        request: &AddressRequest,
    ) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::PUT, &format!("/api/addresses/{address_id}"))
                .json(request),
        )
        .await
    }

    /// Delete a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn delete_address(&self, address_id: AddressId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/api/addresses/{address_id}")))
            .await
    }

    /// Get the user's default delivery address, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn default_address(&self) -> Result<Option<AddressDto>, ApiError> {
        match self
            .execute(self.request(Method::GET, "/api/addresses/default"))
            .await
        {
            Ok(address) => Ok(Some(address)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Mark an address as the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn set_default_address(&self, address_id: AddressId) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::PUT, &format!("/api/addresses/{address_id}/default")),
        )
        .await
    }
}
