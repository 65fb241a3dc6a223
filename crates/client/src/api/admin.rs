//! Back-office endpoints: tenant management and catalog CRUD.
//!
//! Catalog mutations invalidate the client-side catalog cache so admin edits
//! show up without waiting out the TTL.

use reqwest::Method;
use tracing::instrument;

use mealdash_core::{FoodTypeId, TenantId};

use super::types::{
    FoodRequest, FoodTypeCreateRequest, FoodTypeUpdateRequest, FoodUpdateRequest, TenantDto,
    TenantRequest, TenantUpdateRequest,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    // =========================================================================
    // Tenants
    // =========================================================================

    /// List all tenants.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn tenants(&self) -> Result<Vec<TenantDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/tenants"))
            .await
    }

    /// Get a tenant by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant is not found or the request fails.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn tenant(&self, tenant_id: TenantId) -> Result<TenantDto, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/tenants/{tenant_id}")))
            .await
    }

    /// Create a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_tenant(&self, request: &TenantRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/tenants").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Update a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(tenant_id = %request.id))]
    pub async fn update_tenant(&self, request: &TenantUpdateRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::PUT, "/api/tenants").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Delete a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn delete_tenant(&self, tenant_id: TenantId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/api/tenants/{tenant_id}")))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    // =========================================================================
    // Catalog CRUD
    // =========================================================================

    /// Create a food.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_food(&self, request: &FoodRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/foods").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Update a food.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(food_id = %request.id))]
    pub async fn update_food(&self, request: &FoodUpdateRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::PUT, "/api/foods").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Create a food category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_food_type(&self, request: &FoodTypeCreateRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/food-types").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Update a food category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(food_type_id = %request.id))]
    pub async fn update_food_type(&self, request: &FoodTypeUpdateRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::PUT, "/api/food-types").json(request))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Delete a food category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(food_type_id = %food_type_id))]
    pub async fn delete_food_type(&self, food_type_id: FoodTypeId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/api/food-types/{food_type_id}")))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }
}
