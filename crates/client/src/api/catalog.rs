//! Catalog reads: stores, foods, food types, and food-store listings.
//!
//! These are read-mostly endpoints and are cached for 5 minutes. Filtered
//! food-store searches bypass the cache, matching how users expect search
//! results to be fresh.

use reqwest::Method;
use tracing::{debug, instrument};

use mealdash_core::{FoodId, FoodTypeId, StoreId, TenantId};

use super::cache::{CacheKey, CacheValue};
use super::types::{FoodDto, FoodStoreDto, FoodStoreFilter, FoodTypeDto, StoreDto};
use super::{ApiClient, ApiError};

impl ApiClient {
    // =========================================================================
    // Stores
    // =========================================================================

    /// List all stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stores(&self) -> Result<Vec<StoreDto>, ApiError> {
        if let Some(CacheValue::Stores(stores)) = self.cache_get(&CacheKey::Stores).await {
            debug!("Cache hit for stores");
            return Ok(stores);
        }

        let stores: Vec<StoreDto> = self.execute(self.request(Method::GET, "/api/stores")).await?;

        self.cache_insert(CacheKey::Stores, CacheValue::Stores(stores.clone()))
            .await;

        Ok(stores)
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not found or the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn store(&self, store_id: StoreId) -> Result<StoreDto, ApiError> {
        let key = CacheKey::Store(store_id);
        if let Some(CacheValue::Store(store)) = self.cache_get(&key).await {
            debug!("Cache hit for store");
            return Ok(*store);
        }

        let store: StoreDto = self
            .execute(self.request(Method::GET, &format!("/api/stores/{store_id}")))
            .await?;

        self.cache_insert(key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }

    /// Get the store owned by a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not found or the API request fails.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn store_by_tenant(&self, tenant_id: TenantId) -> Result<StoreDto, ApiError> {
        let key = CacheKey::StoreByTenant(tenant_id);
        if let Some(CacheValue::Store(store)) = self.cache_get(&key).await {
            debug!("Cache hit for tenant store");
            return Ok(*store);
        }

        let store: StoreDto = self
            .execute(self.request(Method::GET, &format!("/api/stores/tenant/{tenant_id}")))
            .await?;

        self.cache_insert(key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }

    // =========================================================================
    // Foods
    // =========================================================================

    /// List all foods.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn foods(&self) -> Result<Vec<FoodDto>, ApiError> {
        if let Some(CacheValue::Foods(foods)) = self.cache_get(&CacheKey::Foods).await {
            debug!("Cache hit for foods");
            return Ok(foods);
        }

        let foods: Vec<FoodDto> = self.execute(self.request(Method::GET, "/api/foods")).await?;

        self.cache_insert(CacheKey::Foods, CacheValue::Foods(foods.clone()))
            .await;

        Ok(foods)
    }

    /// Get a food by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the food is not found or the API request fails.
    #[instrument(skip(self), fields(food_id = %food_id))]
    pub async fn food(&self, food_id: FoodId) -> Result<FoodDto, ApiError> {
        let key = CacheKey::Food(food_id);
        if let Some(CacheValue::Food(food)) = self.cache_get(&key).await {
            debug!("Cache hit for food");
            return Ok(*food);
        }

        let food: FoodDto = self
            .execute(self.request(Method::GET, &format!("/api/foods/{food_id}")))
            .await?;

        self.cache_insert(key, CacheValue::Food(Box::new(food.clone())))
            .await;

        Ok(food)
    }

    // =========================================================================
    // Food types
    // =========================================================================

    /// List all food categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn food_types(&self) -> Result<Vec<FoodTypeDto>, ApiError> {
        if let Some(CacheValue::FoodTypes(types)) = self.cache_get(&CacheKey::FoodTypes).await {
            debug!("Cache hit for food types");
            return Ok(types);
        }

        let types: Vec<FoodTypeDto> = self
            .execute(self.request(Method::GET, "/api/food-types"))
            .await?;

        self.cache_insert(CacheKey::FoodTypes, CacheValue::FoodTypes(types.clone()))
            .await;

        Ok(types)
    }

    /// Get a food category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(food_type_id = %food_type_id))]
    pub async fn food_type(&self, food_type_id: FoodTypeId) -> Result<FoodTypeDto, ApiError> {
        let key = CacheKey::FoodType(food_type_id);
        if let Some(CacheValue::FoodType(food_type)) = self.cache_get(&key).await {
            debug!("Cache hit for food type");
            return Ok(*food_type);
        }

        let food_type: FoodTypeDto = self
            .execute(self.request(Method::GET, &format!("/api/food-types/{food_type_id}")))
            .await?;

        self.cache_insert(key, CacheValue::FoodType(Box::new(food_type.clone())))
            .await;

        Ok(food_type)
    }

    // =========================================================================
    // Food-store listings
    // =========================================================================

    /// List food-store offers, optionally filtered by food name or category.
    ///
    /// Only the unfiltered listing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn food_stores(
        &self,
        filter: &FoodStoreFilter,
    ) -> Result<Vec<FoodStoreDto>, ApiError> {
        let unfiltered = filter.food_name.is_none() && filter.food_type_id.is_none();

        if unfiltered
            && let Some(CacheValue::FoodStores(listings)) =
                self.cache_get(&CacheKey::FoodStores).await
        {
            debug!("Cache hit for food stores");
            return Ok(listings);
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(name) = &filter.food_name {
            query.push(("FoodName", name.clone()));
        }
        if let Some(food_type_id) = filter.food_type_id {
            query.push(("FoodTypeId", food_type_id.to_string()));
        }

        let listings: Vec<FoodStoreDto> = self
            .execute(self.request(Method::GET, "/api/food-stores").query(&query))
            .await?;

        if unfiltered {
            self.cache_insert(CacheKey::FoodStores, CacheValue::FoodStores(listings.clone()))
                .await;
        }

        Ok(listings)
    }
}
