//! Cache types for catalog API responses.

use mealdash_core::{FoodId, FoodTypeId, StoreId, TenantId};

use super::types::{FoodDto, FoodStoreDto, FoodTypeDto, StoreDto};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Stores,
    Store(StoreId),
    StoreByTenant(TenantId),
    Foods,
    Food(FoodId),
    FoodTypes,
    FoodType(FoodTypeId),
    FoodStores,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Stores(Vec<StoreDto>),
    Store(Box<StoreDto>),
    Foods(Vec<FoodDto>),
    Food(Box<FoodDto>),
    FoodTypes(Vec<FoodTypeDto>),
    FoodType(Box<FoodTypeDto>),
    FoodStores(Vec<FoodStoreDto>),
}
