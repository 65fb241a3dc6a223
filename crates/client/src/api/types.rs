//! Wire types for the MealDash REST API.
//!
//! Field names follow the backend's camelCase JSON convention. Prices arrive
//! as JSON numbers and are carried as `Decimal` via the float serde adapter.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mealdash_core::{
    AddressId, FoodId, FoodTypeId, NotificationId, OrderStatus, ReviewId, StoreId, TenantId,
    TenantStatus, VoucherId, WalletTransactionStatus, WalletTransactionType,
};

// =============================================================================
// Catalog
// =============================================================================

/// A food item in the platform catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDto {
    pub id: FoodId,
    pub name: Option<String>,
    pub food_type_id: FoodTypeId,
    #[serde(default)]
    pub food_type_name: Option<String>,
    #[serde(default)]
    pub image_src: Option<String>,
    pub is_available: bool,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

/// Payload for creating a food (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    pub food_type_id: FoodTypeId,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Payload for updating a food (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodUpdateRequest {
    pub id: FoodId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    pub food_type_id: FoodTypeId,
    // The backend spells this flag "isAvaiable" on the wire.
    #[serde(rename = "isAvaiable")]
    pub is_available: bool,
}

/// A food category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTypeDto {
    pub id: FoodTypeId,
    pub name: Option<String>,
    #[serde(default)]
    pub img_src: Option<String>,
}

/// Payload for creating a food category (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTypeCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
}

/// Payload for updating a food category (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTypeUpdateRequest {
    pub id: FoodTypeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
}

/// A store (restaurant location).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDto {
    pub id: StoreId,
    // Omitted in the nested snapshots embedded in cart entries.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub food_stores: Option<Vec<FoodStoreDto>>,
}

/// A food listed by a specific store, with its store-specific price.
///
/// This is the unit the cart references: cart line keys are the string form
/// of the food-store id. The nested `store` and `food` snapshots carry
/// everything the UI needs to render a line without further lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodStoreDto {
    pub id: Uuid,
    pub store_id: StoreId,
    #[serde(default)]
    pub store: Option<Box<StoreDto>>,
    pub food_id: FoodId,
    #[serde(default)]
    pub food: Option<FoodDto>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Query filters for the food-store listing.
#[derive(Debug, Clone, Default)]
pub struct FoodStoreFilter {
    pub food_name: Option<String>,
    pub food_type_id: Option<FoodTypeId>,
}

// =============================================================================
// Cart (server-side "temp-data")
// =============================================================================

/// One cart entry as stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntryDto {
    pub quantity: u32,
    #[serde(default)]
    pub food_store: Option<FoodStoreDto>,
}

/// The server-side cart snapshot.
///
/// The remote resource has no partial-update semantics: writes always
/// replace the whole `orderList` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    #[serde(default)]
    pub order_list: HashMap<String, CartEntryDto>,
}

// =============================================================================
// Account
// =============================================================================

/// Credential payload for login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for account registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// The current user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub role_name: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default)]
    pub user: Option<OrderCustomerDto>,
    #[serde(default)]
    pub order_details: Option<Vec<OrderItemDto>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
}

/// Customer contact info embedded in manager-facing order listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomerDto {
    pub name: String,
    pub phone: String,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub food_name: Option<String>,
}

/// Payload for placing an order at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub store_id: StoreId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_lines: Vec<OrderLineRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_id: Option<VoucherId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
}

/// One line of an order payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub food_store_id: Uuid,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

// =============================================================================
// Addresses
// =============================================================================

/// A delivery address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub id: AddressId,
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub district: String,
    pub is_default: bool,
}

/// Payload for creating or updating a delivery address.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub recipient_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

// =============================================================================
// Reviews
// =============================================================================

/// A customer review of a food or store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: ReviewId,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub food_id: Option<FoodId>,
    #[serde(default)]
    pub store_id: Option<StoreId>,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reply: Option<String>,
}

/// Payload for posting a review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<FoodId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    pub rating: u8,
    pub comment: String,
}

// =============================================================================
// Vouchers
// =============================================================================

/// A discount voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherDto {
    pub id: VoucherId,
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Payload for creating or updating a voucher (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherRequest {
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
}

// =============================================================================
// Notifications
// =============================================================================

/// A user notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

// =============================================================================
// Wallet
// =============================================================================

/// The wallet balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceDto {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// One wallet ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransactionDto {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: WalletTransactionType,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: WalletTransactionStatus,
}

// =============================================================================
// Tenants
// =============================================================================

/// A tenant (store-owning account).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDto {
    pub id: TenantId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a tenant (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRequest {
    pub name: String,
}

/// Payload for updating a tenant (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdateRequest {
    pub id: TenantId,
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_dto_wire_format() {
        let json = r#"{
            "orderList": {
                "7f9c24e8-3b2a-4f5d-9e1c-8a6b5d4c3f2e": {
                    "quantity": 2,
                    "foodStore": {
                        "id": "7f9c24e8-3b2a-4f5d-9e1c-8a6b5d4c3f2e",
                        "storeId": 3,
                        "foodId": 11,
                        "price": 45000,
                        "food": {
                            "id": 11,
                            "name": "Phở bò",
                            "foodTypeId": 1,
                            "isAvailable": true,
                            "imageSrc": "https://cdn.mealdash.example/pho.jpg"
                        }
                    }
                }
            }
        }"#;

        let cart: CartDto = serde_json::from_str(json).unwrap();
        assert_eq!(cart.order_list.len(), 1);

        let entry = &cart.order_list["7f9c24e8-3b2a-4f5d-9e1c-8a6b5d4c3f2e"];
        assert_eq!(entry.quantity, 2);

        let food_store = entry.food_store.as_ref().unwrap();
        assert_eq!(food_store.store_id, StoreId::new(3));
        assert_eq!(food_store.price, Decimal::from(45000));
        assert_eq!(
            food_store.food.as_ref().unwrap().name.as_deref(),
            Some("Phở bò")
        );
    }

    #[test]
    fn test_cart_dto_missing_order_list_defaults_empty() {
        let cart: CartDto = serde_json::from_str("{}").unwrap();
        assert!(cart.order_list.is_empty());
    }

    #[test]
    fn test_food_update_request_uses_backend_spelling() {
        let req = FoodUpdateRequest {
            id: FoodId::new(1),
            image_src: None,
            food_type_id: FoodTypeId::new(2),
            is_available: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["isAvaiable"], serde_json::json!(false));
    }

    #[test]
    fn test_order_dto_parses_backend_payload() {
        let json = r#"{
            "id": "ord-2024-0117",
            "totalAmount": 125000,
            "orderDate": "2024-01-17T09:30:00Z",
            "status": "Delivering",
            "driverName": "Trung",
            "orderDetails": [
                { "quantity": 1, "price": 45000, "foodName": "Phở bò" },
                { "quantity": 2, "price": 40000, "foodName": "Bánh mì" }
            ]
        }"#;

        let order: OrderDto = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Delivering);
        assert_eq!(order.order_details.unwrap().len(), 2);
        assert_eq!(order.driver_name.as_deref(), Some("Trung"));
    }

    #[test]
    fn test_order_request_skips_absent_optionals() {
        let req = OrderRequest {
            store_id: StoreId::new(3),
            total_amount: Decimal::from(90000),
            order_lines: vec![],
            voucher_id: None,
            address_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("voucherId").is_none());
        assert!(json.get("addressId").is_none());
        assert_eq!(json["totalAmount"], serde_json::json!(90000.0));
    }

    #[test]
    fn test_notification_type_field_rename() {
        let json = r#"{
            "id": 5,
            "title": "Order update",
            "message": "Your order is on the way",
            "isRead": false,
            "createdAt": "2024-01-17T09:31:00Z",
            "type": "order"
        }"#;
        let notification: NotificationDto = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind.as_deref(), Some("order"));
    }

    #[test]
    fn test_profile_tolerates_missing_role_and_balance() {
        let json = r#"{ "id": "u-1", "email": "an@example.com", "name": "An" }"#;
        let profile: UserProfileDto = serde_json::from_str(json).unwrap();
        assert!(profile.role_name.is_none());
        assert!(profile.balance.is_none());
    }
}
