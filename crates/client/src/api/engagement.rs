//! Favorites, reviews, and notification endpoints.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use mealdash_core::{FoodId, NotificationId, ReviewId, StoreId};

use super::types::{FoodDto, NotificationDto, ReviewDto, ReviewRequest, StoreDto};
use super::{ApiClient, ApiError};

impl ApiClient {
    // =========================================================================
    // Favorites
    // =========================================================================

    /// List the user's favorite stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn favorite_stores(&self) -> Result<Vec<StoreDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/favorites/stores"))
            .await
    }

    /// Add a store to favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn add_favorite_store(&self, store_id: StoreId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, &format!("/api/favorites/stores/{store_id}")))
            .await
    }

    /// Remove a store from favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn remove_favorite_store(&self, store_id: StoreId) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::DELETE, &format!("/api/favorites/stores/{store_id}")),
        )
        .await
    }

    /// Check whether a store is in the user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn is_favorite_store(&self, store_id: StoreId) -> Result<bool, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/api/favorites/stores/{store_id}/check"),
        ))
        .await
    }

    /// List the user's favorite foods.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn favorite_foods(&self) -> Result<Vec<FoodDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/favorites/foods"))
            .await
    }

    /// Add a food to favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(food_id = %food_id))]
    pub async fn add_favorite_food(&self, food_id: FoodId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, &format!("/api/favorites/foods/{food_id}")))
            .await
    }

    /// Remove a food from favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(food_id = %food_id))]
    pub async fn remove_favorite_food(&self, food_id: FoodId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/api/favorites/foods/{food_id}")))
            .await
    }

    /// Check whether a food is in the user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(food_id = %food_id))]
    pub async fn is_favorite_food(&self, food_id: FoodId) -> Result<bool, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/api/favorites/foods/{food_id}/check"),
        ))
        .await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Post a review for a food or store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_review(&self, request: &ReviewRequest) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::POST, "/api/reviews").json(request))
            .await
    }

    /// List the current user's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_reviews(&self) -> Result<Vec<ReviewDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/reviews/my-reviews"))
            .await
    }

    /// List reviews for a food.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(food_id = %food_id))]
    pub async fn reviews_by_food(&self, food_id: FoodId) -> Result<Vec<ReviewDto>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/reviews/food/{food_id}")))
            .await
    }

    /// List reviews for a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn reviews_by_store(&self, store_id: StoreId) -> Result<Vec<ReviewDto>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/reviews/store/{store_id}")))
            .await
    }

    /// Check whether the user may review the foods of a completed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn can_review(&self, order_id: &str) -> Result<bool, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/api/reviews/can-review/{order_id}"),
        ))
        .await
    }

    /// Reply to a review (manager).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, reply), fields(review_id = %review_id))]
    pub async fn reply_to_review(&self, review_id: ReviewId, reply: &str) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::POST, &format!("/api/reviews/{review_id}/reply"))
                .json(&json!({ "reply": reply })),
        )
        .await
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// List the user's notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<NotificationDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/notifications"))
            .await
    }

    /// Count unread notifications (for the badge).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn unread_notification_count(&self) -> Result<u32, ApiError> {
        self.execute(self.request(Method::GET, "/api/notifications/unread-count"))
            .await
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(notification_id = %notification_id))]
    pub async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<(), ApiError> {
        self.execute_empty(self.request(
            Method::PUT,
            &format!("/api/notifications/{notification_id}/read"),
        ))
        .await
    }

    /// Mark all notifications as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::PUT, "/api/notifications/read-all"))
            .await
    }
}
