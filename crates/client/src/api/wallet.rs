//! Wallet endpoints: balance, deposits, and the transaction ledger.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use super::types::{WalletBalanceDto, WalletTransactionDto};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Get the current wallet balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn wallet_balance(&self) -> Result<WalletBalanceDto, ApiError> {
        self.execute(self.request(Method::GET, "/api/wallet/balance"))
            .await
    }

    /// Deposit a whole-đồng amount into the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn deposit(&self, amount: i64) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::POST, "/api/wallet/deposit")
                .json(&json!({ "amount": amount })),
        )
        .await
    }

    /// List wallet transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn wallet_transactions(&self) -> Result<Vec<WalletTransactionDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/wallet/transactions"))
            .await
    }

    /// Check whether the wallet covers an amount (pre-checkout guard).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn check_balance(&self, amount: i64) -> Result<bool, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/api/wallet/check-balance/{amount}"),
        ))
        .await
    }
}
