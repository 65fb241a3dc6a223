//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// State transitions happen server-side; the client only displays them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    New,
    Preparing,
    Ready,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "New",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Delivering => "Delivering",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// Wallet ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletTransactionType {
    Deposit,
    Payment,
    Refund,
}

/// Wallet ledger entry outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WalletTransactionStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Tenant (store owner) account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TenantStatus {
    #[default]
    Active,
    Inactive,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Delivering.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
    }

    #[test]
    fn test_order_status_wire_format() {
        // The backend sends PascalCase status strings.
        let status: OrderStatus = serde_json::from_str("\"Delivering\"").unwrap();
        assert_eq!(status, OrderStatus::Delivering);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Delivering\"");
    }

    #[test]
    fn test_wallet_transaction_serde() {
        let ty: WalletTransactionType = serde_json::from_str("\"Refund\"").unwrap();
        assert_eq!(ty, WalletTransactionType::Refund);
        let st: WalletTransactionStatus = serde_json::from_str("\"Success\"").unwrap();
        assert_eq!(st, WalletTransactionStatus::Success);
    }
}
