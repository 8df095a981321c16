use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum AccountType {
    User,
    Business,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum HistoryType {
    Deposit,
    Withdrawal,
}

/// A history row is born `Pending` and moves to exactly one terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum HistoryStatus {
    Pending,
    Successful,
    Canceled,
}

impl HistoryStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, HistoryStatus::Pending)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum TransactionStatus {
    SentAwaiting,
    PendingPayment,
    PendingDelivery,
    Canceled,
    Completed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Canceled | TransactionStatus::Completed)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum TransactionType {
    Product,
    Service,
    Crypto,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum Party {
    Buyer,
    Seller,
}

/// Fixed audit-trail labels, one appended per state transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString,
)]
pub enum TimelineEvent {
    #[strum(serialize = "Transaction Created")]
    TransactionCreated,
    #[strum(serialize = "Transaction Accepted")]
    TransactionAccepted,
    #[strum(serialize = "Transaction Rejected")]
    TransactionRejected,
    #[strum(serialize = "Payment Made")]
    PaymentMade,
    #[strum(serialize = "Transaction Completed")]
    TransactionCompleted,
    #[strum(serialize = "Transaction Canceled")]
    TransactionCanceled,
}
