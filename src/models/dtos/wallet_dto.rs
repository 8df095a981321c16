use crate::models::dtos::paystack::PaystackInitData;
use crate::models::entities::enum_types::{AccountType, HistoryStatus, HistoryType};
use crate::models::entities::wallet::Wallet;
use crate::models::entities::wallet_history::WalletHistory;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct WalletDto {
    pub id: Uuid,
    pub identifier: String,
    pub account_type: AccountType,
    pub balance: i64,
    pub receivable_balance: i64,
    pub payable_balance: i64,
}

impl From<Wallet> for WalletDto {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id.into(),
            identifier: wallet.identifier,
            account_type: wallet.account_type,
            balance: wallet.balance,
            receivable_balance: wallet.receivable_balance,
            payable_balance: wallet.payable_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WalletHistoryDto {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub history_type: HistoryType,
    pub amount: i64,
    pub status: HistoryStatus,
    pub reference: Uuid,
    pub created_at: NaiveDateTime,
}

impl From<WalletHistory> for WalletHistoryDto {
    fn from(entry: WalletHistory) -> Self {
        Self {
            id: entry.id.into(),
            wallet_id: entry.wallet_id.into(),
            history_type: entry.history_type,
            amount: entry.amount,
            status: entry.status,
            reference: entry.reference.into(),
            created_at: entry.created_at,
        }
    }
}

// Amounts are integer minor-currency units (kobo).

#[derive(Debug, Deserialize, Validate)]
pub struct AddFundsRequest {
    #[validate(range(min = 1))]
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub history: WalletHistoryDto,
    pub payment: PaystackInitData,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WithdrawFundsRequest {
    #[validate(range(min = 1))]
    pub amount: i64,
    pub bank_account_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub history: WalletHistoryDto,
    pub balance: i64,
}
