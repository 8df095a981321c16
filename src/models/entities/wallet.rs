use crate::models::entities::enum_types::AccountType;
use crate::models::entities::ids::DbUuid;
use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::Serialize;

/// The settled-funds ledger row for a single owner. `balance` reflects the
/// sum of all Successful history entries; `receivable_balance` and
/// `payable_balance` carry funds in flight during an escrow transaction.
/// Every mutation bumps `version` by exactly one.
#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::wallets)]
pub struct Wallet {
    pub id: DbUuid,
    pub identifier: String,
    pub account_type: AccountType,
    pub balance: i64,
    pub receivable_balance: i64,
    pub payable_balance: i64,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::wallets)]
pub struct NewWallet<'a> {
    pub id: DbUuid,
    pub identifier: &'a str,
    pub account_type: AccountType,
}
