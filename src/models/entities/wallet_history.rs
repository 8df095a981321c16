use crate::models::entities::enum_types::{HistoryStatus, HistoryType};
use crate::models::entities::ids::DbUuid;
use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable};
use serde::Serialize;

/// Immutable audit entry for a balance change. Deposits are created Pending
/// and settled by reconciliation; withdrawals are created Successful because
/// the funds leave in the same atomic unit. `reference` is the gateway
/// correlation key.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::wallet_history)]
#[diesel(belongs_to(crate::models::entities::wallet::Wallet))]
pub struct WalletHistory {
    pub id: DbUuid,
    pub wallet_id: DbUuid,
    pub history_type: HistoryType,
    pub amount: i64,
    pub status: HistoryStatus,
    pub reference: DbUuid,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::wallet_history)]
pub struct NewWalletHistory {
    pub id: DbUuid,
    pub wallet_id: DbUuid,
    pub history_type: HistoryType,
    pub amount: i64,
    pub status: HistoryStatus,
    pub reference: DbUuid,
}
