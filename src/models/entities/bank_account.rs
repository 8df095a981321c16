use crate::models::entities::ids::DbUuid;
use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable};
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::bank_accounts)]
#[diesel(belongs_to(crate::models::entities::wallet::Wallet))]
pub struct BankAccount {
    pub id: DbUuid,
    pub wallet_id: DbUuid,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    // Never serialized outward.
    #[serde(skip_serializing)]
    pub bvn: String,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bank_accounts)]
pub struct NewBankAccount<'a> {
    pub id: DbUuid,
    pub wallet_id: DbUuid,
    pub bank_name: &'a str,
    pub account_name: &'a str,
    pub account_number: &'a str,
    pub bvn: &'a str,
}
