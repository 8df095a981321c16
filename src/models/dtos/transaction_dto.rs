use crate::models::entities::enum_types::{
    Party, TimelineEvent, TransactionStatus, TransactionType,
};
use crate::models::entities::transaction::{ChargeConfiguration, ProductDetails, Transaction};
use crate::models::entities::transaction_timeline::TransactionTimeline;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub transaction_type: TransactionType,
    pub created_by: Party,
    pub buyer_id: Option<String>,
    pub seller_id: Option<String>,
    #[validate(range(min = 1, max = 365))]
    pub delivery_duration: i32,
    #[validate(length(equal = 3))]
    pub currency: String,
    pub charge_configuration: ChargeConfiguration,
    pub product_details: ProductDetails,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    #[validate(range(min = 1, max = 365))]
    pub delivery_duration: Option<i32>,
    pub charge_configuration: Option<ChargeConfiguration>,
    pub product_details: Option<ProductDetails>,
}

#[derive(Debug, Deserialize)]
pub struct PayTransactionRequest {
    pub transaction_id: Uuid,
    pub buyer_id: String,
    pub is_use_wallet: bool,
    /// Required for the gateway-funded path.
    pub buyer_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
    pub created_by: Party,
    pub buyer_id: Option<String>,
    pub seller_id: Option<String>,
    pub delivery_duration: i32,
    pub currency: String,
    pub charge_configuration: ChargeConfiguration,
    pub product_details: ProductDetails,
    pub total_amount: i64,
    pub buyer_charge: i64,
    pub seller_charge: i64,
    pub total_cost: i64,
    pub receivable_amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        let charge_configuration = tx.charge_configuration();
        Self {
            id: tx.id.into(),
            status: tx.status,
            transaction_type: tx.transaction_type,
            created_by: tx.created_by,
            buyer_id: tx.buyer_id,
            seller_id: tx.seller_id,
            delivery_duration: tx.delivery_duration,
            currency: tx.currency,
            charge_configuration,
            product_details: tx.product_details,
            total_amount: tx.total_amount,
            buyer_charge: tx.buyer_charge,
            seller_charge: tx.seller_charge,
            total_cost: tx.total_cost,
            receivable_amount: tx.receivable_amount,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimelineDto {
    pub name: TimelineEvent,
    pub label: String,
    pub created_at: NaiveDateTime,
}

impl From<TransactionTimeline> for TimelineDto {
    fn from(row: TransactionTimeline) -> Self {
        Self {
            label: row.name.to_string(),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionWithTimelineDto {
    #[serde(flatten)]
    pub transaction: TransactionDto,
    pub timeline: Vec<TimelineDto>,
}

/// Returned by `pay` for the gateway-funded path; no state transition yet.
#[derive(Debug, Serialize)]
pub struct PaymentInitiatedDto {
    pub transaction_id: Uuid,
    pub authorization_url: String,
    pub access_code: String,
    pub reference: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PayTransactionResponse {
    Paid(TransactionWithTimelineDto),
    Initiated(PaymentInitiatedDto),
}
