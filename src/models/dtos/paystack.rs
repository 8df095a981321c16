use serde::{Deserialize, Serialize};

/// Inbound webhook payload. Paystack sends `amount` as a string of minor
/// units; it is validated against the pending history row before settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackWebhook {
    pub event: String,
    pub data: PaystackWebhookData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackWebhookData {
    pub amount: String,
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct InitializeTransactionRequest<'a> {
    pub email: &'a str,
    pub amount: i64,
    pub reference: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PaystackInitResponse {
    pub status: bool,
    pub message: String,
    pub data: Option<PaystackInitData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackInitData {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}
