use crate::error::ApiError;
use crate::models::dtos::paystack::{
    InitializeTransactionRequest, PaystackInitData, PaystackInitResponse,
};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;
use uuid::Uuid;

/// Payment gateway collaborator. Only initiation lives here; confirmation
/// arrives later through the webhook.
#[derive(Clone)]
pub struct PaystackClient {
    http: Client,
    base_url: Url,
    secret_key: SecretString,
}

impl PaystackClient {
    pub fn new(http: Client, base_url: &str, secret_key: SecretString) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::Internal("Invalid Paystack base URL".into()))?;

        Ok(Self {
            http,
            base_url,
            secret_key,
        })
    }

    /// `POST /transaction/initialize` returning the authorization URL the
    /// payer is redirected to. `reference` is our correlation key; it comes
    /// back on the webhook.
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount: i64,
        reference: Uuid,
    ) -> Result<PaystackInitData, ApiError> {
        let url = self.endpoint("transaction/initialize");
        let reference = reference.to_string();

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .json(&InitializeTransactionRequest {
                email,
                amount,
                reference: &reference,
            })
            .send()
            .await?;

        let status = resp.status();
        let body: PaystackInitResponse = resp
            .json()
            .await
            .map_err(|_| ApiError::Payment("Invalid Paystack response".into()))?;

        if !status.is_success() || !body.status {
            warn!(
                paystack_message = %body.message,
                "Paystack initialize_transaction failed"
            );
            return Err(ApiError::Payment(body.message));
        }

        body.data
            .ok_or_else(|| ApiError::Payment("Missing authorization data".into()))
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}
