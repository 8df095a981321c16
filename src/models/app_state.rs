use crate::clients::paystack::PaystackClient;
use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use eyre::{eyre, Result};
use reqwest::Client;
use secrecy::SecretString;
use std::env;
use std::sync::Arc;
use std::time::Duration;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct PaystackInfo {
    pub paystack_secret_key: SecretString,
    pub paystack_api_url: String,
    pub paystack_webhook_secret: SecretString,
}

#[derive(Clone)]
pub struct AppConfig {
    pub app_url: String,
    pub paystack_details: PaystackInfo,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            paystack_details: PaystackInfo {
                paystack_secret_key: SecretString::from(
                    env::var("PAYSTACK_SECRET_KEY")
                        .map_err(|_| eyre!("PAYSTACK_SECRET_KEY must be set"))?,
                ),
                paystack_api_url: env::var("PAYSTACK_API_URL")
                    .unwrap_or_else(|_| "https://api.paystack.co".to_string()),
                paystack_webhook_secret: SecretString::from(
                    env::var("PAYSTACK_WEBHOOK_SECRET")
                        .map_err(|_| eyre!("PAYSTACK_WEBHOOK_SECRET must be set"))?,
                ),
            },
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub http_client: Client,
    pub config: AppConfig,
    pub paystack: PaystackClient,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Result<Arc<Self>> {
        let http = Client::builder().timeout(Duration::from_secs(5)).build()?;

        let paystack = PaystackClient::new(
            http.clone(),
            &config.paystack_details.paystack_api_url,
            config.paystack_details.paystack_secret_key.clone(),
        )
        .map_err(|e| eyre!("paystack client: {e}"))?;

        Ok(Arc::new(Self {
            db,
            http_client: http,
            config,
            paystack,
        }))
    }
}
