#![allow(dead_code)]

use paylock::models::app_state::{AppConfig, AppState, PaystackInfo};
use paylock::utility::db_pool::establish_pool;
use secrecy::SecretString;
use std::sync::Arc;
use tempfile::TempDir;

pub mod fixtures;

pub const TEST_WEBHOOK_SECRET: &str = "test_paystack_webhook_secret";

/// Owns the temp directory backing the SQLite file so it outlives the pool.
pub struct TestContext {
    pub state: Arc<AppState>,
    _db_dir: TempDir,
}

/// Fresh database per test; no shared state, tests run in parallel.
pub fn test_context() -> TestContext {
    // Unroutable gateway; tests that need one use `test_context_with_gateway`.
    test_context_with_gateway("http://127.0.0.1:9")
}

pub fn test_context_with_gateway(paystack_url: &str) -> TestContext {
    let db_dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = db_dir.path().join("paylock_test.sqlite");

    let pool = establish_pool(db_path.to_str().expect("non-utf8 temp path"))
        .expect("failed to build test pool");

    let config = AppConfig {
        app_url: "http://localhost:8080".to_string(),
        paystack_details: PaystackInfo {
            paystack_secret_key: SecretString::from("sk_test_fake_paystack_key"),
            paystack_api_url: paystack_url.to_string(),
            paystack_webhook_secret: SecretString::from(TEST_WEBHOOK_SECRET),
        },
    };

    let state = AppState::new(pool, config).expect("failed to build test state");

    TestContext {
        state,
        _db_dir: db_dir,
    }
}
