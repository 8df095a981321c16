pub mod clients;
pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod services;
pub mod utility;

pub use error::ApiError;
pub use models::app_state::{AppConfig, AppState, DbPool, PaystackInfo};
