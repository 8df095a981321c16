pub mod bank_account;
pub mod enum_types;
pub mod ids;
pub mod transaction;
pub mod transaction_timeline;
pub mod wallet;
pub mod wallet_history;
