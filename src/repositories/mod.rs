pub mod bank_account_repository;
pub mod transaction_repository;
pub mod wallet_repository;
