pub mod bank_dto;
pub mod paystack;
pub mod response;
pub mod transaction_dto;
pub mod wallet_dto;
