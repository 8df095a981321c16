use crate::models::entities::bank_account::BankAccount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddBankAccountRequest {
    #[validate(length(min = 2, max = 100))]
    pub bank_name: String,
    #[validate(length(min = 2, max = 100))]
    pub account_name: String,
    #[validate(length(equal = 10))]
    pub account_number: String,
    #[validate(length(equal = 11))]
    pub bvn: String,
}

#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
}

impl From<BankAccount> for BankAccountResponse {
    fn from(account: BankAccount) -> Self {
        Self {
            id: account.id.into(),
            wallet_id: account.wallet_id.into(),
            bank_name: account.bank_name,
            account_name: account.account_name,
            account_number: account.account_number,
        }
    }
}
