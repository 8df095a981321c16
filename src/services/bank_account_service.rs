use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::dtos::bank_dto::{AddBankAccountRequest, BankAccountResponse};
use crate::models::dtos::response::{ApiResponse, Meta, Pagination};
use crate::models::entities::bank_account::NewBankAccount;
use crate::models::entities::ids::DbUuid;
use crate::repositories::bank_account_repository::BankAccountRepository;
use crate::repositories::wallet_repository::WalletRepository;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

pub struct BankAccountService;

impl BankAccountService {
    pub async fn add_bank_account(
        state: &AppState,
        wallet_id: Uuid,
        req: AddBankAccountRequest,
    ) -> Result<BankAccountResponse, ApiError> {
        req.validate()?;
        if !req.account_number.chars().all(|c| c.is_ascii_digit())
            || !req.bvn.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ApiError::InvalidArgument(
                "Account number and BVN must be numeric".into(),
            ));
        }

        let mut conn = state.db.get().map_err(|_| {
            error!("bank_accounts.add: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let wallet = WalletRepository::find_by_id(&mut conn, wallet_id)?;

        if BankAccountRepository::find_active_by_details(
            &mut conn,
            wallet_id,
            &req.bank_name,
            &req.account_number,
        )?
        .is_some()
        {
            return Err(ApiError::Conflict(
                "Bank account already registered for this wallet".into(),
            ));
        }

        let account = BankAccountRepository::create(
            &mut conn,
            NewBankAccount {
                id: DbUuid::generate(),
                wallet_id: wallet.id,
                bank_name: &req.bank_name,
                account_name: &req.account_name,
                account_number: &req.account_number,
                bvn: &req.bvn,
            },
        )?;

        info!(wallet = %wallet.id, "bank_accounts.add: registered");
        Ok(BankAccountResponse::from(account))
    }

    pub async fn list_bank_accounts(
        state: &AppState,
        wallet_id: Uuid,
        pagination: Pagination,
    ) -> Result<ApiResponse<Vec<BankAccountResponse>>, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("bank_accounts.list: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        WalletRepository::find_by_id(&mut conn, wallet_id)?;

        let (accounts, total) =
            BankAccountRepository::list_by_wallet(&mut conn, wallet_id, pagination)?;

        Ok(ApiResponse::ok_paged(
            "Bank accounts",
            accounts.into_iter().map(BankAccountResponse::from).collect(),
            Meta::new(pagination, total),
        ))
    }

    pub async fn delete_bank_account(
        state: &AppState,
        wallet_id: Uuid,
        bank_account_id: Uuid,
    ) -> Result<(), ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("bank_accounts.delete: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        BankAccountRepository::soft_delete(&mut conn, bank_account_id, wallet_id)?;
        info!(bank_account = %bank_account_id, "bank_accounts.delete: removed");
        Ok(())
    }
}
