use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::dtos::response::{ApiResponse, Meta, Pagination};
use crate::models::dtos::wallet_dto::{
    AddFundsRequest, DepositResponse, WalletDto, WalletHistoryDto, WithdrawFundsRequest,
    WithdrawResponse,
};
use crate::models::entities::enum_types::{AccountType, HistoryStatus};
use crate::repositories::bank_account_repository::BankAccountRepository;
use crate::repositories::wallet_repository::WalletRepository;
use crate::services::with_version_retry;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct WalletService;

impl WalletService {
    /// Idempotent lookup-or-create keyed by the owner identifier; called at
    /// onboarding.
    pub async fn get_or_create_wallet(
        state: &AppState,
        owner_id: &str,
        account_type: AccountType,
    ) -> Result<WalletDto, ApiError> {
        if owner_id.trim().is_empty() {
            return Err(ApiError::InvalidArgument("Owner id must not be empty".into()));
        }

        let mut conn = state.db.get().map_err(|_| {
            error!("wallet.get_or_create: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let wallet = WalletRepository::create_if_not_exists(&mut conn, owner_id, account_type)?;
        Ok(WalletDto::from(wallet))
    }

    pub async fn get_balance(state: &AppState, wallet_id: Uuid) -> Result<WalletDto, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("wallet.balance: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        WalletRepository::find_by_id(&mut conn, wallet_id).map(WalletDto::from)
    }

    /// Two-phase deposit, phase one: durably record intent, then ask the
    /// gateway for a payment authorization. The gateway call runs after the
    /// connection is released; if it fails the Pending row stays behind for
    /// reconciliation or manual cancellation.
    pub async fn request_deposit(
        state: &AppState,
        wallet_id: Uuid,
        owner_email: &str,
        req: AddFundsRequest,
    ) -> Result<DepositResponse, ApiError> {
        req.validate()?;

        let reference = Uuid::new_v4();
        let entry = {
            let mut conn = state.db.get().map_err(|_| {
                error!("wallet.deposit: failed to acquire db connection");
                ApiError::DatabaseConnection("Database unavailable".into())
            })?;
            WalletRepository::deposit_intent(&mut conn, wallet_id, req.amount, reference)?
        };

        let payment = state
            .paystack
            .initialize_transaction(owner_email, req.amount, reference)
            .await
            .map_err(|e| {
                warn!(
                    %reference,
                    "wallet.deposit: gateway initiation failed, pending entry left for reconciliation"
                );
                e
            })?;

        info!(%reference, amount = req.amount, "wallet.deposit: initiated");
        Ok(DepositResponse {
            history: WalletHistoryDto::from(entry),
            payment,
        })
    }

    /// Single-phase withdrawal. Bank-account ownership is checked first;
    /// insufficiency is a user-facing rejection, not a system error.
    pub async fn request_withdrawal(
        state: &AppState,
        wallet_id: Uuid,
        req: WithdrawFundsRequest,
    ) -> Result<WithdrawResponse, ApiError> {
        req.validate()?;

        let mut conn = state.db.get().map_err(|_| {
            error!("wallet.withdraw: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        BankAccountRepository::find_by_id_and_wallet(&mut conn, req.bank_account_id, wallet_id)?
            .ok_or_else(|| ApiError::NotFound("Bank account not found for this wallet".into()))?;

        let entry = with_version_retry("wallet.withdraw", || {
            WalletRepository::withdraw(&mut conn, wallet_id, req.amount)
        })
        .await?;

        let wallet = WalletRepository::find_by_id(&mut conn, wallet_id)?;
        info!(amount = req.amount, balance = wallet.balance, "wallet.withdraw: settled");

        Ok(WithdrawResponse {
            history: WalletHistoryDto::from(entry),
            balance: wallet.balance,
        })
    }

    pub async fn get_history(
        state: &AppState,
        wallet_id: Uuid,
        status: Option<HistoryStatus>,
        pagination: Pagination,
    ) -> Result<ApiResponse<Vec<WalletHistoryDto>>, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("wallet.history: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        // 404 on unknown wallet rather than an empty page.
        WalletRepository::find_by_id(&mut conn, wallet_id)?;

        let (entries, total) =
            WalletRepository::list_history(&mut conn, wallet_id, status, pagination)?;

        Ok(ApiResponse::ok_paged(
            "Wallet history",
            entries.into_iter().map(WalletHistoryDto::from).collect(),
            Meta::new(pagination, total),
        ))
    }
}
