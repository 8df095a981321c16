use crate::error::ApiError;
use crate::models::dtos::response::Pagination;
use crate::models::entities::enum_types::{AccountType, HistoryStatus, HistoryType};
use crate::models::entities::ids::DbUuid;
use crate::models::entities::wallet::{NewWallet, Wallet};
use crate::models::entities::wallet_history::{NewWalletHistory, WalletHistory};
use crate::schema::{wallet_history, wallets};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

/// Ledger store. Every balance mutation is a single-row compare-and-swap on
/// the wallet's `version` column inside one DB transaction; a stale version
/// surfaces as `VersionConflict` and the caller retries with a fresh read.
pub struct WalletRepository;

impl WalletRepository {
    pub fn find_by_id(conn: &mut SqliteConnection, wallet_id: Uuid) -> Result<Wallet, ApiError> {
        wallets::table
            .filter(wallets::id.eq(DbUuid(wallet_id)))
            .filter(wallets::deleted_at.is_null())
            .first::<Wallet>(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Wallet not found".into()))
    }

    pub fn find_by_identifier(
        conn: &mut SqliteConnection,
        identifier: &str,
    ) -> Result<Option<Wallet>, ApiError> {
        wallets::table
            .filter(wallets::identifier.eq(identifier))
            .filter(wallets::deleted_at.is_null())
            .first::<Wallet>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn create_if_not_exists(
        conn: &mut SqliteConnection,
        identifier: &str,
        account_type: AccountType,
    ) -> Result<Wallet, ApiError> {
        if let Some(wallet) = Self::find_by_identifier(conn, identifier)? {
            return Ok(wallet);
        }

        diesel::insert_into(wallets::table)
            .values(&NewWallet {
                id: DbUuid::generate(),
                identifier,
                account_type,
            })
            .on_conflict(wallets::identifier)
            .do_nothing()
            .execute(conn)?;

        Self::find_by_identifier(conn, identifier)?
            .ok_or_else(|| ApiError::Internal("Wallet creation lost".into()))
    }

    /// Records deposit intent: a Pending history row, balance untouched.
    /// The money has not arrived until the gateway confirms it.
    pub fn deposit_intent(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        amount: i64,
        reference: Uuid,
    ) -> Result<WalletHistory, ApiError> {
        if amount <= 0 {
            return Err(ApiError::InvalidArgument(
                "Deposit amount must be positive".into(),
            ));
        }
        let wallet = Self::find_by_id(conn, wallet_id)?;

        diesel::insert_into(wallet_history::table)
            .values(&NewWalletHistory {
                id: DbUuid::generate(),
                wallet_id: wallet.id,
                history_type: HistoryType::Deposit,
                amount,
                status: HistoryStatus::Pending,
                reference: DbUuid(reference),
            })
            .get_result::<WalletHistory>(conn)
            .map_err(ApiError::from)
    }

    /// Single-phase withdrawal: re-reads balance and version, checks
    /// sufficiency, then decrements under CAS and records a Successful
    /// Withdrawal row in the same atomic unit.
    pub fn withdraw(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        amount: i64,
    ) -> Result<WalletHistory, ApiError> {
        if amount <= 0 {
            return Err(ApiError::InvalidArgument(
                "Withdrawal amount must be positive".into(),
            ));
        }

        conn.transaction::<_, ApiError, _>(|conn| {
            let wallet = Self::find_by_id(conn, wallet_id)?;

            if amount > wallet.balance {
                return Err(ApiError::InsufficientFunds("Insufficient balance".into()));
            }

            Self::cas_update(conn, &wallet, -amount, 0, 0)?;

            diesel::insert_into(wallet_history::table)
                .values(&NewWalletHistory {
                    id: DbUuid::generate(),
                    wallet_id: wallet.id,
                    history_type: HistoryType::Withdrawal,
                    amount,
                    status: HistoryStatus::Successful,
                    reference: DbUuid::generate(),
                })
                .get_result::<WalletHistory>(conn)
                .map_err(ApiError::from)
        })
    }

    /// Moves a Pending deposit to its terminal state exactly once. Crediting
    /// the wallet and flipping the row happen in one transaction.
    pub fn settle_deposit(
        conn: &mut SqliteConnection,
        history_id: Uuid,
        outcome: HistoryStatus,
    ) -> Result<WalletHistory, ApiError> {
        if !outcome.is_terminal() {
            return Err(ApiError::InvalidArgument(
                "Settlement outcome must be terminal".into(),
            ));
        }

        conn.transaction::<_, ApiError, _>(|conn| {
            let entry = wallet_history::table
                .filter(wallet_history::id.eq(DbUuid(history_id)))
                .first::<WalletHistory>(conn)
                .optional()?
                .ok_or_else(|| ApiError::NotFound("History entry not found".into()))?;

            if entry.status.is_terminal() {
                return Err(ApiError::AlreadySettled(format!(
                    "History entry already {}",
                    entry.status
                )));
            }

            let updated = diesel::update(
                wallet_history::table
                    .filter(wallet_history::id.eq(entry.id))
                    .filter(wallet_history::version.eq(entry.version)),
            )
            .set((
                wallet_history::status.eq(outcome),
                wallet_history::version.eq(entry.version + 1),
                wallet_history::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            if updated == 0 {
                return Err(ApiError::VersionConflict(
                    "History entry updated concurrently".into(),
                ));
            }

            if outcome == HistoryStatus::Successful {
                let wallet = Self::find_by_id(conn, entry.wallet_id.into())?;
                Self::cas_update(conn, &wallet, entry.amount, 0, 0)?;
            }

            wallet_history::table
                .filter(wallet_history::id.eq(entry.id))
                .first::<WalletHistory>(conn)
                .map_err(ApiError::from)
        })
    }

    /// Credits settled funds and records the Successful Deposit row in one
    /// unit. Used by the escrow engine for release and refund.
    pub fn credit_settled(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        amount: i64,
        receivable_delta: i64,
    ) -> Result<WalletHistory, ApiError> {
        if amount <= 0 {
            return Err(ApiError::InvalidArgument(
                "Credit amount must be positive".into(),
            ));
        }

        conn.transaction::<_, ApiError, _>(|conn| {
            let wallet = Self::find_by_id(conn, wallet_id)?;
            Self::cas_update(conn, &wallet, amount, receivable_delta, 0)?;

            diesel::insert_into(wallet_history::table)
                .values(&NewWalletHistory {
                    id: DbUuid::generate(),
                    wallet_id: wallet.id,
                    history_type: HistoryType::Deposit,
                    amount,
                    status: HistoryStatus::Successful,
                    reference: DbUuid::generate(),
                })
                .get_result::<WalletHistory>(conn)
                .map_err(ApiError::from)
        })
    }

    /// In-flight bookkeeping for the escrow engine; no history row because
    /// settled funds do not move.
    pub fn adjust_in_flight(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        receivable_delta: i64,
        payable_delta: i64,
    ) -> Result<(), ApiError> {
        conn.transaction::<_, ApiError, _>(|conn| {
            let wallet = Self::find_by_id(conn, wallet_id)?;
            Self::cas_update(conn, &wallet, 0, receivable_delta, payable_delta)
        })
    }

    pub fn find_history_by_reference(
        conn: &mut SqliteConnection,
        reference: Uuid,
    ) -> Result<Option<WalletHistory>, ApiError> {
        wallet_history::table
            .filter(wallet_history::reference.eq(DbUuid(reference)))
            .first::<WalletHistory>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list_history(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        status: Option<HistoryStatus>,
        pagination: Pagination,
    ) -> Result<(Vec<WalletHistory>, i64), ApiError> {
        let mut count_query = wallet_history::table
            .filter(wallet_history::wallet_id.eq(DbUuid(wallet_id)))
            .into_boxed();
        let mut page_query = wallet_history::table
            .filter(wallet_history::wallet_id.eq(DbUuid(wallet_id)))
            .into_boxed();

        if let Some(status) = status {
            count_query = count_query.filter(wallet_history::status.eq(status));
            page_query = page_query.filter(wallet_history::status.eq(status));
        }

        let total = count_query.count().get_result::<i64>(conn)?;
        let entries = page_query
            .order(wallet_history::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load::<WalletHistory>(conn)?;

        Ok((entries, total))
    }

    /// The single conditional update every balance mutation goes through.
    /// Zero rows affected means another writer won the race.
    fn cas_update(
        conn: &mut SqliteConnection,
        wallet: &Wallet,
        balance_delta: i64,
        receivable_delta: i64,
        payable_delta: i64,
    ) -> Result<(), ApiError> {
        let new_balance = wallet.balance + balance_delta;
        if new_balance < 0 {
            return Err(ApiError::InsufficientFunds("Insufficient balance".into()));
        }

        let updated = diesel::update(
            wallets::table
                .filter(wallets::id.eq(wallet.id))
                .filter(wallets::version.eq(wallet.version)),
        )
        .set((
            wallets::balance.eq(new_balance),
            wallets::receivable_balance.eq(wallet.receivable_balance + receivable_delta),
            wallets::payable_balance.eq(wallet.payable_balance + payable_delta),
            wallets::version.eq(wallet.version + 1),
            wallets::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(ApiError::VersionConflict(
                "Wallet updated concurrently".into(),
            ));
        }
        Ok(())
    }
}
