use crate::error::ApiError;
use crate::models::dtos::response::Pagination;
use crate::models::entities::bank_account::{BankAccount, NewBankAccount};
use crate::models::entities::ids::DbUuid;
use crate::schema::bank_accounts;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

pub struct BankAccountRepository;

impl BankAccountRepository {
    pub fn create(
        conn: &mut SqliteConnection,
        new_account: NewBankAccount,
    ) -> Result<BankAccount, ApiError> {
        diesel::insert_into(bank_accounts::table)
            .values(&new_account)
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id_and_wallet(
        conn: &mut SqliteConnection,
        id: Uuid,
        wallet_id: Uuid,
    ) -> Result<Option<BankAccount>, ApiError> {
        bank_accounts::table
            .filter(bank_accounts::id.eq(DbUuid(id)))
            .filter(bank_accounts::wallet_id.eq(DbUuid(wallet_id)))
            .filter(bank_accounts::deleted_at.is_null())
            .first::<BankAccount>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// App-level uniqueness check for bank_name + account_number per wallet.
    pub fn find_active_by_details(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        bank_name: &str,
        account_number: &str,
    ) -> Result<Option<BankAccount>, ApiError> {
        bank_accounts::table
            .filter(bank_accounts::wallet_id.eq(DbUuid(wallet_id)))
            .filter(bank_accounts::bank_name.eq(bank_name))
            .filter(bank_accounts::account_number.eq(account_number))
            .filter(bank_accounts::deleted_at.is_null())
            .first::<BankAccount>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list_by_wallet(
        conn: &mut SqliteConnection,
        wallet_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<BankAccount>, i64), ApiError> {
        let total = bank_accounts::table
            .filter(bank_accounts::wallet_id.eq(DbUuid(wallet_id)))
            .filter(bank_accounts::deleted_at.is_null())
            .count()
            .get_result::<i64>(conn)?;

        let accounts = bank_accounts::table
            .filter(bank_accounts::wallet_id.eq(DbUuid(wallet_id)))
            .filter(bank_accounts::deleted_at.is_null())
            .order(bank_accounts::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load::<BankAccount>(conn)?;

        Ok((accounts, total))
    }

    /// Soft delete; the row stays for audit, list/get exclude it.
    pub fn soft_delete(
        conn: &mut SqliteConnection,
        id: Uuid,
        wallet_id: Uuid,
    ) -> Result<(), ApiError> {
        let account = Self::find_by_id_and_wallet(conn, id, wallet_id)?
            .ok_or_else(|| ApiError::NotFound("Bank account not found".into()))?;

        let now = Utc::now().naive_utc();
        let updated = diesel::update(
            bank_accounts::table
                .filter(bank_accounts::id.eq(account.id))
                .filter(bank_accounts::version.eq(account.version)),
        )
        .set((
            bank_accounts::deleted_at.eq(Some(now)),
            bank_accounts::version.eq(account.version + 1),
            bank_accounts::updated_at.eq(now),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(ApiError::VersionConflict(
                "Bank account updated concurrently".into(),
            ));
        }
        Ok(())
    }
}
