use crate::error::ApiError;
use crate::models::dtos::response::Pagination;
use crate::models::entities::enum_types::{TimelineEvent, TransactionStatus};
use crate::models::entities::ids::DbUuid;
use crate::models::entities::transaction::{
    ChargeBreakdown, ChargeConfiguration, NewTransaction, ProductDetails, Transaction,
};
use crate::models::entities::transaction_timeline::{NewTransactionTimeline, TransactionTimeline};
use crate::schema::{transaction_timelines, transactions};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

/// Transaction persistence. Status flips follow the same optimistic-version
/// discipline as the ledger: write conditioned on the version read, zero rows
/// affected means `VersionConflict`.
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn create(
        conn: &mut SqliteConnection,
        new_tx: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        diesel::insert_into(transactions::table)
            .values(&new_tx)
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(
        conn: &mut SqliteConnection,
        transaction_id: Uuid,
    ) -> Result<Transaction, ApiError> {
        transactions::table
            .filter(transactions::id.eq(DbUuid(transaction_id)))
            .filter(transactions::deleted_at.is_null())
            .first::<Transaction>(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))
    }

    pub fn update_status(
        conn: &mut SqliteConnection,
        tx: &Transaction,
        new_status: TransactionStatus,
    ) -> Result<(), ApiError> {
        let updated = diesel::update(
            transactions::table
                .filter(transactions::id.eq(tx.id))
                .filter(transactions::version.eq(tx.version)),
        )
            .set((
                transactions::status.eq(new_status),
                transactions::version.eq(tx.version + 1),
                transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Self::require_row(updated)
    }

    /// Acceptance writes the counter-party id and the status flip together.
    pub fn accept_update(
        conn: &mut SqliteConnection,
        tx: &Transaction,
        buyer_id: &str,
        seller_id: &str,
    ) -> Result<(), ApiError> {
        let updated = diesel::update(
            transactions::table
                .filter(transactions::id.eq(tx.id))
                .filter(transactions::version.eq(tx.version)),
        )
            .set((
                transactions::status.eq(TransactionStatus::PendingPayment),
                transactions::buyer_id.eq(Some(buyer_id)),
                transactions::seller_id.eq(Some(seller_id)),
                transactions::version.eq(tx.version + 1),
                transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Self::require_row(updated)
    }

    /// Pre-acceptance edit; derived fields always travel with the inputs
    /// they were computed from.
    pub fn update_details(
        conn: &mut SqliteConnection,
        tx: &Transaction,
        delivery_duration: i32,
        charge_configuration: ChargeConfiguration,
        product_details: &ProductDetails,
        breakdown: ChargeBreakdown,
    ) -> Result<(), ApiError> {
        let updated = diesel::update(
            transactions::table
                .filter(transactions::id.eq(tx.id))
                .filter(transactions::version.eq(tx.version)),
        )
            .set((
                transactions::delivery_duration.eq(delivery_duration),
                transactions::buyer_charges.eq(charge_configuration.buyer_charges),
                transactions::seller_charges.eq(charge_configuration.seller_charges),
                transactions::product_details.eq(product_details),
                transactions::total_amount.eq(breakdown.total_amount),
                transactions::buyer_charge.eq(breakdown.buyer_charge),
                transactions::seller_charge.eq(breakdown.seller_charge),
                transactions::total_cost.eq(breakdown.total_cost),
                transactions::receivable_amount.eq(breakdown.receivable_amount),
                transactions::version.eq(tx.version + 1),
                transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Self::require_row(updated)
    }

    pub fn append_timeline(
        conn: &mut SqliteConnection,
        transaction_id: DbUuid,
        event: TimelineEvent,
    ) -> Result<TransactionTimeline, ApiError> {
        diesel::insert_into(transaction_timelines::table)
            .values(&NewTransactionTimeline {
                id: DbUuid::generate(),
                transaction_id,
                name: event,
                created_at: Utc::now().naive_utc(),
            })
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn timeline_for(
        conn: &mut SqliteConnection,
        transaction_id: Uuid,
    ) -> Result<Vec<TransactionTimeline>, ApiError> {
        transaction_timelines::table
            .filter(transaction_timelines::transaction_id.eq(DbUuid(transaction_id)))
            .order(transaction_timelines::created_at.asc())
            .load::<TransactionTimeline>(conn)
            .map_err(ApiError::from)
    }

    pub fn list_by_party(
        conn: &mut SqliteConnection,
        party_id: &str,
        pagination: Pagination,
    ) -> Result<(Vec<Transaction>, i64), ApiError> {
        let party_filter = transactions::buyer_id
            .eq(party_id)
            .or(transactions::seller_id.eq(party_id));

        let total = transactions::table
            .filter(party_filter)
            .filter(transactions::deleted_at.is_null())
            .count()
            .get_result::<i64>(conn)?;

        let rows = transactions::table
            .filter(party_filter)
            .filter(transactions::deleted_at.is_null())
            .order(transactions::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load::<Transaction>(conn)?;

        Ok((rows, total))
    }

    fn require_row(updated: usize) -> Result<(), ApiError> {
        if updated == 0 {
            return Err(ApiError::VersionConflict(
                "Transaction updated concurrently".into(),
            ));
        }
        Ok(())
    }
}
