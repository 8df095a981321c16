use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::dtos::response::{ApiResponse, Meta, Pagination};
use crate::models::dtos::transaction_dto::{
    CreateTransactionRequest, PayTransactionRequest, PayTransactionResponse, PaymentInitiatedDto,
    TimelineDto, TransactionDto, TransactionWithTimelineDto, UpdateTransactionRequest,
};
use crate::models::entities::enum_types::{
    AccountType, Party, TimelineEvent, TransactionStatus,
};
use crate::models::entities::ids::DbUuid;
use crate::models::entities::transaction::{NewTransaction, Transaction};
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::wallet_repository::WalletRepository;
use crate::services::with_version_retry;
use diesel::Connection;
use diesel::SqliteConnection;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

/// Escrow transaction engine. Drives the state machine
/// Sent-Awaiting -> Pending-Payment -> Pending-Delivery -> Completed
/// (Canceled from any non-terminal state per the guards below), appending
/// exactly one timeline row per transition and keeping the buyer and seller
/// wallets consistent with the transaction.
pub struct TransactionService;

impl TransactionService {
    pub async fn create_transaction(
        state: &AppState,
        req: CreateTransactionRequest,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        req.validate()?;

        let creator_set = match req.created_by {
            Party::Buyer => req.buyer_id.as_deref(),
            Party::Seller => req.seller_id.as_deref(),
        };
        if creator_set.map_or(true, |id| id.trim().is_empty()) {
            return Err(ApiError::InvalidArgument(format!(
                "{} id is required for a transaction created by the {}",
                req.created_by, req.created_by
            )));
        }

        // Derived amounts are frozen at creation; edits recompute them
        // through the same pure function.
        let breakdown = req.charge_configuration.breakdown(&req.product_details)?;

        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.create: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let (tx, timeline) = conn.transaction::<_, ApiError, _>(|conn| {
            let tx = TransactionRepository::create(
                conn,
                NewTransaction {
                    id: DbUuid::generate(),
                    status: TransactionStatus::SentAwaiting,
                    transaction_type: req.transaction_type,
                    created_by: req.created_by,
                    buyer_id: req.buyer_id.as_deref(),
                    seller_id: req.seller_id.as_deref(),
                    delivery_duration: req.delivery_duration,
                    currency: &req.currency,
                    buyer_charges: req.charge_configuration.buyer_charges,
                    seller_charges: req.charge_configuration.seller_charges,
                    product_details: &req.product_details,
                    total_amount: breakdown.total_amount,
                    buyer_charge: breakdown.buyer_charge,
                    seller_charge: breakdown.seller_charge,
                    total_cost: breakdown.total_cost,
                    receivable_amount: breakdown.receivable_amount,
                },
            )?;
            let row =
                TransactionRepository::append_timeline(conn, tx.id, TimelineEvent::TransactionCreated)?;
            Ok((tx, vec![row]))
        })?;

        info!(transaction = %tx.id, total_cost = tx.total_cost, "transaction.create: created");
        Ok(TransactionWithTimelineDto {
            transaction: TransactionDto::from(tx),
            timeline: timeline.into_iter().map(TimelineDto::from).collect(),
        })
    }

    /// Product-detail edits are only allowed before acceptance; derived
    /// fields are recomputed, never patched.
    pub async fn update_transaction(
        state: &AppState,
        transaction_id: Uuid,
        req: UpdateTransactionRequest,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        req.validate()?;

        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.update: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        with_version_retry("transaction.update", || {
            let tx = TransactionRepository::find_by_id(&mut conn, transaction_id)?;
            if tx.status != TransactionStatus::SentAwaiting {
                return Err(ApiError::InvalidState(format!(
                    "Transaction in {} cannot be edited",
                    tx.status
                )));
            }

            let delivery_duration = req.delivery_duration.unwrap_or(tx.delivery_duration);
            let charge_configuration = req
                .charge_configuration
                .unwrap_or_else(|| tx.charge_configuration());
            let product_details = req
                .product_details
                .clone()
                .unwrap_or_else(|| tx.product_details.clone());

            let breakdown = charge_configuration.breakdown(&product_details)?;
            TransactionRepository::update_details(
                &mut conn,
                &tx,
                delivery_duration,
                charge_configuration,
                &product_details,
                breakdown,
            )
        })
        .await?;

        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    /// Sent-Awaiting -> Pending-Payment. The acceptor becomes the missing
    /// counter-party and states their own account type; the buyer's wallet
    /// starts carrying the amount due as payable balance.
    pub async fn accept_transaction(
        state: &AppState,
        transaction_id: Uuid,
        counterparty_id: &str,
        counterparty_account_type: AccountType,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        if counterparty_id.trim().is_empty() {
            return Err(ApiError::InvalidArgument("Counter-party id is required".into()));
        }

        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.accept: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        with_version_retry("transaction.accept", || {
            let tx = TransactionRepository::find_by_id(&mut conn, transaction_id)?;
            if tx.status != TransactionStatus::SentAwaiting {
                return Err(ApiError::InvalidState(format!(
                    "Transaction in {} cannot be accepted",
                    tx.status
                )));
            }

            let (buyer_id, seller_id) = match tx.created_by {
                Party::Seller => (counterparty_id.to_string(), tx.seller_id.clone()
                    .ok_or_else(|| ApiError::Internal("Creator side missing".into()))?),
                Party::Buyer => (tx.buyer_id.clone()
                    .ok_or_else(|| ApiError::Internal("Creator side missing".into()))?, counterparty_id.to_string()),
            };
            if buyer_id == seller_id {
                return Err(ApiError::InvalidArgument(
                    "Buyer and seller must be different parties".into(),
                ));
            }

            let total_cost = tx.total_cost;
            conn.transaction::<_, ApiError, _>(|conn| {
                TransactionRepository::accept_update(conn, &tx, &buyer_id, &seller_id)?;
                TransactionRepository::append_timeline(
                    conn,
                    tx.id,
                    TimelineEvent::TransactionAccepted,
                )?;

                // An already-onboarded wallet keeps the type it was created
                // with; the stated type only applies to a fresh wallet.
                let counterparty_wallet = WalletRepository::create_if_not_exists(
                    conn,
                    counterparty_id,
                    counterparty_account_type,
                )?;

                let buyer_wallet = if buyer_id == counterparty_id {
                    counterparty_wallet
                } else {
                    WalletRepository::find_by_identifier(conn, &buyer_id)?
                        .ok_or_else(|| ApiError::NotFound("Buyer wallet not found".into()))?
                };
                WalletRepository::adjust_in_flight(conn, buyer_wallet.id.into(), 0, total_cost)
            })
        })
        .await?;

        info!(transaction = %transaction_id, "transaction.accept: pending payment");
        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    /// Sent-Awaiting -> Canceled.
    pub async fn reject_transaction(
        state: &AppState,
        transaction_id: Uuid,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.reject: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        with_version_retry("transaction.reject", || {
            let tx = TransactionRepository::find_by_id(&mut conn, transaction_id)?;
            if tx.status != TransactionStatus::SentAwaiting {
                return Err(ApiError::InvalidState(format!(
                    "Transaction in {} cannot be rejected",
                    tx.status
                )));
            }

            conn.transaction::<_, ApiError, _>(|conn| {
                TransactionRepository::update_status(conn, &tx, TransactionStatus::Canceled)?;
                TransactionRepository::append_timeline(
                    conn,
                    tx.id,
                    TimelineEvent::TransactionRejected,
                )
                .map(|_| ())
            })
        })
        .await?;

        info!(transaction = %transaction_id, "transaction.reject: canceled");
        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    /// Pending-Payment -> Pending-Delivery when funded from the buyer's
    /// wallet; the debit is exactly `total_cost` and the seller's wallet
    /// starts carrying the receivable. The gateway path only initiates a
    /// deposit of `total_cost` and leaves the state machine untouched.
    pub async fn make_payment(
        state: &AppState,
        req: PayTransactionRequest,
    ) -> Result<PayTransactionResponse, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.pay: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let tx = TransactionRepository::find_by_id(&mut conn, req.transaction_id)?;
        if tx.status != TransactionStatus::PendingPayment {
            return Err(ApiError::InvalidState(format!(
                "Transaction in {} cannot be paid",
                tx.status
            )));
        }
        if tx.buyer_id.as_deref() != Some(req.buyer_id.as_str()) {
            return Err(ApiError::InvalidArgument(
                "Only the transaction buyer can pay".into(),
            ));
        }

        // Acceptance guarantees the buyer wallet exists.
        let buyer_wallet_id: Uuid = WalletRepository::find_by_identifier(&mut conn, &req.buyer_id)?
            .ok_or_else(|| ApiError::NotFound("Buyer wallet not found".into()))?
            .id
            .into();

        if !req.is_use_wallet {
            let email = req.buyer_email.as_deref().ok_or_else(|| {
                ApiError::InvalidArgument("buyer_email is required for gateway funding".into())
            })?;

            let reference = Uuid::new_v4();
            WalletRepository::deposit_intent(&mut conn, buyer_wallet_id, tx.total_cost, reference)?;
            drop(conn);

            let payment = state
                .paystack
                .initialize_transaction(email, tx.total_cost, reference)
                .await?;

            info!(transaction = %tx.id, %reference, "transaction.pay: gateway funding initiated");
            return Ok(PayTransactionResponse::Initiated(PaymentInitiatedDto {
                transaction_id: tx.id.into(),
                authorization_url: payment.authorization_url,
                access_code: payment.access_code,
                reference,
            }));
        }

        let seller_id = tx
            .seller_id
            .clone()
            .ok_or_else(|| ApiError::Internal("Seller missing on accepted transaction".into()))?;
        let seller_wallet_id: Uuid = WalletRepository::find_by_identifier(&mut conn, &seller_id)?
            .ok_or_else(|| ApiError::NotFound("Seller wallet not found".into()))?
            .id
            .into();

        with_version_retry("transaction.pay", || {
            let tx = TransactionRepository::find_by_id(&mut conn, req.transaction_id)?;
            if tx.status != TransactionStatus::PendingPayment {
                return Err(ApiError::InvalidState(format!(
                    "Transaction in {} cannot be paid",
                    tx.status
                )));
            }

            conn.transaction::<_, ApiError, _>(|conn| {
                // Guard: the debit is the frozen total_cost, nothing else.
                WalletRepository::withdraw(conn, buyer_wallet_id, tx.total_cost)?;
                WalletRepository::adjust_in_flight(conn, buyer_wallet_id, 0, -tx.total_cost)?;
                WalletRepository::adjust_in_flight(conn, seller_wallet_id, tx.receivable_amount, 0)?;

                TransactionRepository::update_status(conn, &tx, TransactionStatus::PendingDelivery)?;
                TransactionRepository::append_timeline(conn, tx.id, TimelineEvent::PaymentMade)
                    .map(|_| ())
            })
        })
        .await?;

        info!(transaction = %req.transaction_id, "transaction.pay: pending delivery");
        Self::fetch_with_timeline(&mut conn, req.transaction_id).map(PayTransactionResponse::Paid)
    }

    /// Pending-Delivery -> Completed: escrowed funds settle into the
    /// seller's balance as a Successful Deposit entry.
    pub async fn complete_transaction(
        state: &AppState,
        transaction_id: Uuid,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.complete: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        with_version_retry("transaction.complete", || {
            let tx = TransactionRepository::find_by_id(&mut conn, transaction_id)?;
            if tx.status != TransactionStatus::PendingDelivery {
                return Err(ApiError::InvalidState(format!(
                    "Transaction in {} cannot be completed",
                    tx.status
                )));
            }

            let seller_id = tx.seller_id.clone().ok_or_else(|| {
                ApiError::Internal("Seller missing on paid transaction".into())
            })?;

            conn.transaction::<_, ApiError, _>(|conn| {
                let seller_wallet = WalletRepository::find_by_identifier(conn, &seller_id)?
                    .ok_or_else(|| ApiError::NotFound("Seller wallet not found".into()))?;

                WalletRepository::credit_settled(
                    conn,
                    seller_wallet.id.into(),
                    tx.receivable_amount,
                    -tx.receivable_amount,
                )?;

                TransactionRepository::update_status(conn, &tx, TransactionStatus::Completed)?;
                TransactionRepository::append_timeline(
                    conn,
                    tx.id,
                    TimelineEvent::TransactionCompleted,
                )
                .map(|_| ())
            })
        })
        .await?;

        info!(transaction = %transaction_id, "transaction.complete: settled to seller");
        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    /// Cancel from Pending-Payment (releases the buyer's payable) or
    /// Pending-Delivery (automatic refund of the debited total_cost and
    /// release of the seller's receivable).
    pub async fn cancel_transaction(
        state: &AppState,
        transaction_id: Uuid,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.cancel: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        with_version_retry("transaction.cancel", || {
            let tx = TransactionRepository::find_by_id(&mut conn, transaction_id)?;
            match tx.status {
                TransactionStatus::PendingPayment | TransactionStatus::PendingDelivery => {}
                other => {
                    return Err(ApiError::InvalidState(format!(
                        "Transaction in {} cannot be canceled",
                        other
                    )));
                }
            }

            let buyer_id = tx.buyer_id.clone().ok_or_else(|| {
                ApiError::Internal("Buyer missing on accepted transaction".into())
            })?;

            conn.transaction::<_, ApiError, _>(|conn| {
                let buyer_wallet = WalletRepository::find_by_identifier(conn, &buyer_id)?
                    .ok_or_else(|| ApiError::NotFound("Buyer wallet not found".into()))?;

                match tx.status {
                    TransactionStatus::PendingPayment => {
                        WalletRepository::adjust_in_flight(
                            conn,
                            buyer_wallet.id.into(),
                            0,
                            -tx.total_cost,
                        )?;
                    }
                    TransactionStatus::PendingDelivery => {
                        WalletRepository::credit_settled(
                            conn,
                            buyer_wallet.id.into(),
                            tx.total_cost,
                            0,
                        )?;

                        let seller_id = tx.seller_id.clone().ok_or_else(|| {
                            ApiError::Internal("Seller missing on paid transaction".into())
                        })?;
                        let seller_wallet =
                            WalletRepository::find_by_identifier(conn, &seller_id)?.ok_or_else(
                                || ApiError::NotFound("Seller wallet not found".into()),
                            )?;
                        WalletRepository::adjust_in_flight(
                            conn,
                            seller_wallet.id.into(),
                            -tx.receivable_amount,
                            0,
                        )?;
                    }
                    _ => unreachable!("guarded above"),
                }

                TransactionRepository::update_status(conn, &tx, TransactionStatus::Canceled)?;
                TransactionRepository::append_timeline(
                    conn,
                    tx.id,
                    TimelineEvent::TransactionCanceled,
                )
                .map(|_| ())
            })
        })
        .await?;

        info!(transaction = %transaction_id, "transaction.cancel: canceled");
        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    pub async fn get_transaction(
        state: &AppState,
        transaction_id: Uuid,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.fetch: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        Self::fetch_with_timeline(&mut conn, transaction_id)
    }

    pub async fn list_transactions(
        state: &AppState,
        party_id: &str,
        pagination: Pagination,
    ) -> Result<ApiResponse<Vec<TransactionDto>>, ApiError> {
        let mut conn = state.db.get().map_err(|_| {
            error!("transaction.list: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let (rows, total) = TransactionRepository::list_by_party(&mut conn, party_id, pagination)?;

        Ok(ApiResponse::ok_paged(
            "Transactions",
            rows.into_iter().map(TransactionDto::from).collect(),
            Meta::new(pagination, total),
        ))
    }

    fn fetch_with_timeline(
        conn: &mut SqliteConnection,
        transaction_id: Uuid,
    ) -> Result<TransactionWithTimelineDto, ApiError> {
        let tx: Transaction = TransactionRepository::find_by_id(conn, transaction_id)?;
        let timeline = TransactionRepository::timeline_for(conn, transaction_id)?;
        Ok(TransactionWithTimelineDto {
            transaction: TransactionDto::from(tx),
            timeline: timeline.into_iter().map(TimelineDto::from).collect(),
        })
    }
}
