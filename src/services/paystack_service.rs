use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::dtos::paystack::PaystackWebhook;
use crate::models::entities::enum_types::HistoryStatus;
use crate::repositories::wallet_repository::WalletRepository;
use crate::services::with_version_retry;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct PaystackService;

impl PaystackService {
    /// Reconciliation entry point for gateway confirmation events. Gateways
    /// retry webhook delivery, so settlement must be idempotent per
    /// reference: a row already in a terminal state makes the event a
    /// duplicate and a no-op success.
    pub async fn handle_event(state: &AppState, payload: &PaystackWebhook) -> Result<(), ApiError> {
        let outcome = match payload.event.as_str() {
            "charge.success" => HistoryStatus::Successful,
            "charge.failed" | "charge.reversed" => HistoryStatus::Canceled,
            other => {
                info!(event = other, "paystack.webhook: ignoring event");
                return Ok(());
            }
        };

        let reference = Uuid::parse_str(&payload.data.reference)
            .map_err(|_| ApiError::InvalidArgument("Invalid transaction reference".into()))?;

        let mut conn = state.db.get().map_err(|_| {
            error!("paystack.webhook: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let entry = WalletRepository::find_history_by_reference(&mut conn, reference)?
            .ok_or_else(|| {
                // Misrouted or forged event; logged, never retried.
                warn!(%reference, "paystack.webhook: no pending entry for reference");
                ApiError::NotFound("No deposit found for reference".into())
            })?;

        if entry.status.is_terminal() {
            info!(%reference, status = %entry.status, "paystack.webhook: duplicate delivery");
            return Ok(());
        }

        if outcome == HistoryStatus::Successful {
            let event_amount: i64 = payload.data.amount.parse().map_err(|_| {
                ApiError::InvalidArgument("Invalid amount in webhook payload".into())
            })?;
            if event_amount != entry.amount {
                // Held Pending for manual review; the gateway keeps retrying
                // until the discrepancy is resolved.
                error!(
                    %reference,
                    expected = entry.amount,
                    received = event_amount,
                    "paystack.webhook: amount mismatch, entry held pending"
                );
                return Err(ApiError::AmountMismatch(
                    "Webhook amount does not match pending deposit".into(),
                ));
            }
        }

        let entry_id = entry.id.into();
        let settled = with_version_retry("paystack.webhook.settle", || {
            WalletRepository::settle_deposit(&mut conn, entry_id, outcome)
        })
        .await;

        match settled {
            Ok(entry) => {
                info!(%reference, status = %entry.status, "paystack.webhook: settled");
                Ok(())
            }
            // Lost the race to another delivery of the same event.
            Err(ApiError::AlreadySettled(msg)) => {
                info!(%reference, "paystack.webhook: {}", msg);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn verify_signature(
        secret: &str,
        payload: &[u8],
        actual_signature: &str,
    ) -> Result<(), ApiError> {
        use hmac::{Hmac, Mac};
        use sha2::Sha512;
        use subtle::ConstantTimeEq;

        type HmacSha512 = Hmac<Sha512>;

        let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
            .map_err(|_| ApiError::Internal("Invalid webhook secret".into()))?;

        mac.update(payload);
        let expected = hex::encode(mac.finalize().into_bytes());

        if expected
            .as_bytes()
            .ct_eq(actual_signature.as_bytes())
            .unwrap_u8()
            != 1
        {
            return Err(ApiError::InvalidArgument("Invalid Paystack signature".into()));
        }

        Ok(())
    }
}
