mod common;

use common::fixtures;
use paylock::error::ApiError;
use paylock::models::dtos::response::Pagination;
use paylock::models::entities::enum_types::{
    AccountType, HistoryStatus, HistoryType,
};
use paylock::repositories::wallet_repository::WalletRepository;
use paylock::services::wallet_service::WalletService;
use uuid::Uuid;

#[tokio::test]
async fn wallet_creation_is_idempotent_per_owner() {
    let ctx = common::test_context();
    let owner = fixtures::owner_id();

    let first = WalletService::get_or_create_wallet(&ctx.state, &owner, AccountType::User)
        .await
        .unwrap();
    let second = WalletService::get_or_create_wallet(&ctx.state, &owner, AccountType::User)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.balance, 0);
    assert_eq!(first.payable_balance, 0);
    assert_eq!(first.receivable_balance, 0);
}

#[tokio::test]
async fn wallet_creation_rejects_blank_owner() {
    let ctx = common::test_context();

    let err = WalletService::get_or_create_wallet(&ctx.state, "  ", AccountType::User)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn deposit_intent_does_not_touch_balance_until_settled() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let mut conn = ctx.state.db.get().unwrap();
    let entry =
        WalletRepository::deposit_intent(&mut conn, wallet_id, 1_000_000, Uuid::new_v4()).unwrap();
    assert_eq!(entry.status, HistoryStatus::Pending);
    assert_eq!(entry.amount, 1_000_000);

    let wallet = WalletRepository::find_by_id(&mut conn, wallet_id).unwrap();
    assert_eq!(wallet.balance, 0);

    let settled =
        WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Successful)
            .unwrap();
    assert_eq!(settled.status, HistoryStatus::Successful);

    let wallet = WalletRepository::find_by_id(&mut conn, wallet_id).unwrap();
    assert_eq!(wallet.balance, 1_000_000);
}

#[tokio::test]
async fn canceled_deposit_never_credits() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let mut conn = ctx.state.db.get().unwrap();
    let entry =
        WalletRepository::deposit_intent(&mut conn, wallet_id, 250_000, Uuid::new_v4()).unwrap();
    WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Canceled).unwrap();

    let wallet = WalletRepository::find_by_id(&mut conn, wallet_id).unwrap();
    assert_eq!(wallet.balance, 0);
}

#[tokio::test]
async fn settlement_is_exactly_once() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let mut conn = ctx.state.db.get().unwrap();
    let entry =
        WalletRepository::deposit_intent(&mut conn, wallet_id, 400_000, Uuid::new_v4()).unwrap();

    WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Successful).unwrap();
    let err = WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Successful)
        .unwrap_err();
    assert!(matches!(err, ApiError::AlreadySettled(_)));

    // Balance credited once, not twice.
    let wallet = WalletRepository::find_by_id(&mut conn, wallet_id).unwrap();
    assert_eq!(wallet.balance, 400_000);
}

#[tokio::test]
async fn settlement_rejects_non_terminal_outcome() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let mut conn = ctx.state.db.get().unwrap();
    let entry =
        WalletRepository::deposit_intent(&mut conn, wallet_id, 1_000, Uuid::new_v4()).unwrap();

    let err = WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Pending)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn balance_lookup_for_unknown_wallet_is_not_found() {
    let ctx = common::test_context();

    let err = WalletService::get_balance(&ctx.state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn history_filters_by_status_and_paginates() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    fixtures::fund_wallet(&ctx.state, wallet_id, 100_000);
    fixtures::fund_wallet(&ctx.state, wallet_id, 200_000);
    {
        let mut conn = ctx.state.db.get().unwrap();
        WalletRepository::deposit_intent(&mut conn, wallet_id, 300_000, Uuid::new_v4()).unwrap();
    }

    let all = WalletService::get_history(&ctx.state, wallet_id, None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.meta.unwrap().total, 3);
    assert!(all.success);

    let pending = WalletService::get_history(
        &ctx.state,
        wallet_id,
        Some(HistoryStatus::Pending),
        Pagination::default(),
    )
    .await
    .unwrap();
    let entries = pending.data.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 300_000);
    assert_eq!(entries[0].history_type, HistoryType::Deposit);

    let page = WalletService::get_history(&ctx.state, wallet_id, None, Pagination::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.data.unwrap().len(), 2);
    assert_eq!(page.meta.unwrap().total_pages, 2);
}

#[tokio::test]
async fn history_for_unknown_wallet_is_not_found() {
    let ctx = common::test_context();

    let err = WalletService::get_history(&ctx.state, Uuid::new_v4(), None, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
