mod common;

use common::fixtures;
use paylock::error::ApiError;
use paylock::models::dtos::bank_dto::AddBankAccountRequest;
use paylock::models::dtos::response::Pagination;
use paylock::services::bank_account_service::BankAccountService;
use uuid::Uuid;

fn request(bank_name: &str, account_number: &str) -> AddBankAccountRequest {
    AddBankAccountRequest {
        bank_name: bank_name.to_string(),
        account_name: "Ada Obi".to_string(),
        account_number: account_number.to_string(),
        bvn: "12345678901".to_string(),
    }
}

#[tokio::test]
async fn add_bank_account_returns_details_without_bvn() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let account =
        BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "0123456789"))
            .await
            .unwrap();

    assert_eq!(account.wallet_id, wallet_id);
    assert_eq!(account.bank_name, "GTBank");
    assert_eq!(account.account_number, "0123456789");

    let serialized = serde_json::to_value(&account).unwrap();
    assert!(serialized.get("bvn").is_none());
}

#[tokio::test]
async fn add_bank_account_rejects_bad_account_number() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let err =
        BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "12345"))
            .await
            .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err =
        BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "01234567ab"))
            .await
            .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn add_bank_account_requires_existing_wallet() {
    let ctx = common::test_context();

    let err = BankAccountService::add_bank_account(
        &ctx.state,
        Uuid::new_v4(),
        request("GTBank", "0123456789"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_bank_account_is_a_conflict() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "0123456789"))
        .await
        .unwrap();

    let err =
        BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "0123456789"))
            .await
            .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // Same number at a different bank is a distinct account.
    BankAccountService::add_bank_account(&ctx.state, wallet_id, request("UBA", "0123456789"))
        .await
        .unwrap();
}

#[tokio::test]
async fn list_bank_accounts_paginates_with_totals() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    for i in 0..6 {
        BankAccountService::add_bank_account(
            &ctx.state,
            wallet_id,
            request("GTBank", &format!("012345678{i}")),
        )
        .await
        .unwrap();
    }

    let page = BankAccountService::list_bank_accounts(&ctx.state, wallet_id, Pagination::new(1, 3))
        .await
        .unwrap();
    assert_eq!(page.data.unwrap().len(), 3);
    let meta = page.meta.unwrap();
    assert_eq!(meta.total, 6);
    assert_eq!(meta.total_pages, 2);

    let last = BankAccountService::list_bank_accounts(&ctx.state, wallet_id, Pagination::new(2, 3))
        .await
        .unwrap();
    assert_eq!(last.data.unwrap().len(), 3);
}

#[tokio::test]
async fn deleted_bank_account_disappears_and_can_be_re_added() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let account =
        BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "0123456789"))
            .await
            .unwrap();

    BankAccountService::delete_bank_account(&ctx.state, wallet_id, account.id)
        .await
        .unwrap();

    let page =
        BankAccountService::list_bank_accounts(&ctx.state, wallet_id, Pagination::default())
            .await
            .unwrap();
    assert_eq!(page.meta.unwrap().total, 0);

    // Soft delete frees the slot for re-registration.
    BankAccountService::add_bank_account(&ctx.state, wallet_id, request("GTBank", "0123456789"))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_unknown_bank_account_is_not_found() {
    let ctx = common::test_context();
    let wallet_id = fixtures::create_wallet(&ctx.state, &fixtures::owner_id());

    let err = BankAccountService::delete_bank_account(&ctx.state, wallet_id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
