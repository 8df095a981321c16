use paylock::models::app_state::AppState;
use paylock::models::dtos::transaction_dto::CreateTransactionRequest;
use paylock::models::entities::enum_types::{
    AccountType, HistoryStatus, Party, TransactionType,
};
use paylock::models::entities::transaction::{
    ChargeConfiguration, ProductDetail, ProductDetails,
};
use paylock::repositories::wallet_repository::WalletRepository;
use uuid::Uuid;

pub fn owner_id() -> String {
    format!("user-{}", Uuid::new_v4())
}

pub fn create_wallet(state: &AppState, owner: &str) -> Uuid {
    let mut conn = state.db.get().expect("db connection");
    WalletRepository::create_if_not_exists(&mut conn, owner, AccountType::User)
        .expect("wallet creation")
        .id
        .into()
}

/// Settled funds straight into the wallet: a deposit intent confirmed
/// through the same path the webhook uses.
pub fn fund_wallet(state: &AppState, wallet_id: Uuid, amount: i64) -> Uuid {
    let mut conn = state.db.get().expect("db connection");
    let reference = Uuid::new_v4();
    let entry = WalletRepository::deposit_intent(&mut conn, wallet_id, amount, reference)
        .expect("deposit intent");
    WalletRepository::settle_deposit(&mut conn, entry.id.into(), HistoryStatus::Successful)
        .expect("deposit settlement");
    reference
}

pub fn product_details(price: i64, quantity: i64) -> ProductDetails {
    ProductDetails(vec![ProductDetail {
        name: "Mechanical keyboard".to_string(),
        quantity,
        description: "Hot-swappable, 75%".to_string(),
        price,
    }])
}

/// One 100_000-kobo product, 5% buyer / 10% seller charge split:
/// total_cost 105_000, receivable_amount 90_000.
pub fn seller_created_request(seller: &str) -> CreateTransactionRequest {
    CreateTransactionRequest {
        transaction_type: TransactionType::Product,
        created_by: Party::Seller,
        buyer_id: None,
        seller_id: Some(seller.to_string()),
        delivery_duration: 7,
        currency: "NGN".to_string(),
        charge_configuration: ChargeConfiguration {
            buyer_charges: 5,
            seller_charges: 10,
        },
        product_details: product_details(100_000, 1),
    }
}
