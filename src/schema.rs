diesel::table! {
    use diesel::sql_types::*;
    use crate::models::entities::enum_types::AccountTypeMapping;

    wallets (id) {
        id -> Text,
        identifier -> Text,
        account_type -> AccountTypeMapping,
        balance -> BigInt,
        receivable_balance -> BigInt,
        payable_balance -> BigInt,
        version -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::models::entities::enum_types::{HistoryStatusMapping, HistoryTypeMapping};

    wallet_history (id) {
        id -> Text,
        wallet_id -> Text,
        history_type -> HistoryTypeMapping,
        amount -> BigInt,
        status -> HistoryStatusMapping,
        reference -> Text,
        version -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    bank_accounts (id) {
        id -> Text,
        wallet_id -> Text,
        bank_name -> Text,
        account_name -> Text,
        account_number -> Text,
        bvn -> Text,
        version -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::models::entities::enum_types::{
        PartyMapping, TransactionStatusMapping, TransactionTypeMapping,
    };

    transactions (id) {
        id -> Text,
        status -> TransactionStatusMapping,
        transaction_type -> TransactionTypeMapping,
        created_by -> PartyMapping,
        buyer_id -> Nullable<Text>,
        seller_id -> Nullable<Text>,
        delivery_duration -> Integer,
        currency -> Text,
        buyer_charges -> BigInt,
        seller_charges -> BigInt,
        product_details -> Text,
        total_amount -> BigInt,
        buyer_charge -> BigInt,
        seller_charge -> BigInt,
        total_cost -> BigInt,
        receivable_amount -> BigInt,
        version -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::models::entities::enum_types::TimelineEventMapping;

    transaction_timelines (id) {
        id -> Text,
        transaction_id -> Text,
        name -> TimelineEventMapping,
        created_at -> Timestamp,
    }
}

diesel::joinable!(wallet_history -> wallets (wallet_id));
diesel::joinable!(bank_accounts -> wallets (wallet_id));
diesel::joinable!(transaction_timelines -> transactions (transaction_id));

diesel::allow_tables_to_appear_in_same_query!(
    wallets,
    wallet_history,
    bank_accounts,
    transactions,
    transaction_timelines,
);
