use crate::error::ApiError;
use crate::models::entities::enum_types::{Party, TransactionStatus, TransactionType};
use crate::models::entities::ids::DbUuid;
use chrono::NaiveDateTime;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub name: String,
    pub quantity: i64,
    pub description: String,
    pub price: i64,
}

/// Ordered product list, stored as a JSON TEXT column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(transparent)]
pub struct ProductDetails(pub Vec<ProductDetail>);

impl FromSql<Text, Sqlite> for ProductDetails {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(serde_json::from_str(&s)?)
    }
}

impl ToSql<Text, Sqlite> for ProductDetails {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(serde_json::to_string(self)?);
        Ok(IsNull::No)
    }
}

/// Percentage split of the platform charge between the parties. Whole
/// percent, 0..=100 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeConfiguration {
    pub buyer_charges: i64,
    pub seller_charges: i64,
}

/// Amounts derived from the product list and charge split. Recomputed by
/// `ChargeConfiguration::breakdown`, never hand-maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeBreakdown {
    pub total_amount: i64,
    pub buyer_charge: i64,
    pub seller_charge: i64,
    pub total_cost: i64,
    pub receivable_amount: i64,
}

impl ChargeConfiguration {
    /// total_cost = total_amount + buyer_charge and
    /// receivable_amount = total_amount - seller_charge, with charges taken
    /// as floor(total * pct / 100) in minor units.
    pub fn breakdown(&self, details: &ProductDetails) -> Result<ChargeBreakdown, ApiError> {
        if !(0..=100).contains(&self.buyer_charges) || !(0..=100).contains(&self.seller_charges) {
            return Err(ApiError::InvalidArgument(
                "Charge percentages must be between 0 and 100".into(),
            ));
        }
        if details.0.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Transaction requires at least one product".into(),
            ));
        }

        let mut total_amount: i64 = 0;
        for item in &details.0 {
            if item.price <= 0 || item.quantity <= 0 {
                return Err(ApiError::InvalidArgument(
                    "Product price and quantity must be positive".into(),
                ));
            }
            let line = item
                .price
                .checked_mul(item.quantity)
                .ok_or_else(|| ApiError::InvalidArgument("Product amount overflow".into()))?;
            total_amount = total_amount
                .checked_add(line)
                .ok_or_else(|| ApiError::InvalidArgument("Transaction amount overflow".into()))?;
        }

        let buyer_charge = total_amount
            .checked_mul(self.buyer_charges)
            .ok_or_else(|| ApiError::InvalidArgument("Charge amount overflow".into()))?
            / 100;
        let seller_charge = total_amount
            .checked_mul(self.seller_charges)
            .ok_or_else(|| ApiError::InvalidArgument("Charge amount overflow".into()))?
            / 100;
        let total_cost = total_amount
            .checked_add(buyer_charge)
            .ok_or_else(|| ApiError::InvalidArgument("Transaction amount overflow".into()))?;

        Ok(ChargeBreakdown {
            total_amount,
            buyer_charge,
            seller_charge,
            total_cost,
            receivable_amount: total_amount - seller_charge,
        })
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::transactions)]
pub struct Transaction {
    pub id: DbUuid,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
    pub created_by: Party,
    pub buyer_id: Option<String>,
    pub seller_id: Option<String>,
    pub delivery_duration: i32,
    pub currency: String,
    pub buyer_charges: i64,
    pub seller_charges: i64,
    pub product_details: ProductDetails,
    pub total_amount: i64,
    pub buyer_charge: i64,
    pub seller_charge: i64,
    pub total_cost: i64,
    pub receivable_amount: i64,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Transaction {
    pub fn charge_configuration(&self) -> ChargeConfiguration {
        ChargeConfiguration {
            buyer_charges: self.buyer_charges,
            seller_charges: self.seller_charges,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction<'a> {
    pub id: DbUuid,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
    pub created_by: Party,
    pub buyer_id: Option<&'a str>,
    pub seller_id: Option<&'a str>,
    pub delivery_duration: i32,
    pub currency: &'a str,
    pub buyer_charges: i64,
    pub seller_charges: i64,
    pub product_details: &'a ProductDetails,
    pub total_amount: i64,
    pub buyer_charge: i64,
    pub seller_charge: i64,
    pub total_cost: i64,
    pub receivable_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(items: &[(i64, i64)]) -> ProductDetails {
        ProductDetails(
            items
                .iter()
                .map(|(price, quantity)| ProductDetail {
                    name: "item".into(),
                    quantity: *quantity,
                    description: "".into(),
                    price: *price,
                })
                .collect(),
        )
    }

    #[test]
    fn breakdown_sums_lines_and_splits_charges() {
        let cfg = ChargeConfiguration {
            buyer_charges: 5,
            seller_charges: 10,
        };
        let b = cfg.breakdown(&details(&[(100_000, 2), (50_000, 1)])).unwrap();
        assert_eq!(b.total_amount, 250_000);
        assert_eq!(b.buyer_charge, 12_500);
        assert_eq!(b.seller_charge, 25_000);
        assert_eq!(b.total_cost, b.total_amount + b.buyer_charge);
        assert_eq!(b.receivable_amount, b.total_amount - b.seller_charge);
    }

    #[test]
    fn breakdown_invariant_holds_across_charge_range() {
        let d = details(&[(33_333, 3)]);
        for buyer in [0, 1, 50, 99, 100] {
            for seller in [0, 1, 50, 99, 100] {
                let cfg = ChargeConfiguration {
                    buyer_charges: buyer,
                    seller_charges: seller,
                };
                let b = cfg.breakdown(&d).unwrap();
                assert_eq!(b.total_cost, b.total_amount + b.buyer_charge);
                assert_eq!(b.receivable_amount, b.total_amount - b.seller_charge);
            }
        }
    }

    #[test]
    fn breakdown_rejects_out_of_range_percentages() {
        let d = details(&[(1_000, 1)]);
        for cfg in [
            ChargeConfiguration { buyer_charges: 101, seller_charges: 0 },
            ChargeConfiguration { buyer_charges: 0, seller_charges: -1 },
        ] {
            assert!(matches!(
                cfg.breakdown(&d),
                Err(ApiError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn breakdown_rejects_empty_and_non_positive_lines() {
        let cfg = ChargeConfiguration {
            buyer_charges: 0,
            seller_charges: 0,
        };
        assert!(cfg.breakdown(&ProductDetails(vec![])).is_err());
        assert!(cfg.breakdown(&details(&[(0, 1)])).is_err());
        assert!(cfg.breakdown(&details(&[(1_000, 0)])).is_err());
    }

    #[test]
    fn breakdown_rejects_totals_that_overflow_the_charge_multiply() {
        // The line items pass the checked sum but the percentage multiply
        // would wrap.
        let d = details(&[(i64::MAX, 1)]);
        let cfg = ChargeConfiguration {
            buyer_charges: 5,
            seller_charges: 10,
        };
        assert!(matches!(
            cfg.breakdown(&d),
            Err(ApiError::InvalidArgument(_))
        ));

        // A 1% charge survives the multiply; total_cost must still be caught.
        let cfg = ChargeConfiguration {
            buyer_charges: 1,
            seller_charges: 0,
        };
        assert!(matches!(
            cfg.breakdown(&d),
            Err(ApiError::InvalidArgument(_))
        ));

        // Zero charges on a maximal total stay representable.
        let cfg = ChargeConfiguration {
            buyer_charges: 0,
            seller_charges: 0,
        };
        let b = cfg.breakdown(&d).unwrap();
        assert_eq!(b.total_cost, i64::MAX);
        assert_eq!(b.receivable_amount, i64::MAX);
    }

    #[test]
    fn product_details_round_trip_json() {
        let d = details(&[(100, 2)]);
        let json = serde_json::to_string(&d).unwrap();
        let back: ProductDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
