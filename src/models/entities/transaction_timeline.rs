use crate::models::entities::enum_types::TimelineEvent;
use crate::models::entities::ids::DbUuid;
use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable};
use serde::Serialize;

/// Append-only audit trail; one row per state transition, never updated.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::transaction_timelines)]
#[diesel(belongs_to(crate::models::entities::transaction::Transaction))]
pub struct TransactionTimeline {
    pub id: DbUuid,
    pub transaction_id: DbUuid,
    pub name: TimelineEvent,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transaction_timelines)]
pub struct NewTransactionTimeline {
    pub id: DbUuid,
    pub transaction_id: DbUuid,
    pub name: TimelineEvent,
    // Set explicitly; sub-second precision keeps same-second transitions
    // ordered.
    pub created_at: NaiveDateTime,
}
