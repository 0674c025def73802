//! `SeaORM` Entity for ledger_entries table.
//!
//! Entries are append-only. A database trigger rejects UPDATE and DELETE;
//! `ActiveModelBehavior::before_save` rejects updates at the ORM layer as
//! well so no code path can reach the trigger by accident.

use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub entry_type: EntryType,
    /// Signed amount: positive for credit increases, negative for charge sales.
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub credit_request_id: Option<Uuid>,
    pub phone_number_id: Option<Uuid>,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sellers::Entity",
        from = "Column::SellerId",
        to = "super::sellers::Column::Id"
    )]
    Sellers,
    #[sea_orm(
        belongs_to = "super::credit_requests::Entity",
        from = "Column::CreditRequestId",
        to = "super::credit_requests::Column::Id"
    )]
    CreditRequests,
    #[sea_orm(
        belongs_to = "super::phone_numbers::Entity",
        from = "Column::PhoneNumberId",
        to = "super::phone_numbers::Column::Id"
    )]
    PhoneNumbers,
}

impl Related<super::sellers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sellers.def()
    }
}

impl Related<super::credit_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditRequests.def()
    }
}

impl Related<super::phone_numbers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhoneNumbers.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            Ok(self)
        } else {
            Err(DbErr::Custom(
                "ledger entries are append-only and cannot be updated".to_string(),
            ))
        }
    }
}
