//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::ExpenseStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub owner_user_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_amount: Decimal,
    pub original_currency_code: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub base_currency_amount: Decimal,
    pub base_currency_code: String,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub expense_date: Date,
    pub ocr_confidence: Option<i16>,
    /// JSON array of role names.
    #[sea_orm(column_type = "JsonBinary")]
    pub approval_chain: Json,
    pub status: ExpenseStatus,
    pub submitted_at: DateTimeUtc,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub approval_comments: Option<String>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerUserId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
