use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "VERIFIED")]
    Verified,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "program_id")]
    pub program_id: Option<i64>,
    #[sea_orm(column_name = "donor_name")]
    pub donor_name: String,
    #[sea_orm(column_name = "donor_email")]
    pub donor_email: Option<String>,
    #[sea_orm(column_name = "donor_phone")]
    pub donor_phone: Option<String>,
    pub amount: i64,
    #[sea_orm(column_name = "payment_method")]
    pub payment_method: String,
    pub status: DonationStatus,
    #[sea_orm(column_name = "is_anonymous")]
    pub is_anonymous: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    #[sea_orm(column_name = "verified_by")]
    pub verified_by: Option<i64>,
    #[sea_orm(column_name = "verified_at")]
    pub verified_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donation_programs::Entity",
        from = "Column::ProgramId",
        to = "super::donation_programs::Column::Id",
        on_delete = "SetNull"
    )]
    Program,
}

impl Related<super::donation_programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
