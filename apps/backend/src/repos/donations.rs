use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::donations::{self, DonationStatus};
use crate::error::AppError;
use crate::http::pagination::Pagination;

pub struct NewDonation {
    pub program_id: Option<i64>,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub is_anonymous: bool,
    pub message: Option<String>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewDonation,
) -> Result<donations::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = donations::ActiveModel {
        id: NotSet,
        program_id: Set(new.program_id),
        donor_name: Set(new.donor_name),
        donor_email: Set(new.donor_email),
        donor_phone: Set(new.donor_phone),
        amount: Set(new.amount),
        payment_method: Set(new.payment_method),
        status: Set(DonationStatus::Pending),
        is_anonymous: Set(new.is_anonymous),
        message: Set(new.message),
        verified_by: Set(None),
        verified_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: Option<DonationStatus>,
    program_id: Option<i64>,
    page: &Pagination,
) -> Result<(Vec<donations::Model>, u64), AppError> {
    let mut query = donations::Entity::find();
    if let Some(status) = status {
        query = query.filter(donations::Column::Status.eq(status));
    }
    if let Some(program_id) = program_id {
        query = query.filter(donations::Column::ProgramId.eq(program_id));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(donations::Column::CreatedAt)
        .order_by_desc(donations::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<donations::Model>, AppError> {
    Ok(donations::Entity::find_by_id(id).one(conn).await?)
}

/// Same as [`find_by_id`] but takes a row lock for the rest of the
/// transaction, so two reviewers can't both act on a pending donation.
pub async fn find_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<donations::Model>, AppError> {
    Ok(donations::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?)
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: donations::Model,
    status: DonationStatus,
    reviewer_id: i64,
) -> Result<donations::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let mut active: donations::ActiveModel = existing.into();
    active.status = Set(status);
    active.verified_by = Set(Some(reviewer_id));
    active.verified_at = Set(Some(now));
    active.updated_at = Set(now);
    Ok(active.update(conn).await?)
}

pub async fn verified_amounts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<i64>, AppError> {
    Ok(donations::Entity::find()
        .select_only()
        .column(donations::Column::Amount)
        .filter(donations::Column::Status.eq(DonationStatus::Verified))
        .into_tuple::<i64>()
        .all(conn)
        .await?)
}

pub async fn count_pending<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, AppError> {
    Ok(donations::Entity::find()
        .filter(donations::Column::Status.eq(DonationStatus::Pending))
        .count(conn)
        .await?)
}
