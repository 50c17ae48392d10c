use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::{Date, OffsetDateTime};

use crate::entities::transactions::{self, TransactionKind};
use crate::error::AppError;
use crate::http::pagination::Pagination;

pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: i64,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_by: Option<i64>,
}

#[derive(Default)]
pub struct TransactionChanges {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub amount: Option<i64>,
    pub description: Option<Option<String>>,
    pub transaction_date: Option<Date>,
}

/// Half-open date range `[from, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Date,
    pub until: Date,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: Option<TransactionKind>,
    range: Option<DateRange>,
    page: &Pagination,
) -> Result<(Vec<transactions::Model>, u64), AppError> {
    let mut query = transactions::Entity::find();
    if let Some(kind) = kind {
        query = query.filter(transactions::Column::Kind.eq(kind));
    }
    if let Some(range) = range {
        query = query
            .filter(transactions::Column::TransactionDate.gte(range.from))
            .filter(transactions::Column::TransactionDate.lt(range.until));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(transactions::Column::TransactionDate)
        .order_by_desc(transactions::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

/// Every transaction in `range`, unpaginated, for aggregation.
pub async fn in_range<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    range: DateRange,
) -> Result<Vec<transactions::Model>, AppError> {
    Ok(transactions::Entity::find()
        .filter(transactions::Column::TransactionDate.gte(range.from))
        .filter(transactions::Column::TransactionDate.lt(range.until))
        .order_by_asc(transactions::Column::TransactionDate)
        .all(conn)
        .await?)
}

/// (kind, amount) for every transaction ever recorded.
pub async fn all_amounts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(TransactionKind, i64)>, AppError> {
    Ok(transactions::Entity::find()
        .select_only()
        .column(transactions::Column::Kind)
        .column(transactions::Column::Amount)
        .into_tuple::<(TransactionKind, i64)>()
        .all(conn)
        .await?)
}

pub async fn recent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    count: u64,
) -> Result<Vec<transactions::Model>, AppError> {
    Ok(transactions::Entity::find()
        .order_by_desc(transactions::Column::TransactionDate)
        .order_by_desc(transactions::Column::Id)
        .limit(count)
        .all(conn)
        .await?)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<transactions::Model>, AppError> {
    Ok(transactions::Entity::find_by_id(id).one(conn).await?)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewTransaction,
) -> Result<transactions::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = transactions::ActiveModel {
        id: NotSet,
        kind: Set(new.kind),
        category: Set(new.category),
        amount: Set(new.amount),
        description: Set(new.description),
        transaction_date: Set(new.transaction_date),
        created_by: Set(new.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: transactions::Model,
    changes: TransactionChanges,
) -> Result<transactions::Model, AppError> {
    let mut active: transactions::ActiveModel = existing.into();
    if let Some(kind) = changes.kind {
        active.kind = Set(kind);
    }
    if let Some(category) = changes.category {
        active.category = Set(category);
    }
    if let Some(amount) = changes.amount {
        active.amount = Set(amount);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(date) = changes.transaction_date {
        active.transaction_date = Set(date);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, AppError> {
    let result = transactions::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
