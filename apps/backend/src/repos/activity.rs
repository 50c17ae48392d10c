//! Admin activity log.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{activity_logs, users};
use crate::error::AppError;
use crate::http::pagination::Pagination;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: Option<i64>,
    pub action: &'static str,
    pub entity: &'static str,
    pub entity_id: Option<i64>,
    pub detail: Option<String>,
}

/// A log row with the acting user's display name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub log: activity_logs::Model,
    pub user_name: Option<String>,
}

pub async fn record<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    entry: NewActivity,
) -> Result<(), AppError> {
    let active = activity_logs::ActiveModel {
        id: NotSet,
        user_id: Set(entry.user_id),
        action: Set(entry.action.to_string()),
        entity: Set(entry.entity.to_string()),
        entity_id: Set(entry.entity_id),
        detail: Set(entry.detail),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    activity_logs::Entity::insert(active)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: &Pagination,
) -> Result<(Vec<ActivityEntry>, u64), AppError> {
    let query = activity_logs::Entity::find();
    let total = query.clone().count(conn).await?;
    let logs = query
        .order_by_desc(activity_logs::Column::CreatedAt)
        .order_by_desc(activity_logs::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;

    let mut user_ids: Vec<i64> = logs.iter().filter_map(|l| l.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let names: HashMap<i64, String> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect()
    };

    let entries = logs
        .into_iter()
        .map(|log| ActivityEntry {
            user_name: log.user_id.and_then(|id| names.get(&id).cloned()),
            log,
        })
        .collect();

    Ok((entries, total))
}
