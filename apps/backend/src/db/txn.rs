use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};

use crate::error::AppError;

/// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
///
/// ```ignore
/// with_txn(db, move |txn| Box::pin(async move { repo::do_work(txn, input).await })).await
/// ```
pub async fn with_txn<T, F>(db: &DatabaseConnection, f: F) -> Result<T, AppError>
where
    T: Send,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>
        + Send,
{
    db.transaction::<F, T, AppError>(f)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => AppError::from(db_err),
            TransactionError::Transaction(app_err) => app_err,
        })
}
