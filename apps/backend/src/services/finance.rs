//! Income/expense bookkeeping: transaction rules, month filters and the
//! yearly summary.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Date, Month};

use super::{add_amount, net_amount, optional_text, positive_amount, required_text};
use crate::entities::transactions::{Model as Transaction, TransactionKind};
use crate::error::AppError;
use crate::repos::transactions::{self, DateRange, NewTransaction, TransactionChanges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyRow {
    pub month: u8,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

impl Totals {
    /// Errors rather than wrapping when a sum leaves the `i64` range.
    pub fn from_amounts<I>(amounts: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (TransactionKind, i64)>,
    {
        let mut totals = Totals::default();
        for (kind, amount) in amounts {
            match kind {
                TransactionKind::Income => totals.income = add_amount(totals.income, amount)?,
                TransactionKind::Expense => totals.expense = add_amount(totals.expense, amount)?,
            }
        }
        totals.balance = net_amount(totals.income, totals.expense)?;
        Ok(totals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub months: Vec<MonthlyRow>,
    pub totals: Totals,
}

/// Twelve rows, January first, with rows outside `year` ignored.
pub fn summarize_by_month(year: i32, rows: &[Transaction]) -> Result<YearSummary, AppError> {
    let mut months: Vec<MonthlyRow> = (1..=12)
        .map(|month| MonthlyRow {
            month,
            income: 0,
            expense: 0,
            balance: 0,
        })
        .collect();

    for row in rows.iter().filter(|r| r.transaction_date.year() == year) {
        let slot = &mut months[usize::from(u8::from(row.transaction_date.month())) - 1];
        match row.kind {
            TransactionKind::Income => slot.income = add_amount(slot.income, row.amount)?,
            TransactionKind::Expense => slot.expense = add_amount(slot.expense, row.amount)?,
        }
    }
    for slot in &mut months {
        slot.balance = net_amount(slot.income, slot.expense)?;
    }

    let totals = Totals::from_amounts(
        months
            .iter()
            .flat_map(|m| [(TransactionKind::Income, m.income), (TransactionKind::Expense, m.expense)]),
    )?;

    Ok(YearSummary {
        year,
        months,
        totals,
    })
}

fn first_of(year: i32, month: Month) -> Result<Date, AppError> {
    Date::from_calendar_date(year, month, 1)
        .map_err(|_| AppError::invalid(format!("Year {year} is out of range")))
}

/// `[Jan 1 of year, Jan 1 of year + 1)`.
pub fn year_range(year: i32) -> Result<DateRange, AppError> {
    Ok(DateRange {
        from: first_of(year, Month::January)?,
        until: first_of(year + 1, Month::January)?,
    })
}

/// Parse `YYYY-MM` into the month's half-open date range.
pub fn month_range(raw: &str) -> Result<DateRange, AppError> {
    let invalid = || AppError::invalid("Month must be formatted as YYYY-MM");

    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;

    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        m => (year, m.next()),
    };
    Ok(DateRange {
        from: first_of(year, month)?,
        until: first_of(next_year, next_month)?,
    })
}

pub struct CreateTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: i64,
    pub description: Option<String>,
    pub transaction_date: Date,
}

#[derive(Default)]
pub struct UpdateTransaction {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub amount: Option<i64>,
    pub description: Option<Option<String>>,
    pub transaction_date: Option<Date>,
}

pub async fn create_transaction<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    created_by: i64,
    input: CreateTransaction,
) -> Result<Transaction, AppError> {
    transactions::create(
        conn,
        NewTransaction {
            kind: input.kind,
            category: required_text("Category", &input.category)?,
            amount: positive_amount(input.amount)?,
            description: optional_text(input.description),
            transaction_date: input.transaction_date,
            created_by: Some(created_by),
        },
    )
    .await
}

pub async fn update_transaction<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    input: UpdateTransaction,
) -> Result<Transaction, AppError> {
    let changes = TransactionChanges {
        kind: input.kind,
        category: input
            .category
            .as_deref()
            .map(|c| required_text("Category", c))
            .transpose()?,
        amount: input.amount.map(positive_amount).transpose()?,
        description: input.description.map(optional_text),
        transaction_date: input.transaction_date,
    };

    let existing = transactions::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    transactions::update(conn, existing, changes).await
}

pub async fn delete_transaction<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), AppError> {
    if !transactions::delete(conn, id).await? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(())
}

pub async fn year_summary<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    year: i32,
) -> Result<YearSummary, AppError> {
    let rows = transactions::in_range(conn, year_range(year)?).await?;
    summarize_by_month(year, &rows)
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::OffsetDateTime;

    use super::*;

    fn tx(kind: TransactionKind, amount: i64, on: Date) -> Transaction {
        let now = OffsetDateTime::now_utc();
        Transaction {
            id: 0,
            kind,
            category: "Infaq".into(),
            amount,
            description: None,
            transaction_date: on,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_has_twelve_months() {
        let summary = summarize_by_month(2025, &[]).unwrap();
        assert_eq!(summary.months.len(), 12);
        assert_eq!(summary.months[0].month, 1);
        assert_eq!(summary.months[11].month, 12);
        assert_eq!(summary.totals, Totals::default());
    }

    #[test]
    fn summary_buckets_by_month_and_year() {
        let rows = [
            tx(TransactionKind::Income, 1_000_000, date!(2025-01-05)),
            tx(TransactionKind::Income, 500_000, date!(2025-01-31)),
            tx(TransactionKind::Expense, 300_000, date!(2025-01-20)),
            tx(TransactionKind::Expense, 200_000, date!(2025-12-31)),
            tx(TransactionKind::Income, 9_999_999, date!(2024-12-31)),
        ];
        let summary = summarize_by_month(2025, &rows).unwrap();

        assert_eq!(
            summary.months[0],
            MonthlyRow {
                month: 1,
                income: 1_500_000,
                expense: 300_000,
                balance: 1_200_000
            }
        );
        assert_eq!(summary.months[11].balance, -200_000);
        assert_eq!(
            summary.totals,
            Totals {
                income: 1_500_000,
                expense: 500_000,
                balance: 1_000_000
            }
        );
    }

    #[test]
    fn oversized_sums_fail_instead_of_wrapping() {
        let half = i64::MAX / 2 + 1;
        let rows = [
            tx(TransactionKind::Income, half, date!(2025-04-01)),
            tx(TransactionKind::Income, half, date!(2025-04-02)),
        ];
        let err = summarize_by_month(2025, &rows).unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));

        let err = Totals::from_amounts([
            (TransactionKind::Expense, half),
            (TransactionKind::Expense, half),
        ])
        .unwrap_err();
        assert!(err.status().is_server_error());
    }

    #[tokio::test]
    async fn oversized_amounts_are_rejected_on_write() {
        let input = CreateTransaction {
            kind: TransactionKind::Income,
            category: "Infaq".into(),
            amount: i64::MAX / 2 + 1,
            description: None,
            transaction_date: date!(2025-04-01),
        };
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let err = create_transaction(&db, 1, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn month_ranges() {
        let jan = month_range("2025-01").unwrap();
        assert_eq!(jan.from, date!(2025-01-01));
        assert_eq!(jan.until, date!(2025-02-01));

        let dec = month_range("2024-12").unwrap();
        assert_eq!(dec.until, date!(2025-01-01));

        for bad in ["2025-13", "2025-00", "2025-1", "25-01", "januari", ""] {
            assert!(month_range(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn year_range_is_half_open() {
        let range = year_range(2025).unwrap();
        assert_eq!(range.from, date!(2025-01-01));
        assert_eq!(range.until, date!(2026-01-01));
    }
}
