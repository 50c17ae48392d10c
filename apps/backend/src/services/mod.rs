//! Business rules on top of the repositories. Routes stay thin; everything
//! that decides *whether* something may happen lives here.

use crate::error::AppError;

pub mod auth;
pub mod bootstrap;
pub mod dashboard;
pub mod donations;
pub mod finance;
pub mod jobs;
pub mod news;
pub mod users;

/// Trimmed, non-empty text or a validation error naming `field`.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Trimmed text, with blank collapsing to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Largest single amount accepted on any write. Keeps sums over many rows
/// far away from `i64::MAX`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

pub(crate) fn positive_amount(amount: i64) -> Result<i64, AppError> {
    if amount <= 0 {
        return Err(AppError::invalid("Amount must be greater than zero"));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::invalid(format!(
            "Amount must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(amount)
}

/// `total + amount`, failing instead of wrapping.
pub(crate) fn add_amount(total: i64, amount: i64) -> Result<i64, AppError> {
    total
        .checked_add(amount)
        .ok_or_else(|| AppError::internal("amount total overflowed"))
}

/// `income - expense`, failing instead of wrapping.
pub(crate) fn net_amount(income: i64, expense: i64) -> Result<i64, AppError> {
    income
        .checked_sub(expense)
        .ok_or_else(|| AppError::internal("amount balance overflowed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_helpers() {
        assert_eq!(required_text("Title", "  Jumat  ").unwrap(), "Jumat");
        assert!(required_text("Title", "   ").is_err());
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" x ".into())), Some("x".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(positive_amount(50_000).unwrap(), 50_000);
        assert!(positive_amount(0).is_err());
        assert!(positive_amount(-1).is_err());
        assert_eq!(positive_amount(MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(positive_amount(MAX_AMOUNT + 1).is_err());
        assert!(positive_amount(i64::MAX / 2 + 1).is_err());
    }

    #[test]
    fn running_totals_never_wrap() {
        assert_eq!(add_amount(40, 2).unwrap(), 42);
        let err = add_amount(i64::MAX / 2 + 1, i64::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(net_amount(10, 25).unwrap(), -15);
        assert!(net_amount(i64::MIN, 1).is_err());
    }
}
