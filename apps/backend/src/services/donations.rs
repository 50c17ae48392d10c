//! Donation programs and donations: progress math, intake validation and
//! the verify/reject review step.

use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::Date;
use tracing::info;

use super::{optional_text, positive_amount, required_text};
use crate::db::with_txn;
use crate::entities::donation_programs::Model as DonationProgram;
use crate::entities::donations::{DonationStatus, Model as Donation};
use crate::error::AppError;
use crate::repos::donation_programs::{self, NewProgram, ProgramChanges};
use crate::repos::donations::{self, NewDonation};
use crate::utils::slug::{slugify, unique_slug};

const ANONYMOUS_DONOR: &str = "Anonymous";

/// `collected / target` as a percentage with two decimals, capped at 100.
/// A program without a positive target reports 0.
pub fn progress_percent(collected: i64, target: i64) -> f64 {
    if target <= 0 || collected <= 0 {
        return 0.0;
    }
    let raw = collected as f64 / target as f64 * 100.0;
    ((raw * 100.0).round() / 100.0).min(100.0)
}

pub struct CreateProgram {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub target_amount: i64,
    pub is_active: bool,
    pub starts_on: Option<Date>,
    pub ends_on: Option<Date>,
}

#[derive(Default)]
pub struct UpdateProgram {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub target_amount: Option<i64>,
    pub is_active: Option<bool>,
    pub starts_on: Option<Option<Date>>,
    pub ends_on: Option<Option<Date>>,
}

pub struct SubmitDonation {
    pub program_id: Option<i64>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub is_anonymous: bool,
    pub message: Option<String>,
}

fn check_period(starts_on: Option<Date>, ends_on: Option<Date>) -> Result<(), AppError> {
    match (starts_on, ends_on) {
        (Some(start), Some(end)) if end < start => {
            Err(AppError::invalid("End date must not be before start date"))
        }
        _ => Ok(()),
    }
}

async fn unique_program_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    title: &str,
    except: Option<i64>,
) -> Result<String, AppError> {
    let base = slugify(title);
    let taken = donation_programs::slugs_like(conn, &base, except).await?;
    Ok(unique_slug(&base, &taken))
}

pub async fn create_program<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateProgram,
) -> Result<DonationProgram, AppError> {
    let title = required_text("Title", &input.title)?;
    let target_amount = positive_amount(input.target_amount)?;
    check_period(input.starts_on, input.ends_on)?;
    let slug = unique_program_slug(conn, &title, None).await?;

    donation_programs::create(
        conn,
        NewProgram {
            title,
            slug,
            description: optional_text(input.description),
            image_url: optional_text(input.image_url),
            target_amount,
            is_active: input.is_active,
            starts_on: input.starts_on,
            ends_on: input.ends_on,
        },
    )
    .await
}

pub async fn update_program<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    input: UpdateProgram,
) -> Result<DonationProgram, AppError> {
    let existing = donation_programs::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Donation program not found"))?;

    let starts_on = input.starts_on.unwrap_or(existing.starts_on);
    let ends_on = input.ends_on.unwrap_or(existing.ends_on);
    check_period(starts_on, ends_on)?;

    let mut changes = ProgramChanges {
        description: input.description.map(optional_text),
        image_url: input.image_url.map(optional_text),
        target_amount: input.target_amount.map(positive_amount).transpose()?,
        is_active: input.is_active,
        starts_on: input.starts_on,
        ends_on: input.ends_on,
        ..Default::default()
    };
    if let Some(title) = input.title.as_deref() {
        let title = required_text("Title", title)?;
        if title != existing.title {
            changes.slug = Some(unique_program_slug(conn, &title, Some(id)).await?);
        }
        changes.title = Some(title);
    }

    donation_programs::update(conn, existing, changes).await
}

pub async fn delete_program<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), AppError> {
    if !donation_programs::delete(conn, id).await? {
        return Err(AppError::not_found("Donation program not found"));
    }
    Ok(())
}

/// Public intake. Always lands as PENDING.
pub async fn submit_donation<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: SubmitDonation,
) -> Result<Donation, AppError> {
    let amount = positive_amount(input.amount)?;
    let payment_method = required_text("Payment method", &input.payment_method)?;
    let donor_name = match optional_text(input.donor_name) {
        Some(name) => name,
        None if input.is_anonymous => ANONYMOUS_DONOR.to_string(),
        None => return Err(AppError::invalid("Donor name is required")),
    };

    if let Some(program_id) = input.program_id {
        let accepting = donation_programs::find_by_id(conn, program_id)
            .await?
            .is_some_and(|p| p.is_active);
        if !accepting {
            return Err(AppError::invalid(
                "Donation program is not accepting donations",
            ));
        }
    }

    donations::create(
        conn,
        NewDonation {
            program_id: input.program_id,
            donor_name,
            donor_email: optional_text(input.donor_email),
            donor_phone: optional_text(input.donor_phone),
            amount,
            payment_method,
            is_anonymous: input.is_anonymous,
            message: optional_text(input.message),
        },
    )
    .await
}

/// Move a PENDING donation to VERIFIED or REJECTED.
///
/// Verification credits the program's collected amount in the same
/// transaction. A donation is reviewed at most once.
pub async fn review_donation(
    db: &DatabaseConnection,
    id: i64,
    status: DonationStatus,
    reviewer_id: i64,
) -> Result<Donation, AppError> {
    if status == DonationStatus::Pending {
        return Err(AppError::invalid("Status must be VERIFIED or REJECTED"));
    }

    let reviewed = with_txn(db, move |txn| {
        Box::pin(async move {
            let existing = donations::find_for_update(txn, id)
                .await?
                .ok_or_else(|| AppError::not_found("Donation not found"))?;
            if existing.status != DonationStatus::Pending {
                return Err(AppError::conflict("Donation has already been reviewed"));
            }

            let credit = existing.program_id.filter(|_| status == DonationStatus::Verified);
            let amount = existing.amount;
            let updated = donations::set_status(txn, existing, status, reviewer_id).await?;
            if let Some(program_id) = credit {
                donation_programs::add_collected(txn, program_id, amount).await?;
            }
            Ok(updated)
        })
    })
    .await?;

    info!(donation_id = id, status = ?status, reviewer_id, "donation reviewed");
    Ok(reviewed)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use time::OffsetDateTime;

    use super::*;

    fn donation(status: DonationStatus, program_id: Option<i64>) -> Donation {
        let now = OffsetDateTime::now_utc();
        Donation {
            id: 11,
            program_id,
            donor_name: "Fulan".into(),
            donor_email: None,
            donor_phone: None,
            amount: 250_000,
            payment_method: "TRANSFER".into(),
            status,
            is_anonymous: false,
            message: None,
            verified_by: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn progress_rounds_and_caps() {
        assert_eq!(progress_percent(0, 1_000), 0.0);
        assert_eq!(progress_percent(500, 1_000), 50.0);
        assert_eq!(progress_percent(1, 3), 33.33);
        assert_eq!(progress_percent(2, 3), 66.67);
        assert_eq!(progress_percent(5_000, 1_000), 100.0);
        assert_eq!(progress_percent(100, 0), 0.0);
        assert_eq!(progress_percent(100, -5), 0.0);
    }

    #[test]
    fn period_must_be_ordered() {
        let start = time::macros::date!(2025-03-01);
        let end = time::macros::date!(2025-02-01);
        assert!(check_period(Some(start), Some(end)).is_err());
        assert!(check_period(Some(end), Some(start)).is_ok());
        assert!(check_period(None, Some(end)).is_ok());
    }

    #[tokio::test]
    async fn verify_credits_program() {
        let mut verified = donation(DonationStatus::Verified, Some(3));
        verified.verified_by = Some(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![donation(DonationStatus::Pending, Some(3))]])
            .append_query_results([vec![verified]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = review_donation(&db, 11, DonationStatus::Verified, 1)
            .await
            .unwrap();
        assert_eq!(result.status, DonationStatus::Verified);
        assert_eq!(result.verified_by, Some(1));
    }

    #[tokio::test]
    async fn second_review_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![donation(DonationStatus::Verified, Some(3))]])
            .into_connection();

        let err = review_donation(&db, 11, DonationStatus::Verified, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn pending_is_not_a_review_outcome() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = review_donation(&db, 11, DonationStatus::Pending, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn donation_needs_positive_amount_and_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let base = || SubmitDonation {
            program_id: None,
            donor_name: Some("Fulan".into()),
            donor_email: None,
            donor_phone: None,
            amount: 10_000,
            payment_method: "QRIS".into(),
            is_anonymous: false,
            message: None,
        };

        let err = submit_donation(&db, SubmitDonation { amount: 0, ..base() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = submit_donation(
            &db,
            SubmitDonation {
                donor_name: None,
                ..base()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn inactive_program_refuses_donations() {
        let now = OffsetDateTime::now_utc();
        let program = DonationProgram {
            id: 3,
            title: "Renovasi".into(),
            slug: "renovasi".into(),
            description: None,
            image_url: None,
            target_amount: 1_000_000,
            collected_amount: 0,
            is_active: false,
            starts_on: None,
            ends_on: None,
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![program]])
            .into_connection();

        let err = submit_donation(
            &db,
            SubmitDonation {
                program_id: Some(3),
                donor_name: None,
                donor_email: None,
                donor_phone: None,
                amount: 10_000,
                payment_method: "QRIS".into(),
                is_anonymous: true,
                message: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
