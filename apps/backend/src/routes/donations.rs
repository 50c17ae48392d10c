use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::{Date, OffsetDateTime};

use super::record_activity;
use crate::auth::permissions::ManageDonations;
use crate::entities::donation_programs::Model as DonationProgram;
use crate::entities::donations::{DonationStatus, Model as Donation};
use crate::error::AppError;
use crate::extractors::{Authorized, Validate, ValidatedJson};
use crate::http::{envelope, parse_pagination, PaginationQuery};
use crate::repos::{donation_programs, donations};
use crate::services::donations::{
    self as donation_service, progress_percent, CreateProgram, SubmitDonation, UpdateProgram,
};
use crate::state::app_state::AppState;
use crate::utils::date_format::{iso_date, parse_iso_date};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramView {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub target_amount: i64,
    pub collected_amount: i64,
    /// Percent of target collected, two decimals, capped at 100.
    pub progress: f64,
    pub is_active: bool,
    #[serde(with = "iso_date::option")]
    pub starts_on: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub ends_on: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<DonationProgram> for ProgramView {
    fn from(p: DonationProgram) -> Self {
        Self {
            progress: progress_percent(p.collected_amount, p.target_amount),
            id: p.id,
            title: p.title,
            slug: p.slug,
            description: p.description,
            image_url: p.image_url,
            target_amount: p.target_amount,
            collected_amount: p.collected_amount,
            is_active: p.is_active,
            starts_on: p.starts_on,
            ends_on: p.ends_on,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub id: i64,
    pub program_id: Option<i64>,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub status: DonationStatus,
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub verified_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub verified_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Donation> for DonationView {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            program_id: d.program_id,
            donor_name: d.donor_name,
            donor_email: d.donor_email,
            donor_phone: d.donor_phone,
            amount: d.amount,
            payment_method: d.payment_method,
            status: d.status,
            is_anonymous: d.is_anonymous,
            message: d.message,
            verified_by: d.verified_by,
            verified_at: d.verified_at,
            created_at: d.created_at,
        }
    }
}

/// Acknowledgement returned to the public donor; contact details are not echoed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub id: i64,
    pub program_id: Option<i64>,
    pub amount: i64,
    pub status: DonationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub target_amount: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "iso_date::option")]
    pub starts_on: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub ends_on: Option<Date>,
}

impl Validate for CreateProgramRequest {}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub target_amount: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    // Dates arrive as strings so an explicit null can clear them.
    #[serde(default, with = "double_option")]
    pub starts_on: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub ends_on: Option<Option<String>>,
}

impl Validate for UpdateProgramRequest {}

fn parse_optional_date(field: &str, raw: Option<Option<String>>) -> Result<Option<Option<Date>>, AppError> {
    raw.map(|value| value.map(|s| parse_iso_date(field, &s)).transpose())
        .transpose()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDonationRequest {
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_email: Option<String>,
    #[serde(default)]
    pub donor_phone: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Validate for SubmitDonationRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.amount <= 0 {
            return Err(AppError::invalid("Amount must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewDonationRequest {
    pub status: DonationStatus,
}

impl Validate for ReviewDonationRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.status == DonationStatus::Pending {
            return Err(AppError::invalid("Status must be VERIFIED or REJECTED"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub program_id: Option<i64>,
}

// Public

async fn list_active_programs(
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let (programs, total) = donation_programs::list(app_state.db(), true, &page).await?;
    let views: Vec<ProgramView> = programs.into_iter().map(ProgramView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

async fn get_active_program(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let program = donation_programs::find_by_id(app_state.db(), path.into_inner())
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::not_found("Donation program not found"))?;
    Ok(envelope::ok(ProgramView::from(program)))
}

async fn submit_donation(
    body: ValidatedJson<SubmitDonationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let donation = donation_service::submit_donation(
        app_state.db(),
        SubmitDonation {
            program_id: body.program_id,
            donor_name: body.donor_name,
            donor_email: body.donor_email,
            donor_phone: body.donor_phone,
            amount: body.amount,
            payment_method: body.payment_method,
            is_anonymous: body.is_anonymous,
            message: body.message,
        },
    )
    .await?;

    let receipt = DonationReceipt {
        id: donation.id,
        program_id: donation.program_id,
        amount: donation.amount,
        status: donation.status,
        created_at: donation.created_at,
    };
    Ok(envelope::created(
        receipt,
        "Thank you, your donation will be verified shortly",
    ))
}

// Admin: programs

async fn list_programs(
    _user: Authorized<ManageDonations>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let (programs, total) = donation_programs::list(app_state.db(), false, &page).await?;
    let views: Vec<ProgramView> = programs.into_iter().map(ProgramView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

async fn get_program(
    _user: Authorized<ManageDonations>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let program = donation_programs::find_by_id(app_state.db(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Donation program not found"))?;
    Ok(envelope::ok(ProgramView::from(program)))
}

async fn create_program(
    user: Authorized<ManageDonations>,
    body: ValidatedJson<CreateProgramRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let program = donation_service::create_program(
        app_state.db(),
        CreateProgram {
            title: body.title,
            description: body.description,
            image_url: body.image_url,
            target_amount: body.target_amount,
            is_active: body.is_active,
            starts_on: body.starts_on,
            ends_on: body.ends_on,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "create", "donation_program", Some(program.id));
    Ok(envelope::created(ProgramView::from(program), "Donation program created"))
}

async fn update_program(
    user: Authorized<ManageDonations>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateProgramRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let program = donation_service::update_program(
        app_state.db(),
        id,
        UpdateProgram {
            title: body.title,
            description: body.description,
            image_url: body.image_url,
            target_amount: body.target_amount,
            is_active: body.is_active,
            starts_on: parse_optional_date("Start date", body.starts_on)?,
            ends_on: parse_optional_date("End date", body.ends_on)?,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "update", "donation_program", Some(id));
    Ok(envelope::ok_with_message(
        ProgramView::from(program),
        "Donation program updated",
    ))
}

async fn delete_program(
    user: Authorized<ManageDonations>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    donation_service::delete_program(app_state.db(), id).await?;

    record_activity(&app_state, user.id, "delete", "donation_program", Some(id));
    Ok(envelope::done("Donation program deleted"))
}

// Admin: donations

async fn list_donations(
    _user: Authorized<ManageDonations>,
    filter: web::Query<DonationFilter>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let (rows, total) =
        donations::list(app_state.db(), filter.status, filter.program_id, &page).await?;
    let views: Vec<DonationView> = rows.into_iter().map(DonationView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

async fn get_donation(
    _user: Authorized<ManageDonations>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let donation = donations::find_by_id(app_state.db(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Donation not found"))?;
    Ok(envelope::ok(DonationView::from(donation)))
}

async fn review_donation(
    user: Authorized<ManageDonations>,
    path: web::Path<i64>,
    body: ValidatedJson<ReviewDonationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let donation =
        donation_service::review_donation(app_state.db(), id, body.status, user.id).await?;

    let action = match donation.status {
        DonationStatus::Verified => "verify",
        _ => "reject",
    };
    record_activity(&app_state, user.id, action, "donation", Some(id));
    Ok(envelope::ok_with_message(
        DonationView::from(donation),
        "Donation status updated",
    ))
}

pub fn configure_public_program_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_active_programs))
        .route("/{id}", web::get().to(get_active_program));
}

pub fn configure_public_donation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(submit_donation));
}

pub fn configure_admin_program_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_programs))
            .route(web::post().to(create_program)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_program))
            .route(web::put().to(update_program))
            .route(web::delete().to(delete_program)),
    );
}

pub fn configure_admin_donation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_donations))
        .route("/{id}", web::get().to(get_donation))
        .route("/{id}/status", web::put().to(review_donation));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_dates_distinguish_absent_null_and_value() {
        assert_eq!(parse_optional_date("Start date", None).unwrap(), None);
        assert_eq!(parse_optional_date("Start date", Some(None)).unwrap(), Some(None));
        assert_eq!(
            parse_optional_date("Start date", Some(Some("2025-04-01".into()))).unwrap(),
            Some(Some(time::macros::date!(2025-04-01)))
        );
        assert!(parse_optional_date("Start date", Some(Some("soon".into()))).is_err());
    }
}
