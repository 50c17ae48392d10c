//! The `{success, data?, message?, error?, meta?}` body every endpoint returns.
//!
//! Fields are private so a success can't carry an error and an error can't
//! carry data.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use super::pagination::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: Option<String>, meta: Option<PageMeta>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
            error: None,
            meta,
        }
    }

    pub fn paginated(data: T, total: u64, page: u64, limit: u64, message: Option<String>) -> Self {
        Self::success(data, message, Some(PageMeta::new(total, page, limit)))
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.into()),
            meta: None,
        }
    }

    /// Success with a message and no payload (deletes, status changes).
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            meta: None,
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data, None, None))
}

pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data, Some(message.into()), None))
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::success(data, Some(message.into()), None))
}

pub fn done(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::done(message))
}

pub fn paginated<T: Serialize>(data: T, total: u64, page: &Pagination) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::paginated(
        data,
        total,
        page.page(),
        page.limit(),
        None,
    ))
}

/// Error body with the given status, 400 when none is given.
pub fn error_response(message: impl Into<String>, status: Option<StatusCode>) -> HttpResponse {
    HttpResponse::build(status.unwrap_or(StatusCode::BAD_REQUEST))
        .json(ApiResponse::failure(message))
}
