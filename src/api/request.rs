use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::request::{RequestKind, RequestStatus, WorkRequest};
use crate::service::request::{self, RequestData, RequestFilter};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 2)]
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePartTime {
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateRemoteWork {
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateRevertLeave {
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    /// The leave type the original leave day consumed
    pub leave_type_id: u64,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateShiftChange {
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    /// The peer currently holding the shift
    pub target_employee_id: u64,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct Decision {
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct RequestListQuery {
    /// Filter by requester; non-admin callers are always scoped to themselves
    pub employee_id: Option<u64>,
    #[param(example = "LEAVE")]
    pub kind: Option<String>,
    #[param(example = "PENDING")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    pub data: Vec<WorkRequest>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Request a leave day
#[utoipa::path(
    post,
    path = "/api/v1/requests/leave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Request submitted", body = WorkRequest),
        (status = 404, description = "Shift or leave type not found"),
        (status = 409, description = "Past date or shift already started")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ServiceError> {
    let requester = auth.require_employee()?;
    let payload = payload.into_inner();

    let created = request::create(
        pool.get_ref(),
        requester,
        payload.shift_id,
        payload.work_date,
        payload.reason,
        RequestData::Leave {
            leave_type_id: payload.leave_type_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Request part-time overtime on a part-time shift
#[utoipa::path(
    post,
    path = "/api/v1/requests/part-time",
    request_body = CreatePartTime,
    responses(
        (status = 200, description = "Request submitted", body = WorkRequest),
        (status = 409, description = "Not a part-time shift, past date, or started")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_part_time(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePartTime>,
) -> Result<HttpResponse, ServiceError> {
    let requester = auth.require_employee()?;
    let payload = payload.into_inner();

    let created = request::create(
        pool.get_ref(),
        requester,
        payload.shift_id,
        payload.work_date,
        payload.reason,
        RequestData::PartTime,
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Request to work an assigned shift remotely
#[utoipa::path(
    post,
    path = "/api/v1/requests/remote-work",
    request_body = CreateRemoteWork,
    responses(
        (status = 200, description = "Request submitted", body = WorkRequest),
        (status = 409, description = "Past date or shift already started")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_remote_work(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRemoteWork>,
) -> Result<HttpResponse, ServiceError> {
    let requester = auth.require_employee()?;
    let payload = payload.into_inner();

    let created = request::create(
        pool.get_ref(),
        requester,
        payload.shift_id,
        payload.work_date,
        payload.reason,
        RequestData::RemoteWork,
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Request to undo an approved leave day
#[utoipa::path(
    post,
    path = "/api/v1/requests/revert-leave",
    request_body = CreateRevertLeave,
    responses(
        (status = 200, description = "Request submitted", body = WorkRequest),
        (status = 409, description = "No leave recorded for this shift")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_revert_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRevertLeave>,
) -> Result<HttpResponse, ServiceError> {
    let requester = auth.require_employee()?;
    let payload = payload.into_inner();

    let created = request::create(
        pool.get_ref(),
        requester,
        payload.shift_id,
        payload.work_date,
        payload.reason,
        RequestData::RevertLeave {
            leave_type_id: payload.leave_type_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Ask a peer to hand over a shift
#[utoipa::path(
    post,
    path = "/api/v1/requests/shift-change",
    request_body = CreateShiftChange,
    responses(
        (status = 200, description = "Request submitted", body = WorkRequest),
        (status = 400, description = "Target employee equals requester"),
        (status = 404, description = "Target employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_shift_change(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateShiftChange>,
) -> Result<HttpResponse, ServiceError> {
    let requester = auth.require_employee()?;
    let payload = payload.into_inner();

    let created = request::create(
        pool.get_ref(),
        requester,
        payload.shift_id,
        payload.work_date,
        payload.reason,
        RequestData::ShiftChange {
            target_employee_id: payload.target_employee_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Withdraw one's own pending request
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/recall",
    params(("request_id" = u64, Path, description = "Request to recall")),
    responses(
        (status = 200, description = "Request recalled", body = WorkRequest),
        (status = 403, description = "Not the requester"),
        (status = 409, description = "Request is not pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn recall(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let actor = auth.require_employee()?;
    let updated = request::recall(pool.get_ref(), actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Approve a request (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/approve",
    params(("request_id" = u64, Path, description = "Request to approve")),
    request_body = Decision,
    responses(
        (status = 200, description = "Request approved", body = WorkRequest),
        (status = 409, description = "Not pending or side effect precondition failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn approve(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Decision>,
) -> Result<HttpResponse, ServiceError> {
    auth.require_hr_or_admin()?;
    let responder = auth.require_employee()?;

    let updated = request::approve(
        pool.get_ref(),
        responder,
        path.into_inner(),
        payload.into_inner().note,
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Reject a request (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/reject",
    params(("request_id" = u64, Path, description = "Request to reject")),
    request_body = Decision,
    responses(
        (status = 200, description = "Request rejected", body = WorkRequest),
        (status = 409, description = "Request is not pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn reject(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Decision>,
) -> Result<HttpResponse, ServiceError> {
    auth.require_hr_or_admin()?;
    let responder = auth.require_employee()?;

    let updated = request::reject(
        pool.get_ref(),
        responder,
        path.into_inner(),
        payload.into_inner().note,
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Accept a shift-change request aimed at oneself
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/confirm",
    params(("request_id" = u64, Path, description = "Shift-change request to accept")),
    responses(
        (status = 200, description = "Moved to pending approval", body = WorkRequest),
        (status = 403, description = "Not the targeted employee"),
        (status = 409, description = "Not pending or assignment not held")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn confirm(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let actor = auth.require_employee()?;
    let updated =
        request::peer_respond(pool.get_ref(), actor, path.into_inner(), true, None).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Decline a shift-change request aimed at oneself
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/decline",
    params(("request_id" = u64, Path, description = "Shift-change request to decline")),
    request_body = Decision,
    responses(
        (status = 200, description = "Request declined", body = WorkRequest),
        (status = 403, description = "Not the targeted employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn decline(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Decision>,
) -> Result<HttpResponse, ServiceError> {
    let actor = auth.require_employee()?;
    let updated = request::peer_respond(
        pool.get_ref(),
        actor,
        path.into_inner(),
        false,
        payload.into_inner().note,
    )
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Paginated request list
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Paginated request list", body = RequestListResponse),
        (status = 400, description = "Unknown kind or status filter")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RequestListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = if auth.is_hr_or_admin() {
        query.employee_id
    } else {
        Some(auth.require_employee()?)
    };

    let kind = query
        .kind
        .as_deref()
        .map(|k| {
            k.parse::<RequestKind>()
                .map_err(|_| ServiceError::InvalidInput(format!("unknown request kind {}", k)))
        })
        .transpose()?;
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<RequestStatus>()
                .map_err(|_| ServiceError::InvalidInput(format!("unknown request status {}", s)))
        })
        .transpose()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let (data, total) = request::list(
        pool.get_ref(),
        RequestFilter {
            employee_id,
            kind,
            status,
        },
        page,
        per_page,
    )
    .await?;

    Ok(HttpResponse::Ok().json(RequestListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Fetch one request
#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}",
    params(("request_id" = u64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request found", body = WorkRequest),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn get(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let req = request::get(pool.get_ref(), path.into_inner()).await?;

    if !auth.is_hr_or_admin() {
        let me = auth.require_employee()?;
        if req.employee_id != me && req.target_employee_id != Some(me) {
            return Err(ServiceError::Forbidden(
                "not a party to this request".into(),
            ));
        }
    }

    Ok(HttpResponse::Ok().json(req))
}
