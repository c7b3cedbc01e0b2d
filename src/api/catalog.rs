use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::{leave::LeaveType, location::Location, shift::WorkShift};

/// Active shift templates
#[utoipa::path(
    get,
    path = "/api/v1/shifts",
    responses(
        (status = 200, description = "Shift catalog", body = [WorkShift])
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_shifts(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ServiceError> {
    let shifts = sqlx::query_as::<_, WorkShift>(
        "SELECT id, name, start_time, end_time, is_part_time, is_active \
         FROM work_shifts WHERE is_active = TRUE ORDER BY start_time",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(shifts))
}

/// Check-in locations
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Location directory", body = [Location])
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_locations(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ServiceError> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT id, name, latitude, longitude, radius_m FROM locations ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(locations))
}

/// Active leave types
#[utoipa::path(
    get,
    path = "/api/v1/leave-types",
    responses(
        (status = 200, description = "Leave types", body = [LeaveType])
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ServiceError> {
    let leave_types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, annual_quota, is_active \
         FROM leave_types WHERE is_active = TRUE ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(leave_types))
}
