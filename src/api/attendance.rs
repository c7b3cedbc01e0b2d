use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::attendance::Attendance;
use crate::service::attendance::{self, AttendanceEdit, SheetEntry};

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 1)]
    pub location_id: u64,
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
}

#[derive(Deserialize, IntoParams)]
pub struct SheetQuery {
    /// Month 1-12
    pub month: u32,
    pub year: i32,
    /// Another employee's sheet; HR/Admin only
    pub employee_id: Option<u64>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Attendance),
        (status = 404, description = "No shift scheduled or unknown location"),
        (status = 409, description = "Outside geofence or already checked in")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = auth.require_employee()?;

    let attendance = attendance::check_in(
        pool.get_ref(),
        employee_id,
        payload.location_id,
        payload.latitude,
        payload.longitude,
    )
    .await?;

    Ok(HttpResponse::Ok().json(attendance))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{attendance_id}/check-out",
    params(
        ("attendance_id" = u64, Path, description = "Attendance record to close")
    ),
    responses(
        (status = 200, description = "Checked out successfully", body = Attendance),
        (status = 404, description = "Attendance record not found"),
        (status = 409, description = "Already checked out")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = auth.require_employee()?;

    let attendance = attendance::check_out(pool.get_ref(), employee_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(attendance))
}

/// Monthly attendance sheet with lazily derived statuses
#[utoipa::path(
    get,
    path = "/api/v1/attendance/sheet",
    params(SheetQuery),
    responses(
        (status = 200, description = "Sheet for the requested month", body = [SheetEntry]),
        (status = 400, description = "Invalid month")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn sheet(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SheetQuery>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = match query.employee_id {
        Some(id) => {
            auth.require_hr_or_admin()?;
            id
        }
        None => auth.require_employee()?,
    };

    let entries =
        attendance::monthly_sheet(pool.get_ref(), employee_id, query.year, query.month).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Manual attendance correction (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{attendance_id}",
    params(
        ("attendance_id" = u64, Path, description = "Attendance record to correct")
    ),
    request_body = AttendanceEdit,
    responses(
        (status = 200, description = "Attendance corrected", body = Attendance),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn edit(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceEdit>,
) -> Result<HttpResponse, ServiceError> {
    auth.require_hr_or_admin()?;
    let editor = auth.require_employee()?;

    let attendance = attendance::edit_attendance(
        pool.get_ref(),
        editor,
        path.into_inner(),
        payload.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(attendance))
}
