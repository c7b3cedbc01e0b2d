use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::assignment::ShiftAssignment;
use crate::service::assignment;

#[derive(Deserialize, ToSchema)]
pub struct CreateAssignment {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub shift_id: u64,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub work_date: NaiveDate,
}

#[derive(Deserialize, IntoParams)]
pub struct DeleteAssignmentQuery {
    /// Delete on behalf of another employee; HR/Admin only
    pub employee_id: Option<u64>,
}

/// Assign an employee to a shift (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignment,
    responses(
        (status = 200, description = "Assignment created", body = ShiftAssignment),
        (status = 404, description = "Employee or shift not found"),
        (status = 409, description = "Past date or overlapping assignment")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignment"
)]
pub async fn create(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAssignment>,
) -> Result<HttpResponse, ServiceError> {
    auth.require_hr_or_admin()?;

    let assignment = assignment::add_assignment(
        pool.get_ref(),
        payload.employee_id,
        payload.shift_id,
        payload.work_date,
    )
    .await?;

    Ok(HttpResponse::Ok().json(assignment))
}

/// Delete an unattended, unlocked future assignment
#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{assignment_id}",
    params(
        ("assignment_id" = u64, Path, description = "Assignment to delete"),
        DeleteAssignmentQuery
    ),
    responses(
        (status = 200, description = "Assignment deleted", body = Object, example = json!({
            "message": "Assignment deleted"
        })),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Past, locked, attended, or not owned")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignment"
)]
pub async fn delete(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<DeleteAssignmentQuery>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = match query.employee_id {
        Some(id) => {
            auth.require_hr_or_admin()?;
            id
        }
        None => auth.require_employee()?,
    };

    assignment::delete_assignment(pool.get_ref(), employee_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Assignment deleted"
    })))
}
