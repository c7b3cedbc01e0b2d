use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::notification::Notification;

/// One's own notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications for the current employee", body = Object)
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = auth.require_employee()?;

    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT id, employee_id, message, is_read, created_at \
         FROM notifications WHERE employee_id = ? ORDER BY created_at DESC LIMIT 100",
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Mark a notification read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(
        ("notification_id" = u64, Path, description = "Notification to mark read")
    ),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn mark_read(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = auth.require_employee()?;
    let notification_id = path.into_inner();

    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = ? AND employee_id = ?",
    )
    .bind(notification_id)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound(format!(
            "notification {} not found",
            notification_id
        )));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Marked read" })))
}
