use chrono::{Datelike, NaiveDateTime};
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::attendance::AttendanceStatus;
use crate::model::request::WorkRequest;
use crate::service::assignment::fetch_scheduled;
use crate::service::attendance::insert_attendance;
use crate::service::balance;

pub(crate) async fn ensure_leave_type(
    conn: &mut MySqlConnection,
    leave_type_id: u64,
) -> Result<(), ServiceError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM leave_types WHERE id = ? AND is_active = TRUE LIMIT 1)",
    )
    .bind(leave_type_id)
    .fetch_one(conn)
    .await?;

    if exists {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!(
            "leave type {} not found",
            leave_type_id
        )))
    }
}

pub(crate) async fn validate_create(
    conn: &mut MySqlConnection,
    leave_type_id: u64,
) -> Result<(), ServiceError> {
    ensure_leave_type(conn, leave_type_id).await
}

/// Marks the requester's assignment as a leave day: synthesizes a LEAVE
/// attendance record pinned to the shift interval and debits one day from
/// the year's balance.
pub(crate) async fn apply_approval(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
) -> Result<(), ServiceError> {
    let leave_type_id = req.leave_type_id.ok_or_else(|| {
        ServiceError::InvalidInput("leave request without a leave type".into())
    })?;

    let slot = fetch_scheduled(&mut *conn, req.employee_id, req.shift_id, req.work_date)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "no assignment for shift {} on {}",
                req.shift_id, req.work_date
            ))
        })?;

    if slot.locked {
        return Err(ServiceError::Conflict("assignment is locked".into()));
    }
    if slot.attendance_id.is_some() {
        return Err(ServiceError::Conflict(
            "attendance already recorded for this shift".into(),
        ));
    }

    insert_attendance(
        &mut *conn,
        req.employee_id,
        slot.id,
        None,
        NaiveDateTime::new(req.work_date, slot.start_time),
        Some(NaiveDateTime::new(req.work_date, slot.end_time)),
        0.0,
        0,
        AttendanceStatus::Leave,
    )
    .await?;

    balance::debit(conn, req.employee_id, leave_type_id, req.work_date.year()).await?;
    Ok(())
}
