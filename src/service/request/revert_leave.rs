use chrono::{Datelike, NaiveDate};
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::attendance::AttendanceStatus;
use crate::model::request::WorkRequest;
use crate::service::assignment::fetch_scheduled;
use crate::service::balance;
use crate::service::request::leave::ensure_leave_type;

/// A revert-leave request only makes sense against an assignment that is
/// currently recorded as a leave day.
pub(crate) async fn validate_create(
    conn: &mut MySqlConnection,
    requester: u64,
    shift_id: u64,
    work_date: NaiveDate,
    leave_type_id: u64,
) -> Result<(), ServiceError> {
    ensure_leave_type(&mut *conn, leave_type_id).await?;

    let slot = fetch_scheduled(&mut *conn, requester, shift_id, work_date)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "no assignment for shift {} on {}",
                shift_id, work_date
            ))
        })?;

    let attendance_id = slot.attendance_id.ok_or_else(|| {
        ServiceError::Conflict("no leave recorded for this shift".into())
    })?;

    let status = sqlx::query_scalar::<_, String>("SELECT status FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .fetch_one(conn)
        .await?;
    if status != AttendanceStatus::Leave.as_ref() {
        return Err(ServiceError::Conflict(
            "attendance for this shift is not a leave record".into(),
        ));
    }

    Ok(())
}

/// Un-does an approved leave day: detaches and deletes the LEAVE attendance
/// record and credits the day back to the balance it was taken from. This is
/// the single place balances are restored.
pub(crate) async fn apply_approval(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
) -> Result<(), ServiceError> {
    let leave_type_id = req.leave_type_id.ok_or_else(|| {
        ServiceError::InvalidInput("revert-leave request without a leave type".into())
    })?;

    let slot = fetch_scheduled(&mut *conn, req.employee_id, req.shift_id, req.work_date)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "no assignment for shift {} on {}",
                req.shift_id, req.work_date
            ))
        })?;

    let attendance_id = slot.attendance_id.ok_or_else(|| {
        ServiceError::NotFound("leave attendance record no longer exists".into())
    })?;

    let status = sqlx::query_scalar::<_, String>("SELECT status FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .fetch_one(&mut *conn)
        .await?;
    if status != AttendanceStatus::Leave.as_ref() {
        return Err(ServiceError::NotFound(
            "leave attendance record no longer exists".into(),
        ));
    }

    sqlx::query("UPDATE shift_assignments SET attendance_id = NULL WHERE id = ?")
        .bind(slot.id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .execute(&mut *conn)
        .await?;

    balance::credit(conn, req.employee_id, leave_type_id, req.work_date.year()).await?;
    Ok(())
}
