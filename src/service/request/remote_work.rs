use chrono::NaiveDateTime;
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::attendance::AttendanceStatus;
use crate::model::request::WorkRequest;
use crate::service::assignment::fetch_scheduled;
use crate::service::attendance::{insert_attendance, worked_hours};
use crate::service::request::guard_not_started;

/// Remote work augments an existing assignment: the shift is marked PRESENT
/// for its whole interval without a physical check-in. A day already taken
/// as leave cannot be overridden.
pub(crate) async fn apply_approval(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
    now: NaiveDateTime,
) -> Result<(), ServiceError> {
    let slot = fetch_scheduled(&mut *conn, req.employee_id, req.shift_id, req.work_date)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "no assignment for shift {} on {}",
                req.shift_id, req.work_date
            ))
        })?;

    guard_not_started(&slot.shift_name, slot.start_time, req.work_date, now)?;

    if let Some(attendance_id) = slot.attendance_id {
        let status = sqlx::query_scalar::<_, String>("SELECT status FROM attendance WHERE id = ?")
            .bind(attendance_id)
            .fetch_one(&mut *conn)
            .await?;

        if status == AttendanceStatus::Leave.as_ref() {
            return Err(ServiceError::Conflict(
                "cannot override a leave day with remote work".into(),
            ));
        }
        return Ok(());
    }

    let check_in = NaiveDateTime::new(req.work_date, slot.start_time);
    let check_out = NaiveDateTime::new(req.work_date, slot.end_time);

    insert_attendance(
        conn,
        req.employee_id,
        slot.id,
        None,
        check_in,
        Some(check_out),
        worked_hours(check_in, check_out),
        0,
        AttendanceStatus::Present,
    )
    .await?;

    Ok(())
}
