use chrono::NaiveDateTime;
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::request::WorkRequest;
use crate::service::assignment::{ScheduledShift, ensure_employee, fetch_scheduled, fetch_shift, insert_assignment};
use crate::service::request::guard_not_started;

pub(crate) async fn validate_create(
    conn: &mut MySqlConnection,
    requester: u64,
    target_employee_id: u64,
) -> Result<(), ServiceError> {
    if target_employee_id == requester {
        return Err(ServiceError::InvalidInput(
            "target employee must differ from the requester".into(),
        ));
    }
    ensure_employee(conn, target_employee_id).await
}

/// The assignment being requested away. The target employee must currently
/// hold the exact (shift, date) assignment.
pub(crate) async fn peer_assignment(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
) -> Result<ScheduledShift, ServiceError> {
    let target = req.target_employee_id.ok_or_else(|| {
        ServiceError::InvalidInput("shift change request without a target employee".into())
    })?;

    fetch_scheduled(conn, target, req.shift_id, req.work_date)
        .await?
        .ok_or_else(|| {
            ServiceError::Conflict(format!(
                "target employee does not hold shift {} on {}",
                req.shift_id, req.work_date
            ))
        })
}

/// Swaps the assignment to the requester: delete the target's occurrence and
/// create an equivalent one for the requester, both inside the caller's
/// transaction so no intermediate state is ever visible.
pub(crate) async fn apply_approval(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
    now: NaiveDateTime,
) -> Result<(), ServiceError> {
    let shift = fetch_shift(&mut *conn, req.shift_id).await?;
    guard_not_started(&shift.name, shift.start_time, req.work_date, now)?;

    let slot = peer_assignment(&mut *conn, req).await?;
    if slot.locked {
        return Err(ServiceError::Conflict("assignment is locked".into()));
    }
    if slot.attendance_id.is_some() {
        return Err(ServiceError::Conflict(
            "assignment already has an attendance record".into(),
        ));
    }

    sqlx::query("DELETE FROM shift_assignments WHERE id = ?")
        .bind(slot.id)
        .execute(&mut *conn)
        .await?;

    insert_assignment(conn, req.employee_id, &shift, req.work_date).await?;
    Ok(())
}
