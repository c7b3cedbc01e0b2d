use chrono::NaiveDateTime;
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::request::WorkRequest;
use crate::model::shift::WorkShift;
use crate::service::assignment::{fetch_shift, insert_assignment};
use crate::service::request::guard_not_started;

pub(crate) fn validate_create(shift: &WorkShift) -> Result<(), ServiceError> {
    if !shift.is_part_time {
        return Err(ServiceError::Conflict(format!(
            "shift {} is not a part-time shift",
            shift.name
        )));
    }
    Ok(())
}

/// Creates the overtime assignment. The overlap invariant is re-validated by
/// the assignment ledger inside the same transaction, so a racing approval
/// for an intersecting shift fails here with a conflict.
pub(crate) async fn apply_approval(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
    now: NaiveDateTime,
) -> Result<(), ServiceError> {
    let shift = fetch_shift(&mut *conn, req.shift_id).await?;
    guard_not_started(&shift.name, shift.start_time, req.work_date, now)?;

    insert_assignment(conn, req.employee_id, &shift, req.work_date).await?;
    Ok(())
}
