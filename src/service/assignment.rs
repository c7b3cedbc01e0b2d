use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use sqlx::{MySqlConnection, MySqlPool};
use tracing::info;

use crate::error::ServiceError;
use crate::model::{assignment::ShiftAssignment, shift::WorkShift};

/// Half-open interval intersection test for two time-of-day ranges.
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && a_end > b_start
}

/// First day of (year, month) and first day of the following month.
pub(crate) fn month_window(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next))
}

/// An assignment row joined with its shift template, as read by check-in and
/// the approval flows.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ScheduledShift {
    pub id: u64,
    pub employee_id: u64,
    pub shift_id: u64,
    pub work_date: NaiveDate,
    pub locked: bool,
    pub attendance_id: Option<u64>,
    pub shift_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

const SCHEDULED_COLUMNS: &str = "a.id, a.employee_id, a.shift_id, a.work_date, a.locked, \
     a.attendance_id, s.name AS shift_name, s.start_time, s.end_time";

pub(crate) async fn ensure_employee(
    conn: &mut MySqlConnection,
    employee_id: u64,
) -> Result<(), ServiceError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ? LIMIT 1)",
    )
    .bind(employee_id)
    .fetch_one(conn)
    .await?;

    if exists {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!(
            "employee {} not found",
            employee_id
        )))
    }
}

pub(crate) async fn fetch_shift(
    conn: &mut MySqlConnection,
    shift_id: u64,
) -> Result<WorkShift, ServiceError> {
    sqlx::query_as::<_, WorkShift>(
        "SELECT id, name, start_time, end_time, is_part_time, is_active \
         FROM work_shifts WHERE id = ?",
    )
    .bind(shift_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("work shift {} not found", shift_id)))
}

/// Inserts an assignment after re-validating the overlap invariant against
/// the employee's existing assignments for that date. Shared by direct
/// assignment and the part-time / shift-change approval effects.
pub(crate) async fn insert_assignment(
    conn: &mut MySqlConnection,
    employee_id: u64,
    shift: &WorkShift,
    work_date: NaiveDate,
) -> Result<ShiftAssignment, ServiceError> {
    if !shift.is_active {
        return Err(ServiceError::Conflict(format!(
            "work shift {} is inactive",
            shift.name
        )));
    }

    let existing = sqlx::query_as::<_, WorkShift>(
        "SELECT s.id, s.name, s.start_time, s.end_time, s.is_part_time, s.is_active \
         FROM shift_assignments a \
         JOIN work_shifts s ON s.id = a.shift_id \
         WHERE a.employee_id = ? AND a.work_date = ?",
    )
    .bind(employee_id)
    .bind(work_date)
    .fetch_all(&mut *conn)
    .await?;

    for other in &existing {
        if overlaps(other.start_time, other.end_time, shift.start_time, shift.end_time) {
            return Err(ServiceError::Conflict(format!(
                "overlapping shift {} ({} - {}) already assigned on {}",
                other.name, other.start_time, other.end_time, work_date
            )));
        }
    }

    let result = sqlx::query(
        "INSERT INTO shift_assignments (employee_id, shift_id, work_date, locked, reminder_sent) \
         VALUES (?, ?, ?, FALSE, FALSE)",
    )
    .bind(employee_id)
    .bind(shift.id)
    .bind(work_date)
    .execute(&mut *conn)
    .await?;

    Ok(ShiftAssignment {
        id: result.last_insert_id(),
        employee_id,
        shift_id: shift.id,
        work_date,
        locked: false,
        reminder_sent: false,
        attendance_id: None,
    })
}

/// Assigns an employee to a shift on a date. Fails on unknown references,
/// past dates, and overlapping intervals.
pub async fn add_assignment(
    pool: &MySqlPool,
    employee_id: u64,
    shift_id: u64,
    work_date: NaiveDate,
) -> Result<ShiftAssignment, ServiceError> {
    let mut tx = pool.begin().await?;

    ensure_employee(&mut tx, employee_id).await?;
    let shift = fetch_shift(&mut tx, shift_id).await?;

    let today = Local::now().date_naive();
    if work_date < today {
        return Err(ServiceError::Conflict(format!(
            "cannot assign a shift on past date {}",
            work_date
        )));
    }

    let assignment = insert_assignment(&mut tx, employee_id, &shift, work_date).await?;
    tx.commit().await?;

    Ok(assignment)
}

/// Removes an unattended, unlocked, today-or-future assignment owned by the
/// given employee.
pub async fn delete_assignment(
    pool: &MySqlPool,
    employee_id: u64,
    assignment_id: u64,
) -> Result<(), ServiceError> {
    let mut tx = pool.begin().await?;

    let assignment = sqlx::query_as::<_, ShiftAssignment>(
        "SELECT id, employee_id, shift_id, work_date, locked, reminder_sent, attendance_id \
         FROM shift_assignments WHERE id = ? FOR UPDATE",
    )
    .bind(assignment_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("assignment {} not found", assignment_id)))?;

    if assignment.employee_id != employee_id {
        return Err(ServiceError::Conflict(
            "assignment belongs to another employee".into(),
        ));
    }
    if assignment.work_date < Local::now().date_naive() {
        return Err(ServiceError::Conflict(
            "cannot delete a past assignment".into(),
        ));
    }
    if assignment.locked {
        return Err(ServiceError::Conflict("assignment is locked".into()));
    }
    if assignment.attendance_id.is_some() {
        return Err(ServiceError::Conflict(
            "assignment already has an attendance record".into(),
        ));
    }

    sqlx::query("DELETE FROM shift_assignments WHERE id = ?")
        .bind(assignment.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// The (at most one) assignment whose shift interval contains `at` on `date`.
pub(crate) async fn find_current_assignment(
    conn: &mut MySqlConnection,
    employee_id: u64,
    date: NaiveDate,
    at: NaiveTime,
) -> Result<Option<ScheduledShift>, sqlx::Error> {
    sqlx::query_as::<_, ScheduledShift>(&format!(
        "SELECT {SCHEDULED_COLUMNS} \
         FROM shift_assignments a \
         JOIN work_shifts s ON s.id = a.shift_id \
         WHERE a.employee_id = ? AND a.work_date = ? AND s.start_time <= ? AND s.end_time > ? \
         LIMIT 1"
    ))
    .bind(employee_id)
    .bind(date)
    .bind(at)
    .bind(at)
    .fetch_optional(conn)
    .await
}

/// The assignment binding (employee, shift, date), if any.
pub(crate) async fn fetch_scheduled(
    conn: &mut MySqlConnection,
    employee_id: u64,
    shift_id: u64,
    work_date: NaiveDate,
) -> Result<Option<ScheduledShift>, sqlx::Error> {
    sqlx::query_as::<_, ScheduledShift>(&format!(
        "SELECT {SCHEDULED_COLUMNS} \
         FROM shift_assignments a \
         JOIN work_shifts s ON s.id = a.shift_id \
         WHERE a.employee_id = ? AND a.shift_id = ? AND a.work_date = ?"
    ))
    .bind(employee_id)
    .bind(shift_id)
    .bind(work_date)
    .fetch_optional(conn)
    .await
}

/// Monthly sweep: locks every assignment dated before the first day of the
/// current month. Locking is monotone, so re-running is harmless.
pub async fn lock_previous_month(pool: &MySqlPool) -> Result<u64, ServiceError> {
    let today = Local::now().date_naive();
    let first_of_month = month_window(today.year(), today.month())
        .map(|(first, _)| first)
        .ok_or_else(|| ServiceError::InvalidInput("invalid current date".into()))?;

    let result = sqlx::query(
        "UPDATE shift_assignments SET locked = TRUE WHERE locked = FALSE AND work_date < ?",
    )
    .bind(first_of_month)
    .execute(pool)
    .await?;

    let locked = result.rows_affected();
    if locked > 0 {
        info!(locked, cutoff = %first_of_month, "Locked past shift assignments");
    }
    Ok(locked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn detects_partial_overlap() {
        assert!(overlaps(t(9, 0), t(17, 0), t(16, 0), t(22, 0)));
        assert!(overlaps(t(16, 0), t(22, 0), t(9, 0), t(17, 0)));
    }

    #[test]
    fn detects_containment() {
        assert!(overlaps(t(9, 0), t(17, 0), t(10, 0), t(12, 0)));
        assert!(overlaps(t(10, 0), t(12, 0), t(9, 0), t(17, 0)));
        assert!(overlaps(t(9, 0), t(17, 0), t(9, 0), t(17, 0)));
    }

    #[test]
    fn back_to_back_shifts_do_not_overlap() {
        // Half-open intervals: [09:00, 17:00) and [17:00, 22:00) touch but do not intersect.
        assert!(!overlaps(t(9, 0), t(17, 0), t(17, 0), t(22, 0)));
        assert!(!overlaps(t(17, 0), t(22, 0), t(9, 0), t(17, 0)));
    }

    #[test]
    fn disjoint_shifts_do_not_overlap() {
        assert!(!overlaps(t(6, 0), t(9, 0), t(13, 0), t(18, 0)));
    }

    #[test]
    fn month_window_handles_year_rollover() {
        let (first, next) = month_window(2026, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn month_window_rejects_bad_month() {
        assert!(month_window(2026, 13).is_none());
        assert!(month_window(2026, 0).is_none());
    }
}
