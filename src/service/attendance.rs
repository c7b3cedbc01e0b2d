use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlConnection, MySqlPool};
use utoipa::ToSchema;

use crate::error::ServiceError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::service::assignment::{ensure_employee, find_current_assignment, month_window};
use crate::utils::geo::haversine_m;

/// Arriving this many minutes after shift start is classified LATE.
pub const LATE_THRESHOLD_MIN: i64 = 10;

/// Lateness classification for a check-in at `at` against a shift starting at
/// `shift_start`. Minutes are truncated.
pub fn classify_check_in(shift_start: NaiveTime, at: NaiveTime) -> (AttendanceStatus, i64) {
    if at <= shift_start {
        return (AttendanceStatus::Present, 0);
    }

    let late_minutes = (at - shift_start).num_minutes();
    if late_minutes >= LATE_THRESHOLD_MIN {
        (AttendanceStatus::Late, late_minutes)
    } else {
        (AttendanceStatus::Present, late_minutes)
    }
}

/// Worked hours at minute granularity.
pub fn worked_hours(check_in: NaiveDateTime, check_out: NaiveDateTime) -> f64 {
    (check_out - check_in).num_minutes() as f64 / 60.0
}

/// Status of an assignment that has no attendance record, relative to `now`.
/// ABSENT once the day is gone (or today's shift has ended); otherwise the
/// shift is still upcoming and has no status. Computed on every read, never
/// persisted, because "now" advances.
pub fn virtual_status(
    work_date: NaiveDate,
    shift_end: NaiveTime,
    now: NaiveDateTime,
) -> Option<AttendanceStatus> {
    if work_date < now.date() {
        return Some(AttendanceStatus::Absent);
    }
    if work_date == now.date() && now.time() > shift_end {
        return Some(AttendanceStatus::Absent);
    }
    None
}

async fn fetch_attendance(
    conn: &mut MySqlConnection,
    attendance_id: u64,
    employee_id: u64,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT id, employee_id, assignment_id, location_id, check_in, check_out, total_hours, \
         late_minutes, status, edited, edited_by, edited_time \
         FROM attendance WHERE id = ? AND employee_id = ? FOR UPDATE",
    )
    .bind(attendance_id)
    .bind(employee_id)
    .fetch_optional(conn)
    .await
}

/// Inserts an attendance row and links it onto its assignment. Shared with
/// the leave / remote-work approval effects that synthesize records.
pub(crate) async fn insert_attendance(
    conn: &mut MySqlConnection,
    employee_id: u64,
    assignment_id: u64,
    location_id: Option<u64>,
    check_in: NaiveDateTime,
    check_out: Option<NaiveDateTime>,
    total_hours: f64,
    late_minutes: i64,
    status: AttendanceStatus,
) -> Result<Attendance, ServiceError> {
    let result = sqlx::query(
        "INSERT INTO attendance \
         (employee_id, assignment_id, location_id, check_in, check_out, total_hours, late_minutes, status) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(assignment_id)
    .bind(location_id)
    .bind(check_in)
    .bind(check_out)
    .bind(total_hours)
    .bind(late_minutes)
    .bind(status.as_ref())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_id();

    sqlx::query("UPDATE shift_assignments SET attendance_id = ? WHERE id = ?")
        .bind(id)
        .bind(assignment_id)
        .execute(&mut *conn)
        .await?;

    Ok(Attendance {
        id,
        employee_id,
        assignment_id,
        location_id,
        check_in,
        check_out,
        total_hours,
        late_minutes: late_minutes as i32,
        status: status.to_string(),
        edited: false,
        edited_by: None,
        edited_time: None,
    })
}

/// Geofenced check-in against the employee's currently running shift.
pub async fn check_in(
    pool: &MySqlPool,
    employee_id: u64,
    location_id: u64,
    latitude: f64,
    longitude: f64,
) -> Result<Attendance, ServiceError> {
    let mut tx = pool.begin().await?;

    ensure_employee(&mut tx, employee_id).await?;

    let location = sqlx::query_as::<_, crate::model::location::Location>(
        "SELECT id, name, latitude, longitude, radius_m FROM locations WHERE id = ?",
    )
    .bind(location_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("location {} not found", location_id)))?;

    if let (Some(site_lat), Some(site_lng)) = (location.latitude, location.longitude) {
        let distance = haversine_m(latitude, longitude, site_lat, site_lng);
        if distance > location.radius_m {
            return Err(ServiceError::Conflict(format!(
                "check-in outside {} radius: {:.0} m away, allowed {:.0} m",
                location.name, distance, location.radius_m
            )));
        }
    }

    let now = Local::now().naive_local();
    let slot = find_current_assignment(&mut tx, employee_id, now.date(), now.time())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("no shift scheduled for the current time".into())
        })?;

    if slot.locked {
        return Err(ServiceError::Conflict("assignment is locked".into()));
    }
    if slot.attendance_id.is_some() {
        return Err(ServiceError::Conflict(
            "already checked in for this shift".into(),
        ));
    }

    let (status, late_minutes) = classify_check_in(slot.start_time, now.time());

    let attendance = insert_attendance(
        &mut tx,
        employee_id,
        slot.id,
        Some(location.id),
        now,
        None,
        0.0,
        late_minutes,
        status,
    )
    .await?;

    tx.commit().await?;
    Ok(attendance)
}

/// Closes an open attendance record and derives the worked hours.
pub async fn check_out(
    pool: &MySqlPool,
    employee_id: u64,
    attendance_id: u64,
) -> Result<Attendance, ServiceError> {
    let mut tx = pool.begin().await?;

    let mut attendance = fetch_attendance(&mut tx, attendance_id, employee_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("attendance record {} not found", attendance_id))
        })?;

    if attendance.check_out.is_some() {
        return Err(ServiceError::Conflict("already checked out".into()));
    }

    let locked = sqlx::query_scalar::<_, bool>(
        "SELECT locked FROM shift_assignments WHERE id = ?",
    )
    .bind(attendance.assignment_id)
    .fetch_one(&mut *tx)
    .await?;
    if locked {
        return Err(ServiceError::Conflict("assignment is locked".into()));
    }

    let now = Local::now().naive_local();
    let total_hours = worked_hours(attendance.check_in, now);

    sqlx::query("UPDATE attendance SET check_out = ?, total_hours = ? WHERE id = ?")
        .bind(now)
        .bind(total_hours)
        .bind(attendance.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    attendance.check_out = Some(now);
    attendance.total_hours = total_hours;
    Ok(attendance)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceEdit {
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    #[schema(example = "PRESENT")]
    pub status: Option<String>,
}

/// Manual correction by HR/admin. Stamps the edit metadata and recomputes the
/// derived fields from the corrected timestamps.
pub async fn edit_attendance(
    pool: &MySqlPool,
    editor_id: u64,
    attendance_id: u64,
    edit: AttendanceEdit,
) -> Result<Attendance, ServiceError> {
    let mut tx = pool.begin().await?;

    let mut attendance = sqlx::query_as::<_, Attendance>(
        "SELECT id, employee_id, assignment_id, location_id, check_in, check_out, total_hours, \
         late_minutes, status, edited, edited_by, edited_time \
         FROM attendance WHERE id = ? FOR UPDATE",
    )
    .bind(attendance_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        ServiceError::NotFound(format!("attendance record {} not found", attendance_id))
    })?;

    if let Some(status) = &edit.status {
        status.parse::<AttendanceStatus>().map_err(|_| {
            ServiceError::InvalidInput(format!("unknown attendance status {}", status))
        })?;
        attendance.status = status.clone();
    }
    if let Some(check_in) = edit.check_in {
        attendance.check_in = check_in;

        let start_time = sqlx::query_scalar::<_, NaiveTime>(
            "SELECT s.start_time FROM shift_assignments a \
             JOIN work_shifts s ON s.id = a.shift_id WHERE a.id = ?",
        )
        .bind(attendance.assignment_id)
        .fetch_one(&mut *tx)
        .await?;

        let (_, late_minutes) = classify_check_in(start_time, check_in.time());
        attendance.late_minutes = late_minutes as i32;
    }
    if let Some(check_out) = edit.check_out {
        if check_out < attendance.check_in {
            return Err(ServiceError::InvalidInput(
                "check-out must not precede check-in".into(),
            ));
        }
        attendance.check_out = Some(check_out);
    }
    if let Some(check_out) = attendance.check_out {
        attendance.total_hours = worked_hours(attendance.check_in, check_out);
    }

    let now = Local::now().naive_local();
    attendance.edited = true;
    attendance.edited_by = Some(editor_id);
    attendance.edited_time = Some(now);

    sqlx::query(
        "UPDATE attendance SET check_in = ?, check_out = ?, total_hours = ?, late_minutes = ?, \
         status = ?, edited = TRUE, edited_by = ?, edited_time = ? WHERE id = ?",
    )
    .bind(attendance.check_in)
    .bind(attendance.check_out)
    .bind(attendance.total_hours)
    .bind(attendance.late_minutes)
    .bind(&attendance.status)
    .bind(editor_id)
    .bind(now)
    .bind(attendance.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(attendance)
}

/// One line of the monthly attendance sheet. `status` is taken from the
/// attendance record when one exists and lazily derived otherwise.
#[derive(Debug, Serialize, ToSchema)]
pub struct SheetEntry {
    pub assignment_id: u64,
    #[schema(example = "2026-08-01", value_type = String, format = "date")]
    pub work_date: NaiveDate,
    pub shift_name: String,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    pub locked: bool,
    #[schema(example = "PRESENT")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    pub total_hours: Option<f64>,
    pub late_minutes: Option<i32>,
    pub location_id: Option<u64>,
    pub edited: Option<bool>,
    pub edited_by: Option<u64>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub edited_time: Option<NaiveDateTime>,
}

#[derive(Debug, sqlx::FromRow)]
struct SheetRow {
    assignment_id: u64,
    work_date: NaiveDate,
    shift_name: String,
    start_time: NaiveTime,
    end_time: NaiveTime,
    locked: bool,
    status: Option<String>,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    total_hours: Option<f64>,
    late_minutes: Option<i32>,
    location_id: Option<u64>,
    edited: Option<bool>,
    edited_by: Option<u64>,
    edited_time: Option<NaiveDateTime>,
}

/// The derived read view for one employee and month.
pub async fn monthly_sheet(
    pool: &MySqlPool,
    employee_id: u64,
    year: i32,
    month: u32,
) -> Result<Vec<SheetEntry>, ServiceError> {
    let (first, next) = month_window(year, month).ok_or_else(|| {
        ServiceError::InvalidInput(format!("invalid month {}-{}", year, month))
    })?;

    let rows = sqlx::query_as::<_, SheetRow>(
        "SELECT a.id AS assignment_id, a.work_date, s.name AS shift_name, s.start_time, \
         s.end_time, a.locked, t.status, t.check_in, t.check_out, t.total_hours, \
         t.late_minutes, t.location_id, t.edited, t.edited_by, t.edited_time \
         FROM shift_assignments a \
         JOIN work_shifts s ON s.id = a.shift_id \
         LEFT JOIN attendance t ON t.id = a.attendance_id \
         WHERE a.employee_id = ? AND a.work_date >= ? AND a.work_date < ? \
         ORDER BY a.work_date, s.start_time",
    )
    .bind(employee_id)
    .bind(first)
    .bind(next)
    .fetch_all(pool)
    .await?;

    let now = Local::now().naive_local();
    let entries = rows
        .into_iter()
        .map(|row| {
            let status = row.status.clone().or_else(|| {
                virtual_status(row.work_date, row.end_time, now).map(|s| s.to_string())
            });
            SheetEntry {
                assignment_id: row.assignment_id,
                work_date: row.work_date,
                shift_name: row.shift_name,
                start_time: row.start_time,
                end_time: row.end_time,
                locked: row.locked,
                status,
                check_in: row.check_in,
                check_out: row.check_out,
                total_hours: row.total_hours,
                late_minutes: row.late_minutes,
                location_id: row.location_id,
                edited: row.edited,
                edited_by: row.edited_by,
                edited_time: row.edited_time,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dt(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        NaiveDateTime::new(date, t(h, m))
    }

    fn d(y: i32, mo: u32, da: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, da).unwrap()
    }

    #[test]
    fn twelve_minutes_after_start_is_late() {
        let (status, late) = classify_check_in(t(9, 0), t(9, 12));
        assert_eq!(status, AttendanceStatus::Late);
        assert_eq!(late, 12);
    }

    #[test]
    fn five_minutes_after_start_is_still_present() {
        let (status, late) = classify_check_in(t(9, 0), t(9, 5));
        assert_eq!(status, AttendanceStatus::Present);
        assert_eq!(late, 5);
    }

    #[test]
    fn fifteen_minutes_after_start_is_late() {
        let (status, _) = classify_check_in(t(9, 0), t(9, 15));
        assert_eq!(status, AttendanceStatus::Late);
    }

    #[test]
    fn exactly_at_threshold_is_late() {
        let (status, late) = classify_check_in(t(9, 0), t(9, 10));
        assert_eq!(status, AttendanceStatus::Late);
        assert_eq!(late, 10);
    }

    #[test]
    fn early_arrival_is_present_with_zero_lateness() {
        let (status, late) = classify_check_in(t(9, 0), t(8, 45));
        assert_eq!(status, AttendanceStatus::Present);
        assert_eq!(late, 0);
    }

    #[test]
    fn lateness_truncates_seconds() {
        let start = t(9, 0);
        let at = NaiveTime::from_hms_opt(9, 11, 59).unwrap();
        let (_, late) = classify_check_in(start, at);
        assert_eq!(late, 11);
    }

    #[test]
    fn worked_hours_at_minute_granularity() {
        let day = d(2026, 8, 3);
        assert_eq!(worked_hours(dt(day, 9, 0), dt(day, 17, 0)), 8.0);
        assert_eq!(worked_hours(dt(day, 9, 0), dt(day, 13, 30)), 4.5);
    }

    #[test]
    fn past_day_without_attendance_is_absent() {
        let now = dt(d(2026, 8, 5), 12, 0);
        assert_eq!(
            virtual_status(d(2026, 8, 4), t(17, 0), now),
            Some(AttendanceStatus::Absent)
        );
    }

    #[test]
    fn today_after_shift_end_is_absent() {
        let now = dt(d(2026, 8, 5), 18, 0);
        assert_eq!(
            virtual_status(d(2026, 8, 5), t(17, 0), now),
            Some(AttendanceStatus::Absent)
        );
    }

    #[test]
    fn today_before_shift_end_has_no_status() {
        let now = dt(d(2026, 8, 5), 12, 0);
        assert_eq!(virtual_status(d(2026, 8, 5), t(17, 0), now), None);
    }

    #[test]
    fn future_day_has_no_status() {
        let now = dt(d(2026, 8, 5), 12, 0);
        assert_eq!(virtual_status(d(2026, 8, 6), t(17, 0), now), None);
    }
}
