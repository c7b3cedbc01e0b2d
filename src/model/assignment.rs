use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee bound to one shift template on one calendar date.
/// `attendance_id` back-references the (at most one) attendance record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ShiftAssignment {
    pub id: u64,
    pub employee_id: u64,
    pub shift_id: u64,
    #[schema(example = "2026-08-01", value_type = String, format = "date")]
    pub work_date: NaiveDate,
    pub locked: bool,
    pub reminder_sent: bool,
    pub attendance_id: Option<u64>,
}
