use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Leave,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    pub assignment_id: u64,
    /// Null for remote-work and leave-derived records.
    pub location_id: Option<u64>,
    #[schema(value_type = String, format = "date-time")]
    pub check_in: NaiveDateTime,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    pub total_hours: f64,
    pub late_minutes: i32,
    #[schema(example = "PRESENT")]
    pub status: String,
    pub edited: bool,
    pub edited_by: Option<u64>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub edited_time: Option<NaiveDateTime>,
}
