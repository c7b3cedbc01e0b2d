use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
    pub annual_quota: i32,
    pub is_active: bool,
}

/// Per-employee, per-leave-type, per-year day counters.
/// `used_day + remaining_day` is constant for the lifetime of the row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub year: i32,
    pub used_day: i32,
    pub remaining_day: i32,
}
