use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Leave,
    PartTime,
    RemoteWork,
    RevertLeave,
    ShiftChange,
}

impl RequestKind {
    /// Human wording used in notification and email bodies.
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Leave => "leave",
            RequestKind::PartTime => "part-time overtime",
            RequestKind::RemoteWork => "remote work",
            RequestKind::RevertLeave => "revert leave",
            RequestKind::ShiftChange => "shift change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Recalled,
    Rejected,
    Approved,
    PendingApproval,
    RejectedApproval,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending | RequestStatus::PendingApproval)
    }
}

/// Shared row shape of all five request kinds. Never mutated again after
/// reaching a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkRequest {
    pub id: u64,
    #[schema(example = "LEAVE")]
    pub kind: String,
    pub employee_id: u64,
    pub shift_id: u64,
    #[schema(example = "2026-08-10", value_type = String, format = "date")]
    pub work_date: NaiveDate,
    pub leave_type_id: Option<u64>,
    /// Peer being asked to give up the shift; shift-change only.
    pub target_employee_id: Option<u64>,
    pub reason: Option<String>,
    #[schema(example = "PENDING")]
    pub status: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    pub responded_by: Option<u64>,
    pub response_note: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub response_date: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_states_are_not_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::PendingApproval.is_terminal());
    }

    #[test]
    fn resolved_states_are_terminal() {
        assert!(RequestStatus::Recalled.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::RejectedApproval.is_terminal());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        let parsed: RequestStatus = "PENDING_APPROVAL".parse().unwrap();
        assert_eq!(parsed, RequestStatus::PendingApproval);
        assert_eq!(RequestStatus::PendingApproval.to_string(), "PENDING_APPROVAL");
        assert_eq!(RequestKind::PartTime.to_string(), "PART_TIME");
    }
}
