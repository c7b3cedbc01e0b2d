use crate::api::assignment::CreateAssignment;
use crate::api::attendance::CheckInRequest;
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::request::{
    CreateLeave, CreatePartTime, CreateRemoteWork, CreateRevertLeave, CreateShiftChange, Decision,
    RequestListResponse,
};
use crate::model::assignment::ShiftAssignment;
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveBalance, LeaveType};
use crate::model::location::Location;
use crate::model::request::WorkRequest;
use crate::model::shift::WorkShift;
use crate::service::attendance::{AttendanceEdit, SheetEntry};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce Management API",
        version = "1.0.0",
        description = r#"
## Workforce Attendance & Time-Off System

Backend for shift scheduling, geofenced attendance tracking, and multi-party
time-off workflows.

### 🔹 Key Features
- **Shift Assignments**
  - Assign employees to shift occurrences with overlap protection
- **Attendance**
  - Geofenced check-in/check-out with lateness classification and monthly sheets
- **Requests**
  - Leave, part-time overtime, remote work, revert leave, and peer-confirmed shift changes
- **Leave Balances**
  - Per-employee, per-leave-type yearly day counters

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Approvals and administrative operations require the **Admin** or **HR** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::sheet,
        crate::api::attendance::edit,

        crate::api::assignment::create,
        crate::api::assignment::delete,

        crate::api::request::create_leave,
        crate::api::request::create_part_time,
        crate::api::request::create_remote_work,
        crate::api::request::create_revert_leave,
        crate::api::request::create_shift_change,
        crate::api::request::recall,
        crate::api::request::approve,
        crate::api::request::reject,
        crate::api::request::confirm,
        crate::api::request::decline,
        crate::api::request::list,
        crate::api::request::get,

        crate::api::balance::list,

        crate::api::catalog::list_shifts,
        crate::api::catalog::list_locations,
        crate::api::catalog::list_leave_types,

        crate::api::notification::list,
        crate::api::notification::mark_read,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees
    ),
    components(
        schemas(
            CheckInRequest,
            AttendanceEdit,
            Attendance,
            SheetEntry,
            CreateAssignment,
            ShiftAssignment,
            WorkShift,
            Location,
            CreateLeave,
            CreatePartTime,
            CreateRemoteWork,
            CreateRevertLeave,
            CreateShiftChange,
            Decision,
            WorkRequest,
            RequestListResponse,
            LeaveType,
            LeaveBalance,
            CreateEmployee,
            Employee,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in, check-out, and monthly sheets"),
        (name = "Assignment", description = "Shift assignment management"),
        (name = "Requests", description = "Leave, overtime, remote work, and shift change workflows"),
        (name = "Balance", description = "Leave balance queries"),
        (name = "Catalog", description = "Shifts, locations, and leave types"),
        (name = "Notification", description = "In-app notifications"),
        (name = "Employee", description = "Employee directory"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
