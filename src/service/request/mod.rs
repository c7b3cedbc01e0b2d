pub mod leave;
pub mod part_time;
pub mod remote_work;
pub mod revert_leave;
pub mod shift_change;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{MySqlConnection, MySqlPool};

use crate::error::ServiceError;
use crate::model::request::{RequestKind, RequestStatus, WorkRequest};
use crate::service::assignment::{ensure_employee, fetch_shift};
use crate::service::notify;

/// Kind-specific payload of a new request. The engine below owns the shared
/// lifecycle; each kind plugs in its creation guard and approval effect.
#[derive(Debug)]
pub enum RequestData {
    Leave { leave_type_id: u64 },
    PartTime,
    RemoteWork,
    RevertLeave { leave_type_id: u64 },
    ShiftChange { target_employee_id: u64 },
}

impl RequestData {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestData::Leave { .. } => RequestKind::Leave,
            RequestData::PartTime => RequestKind::PartTime,
            RequestData::RemoteWork => RequestKind::RemoteWork,
            RequestData::RevertLeave { .. } => RequestKind::RevertLeave,
            RequestData::ShiftChange { .. } => RequestKind::ShiftChange,
        }
    }
}

fn kind_of(req: &WorkRequest) -> Result<RequestKind, ServiceError> {
    req.kind
        .parse()
        .map_err(|_| ServiceError::InvalidInput(format!("unknown request kind {}", req.kind)))
}

fn status_of(req: &WorkRequest) -> Result<RequestStatus, ServiceError> {
    req.status
        .parse()
        .map_err(|_| ServiceError::InvalidInput(format!("unknown request status {}", req.status)))
}

fn ensure_status(req: &WorkRequest, expected: RequestStatus) -> Result<(), ServiceError> {
    if status_of(req)? != expected {
        return Err(ServiceError::Conflict(
            "Cannot act on non-pending request".into(),
        ));
    }
    Ok(())
}

/// Shared creation guard: the target date must be today or later, and a
/// same-day request must land before the shift starts.
pub(crate) fn guard_not_started(
    shift_name: &str,
    start_time: NaiveTime,
    work_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<(), ServiceError> {
    if work_date < now.date() {
        return Err(ServiceError::Conflict(format!(
            "{} is in the past",
            work_date
        )));
    }
    if work_date == now.date() && now.time() >= start_time {
        return Err(ServiceError::Conflict(format!(
            "shift {} already started at {}",
            shift_name, start_time
        )));
    }
    Ok(())
}

async fn fetch_request_for_update(
    conn: &mut MySqlConnection,
    request_id: u64,
) -> Result<WorkRequest, ServiceError> {
    sqlx::query_as::<_, WorkRequest>(
        "SELECT id, kind, employee_id, shift_id, work_date, leave_type_id, target_employee_id, \
         reason, status, created_at, responded_by, response_note, response_date \
         FROM work_requests WHERE id = ? FOR UPDATE",
    )
    .bind(request_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("request {} not found", request_id)))
}

/// Stamps the responder fields together with the terminal status.
async fn finalize(
    conn: &mut MySqlConnection,
    req: &WorkRequest,
    status: RequestStatus,
    responder: u64,
    note: Option<String>,
    now: NaiveDateTime,
) -> Result<WorkRequest, ServiceError> {
    sqlx::query(
        "UPDATE work_requests SET status = ?, responded_by = ?, response_note = ?, \
         response_date = ? WHERE id = ?",
    )
    .bind(status.as_ref())
    .bind(responder)
    .bind(&note)
    .bind(now)
    .bind(req.id)
    .execute(conn)
    .await?;

    let mut updated = req.clone();
    updated.status = status.to_string();
    updated.responded_by = Some(responder);
    updated.response_note = note;
    updated.response_date = Some(now);
    Ok(updated)
}

fn decision_message(kind: RequestKind, work_date: NaiveDate, approved: bool) -> String {
    format!(
        "Your {} request for {} has been {}",
        kind.label(),
        work_date,
        if approved { "approved" } else { "rejected" }
    )
}

/// Creates a request of any kind in PENDING state.
pub async fn create(
    pool: &MySqlPool,
    requester: u64,
    shift_id: u64,
    work_date: NaiveDate,
    reason: Option<String>,
    data: RequestData,
) -> Result<WorkRequest, ServiceError> {
    let now = Local::now().naive_local();
    let mut tx = pool.begin().await?;

    ensure_employee(&mut tx, requester).await?;
    let shift = fetch_shift(&mut tx, shift_id).await?;
    guard_not_started(&shift.name, shift.start_time, work_date, now)?;

    match &data {
        RequestData::Leave { leave_type_id } => {
            leave::validate_create(&mut tx, *leave_type_id).await?;
        }
        RequestData::PartTime => part_time::validate_create(&shift)?,
        RequestData::RemoteWork => {}
        RequestData::RevertLeave { leave_type_id } => {
            revert_leave::validate_create(&mut tx, requester, shift_id, work_date, *leave_type_id)
                .await?;
        }
        RequestData::ShiftChange { target_employee_id } => {
            shift_change::validate_create(&mut tx, requester, *target_employee_id).await?;
        }
    }

    let kind = data.kind();
    let (leave_type_id, target_employee_id) = match data {
        RequestData::Leave { leave_type_id } | RequestData::RevertLeave { leave_type_id } => {
            (Some(leave_type_id), None)
        }
        RequestData::ShiftChange { target_employee_id } => (None, Some(target_employee_id)),
        _ => (None, None),
    };

    let result = sqlx::query(
        "INSERT INTO work_requests \
         (kind, employee_id, shift_id, work_date, leave_type_id, target_employee_id, reason, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(kind.as_ref())
    .bind(requester)
    .bind(shift_id)
    .bind(work_date)
    .bind(leave_type_id)
    .bind(target_employee_id)
    .bind(&reason)
    .bind(RequestStatus::Pending.as_ref())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(WorkRequest {
        id: result.last_insert_id(),
        kind: kind.to_string(),
        employee_id: requester,
        shift_id,
        work_date,
        leave_type_id,
        target_employee_id,
        reason,
        status: RequestStatus::Pending.to_string(),
        created_at: now,
        responded_by: None,
        response_note: None,
        response_date: None,
    })
}

/// Withdraws a PENDING request. Only the original requester may do this.
pub async fn recall(
    pool: &MySqlPool,
    actor: u64,
    request_id: u64,
) -> Result<WorkRequest, ServiceError> {
    let mut tx = pool.begin().await?;

    let req = fetch_request_for_update(&mut tx, request_id).await?;
    if req.employee_id != actor {
        return Err(ServiceError::Forbidden(
            "only the requester may recall this request".into(),
        ));
    }
    ensure_status(&req, RequestStatus::Pending)?;

    sqlx::query("UPDATE work_requests SET status = ? WHERE id = ?")
        .bind(RequestStatus::Recalled.as_ref())
        .bind(req.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let mut updated = req;
    updated.status = RequestStatus::Recalled.to_string();
    Ok(updated)
}

/// Administrative approval. Shift-change requests must already carry the
/// peer's confirmation (PENDING_APPROVAL); every other kind approves straight
/// from PENDING. The kind's side effects run inside the same transaction as
/// the status transition.
pub async fn approve(
    pool: &MySqlPool,
    responder: u64,
    request_id: u64,
    note: Option<String>,
) -> Result<WorkRequest, ServiceError> {
    let now = Local::now().naive_local();
    let mut tx = pool.begin().await?;

    let req = fetch_request_for_update(&mut tx, request_id).await?;
    let kind = kind_of(&req)?;

    let expected = if kind == RequestKind::ShiftChange {
        RequestStatus::PendingApproval
    } else {
        RequestStatus::Pending
    };
    ensure_status(&req, expected)?;

    match kind {
        RequestKind::Leave => leave::apply_approval(&mut tx, &req).await?,
        RequestKind::PartTime => part_time::apply_approval(&mut tx, &req, now).await?,
        RequestKind::RemoteWork => remote_work::apply_approval(&mut tx, &req, now).await?,
        RequestKind::RevertLeave => revert_leave::apply_approval(&mut tx, &req).await?,
        RequestKind::ShiftChange => shift_change::apply_approval(&mut tx, &req, now).await?,
    }

    let updated = finalize(&mut tx, &req, RequestStatus::Approved, responder, note, now).await?;
    tx.commit().await?;

    notify::dispatch_decision(
        pool,
        updated.employee_id,
        decision_message(kind, updated.work_date, true),
        true,
    );
    Ok(updated)
}

/// Administrative rejection. No ledger effect for any kind.
pub async fn reject(
    pool: &MySqlPool,
    responder: u64,
    request_id: u64,
    note: Option<String>,
) -> Result<WorkRequest, ServiceError> {
    let now = Local::now().naive_local();
    let mut tx = pool.begin().await?;

    let req = fetch_request_for_update(&mut tx, request_id).await?;
    let kind = kind_of(&req)?;

    let expected = if kind == RequestKind::ShiftChange {
        RequestStatus::PendingApproval
    } else {
        RequestStatus::Pending
    };
    ensure_status(&req, expected)?;

    let updated = finalize(&mut tx, &req, RequestStatus::Rejected, responder, note, now).await?;
    tx.commit().await?;

    notify::dispatch_decision(
        pool,
        updated.employee_id,
        decision_message(kind, updated.work_date, false),
        false,
    );
    Ok(updated)
}

/// Peer-confirmation hop of a shift-change request. The targeted employee
/// accepts (PENDING -> PENDING_APPROVAL) or declines (-> REJECTED_APPROVAL,
/// terminal).
pub async fn peer_respond(
    pool: &MySqlPool,
    actor: u64,
    request_id: u64,
    accept: bool,
    note: Option<String>,
) -> Result<WorkRequest, ServiceError> {
    let now = Local::now().naive_local();
    let mut tx = pool.begin().await?;

    let req = fetch_request_for_update(&mut tx, request_id).await?;
    if kind_of(&req)? != RequestKind::ShiftChange {
        return Err(ServiceError::Conflict(
            "not a shift change request".into(),
        ));
    }
    if req.target_employee_id != Some(actor) {
        return Err(ServiceError::Forbidden(
            "only the targeted employee may respond to this request".into(),
        ));
    }
    ensure_status(&req, RequestStatus::Pending)?;

    let updated = if accept {
        shift_change::peer_assignment(&mut tx, &req).await?;

        sqlx::query("UPDATE work_requests SET status = ? WHERE id = ?")
            .bind(RequestStatus::PendingApproval.as_ref())
            .bind(req.id)
            .execute(&mut *tx)
            .await?;

        let mut updated = req;
        updated.status = RequestStatus::PendingApproval.to_string();
        updated
    } else {
        finalize(&mut tx, &req, RequestStatus::RejectedApproval, actor, note, now).await?
    };

    tx.commit().await?;

    let message = if accept {
        format!(
            "Your shift change request for {} was accepted by the target employee and awaits final approval",
            updated.work_date
        )
    } else {
        format!(
            "Your shift change request for {} was declined by the target employee",
            updated.work_date
        )
    };
    notify::dispatch_decision(pool, updated.employee_id, message, accept);

    Ok(updated)
}

pub async fn get(pool: &MySqlPool, request_id: u64) -> Result<WorkRequest, ServiceError> {
    sqlx::query_as::<_, WorkRequest>(
        "SELECT id, kind, employee_id, shift_id, work_date, leave_type_id, target_employee_id, \
         reason, status, created_at, responded_by, response_note, response_date \
         FROM work_requests WHERE id = ?",
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("request {} not found", request_id)))
}

#[derive(Debug, Default)]
pub struct RequestFilter {
    pub employee_id: Option<u64>,
    pub kind: Option<RequestKind>,
    pub status: Option<RequestStatus>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

/// Paginated request listing, newest first.
pub async fn list(
    pool: &MySqlPool,
    filter: RequestFilter,
    page: u64,
    per_page: u64,
) -> Result<(Vec<WorkRequest>, i64), ServiceError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = filter.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }
    if let Some(kind) = filter.kind {
        where_sql.push_str(" AND kind = ?");
        args.push(FilterValue::Str(kind.into()));
    }
    if let Some(status) = filter.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.into()));
    }

    let count_sql = format!("SELECT COUNT(*) FROM work_requests{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT id, kind, employee_id, shift_id, work_date, leave_type_id, target_employee_id, \
         reason, status, created_at, responded_by, response_note, response_date \
         FROM work_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, WorkRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }
    let requests = data_q
        .bind(per_page)
        .bind(page.saturating_sub(1) * per_page)
        .fetch_all(pool)
        .await?;

    Ok((requests, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, mo: u32, da: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, da).unwrap()
    }

    #[test]
    fn past_date_is_rejected() {
        let now = NaiveDateTime::new(d(2026, 8, 5), t(8, 0));
        let err = guard_not_started("Morning", t(9, 0), d(2026, 8, 4), now).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn today_after_shift_start_is_rejected() {
        let now = NaiveDateTime::new(d(2026, 8, 5), t(9, 30));
        let err = guard_not_started("Morning", t(9, 0), d(2026, 8, 5), now).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn today_exactly_at_shift_start_is_rejected() {
        let now = NaiveDateTime::new(d(2026, 8, 5), t(9, 0));
        assert!(guard_not_started("Morning", t(9, 0), d(2026, 8, 5), now).is_err());
    }

    #[test]
    fn today_before_shift_start_is_accepted() {
        let now = NaiveDateTime::new(d(2026, 8, 5), t(8, 0));
        assert!(guard_not_started("Morning", t(9, 0), d(2026, 8, 5), now).is_ok());
    }

    #[test]
    fn future_date_is_accepted_regardless_of_time() {
        let now = NaiveDateTime::new(d(2026, 8, 5), t(23, 0));
        assert!(guard_not_started("Morning", t(9, 0), d(2026, 8, 6), now).is_ok());
    }

    #[test]
    fn decision_message_names_kind_and_date() {
        let msg = decision_message(RequestKind::PartTime, d(2026, 8, 10), true);
        assert_eq!(
            msg,
            "Your part-time overtime request for 2026-08-10 has been approved"
        );
    }
}
