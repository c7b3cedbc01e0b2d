use sqlx::{MySqlConnection, MySqlPool};

use crate::error::ServiceError;
use crate::model::leave::LeaveBalance;

async fn fetch_for_update(
    conn: &mut MySqlConnection,
    employee_id: u64,
    leave_type_id: u64,
    year: i32,
) -> Result<LeaveBalance, ServiceError> {
    sqlx::query_as::<_, LeaveBalance>(
        "SELECT id, employee_id, leave_type_id, year, used_day, remaining_day \
         FROM leave_balances \
         WHERE employee_id = ? AND leave_type_id = ? AND year = ? FOR UPDATE",
    )
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| {
        ServiceError::NotFound(format!(
            "no leave balance for employee {} / leave type {} / year {}",
            employee_id, leave_type_id, year
        ))
    })
}

/// Consumes one leave day. used_day + remaining_day stays constant.
/// Invoked only from the leave approval effect.
pub(crate) async fn debit(
    conn: &mut MySqlConnection,
    employee_id: u64,
    leave_type_id: u64,
    year: i32,
) -> Result<LeaveBalance, ServiceError> {
    let mut balance = fetch_for_update(&mut *conn, employee_id, leave_type_id, year).await?;

    if balance.remaining_day <= 0 {
        return Err(ServiceError::Conflict(format!(
            "leave balance exhausted for year {}",
            year
        )));
    }

    sqlx::query(
        "UPDATE leave_balances SET used_day = used_day + 1, remaining_day = remaining_day - 1 \
         WHERE id = ?",
    )
    .bind(balance.id)
    .execute(&mut *conn)
    .await?;

    balance.used_day += 1;
    balance.remaining_day -= 1;
    Ok(balance)
}

/// Restores one leave day. Invoked only from the revert-leave approval effect.
pub(crate) async fn credit(
    conn: &mut MySqlConnection,
    employee_id: u64,
    leave_type_id: u64,
    year: i32,
) -> Result<LeaveBalance, ServiceError> {
    let mut balance = fetch_for_update(&mut *conn, employee_id, leave_type_id, year).await?;

    if balance.used_day <= 0 {
        return Err(ServiceError::Conflict(format!(
            "no used leave days to restore for year {}",
            year
        )));
    }

    sqlx::query(
        "UPDATE leave_balances SET used_day = used_day - 1, remaining_day = remaining_day + 1 \
         WHERE id = ?",
    )
    .bind(balance.id)
    .execute(&mut *conn)
    .await?;

    balance.used_day -= 1;
    balance.remaining_day += 1;
    Ok(balance)
}

/// Seeds one balance row per active leave type from its annual quota.
/// Runs at employee onboarding.
pub(crate) async fn seed_for_employee(
    conn: &mut MySqlConnection,
    employee_id: u64,
    year: i32,
) -> Result<(), ServiceError> {
    sqlx::query(
        "INSERT INTO leave_balances (employee_id, leave_type_id, year, used_day, remaining_day) \
         SELECT ?, id, ?, 0, annual_quota FROM leave_types WHERE is_active = TRUE",
    )
    .bind(employee_id)
    .bind(year)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn list_balances(
    pool: &MySqlPool,
    employee_id: u64,
    year: i32,
) -> Result<Vec<LeaveBalance>, ServiceError> {
    let balances = sqlx::query_as::<_, LeaveBalance>(
        "SELECT id, employee_id, leave_type_id, year, used_day, remaining_day \
         FROM leave_balances WHERE employee_id = ? AND year = ? ORDER BY leave_type_id",
    )
    .bind(employee_id)
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(balances)
}
