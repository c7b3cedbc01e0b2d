use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::leave::LeaveBalance;
use crate::service::balance;

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Another employee's balances; HR/Admin only
    pub employee_id: Option<u64>,
    /// Defaults to the current year
    pub year: Option<i32>,
}

/// Leave balances for one employee and year
#[utoipa::path(
    get,
    path = "/api/v1/balances",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balances per leave type", body = [LeaveBalance])
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse, ServiceError> {
    let employee_id = match query.employee_id {
        Some(id) => {
            auth.require_hr_or_admin()?;
            id
        }
        None => auth.require_employee()?,
    };

    let year = query.year.unwrap_or_else(|| Local::now().year());

    let balances = balance::list_balances(pool.get_ref(), employee_id, year).await?;
    Ok(HttpResponse::Ok().json(balances))
}
