use sqlx::MySqlPool;
use tracing::{info, warn};

/// Fire-and-forget notification + templated email for a request decision.
/// Runs outside the transaction that produced the transition; a delivery
/// failure never propagates back to the caller.
pub(crate) fn dispatch_decision(pool: &MySqlPool, employee_id: u64, message: String, approved: bool) {
    let pool = pool.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = sqlx::query(
            "INSERT INTO notifications (employee_id, message, is_read) VALUES (?, ?, FALSE)",
        )
        .bind(employee_id)
        .bind(&message)
        .execute(&pool)
        .await
        {
            warn!(error = %e, employee_id, "Failed to persist notification");
        }

        match sqlx::query_scalar::<_, String>("SELECT email FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(&pool)
            .await
        {
            Ok(Some(email)) => {
                // Email sink: templated approval mail, best effort.
                info!(to = %email, approved, body = %message, "Dispatching decision email");
            }
            Ok(None) => warn!(employee_id, "No email on file for decision mail"),
            Err(e) => warn!(error = %e, employee_id, "Failed to resolve email for decision mail"),
        }
    });
}
