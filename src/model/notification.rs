use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: u64,
    pub employee_id: u64,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}
