use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A check-in site. Locations without coordinates skip geofence validation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: f64,
}
