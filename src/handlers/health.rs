use std::time::Instant;

use crate::protocol::HealthResponse;
use crate::store::ContactStore;

/// Health check: live store size and seconds since `started_at`.
pub fn handle(store: &ContactStore, started_at: Instant) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        contacts_loaded: store.len(),
        uptime: started_at.elapsed().as_secs_f64(),
    }
}
