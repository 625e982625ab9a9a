use axum::{extract::State, Json};
use serde::Serialize;

use crate::proxy::Passthrough;

#[derive(Debug, Serialize)]
pub struct GateStatus {
    pub active: usize,
    pub max_connections: usize,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub gate: GateStatus,
}

pub async fn get_health(State(passthrough): State<Passthrough>) -> Json<SystemStatus> {
    let gate = passthrough.gate();
    Json(SystemStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        gate: GateStatus {
            active: gate.active(),
            max_connections: gate.max_connections(),
        },
    })
}
