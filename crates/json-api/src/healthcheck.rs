//! Liveness check

use std::{sync::LazyLock, time::Instant};

use salvo::{
    http::header::{CACHE_CONTROL, HeaderValue},
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

static STARTED: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Start the uptime clock. Later calls are no-ops.
pub(crate) fn mark_started() {
    LazyLock::force(&STARTED);
}

/// Liveness status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,

    /// Server build version
    pub version: String,

    /// Seconds since the server started
    pub uptime_seconds: u64,
}

/// Healthcheck handler
///
/// Answers without touching the database so load balancers can poll it
/// freely.
#[endpoint(tags("health"), summary = "Liveness check")]
pub(crate) async fn handler(res: &mut Response) -> Json<HealthResponse> {
    res.headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Json(HealthResponse {
        status: HealthStatus::Ok,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: STARTED.elapsed().as_secs(),
    })
}
