use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::state::AppState;

/// Where the service is in its lifecycle. `Uninitialized` only lasts
/// until the first database probe; after that the state flips between
/// `Ready` and `Degraded` as probes succeed or fail.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    #[default]
    Uninitialized,
    Ready,
    Degraded,
}

#[derive(Debug, Default)]
struct Inner {
    readiness: Readiness,
    reason: Option<String>,
}

/// Shared readiness cell. Cloning hands out another handle to the same
/// state, so every handler and the startup probe see one machine.
#[derive(Debug, Default, Clone)]
pub struct Health {
    inner: Arc<RwLock<Inner>>,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self) {
        let mut inner = self.write();
        if inner.readiness != Readiness::Ready {
            info!("service is ready");
        }
        inner.readiness = Readiness::Ready;
        inner.reason = None;
    }

    pub fn set_degraded(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut inner = self.write();
        if inner.readiness != Readiness::Degraded {
            warn!(%reason, "service is degraded");
        }
        inner.readiness = Readiness::Degraded;
        inner.reason = Some(reason);
    }

    pub fn readiness(&self) -> Readiness {
        self.read().readiness
    }

    pub fn reason(&self) -> Option<String> {
        self.read().reason.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Readiness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// GET /health: probe the database and report the readiness state.
/// Degraded and uninitialized both answer 503 so load balancers keep
/// traffic away until the store is reachable.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    state.check_database().await;

    let status = state.health.readiness();
    let code = match status {
        Readiness::Ready => StatusCode::OK,
        Readiness::Uninitialized | Readiness::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    let body = HealthResponse {
        status,
        reason: state.health.reason(),
    };
    (code, Json(body))
}
