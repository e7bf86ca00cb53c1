use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use memebot_db::DbPool;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    group_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub database: HealthCheck,
    pub groups: HealthCheck,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool, group_count: usize) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool, group_count })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let ready = database.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "memebot-server runtime initialized".to_string(),
        },
        database,
        groups: HealthCheck {
            status: if state.group_count > 0 { "ready" } else { "degraded" },
            detail: format!("{} group(s) configured", state.group_count),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes").fetch_one(pool).await {
        Ok(count) => HealthCheck { status: "ready", detail: format!("{count} quote(s) stored") },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}
