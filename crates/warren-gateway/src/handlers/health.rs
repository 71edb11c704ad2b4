use crate::model::HealthResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.store().flush_stats();
    Json(HealthResponse {
        status: "ok",
        started_at: state.started_at(),
        flushes: stats.writes,
        failed_flushes: stats.failures,
        last_flush_at: stats.last_flush_at,
    })
}
