use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::Recommendation;
use crate::errors::AppError;
use crate::report::{ProfileDisplay, Report};
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JustificationUpdate {
    pub justification: String,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/v1/session/refresh
pub async fn handle_refresh(State(state): State<AppState>) -> Json<Option<Recommendation>> {
    Json(state.session.refresh_recommendation().await)
}

/// POST /api/v1/session/view/:simulation_id
pub async fn handle_view(
    State(state): State<AppState>,
    Path(simulation_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.view(&simulation_id).await?;
    Ok(Json(state.session.snapshot()))
}

/// POST /api/v1/session/start
pub async fn handle_start(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.start().await?;
    Ok(Json(state.session.snapshot()))
}

/// POST /api/v1/session/actions/:action_id/toggle
pub async fn handle_toggle_action(
    State(state): State<AppState>,
    Path(action_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.toggle_action(&action_id)?;
    Ok(Json(state.session.snapshot()))
}

/// PUT /api/v1/session/justification
pub async fn handle_set_justification(
    State(state): State<AppState>,
    Json(req): Json<JustificationUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.set_justification(req.justification)?;
    Ok(Json(state.session.snapshot()))
}

/// POST /api/v1/session/commit
pub async fn handle_commit(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.commit().await?;
    Ok(Json(state.session.snapshot()))
}

/// POST /api/v1/session/back
pub async fn handle_back(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.back();
    Json(state.session.snapshot())
}

/// POST /api/v1/session/done
pub async fn handle_done(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state.session.done().await?;
    Ok(Json(state.session.snapshot()))
}

/// GET /api/v1/session/report
pub async fn handle_report(
    State(state): State<AppState>,
    Query(profile): Query<ProfileDisplay>,
) -> Result<Json<Report>, AppError> {
    Ok(Json(state.session.report(&profile)?))
}

/// POST /api/v1/session/report/export
///
/// File I/O runs on the blocking pool.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(profile): Json<ProfileDisplay>,
) -> Result<Json<ExportResponse>, AppError> {
    let session = state.session.clone();
    let dir = state.config.report_dir.clone();
    let path = tokio::task::spawn_blocking(move || session.export_report(&profile, &dir))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}
