use crate::auth::ApiKey;
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use leadline_core::domain::Lead;
use leadline_core::intake::{IntakeProfile, IntakeRequest};
use leadline_core::time::now_utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub lead: Lead,
}

pub async fn ingest_widget(
    State(state): State<AppState>,
    _key: ApiKey,
    body: Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    ingest(state, &body, IntakeProfile::WIDGET).await
}

pub async fn ingest_web(
    State(state): State<AppState>,
    _key: ApiKey,
    body: Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    ingest(state, &body, IntakeProfile::WEB).await
}

async fn ingest(
    state: AppState,
    body: &[u8],
    profile: IntakeProfile,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let request: IntakeRequest = serde_json::from_slice(body)
        .map_err(|err| ApiError::Internal(format!("invalid JSON body: {err}")))?;
    if !request
        .name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty())
    {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    let lead = state
        .with_store(move |store| store.leads().ingest(now_utc(), request, &profile))
        .await?;
    tracing::info!(
        lead_id = %lead.id,
        source = lead.source.as_deref().unwrap_or_default(),
        channel = profile.channel_tag,
        "lead ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            success: true,
            lead,
        }),
    ))
}
