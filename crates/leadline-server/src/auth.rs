use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured shared secret.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        match provided {
            Some(key) if key == state.api_key() => Ok(ApiKey),
            Some(_) => {
                tracing::warn!(uri = %parts.uri, "rejected request with wrong api key");
                Err(ApiError::Unauthorized)
            }
            None => {
                tracing::warn!(uri = %parts.uri, "rejected request without api key");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
