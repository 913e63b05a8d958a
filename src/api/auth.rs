use crate::api::AppState;
use crate::api::extract::Json;
use crate::api::schemas::auth::{AccessToken, Login, Registration};
use crate::api::schemas::envelope::Envelope;
use crate::error::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Registration>,
) -> Result<impl IntoResponse> {
    state.auth_service.register(&payload.username, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(Envelope::message_only("user created"))))
}

pub async fn login(State(state): State<AppState>, Json(payload): Json<Login>) -> Result<impl IntoResponse> {
    let access_token = state.auth_service.login(&payload.username, &payload.password).await?;

    Ok(Json(Envelope::ok("login success", AccessToken { access_token })))
}
