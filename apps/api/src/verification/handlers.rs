use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::verification::service;

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub issued: bool,
    pub email_dispatched: bool,
}

/// POST /api/v1/verification/send
pub async fn handle_send_code(
    State(state): State<AppState>,
    Json(req): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, AppError> {
    let name = req.name.as_deref().unwrap_or("there");
    let outcome = service::issue(
        state.codes.as_ref(),
        state.mailer.as_ref(),
        &req.email,
        name,
    )
    .await?;
    Ok(Json(SendCodeResponse {
        issued: true,
        email_dispatched: outcome.email_dispatched,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
}

/// POST /api/v1/verification/verify
pub async fn handle_verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, AppError> {
    let verified = service::verify(state.codes.as_ref(), &req.email, &req.code).await?;
    Ok(Json(VerifyCodeResponse { verified }))
}
