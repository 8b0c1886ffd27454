//! HTTP request handlers and their wire DTOs.
//!
//! The engine is synchronous (LMDB writes block); every orchestrator call
//! goes through `spawn_blocking` so handler tasks never stall the runtime.

use crate::error::RpcError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fangate_engine::{
    EngineError, SubmitRequest, VerificationOrchestrator,
};
use fangate_store::{Attribution, ConsentGrants};
use fangate_types::{EmailAddress, GateSlug, Provider, StepAction, SubmissionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type AppState = Arc<VerificationOrchestrator>;

async fn run_blocking<T, F>(f: F) -> Result<T, RpcError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EngineError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RpcError::Internal(e.to_string()))?
        .map_err(RpcError::Engine)
}

// ── Submit ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitBody {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub consent: BTreeMap<String, bool>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub campaign: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub submission_id: String,
    pub required_steps: Vec<&'static str>,
}

pub async fn submit(
    State(orch): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<SubmitResponse>), RpcError> {
    let slug = GateSlug::new(&slug).map_err(EngineError::Validation)?;
    let email = EmailAddress::new(body.email).map_err(EngineError::Validation)?;
    let request = SubmitRequest {
        email,
        display_name: body.display_name,
        consent: ConsentGrants(body.consent),
        ip: body.ip,
        user_agent: body.user_agent,
        session_id: body.session_id.unwrap_or_else(|| "anonymous".to_string()),
        attribution: attribution(body.referrer, body.campaign),
    };
    let outcome = run_blocking(move || orch.submit(&slug, request)).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission_id: outcome.submission_id.to_string(),
            required_steps: outcome.required_steps.iter().map(|s| s.as_str()).collect(),
        }),
    ))
}

fn attribution(referrer: Option<String>, campaign: Option<String>) -> Option<Attribution> {
    if referrer.is_none() && campaign.is_none() {
        return None;
    }
    Some(Attribution { referrer, campaign })
}

// ── Step verification ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BeginStepBody {
    pub provider: Provider,
    pub action: StepAction,
}

#[derive(Serialize)]
pub struct BeginStepResponse {
    pub state: String,
    pub redirect_url: String,
    pub expires_at: u64,
}

pub async fn begin_step(
    State(orch): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BeginStepBody>,
) -> Result<Json<BeginStepResponse>, RpcError> {
    let id = SubmissionId::parse(&id).map_err(EngineError::Validation)?;
    let outcome =
        run_blocking(move || orch.begin_step_verification(&id, body.provider, body.action))
            .await?;
    Ok(Json(BeginStepResponse {
        state: outcome.handshake_value,
        redirect_url: outcome.redirect_url,
        expires_at: outcome.expires_at.as_secs(),
    }))
}

/// Query parameters the provider redirect carries back.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub state: String,
    pub grant: String,
}

#[derive(Serialize)]
pub struct CallbackResponse {
    pub verified: bool,
}

pub async fn step_callback(
    State(orch): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, RpcError> {
    let verified =
        run_blocking(move || orch.complete_step_verification(&query.state, &query.grant)).await?;
    Ok(Json(CallbackResponse { verified }))
}

// ── Credentials ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IssueCredentialResponse {
    pub token: String,
    pub expires_at: u64,
}

pub async fn issue_credential(
    State(orch): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<IssueCredentialResponse>), RpcError> {
    let id = SubmissionId::parse(&id).map_err(EngineError::Validation)?;
    let issued = run_blocking(move || orch.issue_download_credential(&id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueCredentialResponse {
            token: issued.token,
            expires_at: issued.expires_at.as_secs(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct RedeemBody {
    pub token: String,
}

#[derive(Serialize)]
pub struct RedeemResponse {
    pub file_ref: String,
    pub location: String,
}

pub async fn redeem(
    State(orch): State<AppState>,
    Json(body): Json<RedeemBody>,
) -> Result<Json<RedeemResponse>, RpcError> {
    let download = run_blocking(move || orch.redeem_credential(&body.token)).await?;
    Ok(Json(RedeemResponse {
        file_ref: download.file_ref,
        location: download.location,
    }))
}

// ── Analytics ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ViewBody {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub campaign: Option<String>,
}

pub async fn record_view(
    State(orch): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ViewBody>,
) -> Result<StatusCode, RpcError> {
    let slug = GateSlug::new(&slug).map_err(EngineError::Validation)?;
    let session = body.session_id.unwrap_or_else(|| "anonymous".to_string());
    let attribution = attribution(body.referrer, body.campaign);
    run_blocking(move || orch.record_view(&slug, session, attribution)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct FunnelQuery {
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

pub async fn funnel(
    State(orch): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<FunnelQuery>,
) -> Result<Json<fangate_analytics::FunnelReport>, RpcError> {
    let slug = GateSlug::new(&slug).map_err(EngineError::Validation)?;
    let from = Timestamp::new(query.from.unwrap_or(0));
    let to = query.to.map(Timestamp::new).unwrap_or_else(Timestamp::now);
    let report = run_blocking(move || orch.funnel(&slug, from, to)).await?;
    Ok(Json(report))
}

// ── Consent ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConsentTimelineResponse {
    pub contact: String,
    pub entries: Vec<fangate_store::ConsentEntry>,
}

pub async fn consent_timeline(
    State(orch): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ConsentTimelineResponse>, RpcError> {
    let email = EmailAddress::new(email).map_err(EngineError::Validation)?;
    let contact = email.contact_id().to_string();
    let entries = run_blocking(move || orch.consent_timeline(&email)).await?;
    Ok(Json(ConsentTimelineResponse { contact, entries }))
}
