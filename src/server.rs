use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::batteries::{match_battery, Battery, BATTERIES};
use crate::chat::{
    detect_signals, rank_reply, system_prompt, ChatClient, ChatMessage, ChatSignals, RankedReply,
};
use crate::config::Config;
use crate::error::MatchError;
use crate::matching::{rank_profile, FilterMode, MatchResult};
use crate::profile::{RetailerPreference, UserProfile};
use crate::programs::{PaymentModel, ProgramRegistry, VppProgram};
use crate::region::{lookup_postcode, PostcodeLookup, Region};

#[derive(Clone)]
pub struct ApiState {
    config: Arc<Config>,
    registry: ProgramRegistry,
    chat: Option<ChatClient>,
    system_prompt: Arc<String>,
}

impl ApiState {
    pub fn new(config: Config, registry: ProgramRegistry, chat: Option<ChatClient>) -> Self {
        let system_prompt = Arc::new(system_prompt(&registry));
        Self {
            config: Arc::new(config),
            registry,
            chat,
            system_prompt,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    fn bad_gateway(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: error.to_string(),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(error: MatchError) -> Self {
        match &error {
            MatchError::UnknownProgram(_) => Self::not_found(error.to_string()),
            _ => Self::bad_request(error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize, Default)]
struct ProgramsQuery {
    region: Option<String>,
    independent: Option<bool>,
    payment_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct BatteriesQuery {
    query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MatchRequest {
    battery: String,
    location: String,
    solar: Option<f64>,
    preference: Option<String>,
    filter: Option<String>,
    payment_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    programs: usize,
    chat_enabled: bool,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/programs", get(list_programs))
        .route("/v1/programs/:id", get(get_program))
        .route("/v1/regions/:postcode", get(region_for_postcode))
        .route("/v1/batteries", get(list_batteries))
        .route("/v1/match", post(match_profile))
        .route("/v1/detect", post(detect))
        .route("/v1/qualify", post(qualify))
        .route("/v1/chat", post(chat))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, registry: ProgramRegistry, bind: SocketAddr) -> Result<()> {
    let chat = match ChatClient::from_env(&config.chat) {
        Ok(client) => {
            info!(model = client.model(), "chat relay enabled");
            Some(client)
        }
        Err(error) => {
            warn!("chat relay disabled: {error:#}");
            None
        }
    };
    let app = router(ApiState::new(config, registry, chat));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        programs: state.registry.len(),
        chat_enabled: state.chat.is_some(),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config.as_ref().clone())
}

async fn list_programs(
    State(state): State<ApiState>,
    query: Result<Query<ProgramsQuery>, QueryRejection>,
) -> ApiResult<Vec<VppProgram>> {
    let Query(query) = query?;
    let region = query.region.as_deref().map(str::parse::<Region>).transpose()?;
    let payment_model = query
        .payment_model
        .as_deref()
        .map(str::parse::<PaymentModel>)
        .transpose()?;
    let programs = state
        .registry
        .select(region, query.independent.unwrap_or(false), payment_model)
        .into_iter()
        .cloned()
        .collect();
    Ok(ok(programs))
}

async fn get_program(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<VppProgram> {
    let program = state
        .registry
        .by_id(&id)
        .cloned()
        .ok_or(MatchError::UnknownProgram(id))?;
    Ok(ok(program))
}

async fn region_for_postcode(Path(postcode): Path<String>) -> Json<ApiResponse<PostcodeLookup>> {
    ok(lookup_postcode(&postcode))
}

async fn list_batteries(
    query: Result<Query<BatteriesQuery>, QueryRejection>,
) -> ApiResult<Vec<Battery>> {
    let Query(query) = query?;
    let batteries = match query.query.as_deref() {
        Some(q) => match_battery(q).into_iter().cloned().collect(),
        None => BATTERIES.to_vec(),
    };
    Ok(ok(batteries))
}

async fn match_profile(
    State(state): State<ApiState>,
    request: Result<Json<MatchRequest>, JsonRejection>,
) -> ApiResult<MatchResult> {
    let Json(request) = request?;
    let preference = match request.preference.as_deref() {
        Some(raw) => raw.parse::<RetailerPreference>()?,
        None => RetailerPreference::Open,
    };
    let filter = request
        .filter
        .as_deref()
        .map(str::parse::<FilterMode>)
        .transpose()?
        .unwrap_or_default();
    let payment_model = request
        .payment_model
        .as_deref()
        .map(str::parse::<PaymentModel>)
        .transpose()?;
    let profile = UserProfile::new(request.battery, request.location, request.solar, preference);
    profile.validate()?;

    Ok(ok(rank_profile(
        &state.registry,
        profile,
        filter,
        payment_model,
        &state.config.matching,
    )))
}

async fn detect(request: Result<Json<TextRequest>, JsonRejection>) -> ApiResult<ChatSignals> {
    let Json(request) = request?;
    Ok(ok(detect_signals(&request.text)))
}

async fn qualify(
    State(state): State<ApiState>,
    request: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<RankedReply> {
    let Json(request) = request?;
    Ok(ok(rank_reply(
        &state.registry,
        &request.text,
        &state.config.matching,
    )))
}

async fn chat(
    State(state): State<ApiState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<RankedReply> {
    let Some(client) = state.chat.as_ref() else {
        return Err(ApiError::unavailable("chat relay is not configured"));
    };
    let Json(request) = request?;
    if request.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }
    let reply = client
        .complete(&state.system_prompt, &request.messages)
        .await
        .map_err(|error| {
            warn!("chat relay failed: {error:#}");
            ApiError::bad_gateway(format!("{error:#}"))
        })?;
    Ok(ok(rank_reply(&state.registry, &reply, &state.config.matching)))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_maps_to_not_found() {
        let error = ApiError::from(MatchError::UnknownProgram("nope".to_string()));
        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert!(error.message.contains("nope"));

        let error = ApiError::from(MatchError::EmptyBattery);
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn shared_system_prompt_lists_catalog() {
        let state = ApiState::new(Config::default(), ProgramRegistry::with_defaults(), None);
        assert!(state.system_prompt.contains("Amber Electric"));
        assert!(state.chat.is_none());
    }
}
