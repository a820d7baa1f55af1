use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    CatalogError, ClampRange, GameSession, GameState, JourneyLibrary, JourneySummary, Meter,
    Persona, Preview, Stage,
};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppState {
    library: Arc<JourneyLibrary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct JourneyQuery {
    persona: Option<Persona>,
}

/// Replay request. The client keeps its own session as the list of option ids
/// it has confirmed so far.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayPayload {
    pub persona: Option<Persona>,
    pub choices: Vec<String>,
    pub preview: Option<String>,
}

/// Query-string form of [`PlayPayload`]; `choices` is comma separated.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlayQuery {
    persona: Option<Persona>,
    choices: Option<String>,
    preview: Option<String>,
}

impl From<PlayQuery> for PlayPayload {
    fn from(value: PlayQuery) -> Self {
        let choices = value
            .choices
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
            .collect();
        Self {
            persona: value.persona,
            choices,
            preview: value.preview,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterInfo {
    pub meter: Meter,
    pub label: &'static str,
    pub range: ClampRange,
    pub currency: bool,
    pub start: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaInfo {
    pub id: Persona,
    pub name: &'static str,
    pub stage_count: usize,
    pub meters: Vec<MeterInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JourneyResponse<'a> {
    persona: Persona,
    name: &'static str,
    starting_state: GameState,
    stages: &'a [Stage],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub persona: Persona,
    pub state: GameState,
    pub complete: bool,
    pub current_stage: Option<Stage>,
    pub preview: Option<Preview>,
    pub summary: Option<JourneySummary>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn persona_infos(library: &JourneyLibrary) -> Vec<PersonaInfo> {
    library
        .iter()
        .map(|journey| PersonaInfo {
            id: journey.persona(),
            name: journey.persona().name(),
            stage_count: journey.stages().len(),
            meters: journey
                .schema()
                .meters()
                .iter()
                .map(|&meter| MeterInfo {
                    meter,
                    label: meter.label(),
                    range: meter.clamp_range(),
                    currency: meter.is_currency(),
                    start: journey.starting_meters().get(meter),
                })
                .collect(),
        })
        .collect()
}

/// Replays `payload.choices` from the persona's starting snapshot.
pub fn play(library: &JourneyLibrary, payload: PlayPayload) -> Result<PlayResponse, String> {
    let Some(persona) = payload.persona else {
        return Err("persona is required".to_string());
    };
    let journey = library
        .get(persona)
        .ok_or_else(|| format!("persona {persona} is not loaded"))?;

    let session = GameSession::replay(journey, &payload.choices).map_err(|e| e.to_string())?;
    let preview = payload
        .preview
        .as_deref()
        .map(|option_id| session.preview(option_id))
        .transpose()
        .map_err(|e| e.to_string())?;
    let complete = session.is_complete();

    Ok(PlayResponse {
        persona,
        state: session.state().clone(),
        complete,
        current_stage: session.current_stage().cloned(),
        preview,
        summary: complete.then(|| session.summary()),
    })
}

pub fn router(library: Arc<JourneyLibrary>) -> Router {
    Router::new()
        .route("/api/personas", get(personas_handler))
        .route("/api/journey", get(journey_handler))
        .route("/api/play", get(play_get_handler).post(play_post_handler))
        .fallback(not_found_handler)
        .with_state(AppState { library })
}

pub async fn run_http_server(addr: SocketAddr) -> Result<(), ServeError> {
    let library = Arc::new(JourneyLibrary::load()?);
    let app = router(library);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "FIRE journey HTTP API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn personas_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, persona_infos(&state.library))
}

async fn journey_handler(
    State(state): State<AppState>,
    Query(query): Query<JourneyQuery>,
) -> Response {
    let Some(persona) = query.persona else {
        return error_response(StatusCode::BAD_REQUEST, "persona is required");
    };
    let Some(journey) = state.library.get(persona) else {
        return error_response(StatusCode::NOT_FOUND, "persona is not loaded");
    };

    json_response(
        StatusCode::OK,
        JourneyResponse {
            persona,
            name: persona.name(),
            starting_state: journey.starting_state(),
            stages: journey.stages(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn play_get_handler(
    State(state): State<AppState>,
    Query(query): Query<PlayQuery>,
) -> Response {
    play_handler_impl(&state, query.into())
}

async fn play_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<PlayPayload>,
) -> Response {
    play_handler_impl(&state, payload)
}

fn play_handler_impl(state: &AppState, payload: PlayPayload) -> Response {
    match play(&state.library, payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
