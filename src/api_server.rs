// Axum API Server Module
//
// Purpose: JSON API over the in-memory plant catalog (symptom, effect, name
// and harvest-month lookup) plus reconciliation of identification results.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use moka::future::Cache;

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::model::PlantRecord;
use crate::months::Month;
use crate::resolver::{IdentificationCandidate, NameResolver};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Identification reconciliations keyed by the candidate list
    pub cache: Cache<String, serde_json::Value>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(10_000) // 10K entries
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            catalog: Arc::new(catalog),
            cache,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading plant catalog...");
        let catalog = config.load_catalog()?;
        tracing::info!("Loaded {} plants", catalog.len());
        Ok(Self::new(catalog))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Selection lists (sorted, distinct)
        .route("/api/symptoms", get(list_symptoms))
        .route("/api/effects", get(list_effects))
        .route("/api/names", get(list_names))
        .route("/api/months", get(list_months))
        .route("/api/stats", get(get_stats))

        // Plant lookups
        .route("/api/plants", get(list_plants))
        .route("/api/plants/by-symptom", get(plants_by_symptom))
        .route("/api/plants/by-effect", get(plants_by_effect))
        .route("/api/plants/by-month", get(plants_by_month))
        .route("/api/plants/:name", get(get_plant))

        // Identification service results -> catalog entries
        .route("/api/identify", post(identify))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "plants": state.catalog.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_symptoms(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(rows_json(state.catalog.list_symptoms()))
}

async fn list_effects(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(rows_json(state.catalog.list_effects()))
}

async fn list_names(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(rows_json(state.catalog.list_names()))
}

async fn list_months() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "rows": Month::ALL.len(),
        "data": Month::ALL,
        "current": Month::current(),
    }))
}

async fn get_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!(state.catalog.stats()))
}

async fn list_plants(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(rows_json(state.catalog.records()))
}

async fn plants_by_symptom(
    State(state): State<AppState>,
    Query(params): Query<SymptomQuery>,
) -> Json<serde_json::Value> {
    let symptom = params.symptom.unwrap_or_default();
    let results = state.catalog.find_by_symptom(&symptom);
    tracing::debug!("Symptom '{}' matched {} plants", symptom, results.len());
    Json(records_json(&results))
}

async fn plants_by_effect(
    State(state): State<AppState>,
    Query(params): Query<EffectQuery>,
) -> Json<serde_json::Value> {
    let effect = params.effect.unwrap_or_default();
    let results = state.catalog.find_by_effect(&effect);
    tracing::debug!("Effect '{}' matched {} plants", effect, results.len());
    Json(records_json(&results))
}

/// Harvest-month lookup; defaults to the current month
async fn plants_by_month(
    State(state): State<AppState>,
    Query(params): Query<MonthQuery>,
) -> Json<serde_json::Value> {
    let month = params
        .month
        .unwrap_or_else(|| Month::current().name().to_string());
    let results = state.catalog.find_by_harvest_month_name(&month);
    tracing::debug!("Month '{}' matched {} plants", month, results.len());

    let mut body = records_json(&results);
    body["month"] = serde_json::Value::from(month);
    Json(body)
}

async fn get_plant(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let plant = state
        .catalog
        .find_by_name(&name)
        .ok_or_else(|| AppError::NotFound(format!("Plant '{}' not found", name)))?;

    Ok(Json(serde_json::json!(plant)))
}

async fn identify(
    State(state): State<AppState>,
    Json(request): Json<IdentifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("identify:{:?}", request.candidates);

    // Check cache
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for identification reconciliation");
        return Ok(Json(cached));
    }

    let start = std::time::Instant::now();
    let resolver = NameResolver::new(&state.catalog);
    let reconciled = resolver.reconcile(&request.candidates);
    let matched = reconciled.iter().filter(|r| r.record.is_some()).count();
    tracing::debug!(
        "Reconciled {} candidates ({} matched) in {:?}",
        reconciled.len(),
        matched,
        start.elapsed()
    );

    let data = serde_json::to_value(&reconciled)
        .map_err(|e| AppError::Internal(format!("JSON encode error: {}", e)))?;
    let result = serde_json::json!({
        "rows": reconciled.len(),
        "matched": matched,
        "data": data,
    });

    // Cache result
    state.cache.insert(cache_key, result.clone()).await;

    Ok(Json(result))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct SymptomQuery {
    symptom: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct EffectQuery {
    effect: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct MonthQuery {
    month: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct IdentifyRequest {
    candidates: Vec<IdentificationCandidate>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn rows_json<T: serde::Serialize>(rows: &[T]) -> serde_json::Value {
    serde_json::json!({
        "rows": rows.len(),
        "data": rows,
    })
}

fn records_json(records: &[&PlantRecord]) -> serde_json::Value {
    rows_json(records)
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Internal(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
