/*!
crashmap REST server

Serves the dashboard page and the chart endpoints backing it.

## Usage

```bash
crashmap-rest --host 127.0.0.1 --port 8080
```

## Endpoints

- `GET /` - Dashboard page
- `GET /api/v1/crosstab` - Heatmap figure for two dimensions
- `GET /api/v1/map` - Map figure for one clicked cross-tab cell
- `GET /api/v1/health` - Health check
- `GET /api/v1/version` - Version information
*/

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crashmap::controller::{crosstab_view, map_view, CellClick};
use crashmap::warehouse::{PostgresWarehouse, WarehouseConfig};
use crashmap::{CrashmapError, Dimension, VERSION};

/// CLI arguments for the dashboard server
#[derive(Parser)]
#[command(name = "crashmap-rest")]
#[command(about = "Grand Rapids traffic-accident dashboard server")]
#[command(version = VERSION)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind to
    #[arg(long, default_value = "8080")]
    port: u16,

    /// CORS allowed origins (comma-separated)
    #[arg(long, default_value = "*")]
    cors_origin: String,
}

/// Shared application state
///
/// One warehouse session for the whole process, wrapped in `Arc<Mutex>`
/// since the pg client is blocking and not `Sync`. The session is only
/// ever replaced wholesale, inside the lock, by the reconnect path.
#[derive(Clone)]
struct AppState {
    warehouse: Arc<Mutex<PostgresWarehouse>>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for /api/v1/crosstab
#[derive(Debug, Deserialize)]
struct CrosstabParams {
    /// X-axis dimension label
    x: String,
    /// Y-axis dimension label
    y: String,
}

/// Query parameters for /api/v1/map
///
/// `x_value`/`y_value` carry the clicked cross-tab cell; both absent
/// means no click has happened yet and the placeholder map is returned.
#[derive(Debug, Deserialize)]
struct MapParams {
    x: String,
    y: String,
    x_value: Option<f64>,
    y_value: Option<f64>,
}

/// Error API response
#[derive(Debug, Serialize)]
struct ApiError {
    status: String,
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Version response
#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
    dimensions: Vec<String>,
}

// ============================================================================
// Error Handling
// ============================================================================

/// Custom error type for API responses
struct ApiErrorResponse {
    status: StatusCode,
    error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let json = Json(self.error);
        (self.status, json).into_response()
    }
}

impl From<CrashmapError> for ApiErrorResponse {
    fn from(err: CrashmapError) -> Self {
        let (status, error_type) = match &err {
            CrashmapError::UnknownDimension(_) => (StatusCode::BAD_REQUEST, "UnknownDimension"),
            CrashmapError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
            CrashmapError::Connection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConnectionError"),
            CrashmapError::Query(_) => (StatusCode::INTERNAL_SERVER_ERROR, "QueryError"),
            CrashmapError::Chart(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ChartError"),
            CrashmapError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        ApiErrorResponse {
            status,
            error: ApiError {
                status: "error".to_string(),
                error: ErrorDetails {
                    message: err.to_string(),
                    error_type: error_type.to_string(),
                },
            },
        }
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET / - Dashboard page
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// GET /api/v1/crosstab - Heatmap figure for two dimensions
async fn crosstab_handler(
    State(state): State<AppState>,
    Query(params): Query<CrosstabParams>,
) -> Result<Json<serde_json::Value>, ApiErrorResponse> {
    let x: Dimension = params.x.parse()?;
    let y: Dimension = params.y.parse()?;
    info!(x = %x, y = %y, "building cross-tab figure");

    let mut warehouse = state
        .warehouse
        .lock()
        .map_err(|e| CrashmapError::Internal(format!("failed to lock warehouse: {e}")))?;

    let fig = crosstab_view(&mut *warehouse, x, y)?;
    Ok(Json(fig))
}

/// GET /api/v1/map - Map figure for one clicked cross-tab cell
async fn map_handler(
    State(state): State<AppState>,
    Query(params): Query<MapParams>,
) -> Result<Json<serde_json::Value>, ApiErrorResponse> {
    let x: Dimension = params.x.parse()?;
    let y: Dimension = params.y.parse()?;

    let click = match (params.x_value, params.y_value) {
        (Some(cx), Some(cy)) => Some(CellClick { x: cx, y: cy }),
        _ => None,
    };
    info!(x = %x, y = %y, clicked = click.is_some(), "building map figure");

    let mut warehouse = state
        .warehouse
        .lock()
        .map_err(|e| CrashmapError::Internal(format!("failed to lock warehouse: {e}")))?;

    let fig = map_view(&mut *warehouse, click, x, y)?;
    Ok(Json(fig))
}

/// GET /api/v1/health - Health check
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

/// GET /api/v1/version - Version information
async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: VERSION.to_string(),
        dimensions: Dimension::ALL.iter().map(|d| d.label().to_string()).collect(),
    })
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crashmap_rest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Fail fast on missing credentials, then open the one warehouse
    // session the process will hold.
    let config = WarehouseConfig::from_env()?;
    info!(user = %config.user, pool = %config.pool, "connecting to crash warehouse");
    let warehouse = PostgresWarehouse::connect(config)?;

    let state = AppState {
        warehouse: Arc::new(Mutex::new(warehouse)),
    };

    // Configure CORS
    let cors = if cli.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    } else {
        let origins: Vec<_> = cli
            .cors_origin
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    };

    // Build router
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/v1/crosstab", get(crosstab_handler))
        .route("/api/v1/map", get(map_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/version", get(version_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;

    info!("Starting crashmap dashboard server on {}", addr);
    info!("  GET  /                - dashboard");
    info!("  GET  /api/v1/crosstab - heatmap figure");
    info!("  GET  /api/v1/map      - map figure");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
