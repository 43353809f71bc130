use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use sleigh_packer::score::{Score, score};
use sleigh_packer::types::deserialize_u32_from_number;
use sleigh_packer::{Catalog, Finding, IdOrder, Item, PackConfig, Solver, VertexRow, Validator};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    #[serde(default)]
    config: PackConfig,
    items: Vec<ItemRequest>,
    #[serde(default)]
    order: IdOrder,
}

#[derive(Deserialize, Serialize)]
struct ItemRequest {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    id: u32,
    dims: [u32; 3],
}

#[derive(Serialize)]
struct PackResponse {
    layer_count: usize,
    score: Score,
    findings: Vec<Finding>,
    placements: Vec<VertexRow>,
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        items = req.items.len(),
        config = serde_json::to_string(&req.config).unwrap_or_default(),
        "POST /pack"
    );

    if req.config.bounds.max_x == 0 || req.config.bounds.max_y == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "container dimensions must be non-zero".to_string(),
        ));
    }

    let records = req
        .items
        .iter()
        .map(|i| Item::new(i.id, i.dims[0], i.dims[1], i.dims[2]))
        .collect();
    let catalog = Catalog::new(records).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let config = req.config;
    let stack = Solver::new(config)
        .solve(catalog.iter())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let expected = config.expected_count.unwrap_or(catalog.len());
    let report = Validator::new(&catalog, config.bounds, expected).validate(&stack);

    Ok(Json(PackResponse {
        layer_count: stack.layers().len(),
        score: score(&stack),
        findings: report.findings,
        placements: stack.vertex_rows(req.order).collect(),
    }))
}

#[tokio::main]
async fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    // No-op client when SENTRY_DSN is unset.
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
