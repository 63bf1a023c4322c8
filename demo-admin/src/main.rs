use std::sync::Arc;

use axum::{Json, Router, routing::get};
use dotenvy::dotenv;
use serde_json::{Value, json};

use nexalaris_axum::{AppState, NX_ROUTE_PREFIX, nexalaris_router};

mod server;
use server::{init_tracing, spawn_http_server};

async fn index() -> Json<Value> {
    Json(json!({
        "service": "nexalaris demo",
        "api": NX_ROUTE_PREFIX.as_str(),
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("demo_admin");

    dotenv().ok();
    nexalaris_axum::init().await?;

    let state = Arc::new(AppState::from_env());
    let app = Router::new()
        .route("/", get(index))
        .nest(NX_ROUTE_PREFIX.as_str(), nexalaris_router(state));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let http_server = spawn_http_server(port, app);
    http_server.await?;
    Ok(())
}
