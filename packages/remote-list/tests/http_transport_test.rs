//! HttpTransport against a local axum server standing in for the public APIs.

mod common;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use common::{character_page, pokemon_json, RecordingRenderer, FIRST_TEN};
use remote_list::{
    presets, BrowserConfig, CharacterStatus, CycleOutcome, FetchError, FilterCriteria,
    HttpTransport, RecordId, Transport,
};
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn pokemon(Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let name = (id as usize)
        .checked_sub(1)
        .and_then(|index| FIRST_TEN.get(index))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(pokemon_json(id, name)))
}

async fn characters(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    if params.get("status").map(String::as_str) == Some("dead") {
        return Err(StatusCode::NOT_FOUND);
    }
    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(character_page(page, 42)))
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/v2/pokemon/:id", get(pokemon))
        .route("/api/character", get(characters))
        .route("/broken", get(|| async { "<html>definitely not json</html>" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({}))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr, catalog_size: u32) -> BrowserConfig {
    BrowserConfig {
        pokeapi_base_url: format!("http://{}/api/v2", addr),
        characters_base_url: format!("http://{}/api", addr),
        catalog_size,
        ..BrowserConfig::default()
    }
}

fn transport(timeout: Duration) -> HttpTransport {
    HttpTransport::new(timeout, "remote-list-tests").unwrap()
}

fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{}{}", addr, path)).unwrap()
}

#[tokio::test]
async fn test_get_json_ok() {
    let addr = spawn_server().await;
    let body = transport(Duration::from_secs(5))
        .get_json(&url(addr, "/api/v2/pokemon/1"))
        .await
        .unwrap();
    assert_eq!(body["name"], "bulbasaur");
}

#[tokio::test]
async fn test_error_classification() {
    let addr = spawn_server().await;
    let http = transport(Duration::from_millis(300));

    let err = http
        .get_json(&url(addr, "/api/v2/pokemon/99"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = http.get_json(&url(addr, "/broken")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }), "{:?}", err);

    let err = http.get_json(&url(addr, "/slow")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // grab a free port and close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(Duration::from_secs(2))
        .get_json(&url(addr, "/api/v2/pokemon/1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_pokedex_over_http() {
    let addr = spawn_server().await;
    let renderer = RecordingRenderer::new();
    let pipeline = presets::pokedex(
        &config_for(addr, 10),
        Arc::new(transport(Duration::from_secs(5))),
        renderer.clone(),
    )
    .unwrap();

    assert_eq!(pipeline.load().await, CycleOutcome::Applied { records: 10 });
    assert!(pipeline.select(&RecordId::Number(5)));
    assert_eq!(renderer.last_detail().unwrap().name, "charmeleon");

    // 11 is past the served range, so the whole batch goes
    let pipeline = presets::pokedex(
        &config_for(addr, 11),
        Arc::new(transport(Duration::from_secs(5))),
        RecordingRenderer::new(),
    )
    .unwrap();
    assert!(pipeline.load().await.error().is_some());
    assert!(pipeline.records().is_empty());
}

#[tokio::test]
async fn test_characters_over_http() {
    let addr = spawn_server().await;
    let renderer = RecordingRenderer::new();
    let pipeline = presets::characters(
        &config_for(addr, 151),
        Arc::new(transport(Duration::from_secs(5))),
        renderer.clone(),
    )
    .unwrap();

    assert!(pipeline
        .search(FilterCriteria::new().with_name("rick sanchez"))
        .await
        .is_applied());
    let controls = renderer.last_pagination().unwrap().unwrap();
    assert_eq!((controls.current, controls.total), (1, 42));
    assert!(!controls.previous_enabled && controls.next_enabled);

    let outcome = pipeline
        .search(FilterCriteria::new().with_status(CharacterStatus::Dead))
        .await;
    assert_eq!(outcome.error().and_then(FetchError::status), Some(404));
    assert_eq!(renderer.last_error().as_deref(), Some(presets::CHARACTERS_NOT_FOUND));
}
