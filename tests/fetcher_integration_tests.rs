//! Integration Tests for the read-through fetcher and REPL session
//!
//! Runs a mock PokeAPI with axum on an ephemeral port and drives the
//! session against it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;

use pokedex::{Cache, Command, Config, PokeClient, PokedexError, Session};

const AREAS: [&str; 4] = [
    "canalave-city-area",
    "eterna-city-area",
    "pastoria-city-area",
    "sunyshore-city-area",
];
const PAGE_SIZE: usize = 2;

// == Mock PokeAPI ==

#[derive(Clone)]
struct MockState {
    base: String,
    requests: Arc<AtomicUsize>,
}

#[derive(Deserialize)]
struct PageQuery {
    offset: Option<usize>,
}

async fn location_areas(
    State(state): State<MockState>,
    Query(query): Query<PageQuery>,
) -> Json<serde_json::Value> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let offset = query.offset.unwrap_or(0);
    let page_url = |offset: usize| {
        format!("{}location-area/?offset={}&limit={}", state.base, offset, PAGE_SIZE)
    };

    let results: Vec<_> = AREAS
        .iter()
        .enumerate()
        .skip(offset)
        .take(PAGE_SIZE)
        .map(|(i, name)| json!({"name": name, "url": format!("{}location-area/{}/", state.base, i + 1)}))
        .collect();
    let next = (offset + PAGE_SIZE < AREAS.len()).then(|| page_url(offset + PAGE_SIZE));
    let previous = (offset > 0).then(|| page_url(offset.saturating_sub(PAGE_SIZE)));

    Json(json!({
        "count": AREAS.len(),
        "next": next,
        "previous": previous,
        "results": results,
    }))
}

async fn location_area(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        "pastoria-city-area" => (
            StatusCode::OK,
            Json(json!({
                "name": "pastoria-city-area",
                "pokemon_encounters": [
                    {"pokemon": {"name": "tentacool", "url": ""}},
                    {"pokemon": {"name": "magikarp", "url": ""}}
                ]
            })),
        )
            .into_response(),
        "broken-area" => (StatusCode::OK, "{ not json").into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn pokemon(State(state): State<MockState>, Path(name): Path<String>) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        "magikarp" => (
            StatusCode::OK,
            Json(json!({
                "id": 129,
                "name": "magikarp",
                "base_experience": 0,
                "height": 9,
                "weight": 100,
                "stats": [{"base_stat": 20, "stat": {"name": "hp", "url": ""}}],
                "types": [{"slot": 1, "type": {"name": "water", "url": ""}}]
            })),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn spawn_mock_api() -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api/v2/", listener.local_addr().unwrap());
    let requests = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        base: base.clone(),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/v2/location-area/", get(location_areas))
        .route("/api/v2/location-area/:name/", get(location_area))
        .route("/api/v2/pokemon/:name", get(pokemon))
        .with_state(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base, requests)
}

// == Helper Functions ==

async fn create_session(interval: Duration) -> (Session, Cache, Arc<AtomicUsize>) {
    let (base, requests) = spawn_mock_api().await;
    let config = Config {
        api_base_url: base,
        ..Config::default()
    };
    let cache = Cache::new(interval).unwrap();
    let client = PokeClient::new(&config, cache.clone()).unwrap();
    let session = Session::with_rng(client, StdRng::seed_from_u64(42));
    (session, cache, requests)
}

async fn run(session: &mut Session, command: Command) -> Result<String, PokedexError> {
    let mut out = Vec::new();
    session.execute(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

// == Paging ==

#[tokio::test]
async fn test_map_pages_forward_and_back() {
    let (mut session, cache, _) = create_session(Duration::from_secs(60)).await;

    let first = run(&mut session, Command::Map).await.unwrap();
    assert_eq!(first, "canalave-city-area\neterna-city-area\n");

    let second = run(&mut session, Command::Map).await.unwrap();
    assert_eq!(second, "pastoria-city-area\nsunyshore-city-area\n");

    let last_page = run(&mut session, Command::Map).await;
    assert!(matches!(last_page, Err(PokedexError::NoNextPage)));

    let back = run(&mut session, Command::MapBack).await.unwrap();
    assert_eq!(back, "canalave-city-area\neterna-city-area\n");

    let first_page = run(&mut session, Command::MapBack).await;
    assert!(matches!(first_page, Err(PokedexError::NoPreviousPage)));

    cache.shutdown().await;
}

// == Read-through caching ==

#[tokio::test]
async fn test_repeated_lookup_served_from_cache() {
    let (mut session, cache, requests) = create_session(Duration::from_secs(60)).await;
    let explore = || Command::Explore("pastoria-city-area".to_string());

    let first = run(&mut session, explore()).await.unwrap();
    let second = run(&mut session, explore()).await.unwrap();

    assert_eq!(first, second);
    assert!(first.contains(" - tentacool\n - magikarp\n"));
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.total_entries, 1);
    cache.shutdown().await;
}

#[tokio::test]
async fn test_cache_key_is_full_url() {
    let (session, cache, _) = create_session(Duration::from_secs(60)).await;
    let client = session.client();

    client.pokemon("magikarp").await.unwrap();

    assert!(cache.get(&client.pokemon_url("magikarp")).unwrap().is_some());
    cache.shutdown().await;
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let (mut session, cache, requests) = create_session(Duration::from_millis(50)).await;
    let explore = || Command::Explore("pastoria-city-area".to_string());

    run(&mut session, explore()).await.unwrap();
    // Two sweeps past the entry's interval
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(cache.is_empty());
    run(&mut session, explore()).await.unwrap();

    assert_eq!(requests.load(Ordering::SeqCst), 2);
    cache.shutdown().await;
}

// == Failures ==

#[tokio::test]
async fn test_not_found_is_reported_and_not_cached() {
    let (mut session, cache, requests) = create_session(Duration::from_secs(60)).await;

    for _ in 0..2 {
        let result = run(&mut session, Command::Catch("missingno".to_string())).await;
        assert!(matches!(result, Err(PokedexError::Status { status: 404, .. })));
    }

    assert_eq!(requests.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
    cache.shutdown().await;
}

#[tokio::test]
async fn test_undecodable_body_is_not_cached() {
    let (mut session, cache, _) = create_session(Duration::from_secs(60)).await;

    let result = run(&mut session, Command::Explore("broken-area".to_string())).await;

    assert!(matches!(result, Err(PokedexError::Decode(_))));
    assert!(cache.is_empty());
    cache.shutdown().await;
}

// == Catch and inspect ==

#[tokio::test]
async fn test_catch_then_inspect() {
    let (mut session, cache, _) = create_session(Duration::from_secs(60)).await;

    let inspect_early = run(&mut session, Command::Inspect("magikarp".to_string())).await;
    assert!(matches!(inspect_early, Err(PokedexError::NotCaught(_))));

    // Zero base experience is a guaranteed catch
    let caught = run(&mut session, Command::Catch("magikarp".to_string())).await.unwrap();
    assert!(caught.contains("magikarp was caught!"));

    let details = run(&mut session, Command::Inspect("magikarp".to_string())).await.unwrap();
    assert!(details.contains("Name: magikarp\nHeight: 9\nWeight: 100\n"));
    assert!(details.contains("  -hp: 20\n"));
    assert!(details.contains("  - water\n"));

    let listing = run(&mut session, Command::Pokedex).await.unwrap();
    assert!(listing.contains(" - magikarp (caught "));
    cache.shutdown().await;
}
