//! HTTP front for the radar catalog: loads the static JSON once, builds
//! the index, and answers `/api/search` with the filtered record set and
//! its map-point projection.
//!
//! A failed catalog load is not fatal: the server comes up with an empty
//! store and serves zero hits, per the degraded-load contract.

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use radar_search::constants::DEFAULT_DATA_PATH;
use radar_search::filter::{countries_available, FacetSelection};
use radar_search::index::SearchIndex;
use radar_search::normalize::{normalize_band_str, normalize_status_str};
use radar_search::record::{RadarRecord, RecordStore};
use radar_search::search::search;
use radar_search::view::{bounds, project, Bounds, MapPoint};

/// Read-only per-process catalog state, derived once at startup.
struct Catalog {
    store: RecordStore,
    index: SearchIndex,
    countries: Vec<String>,
}

type AppState = Arc<Catalog>;

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    /// Comma-separated band codes, free text (e.g. `band=C,s-band`).
    band: Option<String>,
    /// Comma-separated status labels, free text.
    status: Option<String>,
    country: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    hits: usize,
    results: Vec<RadarRecord>,
    points: Vec<MapPoint>,
    bounds: Option<Bounds>,
}

fn selection_from(params: &SearchParams) -> FacetSelection {
    let mut selection = FacetSelection::default();
    if let Some(bands) = params.band.as_deref() {
        selection.bands = bands.split(',').filter_map(normalize_band_str).collect();
    }
    if let Some(statuses) = params.status.as_deref() {
        selection.statuses = statuses.split(',').filter_map(normalize_status_str).collect();
    }
    selection.country = params.country.clone().filter(|c| !c.is_empty());
    selection
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let store = match RecordStore::load(&path) {
        Ok(store) => {
            info!(records = store.len(), %path, "catalog loaded");
            store
        }
        Err(e) => {
            warn!(%path, error = %e, "catalog load failed; serving an empty store");
            RecordStore::default()
        }
    };

    let index = SearchIndex::build(store.records());
    let countries = countries_available(store.records());
    let state = Arc::new(Catalog { store, index, countries });

    let app = Router::new()
        .route("/", get(serve_frontend))
        .route("/api/search", get(search_api))
        .route("/api/countries", get(countries_api))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    info!("server running at http://127.0.0.1:3000");

    axum::serve(listener, app).await.unwrap();
}

async fn serve_frontend() -> Html<String> {
    let html = fs::read_to_string("index.html").unwrap_or_else(|_| {
        "<h1>Error: index.html not found in the project root!</h1>".to_string()
    });
    Html(html)
}

async fn search_api(
    State(catalog): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let query = params.q.as_deref().unwrap_or("");
    let selection = selection_from(&params);

    let matched = search(query, catalog.store.records(), &catalog.index);
    let results = selection.apply(matched);
    let points = project(&results);
    let bounds = bounds(&points);

    Json(SearchResponse {
        hits: results.len(),
        results: results.into_iter().cloned().collect(),
        points,
        bounds,
    })
}

async fn countries_api(State(catalog): State<AppState>) -> Json<Vec<String>> {
    Json(catalog.countries.clone())
}
