//! Fake eBird API and species pages served from a local axum router

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router};
use forthebirds::{PlannerConfig, TripPlanner};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct FakeEbird {
    requests: Mutex<Vec<Recorded>>,
    observations: HashMap<String, Value>,
    species_pages: HashMap<String, String>,
    failing: HashSet<String>,
}

impl FakeEbird {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for an observation path such as `/data/obs/US-NY/recent`
    pub fn observations(mut self, api_path: &str, rows: Value) -> Self {
        self.observations.insert(api_path.to_string(), rows);
        self
    }

    /// Serve a species page whose description metadata is `blurb`
    pub fn species_page(mut self, code: &str, blurb: &str) -> Self {
        let html = format!(
            r#"<!doctype html><html><head>
<title>{code} - eBird</title>
<meta property="og:description" content="{blurb}">
</head><body><h1>{code}</h1></body></html>"#
        );
        self.species_pages.insert(code.to_string(), html);
        self
    }

    /// Serve a species page with no identification paragraph
    pub fn bare_species_page(mut self, code: &str) -> Self {
        self.species_pages.insert(
            code.to_string(),
            "<html><head><title>Nothing here</title></head></html>".to_string(),
        );
        self
    }

    /// Answer 500 for an exact request path (including the `/v2` prefix)
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub async fn spawn(self) -> (String, Arc<FakeEbird>) {
        let fake = Arc::new(self);
        let router = Router::new().fallback(handle).with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}", addr), fake)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.paths().iter().filter(|p| p.starts_with(prefix)).count()
    }

    /// The single request made to `path`
    pub fn only_request_to(&self, path: &str) -> Recorded {
        let matching: Vec<Recorded> = self
            .requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect();
        assert_eq!(matching.len(), 1, "requests to {}: {:?}", path, self.paths());
        matching.into_iter().next().unwrap()
    }
}

async fn handle(State(fake): State<Arc<FakeEbird>>, headers: HeaderMap, uri: Uri) -> Response {
    let path = uri.path().to_string();
    let token = headers
        .get("x-ebirdapitoken")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    fake.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        query: uri.query().map(str::to_string),
        token: token.clone(),
    });

    if fake.failing.contains(&path) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if let Some(code) = path.strip_prefix("/species/") {
        return match fake.species_pages.get(code) {
            Some(html) => Html(html.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }

    let api_path = match path.strip_prefix("/v2") {
        Some(p) => p,
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    if token.as_deref() != Some(TOKEN) {
        return StatusCode::FORBIDDEN.into_response();
    }

    if let Some(body) = reference_data(api_path) {
        return Json(body).into_response();
    }

    if api_path.starts_with("/data/obs/") {
        let mut rows = fake
            .observations
            .get(api_path)
            .cloned()
            .unwrap_or_else(|| json!([]));
        if let (Some(max), Some(list)) = (max_results(uri.query()), rows.as_array_mut()) {
            list.truncate(max);
        }
        return Json(rows).into_response();
    }

    StatusCode::NOT_FOUND.into_response()
}

fn max_results(query: Option<&str>) -> Option<usize> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("maxResults="))
        .and_then(|v| v.parse().ok())
}

fn reference_data(api_path: &str) -> Option<Value> {
    let body = match api_path {
        "/ref/region/list/country/world" => json!([
            {"code": "CA", "name": "Canada"},
            {"code": "GE", "name": "Georgia"},
            {"code": "US", "name": "United States"},
        ]),
        "/ref/region/list/subnational1/US" => json!([
            {"code": "US-GA", "name": "Georgia"},
            {"code": "US-NJ", "name": "New Jersey"},
            {"code": "US-NY", "name": "New York"},
        ]),
        "/ref/region/list/subnational1/CA" => json!([
            {"code": "CA-ON", "name": "Ontario"},
        ]),
        "/ref/region/list/subnational2/US-NY" => json!([
            {"code": "US-NY-047", "name": "Kings"},
            {"code": "US-NY-061", "name": "New York"},
            {"code": "US-NY-081", "name": "Queens"},
        ]),
        "/ref/hotspot/US-NY" => json!([
            hotspot("L109516", "Prospect Park", "US-NY-047", 285),
            hotspot("L109145", "Jamaica Bay Wildlife Refuge", "US-NY-081", 331),
            hotspot("L1000001", "Town Park", "US-NY-047", 40),
            hotspot("L1000002", "Town Park", "US-NY-081", 52),
        ]),
        "/ref/hotspot/US-NY-047" => json!([
            hotspot("L109516", "Prospect Park", "US-NY-047", 285),
            hotspot("L1000001", "Town Park", "US-NY-047", 40),
        ]),
        _ => return None,
    };
    Some(body)
}

fn hotspot(code: &str, name: &str, substate: &str, species: u32) -> Value {
    json!({
        "locId": code,
        "locName": name,
        "countryCode": "US",
        "subnational1Code": "US-NY",
        "subnational2Code": substate,
        "lat": 40.66,
        "lng": -73.97,
        "latestObsDt": "2024-03-14 18:45",
        "numSpeciesAllTime": species,
    })
}

/// One observation row as the API returns it
pub fn obs(
    species_code: &str,
    com_name: &str,
    loc_id: &str,
    obs_dt: &str,
    how_many: Option<u32>,
) -> Value {
    json!({
        "speciesCode": species_code,
        "comName": com_name,
        "sciName": format!("Sci {}", species_code),
        "locId": loc_id,
        "locName": format!("Place {}", loc_id),
        "obsDt": obs_dt,
        "howMany": how_many,
        "lat": 40.6602,
        "lng": -73.969,
        "obsValid": true,
        "obsReviewed": false,
        "locationPrivate": false,
        "subId": "S100",
    })
}

pub fn config(base: &str, country: &str, state: &str) -> PlannerConfig {
    PlannerConfig::new(TOKEN)
        .with_country(country)
        .with_state(state)
        .with_api_url(&format!("{}/v2", base))
        .with_species_url(&format!("{}/species", base))
}

pub fn planner(base: &str, country: &str, state: &str) -> TripPlanner {
    TripPlanner::new(config(base, country, state)).unwrap()
}
