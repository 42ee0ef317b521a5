//! Routing provider abstraction.
//!
//! All Google Directions API specifics are isolated in this module so
//! endpoint changes are easy to fix. The rest of the crate talks to the
//! [`DirectionsClient`] trait only.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// The Directions API endpoint.
const DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Request timeout for a single routing query.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a single routing query.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// The provider answered, but with a non-OK status.
    #[error("direction request failed: {status} - {message:?}")]
    Provider {
        status: String,
        message: Option<String>,
    },

    /// Network or transport failure (including body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Status was OK but the response carried no route or leg.
    #[error("provider returned no routes")]
    EmptyResponse,
}

/// When to depart for a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Current wall-clock time, resolved when the query is sent.
    Now,
    /// Explicit departure, epoch seconds.
    At(i64),
}

/// One routing query, constructed per sample.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub departure: Departure,
}

/// A single step of the returned route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    /// Turn instruction, HTML markup stripped.
    pub instruction: String,
    pub distance_text: String,
    pub duration_text: String,
}

/// The route summary for one origin/destination/departure triple.
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub distance_text: String,
    pub duration_text: String,
    /// Traffic-adjusted duration; falls back to `duration_text` when the
    /// provider omits it.
    pub duration_in_traffic_text: String,
    pub start_address: String,
    pub end_address: String,
    pub steps: Vec<RouteStep>,
}

/// Abstract routing capability.
///
/// One outbound query per `fetch` call; no caching, no retry.
#[async_trait]
pub trait DirectionsClient: Send + Sync {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResult, DirectionsError>;
}

// ── Google Directions API response types ────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    distance: ApiText,
    duration: ApiText,
    duration_in_traffic: Option<ApiText>,
    start_address: String,
    end_address: String,
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    html_instructions: String,
    distance: ApiText,
    duration: ApiText,
}

/// Strip HTML markup from a step instruction.
fn strip_html(text: &str) -> String {
    let re_tags = Regex::new(r"<[^>]+>").unwrap();
    re_tags.replace_all(text, "").into_owned()
}

// ── Google client ───────────────────────────────────────────────────────────

/// Routing client backed by the Google Directions API.
///
/// The API key is threaded in at construction; nothing in the query path
/// reads the environment.
pub struct GoogleDirectionsClient {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, api_key })
    }
}

/// Epoch seconds to send as `departure_time`.
///
/// `Now` resolves at call time, not request-construction time.
fn departure_epoch(departure: Departure) -> i64 {
    match departure {
        Departure::Now => Utc::now().timestamp(),
        Departure::At(epoch) => epoch,
    }
}

/// Reduce a provider response to the single route summary.
///
/// A non-OK status is a provider error; an OK status without a route or
/// leg is `EmptyResponse`. When the traffic-adjusted duration is absent,
/// the plain duration text stands in for it.
fn route_result_from(body: DirectionsResponse) -> Result<RouteResult, DirectionsError> {
    if body.status != "OK" {
        return Err(DirectionsError::Provider {
            status: body.status,
            message: body.error_message,
        });
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::EmptyResponse)?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or(DirectionsError::EmptyResponse)?;

    let duration_text = leg.duration.text;
    Ok(RouteResult {
        distance_text: leg.distance.text,
        duration_in_traffic_text: leg
            .duration_in_traffic
            .map(|t| t.text)
            .unwrap_or_else(|| duration_text.clone()),
        duration_text,
        start_address: leg.start_address,
        end_address: leg.end_address,
        steps: leg
            .steps
            .into_iter()
            .map(|s| RouteStep {
                instruction: strip_html(&s.html_instructions),
                distance_text: s.distance.text,
                duration_text: s.duration.text,
            })
            .collect(),
    })
}

#[async_trait]
impl DirectionsClient for GoogleDirectionsClient {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResult, DirectionsError> {
        let departure_time = departure_epoch(query.departure);

        debug!(
            "Querying directions {} -> {} at {}",
            query.origin, query.destination, departure_time
        );

        let response = self
            .client
            .get(DIRECTIONS_ENDPOINT)
            .query(&[
                ("origin", query.origin.as_str()),
                ("destination", query.destination.as_str()),
                ("key", self.api_key.as_str()),
                ("departure_time", departure_time.to_string().as_str()),
                ("traffic_model", "best_guess"),
                ("mode", "driving"),
                ("alternatives", "false"),
            ])
            .send()
            .await?;

        let body: DirectionsResponse = response.json().await?;
        route_result_from(body)
    }
}

// ── Mock client ─────────────────────────────────────────────────────────────

/// A scripted response for [`MockDirectionsClient`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Route(RouteResult),
    /// Provider-level failure with the given status.
    Failure(String),
}

/// In-process client for testing without the network.
///
/// Pops one scripted response per `fetch` call; an exhausted script
/// answers with a provider failure.
#[derive(Default)]
pub struct MockDirectionsClient {
    script: Mutex<VecDeque<MockResponse>>,
}

impl MockDirectionsClient {
    pub fn new(script: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// A route whose only meaningful field is the traffic duration text.
    pub fn route(duration_in_traffic_text: &str) -> MockResponse {
        MockResponse::Route(RouteResult {
            distance_text: "12.4 mi".to_string(),
            duration_text: duration_in_traffic_text.to_string(),
            duration_in_traffic_text: duration_in_traffic_text.to_string(),
            start_address: "Origin St".to_string(),
            end_address: "Destination Ave".to_string(),
            steps: Vec::new(),
        })
    }
}

#[async_trait]
impl DirectionsClient for MockDirectionsClient {
    async fn fetch(&self, _query: &RouteQuery) -> Result<RouteResult, DirectionsError> {
        let next = self.script.lock().expect("mock script lock").pop_front();
        match next {
            Some(MockResponse::Route(route)) => Ok(route),
            Some(MockResponse::Failure(status)) => Err(DirectionsError::Provider {
                status,
                message: None,
            }),
            None => Err(DirectionsError::Provider {
                status: "SCRIPT_EXHAUSTED".to_string(),
                message: None,
            }),
        }
    }
}
