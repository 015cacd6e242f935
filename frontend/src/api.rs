use gloo_net::http::Request;
use serde::Deserialize;
use trip_player_lib::{hotzone::Hotzone, trip_point::TripRecord, Trip};
use web_sys::js_sys::encode_uri_component;

use crate::config::API_BASE;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("no trip id in response")]
    MissingTripId,
}

#[derive(Deserialize)]
struct RandomTripId {
    trip_id: Option<String>,
}

pub async fn make_request<ReturnType>(path: &str) -> Result<ReturnType, ApiError>
where
    ReturnType: serde::de::DeserializeOwned,
{
    let response = Request::get(&format!("{API_BASE}{path}")).send().await?;

    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }

    Ok(response.json::<ReturnType>().await?)
}

/// Points come back in whatever order the provider stores them, `Trip` sorts them.
pub async fn get_trip(trip_id: &str) -> Result<Trip, ApiError> {
    let encoded = String::from(encode_uri_component(trip_id));
    make_request(&format!("/trips/{encoded}")).await
}

pub async fn get_random_trip_id() -> Result<String, ApiError> {
    let response = make_request::<RandomTripId>("/random-trip-id").await?;
    response
        .trip_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingTripId)
}

pub async fn get_hotzones() -> Result<Vec<Hotzone>, ApiError> {
    make_request("/hotzones").await
}

/// One simulated point. It may come back without a position.
pub async fn get_simulated_trip() -> Result<TripRecord, ApiError> {
    make_request("/simulate-trip").await
}
