use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{GeocodeFailure, Geocoder};
use crate::config::GeocoderConfig;
use crate::types::Coordinates;

/// Nominatim 搜索结果中的一项，坐标以字符串给出
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// 基于 Nominatim `/search` 接口的地理编码器
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Coordinates, GeocodeFailure> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeFailure::Service(e.to_string()))?;

        let resp = resp
            .error_for_status()
            .map_err(|e| GeocodeFailure::Service(e.to_string()))?;

        let body = resp
            .text()
            .await
            .map_err(|e| GeocodeFailure::Service(e.to_string()))?;

        parse_search_response(place, &body)
    }
}

fn parse_search_response(place: &str, body: &str) -> Result<Coordinates, GeocodeFailure> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeFailure::Malformed(e.to_string()))?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeFailure::NotFound(place.to_string()))?;

    let latitude = parse_coordinate(&hit.lat)?;
    let longitude = parse_coordinate(&hit.lon)?;
    Ok(Coordinates {
        latitude,
        longitude,
    })
}

fn parse_coordinate(value: &str) -> Result<f64, GeocodeFailure> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeFailure::Malformed(format!("invalid coordinate {:?}", value)))
}
