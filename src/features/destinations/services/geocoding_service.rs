use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::features::destinations::models::Coordinate;

/// Why an address could not be turned into a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeFailure {
    #[error("no location matches the address")]
    NotFound,
    #[error("geocoder unavailable: {0}")]
    Adapter(String),
}

/// Resolves free-text addresses into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> std::result::Result<Coordinate, GeocodeFailure>;
}

/// Nominatim API response structure
#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    #[allow(dead_code)]
    pub place_id: Option<i64>,
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

/// Geocoder backed by Nominatim's free-form search
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country_codes: config.country_codes.clone(),
        })
    }

    fn search_url(&self, address: &str) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        );
        if let Some(codes) = &self.country_codes {
            url.push_str("&countrycodes=");
            url.push_str(&urlencoding::encode(codes));
        }
        url
    }

    /// Execute HTTP request to Nominatim and parse response
    async fn execute_request(
        &self,
        url: &str,
    ) -> std::result::Result<Vec<NominatimResponse>, GeocodeFailure> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            GeocodeFailure::Adapter(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Err(GeocodeFailure::Adapter(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {:?}", e);
            GeocodeFailure::Adapter(format!("Failed to parse Nominatim response: {}", e))
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> std::result::Result<Coordinate, GeocodeFailure> {
        let url = self.search_url(address);
        tracing::debug!("Geocoding (free-form): {} -> {}", address, url);

        let results = self.execute_request(&url).await?;
        first_coordinate(results)
    }
}

/// Pick the best (first) match and convert it into a coordinate
fn first_coordinate(
    results: Vec<NominatimResponse>,
) -> std::result::Result<Coordinate, GeocodeFailure> {
    let best = results.into_iter().next().ok_or(GeocodeFailure::NotFound)?;

    let (lat, lon) = match (best.lat.trim().parse::<f64>(), best.lon.trim().parse::<f64>()) {
        (Ok(lat), Ok(lon)) => (lat, lon),
        _ => return Err(GeocodeFailure::NotFound),
    };

    tracing::debug!(
        "Nominatim match: {} ({}, {})",
        best.display_name.as_deref().unwrap_or("-"),
        lat,
        lon
    );

    Coordinate::new(lat, lon).ok_or_else(|| {
        GeocodeFailure::Adapter(format!("Coordinate out of range: ({}, {})", lat, lon))
    })
}
