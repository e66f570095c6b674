use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CoordinateToken, NominatimPlace};
use reqwest::Client;
use std::time::Duration;

/// Resolves place names to map coordinates through a nominatim-compatible service.
#[derive(Clone)]
pub struct GeocoderService {
    client: Client,
    base_url: String,
}

impl GeocoderService {
    /// Creates a new `GeocoderService`.
    ///
    /// The client carries the configured `User-Agent` (nominatim rejects
    /// anonymous traffic) and the geocoder timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocoder_timeout_secs))
            .user_agent(config.geocoder_user_agent.clone())
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create geocoder client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.geocoder_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Looks up `place_name` and returns the coordinate token for the best match.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - the service has no match for the name.
    /// * `AppError::Transport` - network failure or timeout.
    /// * `AppError::Provider` - non-2xx status or an unreadable body.
    pub async fn resolve(&self, place_name: &str, zoom: u8) -> Result<CoordinateToken, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("q", place_name), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| AppError::Provider(format!("Failed to build geocoder URL: {}", e)))?;

        tracing::info!("Geocoding '{}'", place_name);

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en")
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Geocoder request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Geocoder returned error {}: {}", status, error_text);
            return Err(AppError::Provider(format!(
                "Geocoder returned status {}: {}",
                status, error_text
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            AppError::Provider(format!("Failed to parse geocoder response: {}", e))
        })?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("City not found: {}", place_name)))?;

        let display_name = place.display_name.unwrap_or_default();
        let token = CoordinateToken::new(place.lat, place.lon, zoom);
        tracing::debug!(
            "Geocoded '{}' to {},{} ({})",
            place_name,
            token.latitude(),
            token.longitude(),
            display_name
        );

        Ok(token)
    }
}
