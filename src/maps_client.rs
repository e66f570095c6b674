use crate::config::Config;
use crate::errors::AppError;
use crate::models::{BusinessRecord, CoordinateToken};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Google Maps search through SerpAPI.
#[derive(Clone)]
pub struct MapsSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MapsSearchClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create SerpAPI client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.serpapi_base_url.trim_end_matches('/').to_string(),
            api_key: config.serpapi_api_key.clone(),
        })
    }

    /// Query parameters for one `google_maps` search, without the API key.
    pub fn search_params<'a>(
        query: &'a str,
        near: &'a CoordinateToken,
    ) -> [(&'static str, &'a str); 6] {
        [
            ("engine", "google_maps"),
            ("q", query),
            ("ll", near.as_str()),
            ("type", "search"),
            ("hl", "en"),
            ("gl", "in"),
        ]
    }

    /// Runs a single maps search near `near`.
    ///
    /// Only the first page the provider returns is read.
    pub async fn search(
        &self,
        query: &str,
        near: &CoordinateToken,
    ) -> Result<Vec<BusinessRecord>, AppError> {
        let mut params: Vec<(&str, &str)> = Self::search_params(query, near).to_vec();
        params.push(("api_key", self.api_key.as_str()));

        let url =
            reqwest::Url::parse_with_params(&format!("{}/search.json", self.base_url), &params)
                .map_err(|e| AppError::Provider(format!("Failed to build SerpAPI URL: {}", e)))?;

        tracing::info!("Searching maps for '{}' near {}", query, near);
        // Redact api_key from logs to prevent credential exposure
        tracing::debug!(
            "SerpAPI URL: {}/search.json?engine=google_maps&q={}&ll={}&api_key=[REDACTED]",
            self.base_url,
            query,
            near
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("SerpAPI request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read SerpAPI response: {}", e)))?;

        // SerpAPI sends its error message in the body, often with a 4xx status.
        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) if status.is_success() => {
                return Err(AppError::Provider(format!(
                    "Failed to parse SerpAPI response: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(AppError::Provider(format!(
                    "SerpAPI returned status {}: {}",
                    status, body
                )));
            }
        };

        if let Some(error) = data.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            tracing::error!("SerpAPI returned error: {}", message);
            return Err(AppError::Provider(message));
        }

        if !status.is_success() {
            return Err(AppError::Provider(format!(
                "SerpAPI returned status {}",
                status
            )));
        }

        let businesses: Vec<BusinessRecord> = data
            .get("local_results")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(BusinessRecord::from_local_result).collect())
            .unwrap_or_default();

        tracing::info!("Maps search returned {} businesses", businesses.len());
        Ok(businesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_fixed_fields() {
        let near = CoordinateToken::new("13.08", "80.27", 12);
        let params = MapsSearchClient::search_params("software companies", &near);

        assert_eq!(params[0], ("engine", "google_maps"));
        assert_eq!(params[1], ("q", "software companies"));
        assert_eq!(params[2], ("ll", "@13.08,80.27,12z"));
        assert!(params.contains(&("gl", "in")));
        assert!(params.iter().all(|(k, _)| *k != "api_key"));
    }
}
