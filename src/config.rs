use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_LEMLIST_BASE_URL: &str = "https://api.lemlist.com";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "maps-leads/0.1 (business lead enrichment)";

/// How the people-search credential is presented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadAuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// HTTP basic auth with an empty user and the key as password.
    Basic,
}

impl std::str::FromStr for LeadAuthScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(Self::Bearer),
            "basic" => Ok(Self::Basic),
            other => anyhow::bail!(
                "LEMLIST_AUTH_SCHEME must be 'bearer' or 'basic', got '{}'",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub serpapi_api_key: String,
    pub lemlist_api_key: String,
    pub lemlist_auth_scheme: LeadAuthScheme,
    pub geocoder_base_url: String,
    pub serpapi_base_url: String,
    pub lemlist_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub map_zoom: u8,
    pub lead_page_size: u32,
    pub lead_country: String,
    pub lead_location: String,
    pub enrich_concurrency: usize,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            serpapi_api_key: required_secret("SERPAPI_API_KEY")?,
            lemlist_api_key: required_secret("LEMLIST_API_KEY")?,
            lemlist_auth_scheme: std::env::var("LEMLIST_AUTH_SCHEME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<LeadAuthScheme>())
                .transpose()?
                .unwrap_or(LeadAuthScheme::Bearer),
            geocoder_base_url: base_url("GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL)?,
            serpapi_base_url: base_url("SERPAPI_BASE_URL", DEFAULT_SERPAPI_BASE_URL)?,
            lemlist_base_url: base_url("LEMLIST_BASE_URL", DEFAULT_LEMLIST_BASE_URL)?,
            geocoder_user_agent: std::env::var("GEOCODER_USER_AGENT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEOCODER_USER_AGENT.to_string()),
            geocoder_timeout_secs: number("GEOCODER_TIMEOUT_SECS", 10)?,
            http_timeout_secs: number("HTTP_TIMEOUT_SECS", 30)?,
            map_zoom: number("MAP_ZOOM", 12)?,
            lead_page_size: number("LEAD_PAGE_SIZE", 5)?,
            lead_country: std::env::var("LEAD_COUNTRY").unwrap_or_else(|_| "India".to_string()),
            lead_location: std::env::var("LEAD_LOCATION")
                .unwrap_or_else(|_| "Chennai".to_string()),
            enrich_concurrency: number("ENRICH_CONCURRENCY", 1)?,
            output_dir: std::env::var("OUTPUT_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./output")),
        };

        config.validate()?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Geocoder Base URL: {}", config.geocoder_base_url);
        tracing::debug!("SerpAPI Base URL: {}", config.serpapi_base_url);
        tracing::debug!(
            "Lemlist Base URL: {} (auth: {:?})",
            config.lemlist_base_url,
            config.lemlist_auth_scheme
        );
        tracing::debug!("Output directory: {}", config.output_dir.display());

        Ok(config)
    }

    /// Range checks shared by `from_env` and callers that build a `Config` by hand.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.serpapi_api_key.trim().is_empty() {
            anyhow::bail!("SERPAPI_API_KEY cannot be empty");
        }
        if self.lemlist_api_key.trim().is_empty() {
            anyhow::bail!("LEMLIST_API_KEY cannot be empty");
        }
        if self.lead_page_size == 0 {
            anyhow::bail!("LEAD_PAGE_SIZE must be at least 1");
        }
        if self.enrich_concurrency == 0 {
            anyhow::bail!("ENRICH_CONCURRENCY must be at least 1");
        }
        if self.geocoder_timeout_secs == 0 || self.http_timeout_secs == 0 {
            anyhow::bail!("timeouts must be at least 1 second");
        }
        if self.lead_country.trim().is_empty() || self.lead_location.trim().is_empty() {
            anyhow::bail!("LEAD_COUNTRY and LEAD_LOCATION cannot be empty");
        }
        Ok(())
    }
}

fn required_secret(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))
        .and_then(|value| {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        })
}

fn base_url(name: &str, default: &str) -> anyhow::Result<String> {
    let url = std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    url::Url::parse(&url).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    Ok(url.trim_end_matches('/').to_string())
}

fn number<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            serpapi_api_key: "serp_key".to_string(),
            lemlist_api_key: "lemlist_key".to_string(),
            lemlist_auth_scheme: LeadAuthScheme::Bearer,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            lemlist_base_url: DEFAULT_LEMLIST_BASE_URL.to_string(),
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
            geocoder_timeout_secs: 10,
            http_timeout_secs: 30,
            map_zoom: 12,
            lead_page_size: 5,
            lead_country: "India".to_string(),
            lead_location: "Chennai".to_string(),
            enrich_concurrency: 1,
            output_dir: PathBuf::from("./output"),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_credentials() {
        let mut config = sample();
        config.lemlist_api_key = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LEMLIST_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = sample();
        config.lead_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_scheme_parsing() {
        assert_eq!("Bearer".parse::<LeadAuthScheme>().unwrap(), LeadAuthScheme::Bearer);
        assert_eq!(" basic ".parse::<LeadAuthScheme>().unwrap(), LeadAuthScheme::Basic);
        assert!("token".parse::<LeadAuthScheme>().is_err());
    }

    #[test]
    fn test_required_secret_reports_missing_variable() {
        let err = required_secret("MAPS_LEADS_UNSET_SECRET_FOR_TESTS").unwrap_err();
        assert_eq!(
            err.to_string(),
            "MAPS_LEADS_UNSET_SECRET_FOR_TESTS environment variable required"
        );
    }
}
