//! People-search client for the Lemlist people database.
//!
//! Every request asks for executives in a fixed set of departments at one
//! company, restricted to one country and city. Only the first page is read.

use crate::config::{Config, LeadAuthScheme};
use crate::errors::AppError;
use crate::models::LeadPayload;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Seniority levels the lead search is restricted to.
pub const SENIORITY_LEVELS: [&str; 7] = [
    "CxO",
    "Owner/Partner",
    "Vice President",
    "CEO",
    "COO",
    "CFO",
    "CTO",
];

/// Departments the lead search is restricted to.
pub const DEPARTMENTS: [&str; 4] = [
    "Operations",
    "Information Technology",
    "Engineering",
    "Sales",
];

/// One entry of the `filters` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilter {
    pub filter_id: &'static str,
    #[serde(rename = "in")]
    pub include: Vec<String>,
    #[serde(rename = "out")]
    pub exclude: Vec<String>,
}

impl LeadFilter {
    fn including<I, S>(filter_id: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_id,
            include: values.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }
}

/// Request body for `POST /api/database/people`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadQuery {
    pub filters: Vec<LeadFilter>,
    pub page: u32,
    pub size: u32,
}

impl LeadQuery {
    pub fn for_company(company_name: &str, country: &str, location: &str, size: u32) -> Self {
        Self {
            filters: vec![
                LeadFilter::including("keywordInCompany", [company_name]),
                LeadFilter::including("currentCompanyCountry", [country]),
                LeadFilter::including("currentCompanyLocation", [location]),
                LeadFilter::including("seniority", SENIORITY_LEVELS),
                LeadFilter::including("department", DEPARTMENTS),
            ],
            page: 1,
            size,
        }
    }
}

/// Client for the people-search provider.
#[derive(Clone)]
pub struct LeadClient {
    client: Client,
    base_url: String,
    api_key: String,
    auth_scheme: LeadAuthScheme,
    country: String,
    location: String,
    page_size: u32,
}

impl LeadClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create Lemlist client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.lemlist_base_url.trim_end_matches('/').to_string(),
            api_key: config.lemlist_api_key.clone(),
            auth_scheme: config.lemlist_auth_scheme,
            country: config.lead_country.clone(),
            location: config.lead_location.clone(),
            page_size: config.lead_page_size,
        })
    }

    pub fn query_for(&self, company_name: &str) -> LeadQuery {
        LeadQuery::for_company(company_name, &self.country, &self.location, self.page_size)
    }

    /// Searches for leads at `company_name`.
    ///
    /// Returns the provider response untouched. Callers decide what a failure
    /// means for the run.
    pub async fn find_leads(&self, company_name: &str) -> Result<LeadPayload, AppError> {
        let url = format!("{}/api/database/people", self.base_url);
        let body = self.query_for(company_name);

        tracing::info!("Searching leads for: {}", company_name);

        let request = self.client.post(&url).json(&body);
        let request = match self.auth_scheme {
            LeadAuthScheme::Bearer => request.bearer_auth(&self.api_key),
            LeadAuthScheme::Basic => request.basic_auth("", Some(&self.api_key)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Lemlist request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "Lemlist returned {}: {}",
                status, error_text
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            AppError::Provider(format!("Failed to parse Lemlist response: {}", e))
        })?;

        let payload = LeadPayload(data);
        tracing::debug!(
            "Lemlist returned {} results for {}",
            payload.results().len(),
            company_name
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_body_shape() {
        let query = LeadQuery::for_company("Zoho", "India", "Chennai", 5);
        let body = serde_json::to_value(&query).unwrap();

        assert_eq!(body["page"], json!(1));
        assert_eq!(body["size"], json!(5));
        assert_eq!(
            body["filters"][0],
            json!({"filterId": "keywordInCompany", "in": ["Zoho"], "out": []})
        );
        assert_eq!(body["filters"][1]["in"], json!(["India"]));
        assert_eq!(body["filters"][2]["in"], json!(["Chennai"]));
        assert_eq!(body["filters"][3]["filterId"], json!("seniority"));
        assert_eq!(body["filters"][3]["in"].as_array().unwrap().len(), 7);
        assert_eq!(body["filters"][4]["in"].as_array().unwrap().len(), 4);
        assert_eq!(body["filters"].as_array().unwrap().len(), 5);
    }
}
