use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============ Geocoding ============

/// One match from a nominatim-compatible `/search` response.
///
/// Only the coordinates are read; everything else the service sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Location string accepted by the maps provider's `ll` parameter.
///
/// Rendered as `@<latitude>,<longitude>,<zoom>z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateToken {
    latitude: String,
    longitude: String,
    zoom: u8,
    token: String,
}

impl CoordinateToken {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>, zoom: u8) -> Self {
        let latitude = latitude.into();
        let longitude = longitude.into();
        let token = format!("@{},{},{}z", latitude, longitude, zoom);
        Self {
            latitude,
            longitude,
            zoom,
            token,
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for CoordinateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

// ============ Business listings ============

/// A business found by the maps search, plus whatever the lead lookup returned for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
    pub address: Option<String>,
    /// Free-text opening hours as shown on the listing.
    pub openstate: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Unset until the enrichment step has run for this business.
    #[serde(rename = "leadData")]
    pub lead_data: Option<LeadData>,
}

impl BusinessRecord {
    /// Maps one `local_results` item from the maps provider.
    pub fn from_local_result(item: &Value) -> Self {
        Self {
            name: text_field(item, "title"),
            business_type: text_field(item, "type"),
            address: text_field(item, "address"),
            openstate: text_field(item, "hours"),
            phone: text_field(item, "phone"),
            website: text_field(item, "website"),
            lead_data: None,
        }
    }

    /// Name used as the company keyword for the lead search.
    ///
    /// `None` for listings without a usable title; an empty keyword would
    /// match every company in the searched location.
    pub fn search_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// Outcome of the lead lookup for one business.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeadData {
    /// The lookup failed; the run carried on without leads for this business.
    Failed(LeadFailure),
    /// Raw provider response.
    Payload(LeadPayload),
}

impl LeadData {
    pub fn failed(message: impl Into<String>) -> Self {
        LeadData::Failed(LeadFailure {
            error: message.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LeadData::Failed(_))
    }

    /// People found for the business; empty for failures.
    pub fn people(&self) -> Vec<PersonRecord> {
        match self {
            LeadData::Failed(_) => Vec::new(),
            LeadData::Payload(payload) => payload.people(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadFailure {
    pub error: String,
}

/// Raw people-search response, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LeadPayload(pub Value);

impl LeadPayload {
    /// Entries of the `results` list, if there is one.
    pub fn results(&self) -> &[Value] {
        self.0
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn people(&self) -> Vec<PersonRecord> {
        self.results().iter().map(PersonRecord::from_lead).collect()
    }
}

// ============ People ============

/// A contact at one of the businesses, flattened from a lead result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: Option<String>,
    pub company: Option<String>,
    pub seniority: Option<String>,
    pub linkedin: Option<String>,
    pub headline: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "companyIndustry")]
    pub company_industry: Option<String>,
}

impl PersonRecord {
    /// Column order of the CSV export.
    pub const CSV_COLUMNS: [&'static str; 7] = [
        "name",
        "company",
        "seniority",
        "linkedin",
        "headline",
        "department",
        "companyIndustry",
    ];

    pub fn from_lead(lead: &Value) -> Self {
        Self {
            name: text_field(lead, "full_name"),
            company: text_field(lead, "current_exp_company_name"),
            seniority: text_field(lead, "seniority"),
            linkedin: text_field(lead, "lead_linkedin_url"),
            headline: text_field(lead, "headline"),
            department: text_field(lead, "department"),
            // The provider really does spell it "cmpany".
            company_industry: text_field(lead, "current_exp_cmpany_subindustry")
                .or_else(|| text_field(lead, "current_exp_company_subindustry")),
        }
    }
}

// ============ Run output ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_companies: usize,
    pub companies: Vec<BusinessRecord>,
    pub linkedin_profiles: Vec<PersonRecord>,
}

/// Reads `key` from a JSON object as text.
///
/// Strings come back verbatim; other non-null values are rendered as JSON so
/// nothing the provider sent is dropped.
fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
