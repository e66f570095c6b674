//! Maps-to-leads enrichment run
//!
//! One run goes through these steps, in order:
//! 1. Validate the query and location
//! 2. Geocode the location
//! 3. Search the maps provider near it
//! 4. Look up leads for every business (failures are recorded, not raised)
//! 5. Write the people found to JSON and CSV
//! 6. Return the run summary

use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::export;
use crate::geocoder::GeocoderService;
use crate::lead_client::LeadClient;
use crate::maps_client::MapsSearchClient;
use crate::models::{BusinessRecord, LeadData, PersonRecord, RunSummary};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::Instrument;

pub const JSON_OUTPUT_FILE: &str = "linkedin_output.json";
pub const CSV_OUTPUT_FILE: &str = "linkedin_output.csv";

/// `leadData` error for listings that have no title to search by.
pub const NO_NAME_ERROR: &str = "business has no name";

pub struct Pipeline {
    geocoder: GeocoderService,
    maps: MapsSearchClient,
    leads: LeadClient,
    zoom: u8,
    concurrency: usize,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            geocoder: GeocoderService::new(config)?,
            maps: MapsSearchClient::new(config)?,
            leads: LeadClient::new(config)?,
            zoom: config.map_zoom,
            concurrency: config.enrich_concurrency.max(1),
            output_dir: config.output_dir.clone(),
        })
    }

    /// Runs the whole pipeline for `query` near `near`.
    ///
    /// Geocoding and search failures abort the run before anything is
    /// written. Lead lookup failures end up in the business's `leadData`.
    pub async fn run(&self, query: &str, near: &str) -> Result<RunSummary, AppError> {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id, query, near);
        self.run_inner(query, near).instrument(span).await
    }

    async fn run_inner(&self, query: &str, near: &str) -> Result<RunSummary, AppError> {
        if query.trim().is_empty() || near.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "query and near are required".to_string(),
            ));
        }

        let token = self
            .geocoder
            .resolve(near, self.zoom)
            .await
            .with_context(|| format!("Failed to geocode '{}'", near))?;

        let businesses = self
            .maps
            .search(query, &token)
            .await
            .context("Maps search failed")?;

        let (companies, profiles) = self.enrich(businesses).await;

        self.persist(&profiles)?;

        tracing::info!(
            "Run complete: {} companies, {} profiles",
            companies.len(),
            profiles.len()
        );

        Ok(RunSummary {
            total_companies: companies.len(),
            companies,
            linkedin_profiles: profiles,
        })
    }

    /// Attaches lead data to every business and collects the people found.
    ///
    /// Up to `concurrency` lookups run at once; results come back in source order.
    pub async fn enrich(
        &self,
        businesses: Vec<BusinessRecord>,
    ) -> (Vec<BusinessRecord>, Vec<PersonRecord>) {
        let leads = &self.leads;

        let companies: Vec<BusinessRecord> = stream::iter(businesses)
            .map(|mut company| async move {
                let lead_data = match company.search_name() {
                    None => {
                        tracing::warn!("Skipping lead search for a business with no name");
                        LeadData::failed(NO_NAME_ERROR)
                    }
                    Some(name) => match leads.find_leads(name).await {
                        Ok(payload) => LeadData::Payload(payload),
                        Err(e) => {
                            tracing::warn!("Lemlist error for {}: {}", name, e);
                            LeadData::failed(e.to_string())
                        }
                    },
                };
                company.lead_data = Some(lead_data);
                company
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let profiles = companies
            .iter()
            .filter_map(|company| company.lead_data.as_ref())
            .flat_map(LeadData::people)
            .collect();

        (companies, profiles)
    }

    /// Writes the people found to the JSON and CSV exports.
    pub fn persist(&self, profiles: &[PersonRecord]) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        export::write_json(profiles, &self.output_dir.join(JSON_OUTPUT_FILE))?;

        let csv_path = self.output_dir.join(CSV_OUTPUT_FILE);
        if profiles.is_empty() {
            // The CSV writer skips empty input; drop a previous run's file so
            // the two exports agree.
            match std::fs::remove_file(&csv_path) {
                Ok(()) => tracing::debug!("Removed stale {}", csv_path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to remove {}", csv_path.display()))
                }
            }
        }

        let records = export::to_records(profiles)?;
        export::write_csv(&records, &PersonRecord::CSV_COLUMNS, &csv_path)?;

        tracing::info!(
            "{} & {} saved to {}",
            JSON_OUTPUT_FILE,
            CSV_OUTPUT_FILE,
            self.output_dir.display()
        );
        Ok(())
    }
}
