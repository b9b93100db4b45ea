// src/services/places_client.rs
// DOCUMENTATION: Google Places API (v1) client
// PURPOSE: Dual-mode place retrieval (nearby circle search and free-text search)

use crate::errors::LeadError;
use crate::models::{LeadRecord, NOT_AVAILABLE};
use crate::services::GridCell;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const NEARBY_SEARCH_PATH: &str = "/v1/places:searchNearby";
const TEXT_SEARCH_PATH: &str = "/v1/places:searchText";
const DEFAULT_BASE_URL: &str = "https://places.googleapis.com";

/// Attribute restriction sent with every request; the API only returns
/// the fields a lead needs
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,places.nationalPhoneNumber,places.websiteUri";

/// Result cap per request; the grid tiling exists to work around it
const MAX_RESULT_COUNT: u32 = 20;

/// Per-request timeout so one hanging call cannot stall the whole fan-out
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which of the two search endpoints a fetch uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Circular-region search constrained to a cell's center and radius
    Proximity,
    /// Free-text search seeded with the cell's coordinates, no radius bound
    Keyword,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Proximity => write!(f, "proximity"),
            SearchMode::Keyword => write!(f, "keyword"),
        }
    }
}

/// Places API client
/// DOCUMENTATION: Holds the API key and endpoint URLs; constructed from
/// Config, never from ambient state
#[derive(Debug, Clone)]
pub struct PlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Places API key
    api_key: String,
    /// Base URL for the Places API (overridable for tests)
    base_url: String,
}

/// Geographic coordinates on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationRestriction {
    circle: Circle,
}

/// Body for places:searchNearby
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbySearchRequest {
    max_result_count: u32,
    location_restriction: LocationRestriction,
    included_types: Vec<String>,
}

/// Body for places:searchText
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchRequest {
    max_result_count: u32,
    text_query: String,
}

/// Response envelope from either search endpoint
/// DOCUMENTATION: The API omits `places` entirely on errors and empty
/// results, so the field is optional rather than defaulted
#[derive(Debug, Deserialize)]
struct SearchResponse {
    places: Option<Vec<ApiPlace>>,
}

/// Individual place entry as returned under the field mask
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
    pub national_phone_number: Option<String>,
    pub website_uri: Option<String>,
}

/// Localized text wrapper used by displayName
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalizedText {
    pub text: Option<String>,
}

impl PlacesClient {
    /// Create new Places API client
    /// DOCUMENTATION: Initializes client with API key
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client pointed at an alternate base URL (used by tests
    /// to substitute a mock server for the live API)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Proximity-mode search for one grid cell
    ///
    /// Issues a circular-region search restricted to the cell's center and
    /// radius, filtered to a single included category.
    ///
    /// # Arguments
    /// * `cell` - Grid cell whose center and radius bound the search
    /// * `included_type` - Category filter (translated, lowercased term)
    pub async fn search_nearby(
        &self,
        cell: &GridCell,
        included_type: &str,
    ) -> Result<Vec<LeadRecord>, LeadError> {
        let body = NearbySearchRequest {
            max_result_count: MAX_RESULT_COUNT,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: cell.latitude,
                        longitude: cell.longitude,
                    },
                    radius: cell.radius,
                },
            },
            included_types: vec![included_type.to_string()],
        };

        log::debug!(
            "Nearby search cell {}: lat={:.4}, lon={:.4}, radius={:.1}",
            cell.cell_id,
            cell.latitude,
            cell.longitude,
            cell.radius
        );

        self.execute(NEARBY_SEARCH_PATH, &body, SearchMode::Proximity)
            .await
    }

    /// Keyword-text-mode search for one grid cell
    ///
    /// The query string carries the cell's coordinates instead of an
    /// explicit radius; coverage relies on the text relevance ranking.
    pub async fn search_text(
        &self,
        term: &str,
        cell: &GridCell,
    ) -> Result<Vec<LeadRecord>, LeadError> {
        let body = TextSearchRequest {
            max_result_count: MAX_RESULT_COUNT,
            text_query: format!("{} near {},{}", term, cell.latitude, cell.longitude),
        };

        log::debug!("Text search cell {}: query={:?}", cell.cell_id, body.text_query);

        self.execute(TEXT_SEARCH_PATH, &body, SearchMode::Keyword).await
    }

    /// POST one search request and map the entries to lead records
    async fn execute<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        mode: SearchMode,
    ) -> Result<Vec<LeadRecord>, LeadError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Places API {} request failed: {}", mode, e);
                LeadError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Places API {} error {}: {}", mode, status, body);
            return Err(LeadError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: SearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Places API {} response: {}", mode, e);
            LeadError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        // A well-formed but empty or erroneous response simply has no
        // `places` field; that counts as zero results for this request
        let places = match api_response.places {
            Some(places) => places,
            None => {
                log::warn!("Places API {} response without places field", mode);
                return Ok(Vec::new());
            }
        };

        Ok(places.iter().map(Self::to_lead_record).collect())
    }

    /// Convert one API entry to a LeadRecord
    /// DOCUMENTATION: Every missing string field becomes the sentinel;
    /// coordinates stay as options and render at export time
    pub fn to_lead_record(place: &ApiPlace) -> LeadRecord {
        LeadRecord {
            name: place
                .display_name
                .as_ref()
                .and_then(|d| d.text.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            address: place
                .formatted_address
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: place
                .national_phone_number
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            website: place
                .website_uri
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            latitude: place.location.as_ref().map(|l| l.latitude),
            longitude: place.location.as_ref().map(|l| l.longitude),
        }
    }
}
