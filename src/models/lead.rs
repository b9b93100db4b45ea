// src/models/lead.rs
// DOCUMENTATION: Core data structures for lead scraping
// PURPOSE: Defines the search request and the lead record produced per place

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sentinel written wherever the upstream API omitted a field.
/// Exported rows never contain an empty or null value.
pub const NOT_AVAILABLE: &str = "N/A";

/// One lead-generation search run, immutable once parsed
/// DOCUMENTATION: Parameters shared by the HTTP surface and the terminal client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// Business-type query term in French (translated before use)
    #[validate(length(min = 1, message = "query term is required"))]
    pub query: String,

    /// Center point latitude
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    /// Center point longitude
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Overall search radius in meters
    #[validate(range(min = 1.0, max = 50000.0))]
    pub radius_m: f64,

    /// Keep only leads with a phone number or a website
    #[serde(default)]
    pub filter_contact: bool,

    /// Collapse duplicates sharing the same (name, address) pair
    #[serde(default = "default_true")]
    pub dedupe: bool,

    /// Include the address column in the export
    #[serde(default = "default_true")]
    pub include_address: bool,
}

fn default_true() -> bool {
    true
}

/// One establishment extracted from a Places API result entry
/// DOCUMENTATION: String fields default to the NOT_AVAILABLE sentinel when
/// the upstream response omitted them; coordinates stay numeric and render
/// as the sentinel only at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Establishment name
    pub name: String,

    /// Formatted street address
    pub address: String,

    /// National phone number
    pub phone: String,

    /// Website URL
    pub website: String,

    /// Latitude of the establishment
    pub latitude: Option<f64>,

    /// Longitude of the establishment
    pub longitude: Option<f64>,
}

impl LeadRecord {
    /// Identity key used for duplicate suppression
    pub fn identity_key(&self) -> (String, String) {
        (self.name.clone(), self.address.clone())
    }

    /// Whether the lead carries at least one way to contact it
    pub fn has_contact(&self) -> bool {
        self.phone != NOT_AVAILABLE || self.website != NOT_AVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phone: &str, website: &str) -> LeadRecord {
        LeadRecord {
            name: "Chez Test".to_string(),
            address: "1 rue de la Paix".to_string(),
            phone: phone.to_string(),
            website: website.to_string(),
            latitude: Some(48.8566),
            longitude: Some(2.3522),
        }
    }

    #[test]
    fn test_has_contact() {
        assert!(record("+33 1 23 45 67 89", NOT_AVAILABLE).has_contact());
        assert!(record(NOT_AVAILABLE, "https://cheztest.fr").has_contact());
        assert!(!record(NOT_AVAILABLE, NOT_AVAILABLE).has_contact());
    }

    #[test]
    fn test_identity_key() {
        let a = record("+33 1 23 45 67 89", NOT_AVAILABLE);
        let b = record(NOT_AVAILABLE, "https://cheztest.fr");

        // Contact details do not participate in identity
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_search_request_validation() {
        let valid = SearchRequest {
            query: "restaurant".to_string(),
            latitude: 48.8566,
            longitude: 2.3522,
            radius_m: 1000.0,
            filter_contact: false,
            dedupe: true,
            include_address: true,
        };
        assert!(validator::Validate::validate(&valid).is_ok());

        let bad_lat = SearchRequest { latitude: 95.0, ..valid.clone() };
        assert!(validator::Validate::validate(&bad_lat).is_err());

        let empty_query = SearchRequest { query: String::new(), ..valid };
        assert!(validator::Validate::validate(&empty_query).is_err());
    }

    #[test]
    fn test_search_request_defaults() {
        // Optional toggles default from serde, matching the form UI defaults
        let req: SearchRequest = serde_json::from_value(serde_json::json!({
            "query": "restaurant",
            "latitude": 48.8566,
            "longitude": 2.3522,
            "radius_m": 1000.0
        }))
        .unwrap();

        assert!(!req.filter_contact);
        assert!(req.dedupe);
        assert!(req.include_address);
    }
}
