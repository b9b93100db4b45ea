// src/handlers/search.rs
// DOCUMENTATION: HTTP handlers for scrape runs
// PURPOSE: Parse requests, drive the scrape service, return JSON or CSV

use crate::config::Config;
use crate::errors::LeadError;
use crate::handlers::auth::verify_access_token;
use crate::models::SearchRequest;
use crate::services::{CsvExporter, PlacesClient, ScrapeOutcome, ScrapeService, Translator};
use actix_web::{http::header::ContentDisposition, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

/// Response for the JSON search endpoint
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Human-readable outcome, distinct "no data found" wording when empty
    pub message: String,
    /// Number of leads in the final collection
    pub count: usize,
    #[serde(flatten)]
    pub outcome: ScrapeOutcome,
}

/// Run one scrape for a validated request
async fn run_scrape(
    config: &Config,
    request: &SearchRequest,
) -> Result<ScrapeOutcome, LeadError> {
    if let Err(e) = request.validate() {
        return Err(LeadError::ValidationError(e.to_string()));
    }

    // Missing API key is a blocking, user-visible error
    if config.places_api_key.is_empty() {
        return Err(LeadError::InvalidInput(
            "Places API key not configured".to_string(),
        ));
    }

    let client = match &config.places_base_url {
        Some(url) => PlacesClient::with_base_url(config.places_api_key.clone(), url.clone()),
        None => PlacesClient::new(config.places_api_key.clone()),
    };
    let translator = match &config.translate_base_url {
        Some(url) => Translator::with_base_url(url.clone()),
        None => Translator::new(),
    };

    ScrapeService::run(&client, &translator, request).await
}

fn result_message(count: usize) -> String {
    if count == 0 {
        "no data found - check the parameters or the API quota".to_string()
    } else {
        format!("{} establishments found", count)
    }
}

/// POST /search
/// Run a scrape and return the leads as JSON
pub async fn search(
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<SearchRequest>,
) -> Result<impl Responder, LeadError> {
    verify_access_token(&req, &config)?;

    let outcome = run_scrape(&config, &body).await?;
    let count = outcome.records.len();

    Ok(HttpResponse::Ok().json(SearchResponse {
        message: result_message(count),
        count,
        outcome,
    }))
}

/// POST /search/export
/// Run a scrape and return the leads as a downloadable CSV file
///
/// DOCUMENTATION: An empty run is not an error; it returns the "no data
/// found" message as JSON instead of an empty spreadsheet
pub async fn search_export(
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<SearchRequest>,
) -> Result<impl Responder, LeadError> {
    verify_access_token(&req, &config)?;

    let outcome = run_scrape(&config, &body).await?;
    let count = outcome.records.len();

    if count == 0 {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": result_message(0),
            "count": 0,
            "stats": outcome.stats,
        })));
    }

    let csv_bytes = CsvExporter::to_bytes(&outcome.records, body.include_address)?;
    let filename = format!("leads_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

    log::info!("Exporting {} leads as {}", count, filename);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(filename))
        .body(csv_bytes))
}

/// Configuration for search routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/search")
            .route("", web::post().to(search))
            .route("/export", web::post().to(search_export)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_message_empty_is_distinct() {
        assert!(result_message(0).contains("no data found"));
        assert_eq!(result_message(12), "12 establishments found");
    }
}
