// src/services/scraper.rs
// DOCUMENTATION: Concurrent scrape orchestration
// PURPOSE: Fan one search out over the grid in both modes, then merge,
// deduplicate and filter the results

use crate::errors::LeadError;
use crate::models::{LeadRecord, SearchRequest};
use crate::services::{GridGenerator, PlacesClient, SearchMode, Translator};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Self-imposed pacing: fixed delay inside each task after its call returns
const REQUEST_PACING: Duration = Duration::from_millis(200);

/// Both endpoints are queried for every cell
const SEARCH_MODES: [SearchMode; 2] = [SearchMode::Proximity, SearchMode::Keyword];

/// Scrape run statistics
/// DOCUMENTATION: Tracks results of one full fan-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeStats {
    /// Original query term as entered
    pub query: String,
    /// Translated, lowercased term actually sent upstream
    pub translated_query: String,
    /// Number of API requests that completed (success or handled failure)
    pub api_requests: u32,
    /// Total entries returned by the API before filtering
    pub places_retrieved: u32,
    /// Records in the final collection
    pub leads_kept: u32,
    /// Records dropped as (name, address) duplicates
    pub duplicates_dropped: u32,
    /// Records dropped by the contact filter
    pub filtered_out: u32,
    /// Error messages from failed cell/mode pairs
    pub errors: Vec<String>,
    /// Total run duration in seconds
    pub duration_seconds: u64,
    /// Timestamp when the run started
    pub started_at: String,
    /// Timestamp when the run completed
    pub completed_at: Option<String>,
}

impl ScrapeStats {
    pub fn new(query: String, translated_query: String) -> Self {
        Self {
            query,
            translated_query,
            api_requests: 0,
            places_retrieved: 0,
            leads_kept: 0,
            duplicates_dropped: 0,
            filtered_out: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Mark the run as completed
    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Final collection plus its statistics, owned by one run and discarded
/// after the response is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub records: Vec<LeadRecord>,
    pub stats: ScrapeStats,
}

/// Result of one (cell, mode) fetch task
///
/// Each task returns its own outcome instead of appending to a shared
/// collection, so no synchronization exists during the fan-out; all
/// merging happens on one thread after every task has joined.
#[derive(Debug, Default)]
struct FetchOutcome {
    records: Vec<LeadRecord>,
    retrieved: u32,
    filtered_out: u32,
    error: Option<String>,
}

/// Scrape service
/// DOCUMENTATION: Drives the whole grid search for one request
pub struct ScrapeService;

impl ScrapeService {
    /// Run one full scrape
    ///
    /// Process:
    /// 1. Translate the query term (single call, before any fan-out)
    /// 2. Generate the 13x13 grid
    /// 3. Spawn one task per (cell, mode) pair - 338 for the default grid
    /// 4. Await every task; per-task failures become stats entries
    /// 5. Merge task outcomes, deduplicating and counting
    ///
    /// The run always completes with whatever partial results were
    /// gathered; only translation failure, grid rejection, or an invalid
    /// request abort it.
    pub async fn run(
        client: &PlacesClient,
        translator: &Translator,
        request: &SearchRequest,
    ) -> Result<ScrapeOutcome, LeadError> {
        let start_time = Instant::now();

        let term = translator.translate(&request.query).await?;
        let mut stats = ScrapeStats::new(request.query.clone(), term.clone());

        let cells =
            GridGenerator::generate_grid(request.latitude, request.longitude, request.radius_m)?;

        log::info!(
            "Starting scrape for {:?}: {} cells x {} modes",
            term,
            cells.len(),
            SEARCH_MODES.len()
        );

        let mut handles = Vec::with_capacity(cells.len() * SEARCH_MODES.len());

        for mode in SEARCH_MODES {
            for cell in &cells {
                let client = client.clone();
                let cell = cell.clone();
                let term = term.clone();
                let filter_contact = request.filter_contact;

                handles.push(tokio::spawn(async move {
                    let result = match mode {
                        SearchMode::Proximity => client.search_nearby(&cell, &term).await,
                        SearchMode::Keyword => client.search_text(&term, &cell).await,
                    };

                    let outcome = match result {
                        Ok(records) => {
                            let retrieved = records.len() as u32;
                            let (records, filtered_out) = if filter_contact {
                                let before = records.len();
                                let kept: Vec<LeadRecord> =
                                    records.into_iter().filter(|r| r.has_contact()).collect();
                                let dropped = (before - kept.len()) as u32;
                                (kept, dropped)
                            } else {
                                (records, 0)
                            };

                            FetchOutcome {
                                records,
                                retrieved,
                                filtered_out,
                                error: None,
                            }
                        }
                        Err(e) => {
                            // A failed cell/mode pair contributes zero
                            // records; the run keeps going
                            log::warn!("Cell {} {} search failed: {}", cell.cell_id, mode, e);
                            FetchOutcome {
                                error: Some(format!("cell {} {}: {}", cell.cell_id, mode, e)),
                                ..FetchOutcome::default()
                            }
                        }
                    };

                    tokio::time::sleep(REQUEST_PACING).await;
                    outcome
                }));
            }
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::error!("Fetch task panicked: {}", e);
                    stats.errors.push(format!("task join: {}", e));
                }
            }
        }

        let records = Self::merge(outcomes, request.dedupe, &mut stats);

        stats.complete(start_time.elapsed().as_secs());

        log::info!(
            "Scrape completed for {:?}: {} leads kept, {} duplicates, {} filtered, {} errors in {}s",
            term,
            stats.leads_kept,
            stats.duplicates_dropped,
            stats.filtered_out,
            stats.errors.len(),
            stats.duration_seconds
        );

        Ok(ScrapeOutcome { records, stats })
    }

    /// Merge all task outcomes into the final collection
    ///
    /// Runs single-threaded after the joins, so the seen-set insert is
    /// atomic by construction. Order follows task completion, which is
    /// nondeterministic.
    fn merge(
        outcomes: Vec<FetchOutcome>,
        dedupe: bool,
        stats: &mut ScrapeStats,
    ) -> Vec<LeadRecord> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut records = Vec::new();

        for outcome in outcomes {
            stats.api_requests += 1;
            stats.places_retrieved += outcome.retrieved;
            stats.filtered_out += outcome.filtered_out;

            if let Some(error) = outcome.error {
                stats.errors.push(error);
            }

            for record in outcome.records {
                if dedupe && !seen.insert(record.identity_key()) {
                    stats.duplicates_dropped += 1;
                    continue;
                }
                records.push(record);
            }
        }

        stats.leads_kept = records.len() as u32;
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;

    fn lead(name: &str, address: &str) -> LeadRecord {
        LeadRecord {
            name: name.to_string(),
            address: address.to_string(),
            phone: "01 02 03 04 05".to_string(),
            website: NOT_AVAILABLE.to_string(),
            latitude: Some(48.85),
            longitude: Some(2.35),
        }
    }

    #[test]
    fn test_merge_dedupes_by_name_and_address() {
        let outcomes = vec![
            FetchOutcome {
                records: vec![lead("A", "1 rue X"), lead("B", "2 rue Y")],
                retrieved: 2,
                ..FetchOutcome::default()
            },
            FetchOutcome {
                records: vec![lead("A", "1 rue X"), lead("A", "9 rue Z")],
                retrieved: 2,
                ..FetchOutcome::default()
            },
        ];

        let mut stats = ScrapeStats::new("test".to_string(), "test".to_string());
        let records = ScrapeService::merge(outcomes, true, &mut stats);

        // Same name at a different address is a distinct lead
        assert_eq!(records.len(), 3);
        assert_eq!(stats.duplicates_dropped, 1);
        assert_eq!(stats.leads_kept, 3);
        assert_eq!(stats.places_retrieved, 4);
        assert_eq!(stats.api_requests, 2);
    }

    #[test]
    fn test_merge_without_dedupe_keeps_repeats() {
        let outcomes = vec![
            FetchOutcome {
                records: vec![lead("A", "1 rue X")],
                retrieved: 1,
                ..FetchOutcome::default()
            },
            FetchOutcome {
                records: vec![lead("A", "1 rue X")],
                retrieved: 1,
                ..FetchOutcome::default()
            },
        ];

        let mut stats = ScrapeStats::new("test".to_string(), "test".to_string());
        let records = ScrapeService::merge(outcomes, false, &mut stats);

        assert_eq!(records.len(), 2);
        assert_eq!(stats.duplicates_dropped, 0);
    }

    #[test]
    fn test_merge_collects_task_errors() {
        let outcomes = vec![
            FetchOutcome {
                error: Some("cell 0:0 proximity: timed out".to_string()),
                ..FetchOutcome::default()
            },
            FetchOutcome {
                records: vec![lead("A", "1 rue X")],
                retrieved: 1,
                ..FetchOutcome::default()
            },
        ];

        let mut stats = ScrapeStats::new("test".to_string(), "test".to_string());
        let records = ScrapeService::merge(outcomes, true, &mut stats);

        // The failed pair contributed nothing, the run still has results
        assert_eq!(records.len(), 1);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.api_requests, 2);
    }

    #[test]
    fn test_stats_complete() {
        let mut stats = ScrapeStats::new("restaurant".to_string(), "restaurant".to_string());
        assert!(stats.completed_at.is_none());

        stats.complete(42);

        assert_eq!(stats.duration_seconds, 42);
        assert!(stats.completed_at.is_some());
    }
}
