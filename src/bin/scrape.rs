// src/bin/scrape.rs
// Terminal client for the leadgrid service: prompts for the search
// parameters, runs the scrape through the HTTP API and saves the CSV.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::io::{self, Write};
use std::time::Instant;

// --- ANSI colors for the terminal ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8002";
const OUTPUT_FILE: &str = "leads.csv";

fn prompt(label: &str) -> Result<String> {
    print!("{}{}{} ", BOLD, label, RESET);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_f64(label: &str) -> Result<f64> {
    prompt(label)?
        .parse()
        .with_context(|| format!("expected a number for {:?}", label))
}

/// Log in against the gated service when credentials are configured,
/// returning the access token to attach to search requests.
async fn login(client: &Client, server_url: &str) -> Result<Option<String>> {
    let username = match env::var("LEADGRID_USERNAME") {
        Ok(u) if !u.is_empty() => u,
        _ => return Ok(None),
    };
    let password = env::var("LEADGRID_PASSWORD").unwrap_or_default();

    let response = client
        .post(format!("{}/auth/login", server_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .context("login request failed")?;

    if !response.status().is_success() {
        bail!("login rejected ({})", response.status());
    }

    let body: Value = response.json().await.context("unreadable login response")?;
    Ok(body["access_token"].as_str().map(|t| t.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let server_url = env::var("LEADGRID_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let client = Client::new();

    println!("{}{}=== leadgrid ==={}", BOLD, CYAN, RESET);
    println!("Service: {}\n", server_url);

    let token = login(&client, &server_url).await?;
    if token.is_some() {
        println!("{}Logged in.{}\n", GREEN, RESET);
    }

    // Same prompt set as the original command-line revision
    let query = prompt("Que recherches-tu ? (ex: restaurant, hôtel, cinéma) :")?;
    let latitude = prompt_f64("Latitude du point GPS :")?;
    let longitude = prompt_f64("Longitude du point GPS :")?;
    let radius_m = prompt_f64("Rayon de recherche en mètres :")?;
    let filter_contact = prompt("Seulement avec téléphone ou site web ? (oui/non) :")?
        .to_lowercase()
        == "oui";

    println!(
        "\n{}Recherche en cours pour {:?}...{}",
        YELLOW, query, RESET
    );
    let start = Instant::now();

    let mut request = client.post(format!("{}/search/export", server_url)).json(&json!({
        "query": query,
        "latitude": latitude,
        "longitude": longitude,
        "radius_m": radius_m,
        "filter_contact": filter_contact,
    }));
    if let Some(ref token) = token {
        request = request.header("X-Access-Token", token);
    }

    let response = request.send().await.context("scrape request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("scrape failed ({}): {}", status, body);
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("text/csv") {
        let bytes = response.bytes().await.context("unreadable CSV body")?;
        std::fs::write(OUTPUT_FILE, &bytes)
            .with_context(|| format!("could not write {}", OUTPUT_FILE))?;

        // Header row is not a lead
        let rows = bytes.iter().filter(|b| **b == b'\n').count().saturating_sub(1);
        println!(
            "{}Scraping terminé. {} établissements trouvés. Fichier généré : {}{}",
            GREEN, rows, OUTPUT_FILE, RESET
        );
    } else {
        // Empty runs come back as a JSON message instead of a file
        let body: Value = response.json().await.context("unreadable response")?;
        println!(
            "{}{}{}",
            RED,
            body["message"].as_str().unwrap_or("no data found"),
            RESET
        );
    }

    println!("Durée : {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}
