use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::HashMap;
use url::Url;
use log::{info, debug, warn, error};

use crate::config::Config;
use crate::error::{Result, WetError};

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const SEARCH_PATH: &str = "/v3/businesses/search";
const GRANT_TYPE: &str = "client_credentials";
pub const PAGE_SIZE: usize = 50;
const UNKNOWN_CATEGORY: &str = "❓";

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub name: String,
    pub rating: f64,
    pub category: String,
    pub address_lines: Vec<String>,
}

/// Businesses keyed by name; a later page overwrites an earlier entry with the same name.
pub type ResultSet = HashMap<String, BusinessRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

/// Full pages of 50, then one short page for the remainder. A zero-sized
/// trailing page is never requested.
pub fn page_plan(limit: usize) -> Vec<Page> {
    let full_pages = limit / PAGE_SIZE;
    let mut pages: Vec<Page> = (0..full_pages)
        .map(|i| Page { limit: PAGE_SIZE, offset: PAGE_SIZE * i })
        .collect();

    let remainder = limit % PAGE_SIZE;
    if remainder > 0 {
        pages.push(Page { limit: remainder, offset: PAGE_SIZE * full_pages });
    }
    pages
}

pub struct YelpClient {
    client: Client,
    host: Url,
}

impl YelpClient {
    pub fn new(client: Client, host: &str) -> Result<Self> {
        let parsed = Url::parse(host)
            .map_err(|e| WetError::Config(format!("invalid API host '{}': {}", host, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WetError::Config(format!("API host must be http(s), got '{}'", host)));
        }
        debug!("Using API host {}", parsed);
        Ok(Self {
            client,
            host: parsed,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.host
            .join(path)
            .map_err(|e| WetError::Config(format!("cannot build URL for {}: {}", path, e)))
    }

    pub async fn obtain_bearer_token(&self, config: &Config) -> Result<String> {
        if config.client_id.is_empty() {
            return Err(WetError::Credential("Please supply your client_id."));
        }
        if config.client_secret.is_empty() {
            return Err(WetError::Credential("Please supply your client_secret."));
        }

        let url = self.url(TOKEN_PATH)?;
        info!("Requesting bearer token from {}", url);

        let params = [
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", GRANT_TYPE),
        ];

        let response = self.client.post(url.clone())
            .form(&params)
            .send()
            .await?;
        let body = check_status(response).await?;

        match body["access_token"].as_str() {
            Some(token) => {
                info!("Obtained bearer token");
                Ok(token.to_string())
            }
            None => {
                error!("Token response has no access_token: {:?}", body);
                Err(WetError::MalformedResponse("token response has no access_token".to_string()))
            }
        }
    }

    pub async fn search(&self, bearer_token: &str, term: &Map<String, Value>, limit: usize) -> Result<ResultSet> {
        let base_params = term_params(term);
        let url = self.url(SEARCH_PATH)?;
        let mut results = ResultSet::new();

        for page in page_plan(limit) {
            let mut params = base_params.clone();
            params.push(("limit".to_string(), page.limit.to_string()));
            params.push(("offset".to_string(), page.offset.to_string()));

            debug!("Sending request to Yelp API with params: {:?}", params);

            let response = self.client.get(url.clone())
                .query(&params)
                .header("Authorization", format!("Bearer {}", bearer_token))
                .send()
                .await?;
            let body = check_status(response).await?;

            let added = reduce_businesses(&body, &mut results)?;
            info!("Page at offset {} returned {} businesses", page.offset, added);
        }

        info!("Collected {} distinct businesses", results.len());
        Ok(results)
    }
}

/// Non-success statuses become `WetError::Http` carrying the status, URL and body.
async fn check_status(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
        let body = error_body(response.text().await, &url);
        error!("Yelp API returned {} for {}", status, url);
        debug!("Error body: {}", body);
        return Err(WetError::Http { status, url, body });
    }

    let body = response.json::<Value>().await?;
    debug!("Received response from Yelp API: {:?}", body);
    Ok(body)
}

fn error_body(body: reqwest::Result<String>, url: &str) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            debug!("Could not read error body from {}: {}", url, e);
            format!("<unreadable response body: {}>", e)
        }
    }
}

/// Arrays become repeated keys and nulls are dropped, the way form encoders treat lists and `None`.
fn term_params(term: &Map<String, Value>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for (key, value) in term {
        if key == "limit" || key == "offset" {
            warn!("Ignoring '{}' in term, pagination controls it", key);
            continue;
        }
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(item) = param_value(item) {
                        params.push((key.clone(), item));
                    }
                }
            }
            other => {
                if let Some(value) = param_value(other) {
                    params.push((key.clone(), value));
                }
            }
        }
    }
    params
}

fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Inserts every usable business of one response into `results`, returning how many were seen.
fn reduce_businesses(body: &Value, results: &mut ResultSet) -> Result<usize> {
    let businesses = body["businesses"].as_array().ok_or_else(|| {
        WetError::MalformedResponse("search response has no businesses list".to_string())
    })?;

    let mut added = 0;
    for business in businesses {
        let (Some(name), Some(rating)) = (business["name"].as_str(), business["rating"].as_f64()) else {
            warn!("Skipping business without name or rating: {:?}", business["id"]);
            continue;
        };

        let category = business["categories"][0]["title"]
            .as_str()
            .unwrap_or(UNKNOWN_CATEGORY)
            .to_string();

        let address_lines: Vec<String> = business["location"]["display_address"]
            .as_array()
            .map(|lines| {
                lines.iter()
                    .filter_map(|line| line.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        if results.contains_key(name) {
            debug!("Overwriting earlier entry for {}", name);
        }
        results.insert(name.to_string(), BusinessRecord {
            name: name.to_string(),
            rating,
            category,
            address_lines,
        });
        added += 1;
    }
    Ok(added)
}
