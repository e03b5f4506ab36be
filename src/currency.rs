//! Currency sources and the currency reconciler.
//!
//! The primary source lists countries with the currencies they use; the
//! auxiliary ISO 4217 dataset supplies minor units. One record is produced per
//! (country, currency) pair.

use crate::artifact;
use crate::error::{Result, SyncError};
use crate::fetch::Fetcher;
use crate::normalize::{capitalize_first, normalize_code, resolve_decimals, DecimalTable};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{error, info, warn};

/// One entry of the persisted currency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    pub code: String,
    pub local: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

/// A country as returned by the primary source.
#[derive(Debug, Clone, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub name: Option<CountryName>,
    /// Keyed by currency code, in source order
    #[serde(default)]
    pub currencies: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CurrencyInfo {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

const UNKNOWN_COUNTRY: &str = "Unknown";

const NOT_APPLICABLE: &str = "N.A.";

// ==================== Sources ====================

/// Fetch the primary country list. Any failure here is fatal for the run.
pub async fn fetch_countries(fetcher: &Fetcher, url: &str) -> Result<Vec<Country>> {
    info!("Fetching country currencies from: {}", url);
    let countries: Vec<Country> = fetcher.fetch_json(url).await?;
    info!("Fetched {} countries", countries.len());
    Ok(countries)
}

/// Fetch the ISO 4217 minor-unit table.
///
/// Never fails: an unreachable, insecure or malformed source yields an empty
/// table and every code falls through to overrides and the default.
pub async fn fetch_iso_table(fetcher: &Fetcher, url: &str) -> DecimalTable {
    info!("Fetching ISO 4217 data from: {}", url);

    let table = match fetcher.fetch_text(url, Some("text/csv")).await {
        Ok(text) => parse_iso_4217(&text, url),
        Err(e) => Err(e),
    };

    match table {
        Ok(table) => {
            info!(
                "Successfully loaded decimal data for {} currencies from ISO 4217",
                table.len()
            );
            table
        }
        Err(e) => {
            error!("Failed to load ISO 4217 data ({} stage): {}", e.stage(), e);
            DecimalTable::new()
        }
    }
}

/// Parse the ISO 4217 CSV into code → minor units.
///
/// Rows whose `MinorUnit` is `N.A.` or not a plain non-negative integer are
/// dropped. Later rows for the same code win.
pub fn parse_iso_4217(csv_text: &str, url: &str) -> Result<DecimalTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SyncError::content(url, format!("unreadable CSV header: {}", e)))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SyncError::content(url, format!("missing {} column", name)))
    };
    let code_idx = column("AlphabeticCode")?;
    let minor_idx = column("MinorUnit")?;

    let mut table = DecimalTable::new();
    for record in reader.records() {
        let record = record.map_err(|e| SyncError::content(url, format!("bad CSV row: {}", e)))?;

        let code = normalize_code(record.get(code_idx));
        let minor_unit = record.get(minor_idx).unwrap_or("").trim();

        if code.is_empty() || minor_unit == NOT_APPLICABLE {
            continue;
        }
        if !minor_unit.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(decimals) = minor_unit.parse::<i64>() {
            table.insert(code, decimals);
        }
    }

    Ok(table)
}

// ==================== Reconciler ====================

/// Build one record per (country, currency) pair, sorted case-insensitively
/// by country name.
pub fn reconcile_currencies(
    countries: &[Country],
    overrides: &DecimalTable,
    iso: &DecimalTable,
) -> Result<Vec<CurrencyRecord>> {
    let mut records = Vec::new();

    for country in countries {
        let local = country
            .name
            .as_ref()
            .and_then(|n| n.common.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY);

        let Some(currencies) = &country.currencies else {
            continue;
        };

        for (code, info) in currencies {
            let info: CurrencyInfo = serde_json::from_value(info.clone()).map_err(|e| {
                SyncError::content(
                    "currencies",
                    format!("malformed currency {} for {}: {}", code, local, e),
                )
            })?;

            records.push(CurrencyRecord {
                code: code.clone(),
                local: local.to_string(),
                symbol: info.symbol.unwrap_or_default(),
                name: capitalize_first(info.name.as_deref().unwrap_or_default()),
                decimals: resolve_decimals(code, overrides, iso),
            });
        }
    }

    records.sort_by_cached_key(|record| record.local.to_lowercase());
    Ok(records)
}

// ==================== Artifact ====================

/// Load the persisted currency list; missing or unreadable files count as empty.
pub fn load_currency_baseline(path: &Path) -> Vec<CurrencyRecord> {
    let value = match artifact::read_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Could not load existing file ({}): {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_value(value) {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not load existing file ({}): {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn save_currencies(path: &Path, records: &[CurrencyRecord]) -> Result<()> {
    artifact::write_json(path, &records, false)?;
    info!("Wrote {} entries to {}", records.len(), path.display());
    Ok(())
}
