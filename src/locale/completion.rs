//! Translation-completion statistics from the translation platform.
//!
//! The statistics are auxiliary: if any page cannot be fetched or decoded the
//! whole source is reported unavailable and callers fall back to static
//! locale metadata.

use crate::error::{Result, SyncError};
use crate::fetch::Fetcher;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Upper bound on followed `next` cursors.
const MAX_PAGES: usize = 100;

#[derive(Debug, Deserialize)]
struct TranslationsPage {
    #[serde(default)]
    results: Option<Vec<TranslationEntry>>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    translated_percent: Option<f64>,
    #[serde(default)]
    language: Option<LanguageInfo>,
}

#[derive(Debug, Deserialize)]
struct LanguageInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    native: Option<String>,
}

/// Completion data for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEntry {
    pub percent: f64,
    pub english_name: String,
    pub native_name: String,
}

/// Completion statistics keyed by hyphenated locale code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionStats {
    entries: HashMap<String, CompletionEntry>,
}

impl CompletionStats {
    pub fn get(&self, code: &str) -> Option<&CompletionEntry> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: CompletionEntry) {
        self.entries.insert(code.into(), entry);
    }
}

impl FromIterator<(String, CompletionEntry)> for CompletionStats {
    fn from_iter<I: IntoIterator<Item = (String, CompletionEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fetch every page of translation statistics starting at `url`.
///
/// Returns `None` when the source is unavailable for any reason.
pub async fn fetch_completion_stats(fetcher: &Fetcher, url: &str) -> Option<CompletionStats> {
    match fetch_all_pages(fetcher, url).await {
        Ok(stats) => {
            if stats.is_empty() {
                warn!("Weblate returned no translations");
            } else {
                info!("Fetched {} translations from Weblate", stats.len());
            }
            Some(stats)
        }
        Err(e) => {
            warn!(
                "Failed to fetch from Weblate API ({} stage): {}",
                e.stage(),
                e
            );
            None
        }
    }
}

async fn fetch_all_pages(fetcher: &Fetcher, url: &str) -> Result<CompletionStats> {
    let mut stats = CompletionStats::default();
    let mut visited = HashSet::new();
    let mut page_url = Some(url.to_string());

    while let Some(current) = page_url.take() {
        if !visited.insert(current.clone()) {
            return Err(SyncError::content(&current, "pagination cursor repeats"));
        }
        if visited.len() > MAX_PAGES {
            return Err(SyncError::content(
                &current,
                format!("more than {} pages of translations", MAX_PAGES),
            ));
        }

        info!("Fetching translations from Weblate: {}", current);
        let page: TranslationsPage = fetcher.fetch_json(&current).await?;

        for entry in page.results.unwrap_or_default() {
            let code = entry.language_code.unwrap_or_default().replace('_', "-");
            if code.is_empty() {
                continue;
            }
            let (english_name, native_name) = entry
                .language
                .map(|lang| {
                    (
                        lang.name.unwrap_or_default(),
                        lang.native.unwrap_or_default(),
                    )
                })
                .unwrap_or_default();

            stats.insert(
                code,
                CompletionEntry {
                    percent: entry.translated_percent.unwrap_or(0.0),
                    english_name,
                    native_name,
                },
            );
        }

        page_url = page.next.filter(|next| !next.is_empty());
    }

    Ok(stats)
}
