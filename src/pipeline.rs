//! End-to-end runs: fetch, reconcile, merge against the baseline, commit.

use crate::commit::{commit, ExitSignal};
use crate::config::Config;
use crate::currency::{
    fetch_countries, fetch_iso_table, load_currency_baseline, reconcile_currencies,
    save_currencies, CurrencyRecord,
};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::locale::{
    discover_locale_codes, fetch_completion_stats, reconcile_locales, CompletionResolver,
    LanguageNames, LanguagesDocument, LocaleReconciliation, MetadataResolver, ResolverChain,
};
use crate::merge::{merge_currencies, merge_language_names, MergeOutcome};
use crate::normalize::default_overrides;
use crate::retry::RetryPolicy;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const CURRENCIES_ARTIFACT: &str = "currencies";
const LANGUAGES_ARTIFACT: &str = "language names";

/// Which artifacts a run updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Currencies,
    Languages,
    All,
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "currencies" => Ok(Target::Currencies),
            "languages" | "language-names" => Ok(Target::Languages),
            "all" => Ok(Target::All),
            other => anyhow::bail!(
                "unknown target {:?} (expected currencies, languages or all)",
                other
            ),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Currencies => f.write_str("currencies"),
            Target::Languages => f.write_str("languages"),
            Target::All => f.write_str("all"),
        }
    }
}

/// Fetcher with the configured timeout and the default GET retry policy.
pub fn build_fetcher(config: &Config) -> Result<Fetcher> {
    Fetcher::new(config.request_timeout, RetryPolicy::http_get())
}

/// Run the pipelines selected by `target` one after the other.
pub async fn run(config: &Config, fetcher: &Fetcher, target: Target) -> ExitSignal {
    match target {
        Target::Currencies => run_currency_sync(config, fetcher).await,
        Target::Languages => run_language_sync(config, fetcher).await,
        Target::All => {
            let currencies = run_currency_sync(config, fetcher).await;
            let languages = run_language_sync(config, fetcher).await;
            currencies.combine(languages)
        }
    }
}

// ==================== Currencies ====================

pub async fn run_currency_sync(config: &Config, fetcher: &Fetcher) -> ExitSignal {
    info!("Starting currency sync");

    let baseline = load_currency_baseline(&config.currencies_path);
    info!("Loaded {} existing currency records", baseline.len());

    let candidate = currency_candidate(config, fetcher).await;
    if let Ok(records) = &candidate {
        info!("Reconciled {} currency records", records.len());
    }

    let outcome = merge_currencies(&baseline, candidate);
    commit(outcome, CURRENCIES_ARTIFACT, |records| {
        save_currencies(&config.currencies_path, records)
    })
}

async fn currency_candidate(config: &Config, fetcher: &Fetcher) -> Result<Vec<CurrencyRecord>> {
    let countries = fetch_countries(fetcher, &config.currencies_api_url).await?;
    let iso = fetch_iso_table(fetcher, &config.iso_4217_url).await;
    if iso.is_empty() {
        warn!("No ISO 4217 data available; using overrides and default decimals");
    }
    reconcile_currencies(&countries, &default_overrides(), &iso)
}

// ==================== Language names ====================

pub async fn run_language_sync(config: &Config, fetcher: &Fetcher) -> ExitSignal {
    info!("Starting language name sync");

    let (document, baseline) = match load_languages(&config.languages_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            return commit(
                MergeOutcome::<LanguageNames>::Fatal(e),
                LANGUAGES_ARTIFACT,
                |_| Ok(()),
            )
        }
    };
    info!("Loaded {} existing language names", baseline.len());

    let candidate = language_candidate(config, fetcher, &baseline).await;
    let outcome = merge_language_names(&baseline, candidate);
    commit(outcome, LANGUAGES_ARTIFACT, |merged| {
        document
            .with_languages(merged)
            .save(&config.languages_path)
    })
}

fn load_languages(path: &Path) -> Result<(LanguagesDocument, LanguageNames)> {
    let document = LanguagesDocument::load(path)?;
    let languages = document.languages()?;
    Ok((document, languages))
}

async fn language_candidate(
    config: &Config,
    fetcher: &Fetcher,
    baseline: &LanguageNames,
) -> Result<LocaleReconciliation> {
    let codes = discover_locale_codes(&config.locales_dir)?;
    if codes.is_empty() {
        warn!(
            "No locale files found in {}",
            config.locales_dir.display()
        );
        return Ok(LocaleReconciliation::default());
    }
    let stats = fetch_completion_stats(fetcher, &config.weblate_translations_url()).await;
    if stats.is_none() {
        warn!("Translation statistics unavailable; falling back to locale metadata");
    }

    let mut chain = ResolverChain::new();
    if let Some(stats) = &stats {
        chain = chain.with(CompletionResolver::new(stats));
    }
    let chain = chain.with(MetadataResolver::new());

    let reconciliation = reconcile_locales(
        &codes,
        baseline,
        stats.as_ref(),
        config.completion_threshold,
        &chain,
    );

    info!(
        "Languages: {} added, {} below threshold, {} unresolved, {} invalid",
        reconciliation.resolved.len(),
        reconciliation.skipped_below_threshold.len(),
        reconciliation.unresolved.len(),
        reconciliation.invalid.len()
    );
    if !reconciliation.unresolved.is_empty() {
        warn!(
            "Could not name locales: {}",
            reconciliation.unresolved.join(", ")
        );
    }

    Ok(reconciliation)
}
