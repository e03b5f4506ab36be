//! Display-name resolution for locale codes.
//!
//! Resolvers are tried in order and the first one that names a code wins.
//! Each resolver is a pure lookup so the chain can be tested without any
//! network access.

use super::completion::CompletionStats;
use super::metadata::LocaleRegistry;
use super::{LanguageNames, LocaleEntry};
use crate::error::{Result, SyncError};
use crate::normalize::format_display_name;
use tracing::{info, warn};

/// Key namespace used by the localization document itself.
pub const RESERVED_PREFIX: &str = "languages.";

/// A source of display names for locale codes.
pub trait NameResolver {
    /// Short label used in logs.
    fn source(&self) -> &'static str;

    fn resolve(&self, code: &str) -> Option<String>;
}

/// Names from translation-completion statistics.
pub struct CompletionResolver<'a> {
    stats: &'a CompletionStats,
}

impl<'a> CompletionResolver<'a> {
    pub fn new(stats: &'a CompletionStats) -> Self {
        Self { stats }
    }
}

impl NameResolver for CompletionResolver<'_> {
    fn source(&self) -> &'static str {
        "weblate"
    }

    fn resolve(&self, code: &str) -> Option<String> {
        let entry = self.stats.get(code)?;
        if entry.english_name.is_empty() {
            return None;
        }
        Some(format_display_name(
            &entry.english_name,
            Some(entry.native_name.as_str()),
        ))
    }
}

/// Names from the static locale metadata registry.
pub struct MetadataResolver {
    registry: &'static LocaleRegistry,
}

impl MetadataResolver {
    pub fn new() -> Self {
        Self {
            registry: LocaleRegistry::get(),
        }
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver for MetadataResolver {
    fn source(&self) -> &'static str {
        "locale metadata"
    }

    fn resolve(&self, code: &str) -> Option<String> {
        let names = self.registry.display_names(code)?;
        Some(format_display_name(&names.english, names.native.as_deref()))
    }
}

/// Ordered list of resolvers; the first non-empty answer wins.
pub struct ResolverChain<'a> {
    resolvers: Vec<Box<dyn NameResolver + 'a>>,
}

impl<'a> ResolverChain<'a> {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    pub fn with(mut self, resolver: impl NameResolver + 'a) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Resolve `code`, returning the name and the label of the source that produced it.
    pub fn resolve(&self, code: &str) -> Option<(String, &'static str)> {
        self.resolvers.iter().find_map(|resolver| {
            resolver
                .resolve(code)
                .filter(|name| !name.trim().is_empty())
                .map(|name| (name, resolver.source()))
        })
    }
}

impl Default for ResolverChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject codes that would collide with the document's key namespace.
pub fn validate_locale_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(SyncError::Validation("empty locale code".to_string()));
    }
    if code.starts_with(RESERVED_PREFIX) {
        return Err(SyncError::Validation(format!(
            "locale code {:?} uses the reserved {:?} prefix",
            code, RESERVED_PREFIX
        )));
    }
    if code.contains('.') {
        return Err(SyncError::Validation(format!(
            "locale code {:?} contains a dot",
            code
        )));
    }
    Ok(())
}

/// Result of naming the locale inventory against a baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleReconciliation {
    /// Number of codes in the inventory
    pub considered: usize,
    /// Newly named codes, in inventory order
    pub resolved: Vec<LocaleEntry>,
    pub skipped_below_threshold: Vec<String>,
    pub unresolved: Vec<String>,
    pub invalid: Vec<String>,
}

/// Name every inventory code missing from `baseline`.
///
/// Codes already in the baseline are left alone whatever their current
/// completion. When statistics are available, a code they report below
/// `threshold` is held back for this run; a code they do not report falls
/// through to the remaining resolvers.
pub fn reconcile_locales(
    codes: &[String],
    baseline: &LanguageNames,
    stats: Option<&CompletionStats>,
    threshold: f64,
    chain: &ResolverChain<'_>,
) -> LocaleReconciliation {
    let mut outcome = LocaleReconciliation {
        considered: codes.len(),
        ..Default::default()
    };

    for code in codes {
        if baseline.contains_key(code) {
            continue;
        }

        if let Err(e) = validate_locale_code(code) {
            warn!("Skipping invalid locale code: {}", e);
            outcome.invalid.push(code.clone());
            continue;
        }

        if let Some(entry) = stats.and_then(|stats| stats.get(code)) {
            if entry.percent < threshold {
                info!(
                    "Skipping {}: {:.1}% translated (threshold {:.1}%)",
                    code, entry.percent, threshold
                );
                outcome.skipped_below_threshold.push(code.clone());
                continue;
            }
        }

        match chain.resolve(code) {
            Some((display_name, source)) => {
                info!("Adding {}: {} (from {})", code, display_name, source);
                outcome.resolved.push(LocaleEntry {
                    code: code.clone(),
                    display_name,
                });
            }
            None => {
                warn!("Could not resolve a display name for {}; skipping", code);
                outcome.unresolved.push(code.clone());
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::CompletionEntry;

    struct FixedResolver(&'static str, Option<&'static str>);

    impl NameResolver for FixedResolver {
        fn source(&self) -> &'static str {
            self.0
        }

        fn resolve(&self, _code: &str) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    fn stats(entries: &[(&str, f64, &str, &str)]) -> CompletionStats {
        entries
            .iter()
            .map(|(code, percent, english, native)| {
                (
                    code.to_string(),
                    CompletionEntry {
                        percent: *percent,
                        english_name: english.to_string(),
                        native_name: native.to_string(),
                    },
                )
            })
            .collect()
    }

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|c| c.to_string()).collect()
    }

    fn baseline_en() -> LanguageNames {
        [("en".to_string(), "English".to_string())].into_iter().collect()
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_accepts_plain_codes() {
        assert!(validate_locale_code("fr").is_ok());
        assert!(validate_locale_code("pt-BR").is_ok());
        assert!(validate_locale_code("zh-Hant").is_ok());
    }

    #[test]
    fn test_validate_rejects_dots_and_reserved_prefix() {
        assert!(matches!(
            validate_locale_code("fr.backup"),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(
            validate_locale_code("languages.fr"),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(validate_locale_code(" "), Err(SyncError::Validation(_))));
    }

    // ==================== Resolver Tests ====================

    #[test]
    fn test_completion_resolver_formats_names() {
        let stats = stats(&[("fr", 85.0, "French", "Français"), ("eo", 90.0, "", "")]);
        let resolver = CompletionResolver::new(&stats);

        assert_eq!(resolver.resolve("fr").as_deref(), Some("French (Français)"));
        assert_eq!(resolver.resolve("eo"), None);
        assert_eq!(resolver.resolve("de"), None);
    }

    #[test]
    fn test_metadata_resolver() {
        let resolver = MetadataResolver::new();
        assert_eq!(resolver.resolve("de").as_deref(), Some("German (Deutsch)"));
        assert_eq!(resolver.resolve("ja-JP").as_deref(), Some("Japanese (日本語)"));
        assert_eq!(resolver.resolve("en").as_deref(), Some("English"));
        assert_eq!(resolver.resolve("qq-ZZ"), None);
    }

    #[test]
    fn test_metadata_resolver_flattens_regional_locales() {
        let resolver = MetadataResolver::new();
        assert_eq!(resolver.resolve("cs-CZ").as_deref(), Some("Czech (čeština)"));
        assert_eq!(resolver.resolve("it-CH").as_deref(), Some("Italian (italiano)"));
        assert_eq!(resolver.resolve("sr-Latn").as_deref(), Some("Serbian (српски)"));
        assert_eq!(resolver.resolve("en-AU").as_deref(), Some("English (Australia)"));
    }

    #[test]
    fn test_chain_first_answer_wins() {
        let chain = ResolverChain::new()
            .with(FixedResolver("first", None))
            .with(FixedResolver("second", Some("Second")))
            .with(FixedResolver("third", Some("Third")));

        assert_eq!(chain.resolve("xx"), Some(("Second".to_string(), "second")));
    }

    #[test]
    fn test_chain_ignores_blank_names() {
        let chain = ResolverChain::new()
            .with(FixedResolver("blank", Some("  ")))
            .with(FixedResolver("real", Some("Real")));

        assert_eq!(chain.resolve("xx"), Some(("Real".to_string(), "real")));
    }

    #[test]
    fn test_empty_chain_resolves_nothing() {
        let chain = ResolverChain::new();
        assert_eq!(chain.resolve("fr"), None);
    }

    // ==================== Reconciler Tests ====================

    #[test]
    fn test_reconcile_adds_code_above_threshold() {
        let stats = stats(&[("fr", 85.0, "French", "Français")]);
        let chain = ResolverChain::new()
            .with(CompletionResolver::new(&stats))
            .with(MetadataResolver::new());

        let outcome =
            reconcile_locales(&codes(&["en", "fr"]), &baseline_en(), Some(&stats), 80.0, &chain);

        assert_eq!(outcome.considered, 2);
        assert_eq!(
            outcome.resolved,
            vec![LocaleEntry {
                code: "fr".to_string(),
                display_name: "French (Français)".to_string(),
            }]
        );
    }

    #[test]
    fn test_reconcile_holds_back_code_below_threshold() {
        let stats = stats(&[("fr", 60.0, "French", "Français")]);
        let chain = ResolverChain::new()
            .with(CompletionResolver::new(&stats))
            .with(MetadataResolver::new());

        let outcome =
            reconcile_locales(&codes(&["en", "fr"]), &baseline_en(), Some(&stats), 80.0, &chain);

        assert!(outcome.resolved.is_empty());
        assert_eq!(outcome.skipped_below_threshold, vec!["fr".to_string()]);
    }

    #[test]
    fn test_reconcile_threshold_is_inclusive() {
        let stats = stats(&[("fr", 80.0, "French", "Français")]);
        let chain = ResolverChain::new().with(CompletionResolver::new(&stats));

        let outcome =
            reconcile_locales(&codes(&["fr"]), &LanguageNames::new(), Some(&stats), 80.0, &chain);

        assert_eq!(outcome.resolved.len(), 1);
    }

    #[test]
    fn test_reconcile_never_touches_baseline_codes() {
        let stats = stats(&[("en", 10.0, "English", "English")]);
        let chain = ResolverChain::new().with(CompletionResolver::new(&stats));

        let outcome = reconcile_locales(&codes(&["en"]), &baseline_en(), Some(&stats), 80.0, &chain);

        assert!(outcome.resolved.is_empty());
        assert!(outcome.skipped_below_threshold.is_empty());
    }

    #[test]
    fn test_reconcile_falls_back_to_metadata_when_stats_missing_code() {
        let stats = stats(&[("fr", 95.0, "French", "Français")]);
        let chain = ResolverChain::new()
            .with(CompletionResolver::new(&stats))
            .with(MetadataResolver::new());

        let outcome =
            reconcile_locales(&codes(&["de"]), &LanguageNames::new(), Some(&stats), 80.0, &chain);

        assert_eq!(outcome.resolved[0].display_name, "German (Deutsch)");
    }

    #[test]
    fn test_reconcile_without_stats_uses_metadata() {
        let chain = ResolverChain::new().with(MetadataResolver::new());

        let outcome = reconcile_locales(
            &codes(&["ar-AA", "pt-BR"]),
            &LanguageNames::new(),
            None,
            80.0,
            &chain,
        );

        let names: Vec<_> = outcome
            .resolved
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Arabic (العربية)", "Portuguese (português)"]);
    }

    #[test]
    fn test_reconcile_records_invalid_and_unresolved() {
        let chain = ResolverChain::new().with(MetadataResolver::new());

        let outcome = reconcile_locales(
            &codes(&["languages.fr", "qq"]),
            &LanguageNames::new(),
            None,
            80.0,
            &chain,
        );

        assert!(outcome.resolved.is_empty());
        assert_eq!(outcome.invalid, vec!["languages.fr".to_string()]);
        assert_eq!(outcome.unresolved, vec!["qq".to_string()]);
    }
}
