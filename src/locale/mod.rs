//! Language-name synchronization.
//!
//! Locale codes come from the locale files present on disk. Each code that
//! is not yet named gets a display name from the first resolver that knows
//! it: translation-completion statistics first, the static locale metadata
//! registry second. Codes nobody can name are skipped, never guessed.
//!
//! # Architecture
//!
//! - `inventory`: which locale codes exist locally
//! - `completion`: paginated translation-completion statistics
//! - `metadata`: static English/native names for locale tags
//! - `resolver`: resolver chain, code validation and the locale reconciler
//! - `document`: the localization document holding the `languages` map

mod completion;
mod document;
mod inventory;
mod metadata;
mod resolver;

use std::collections::BTreeMap;

pub use completion::{fetch_completion_stats, CompletionEntry, CompletionStats};
pub use document::LanguagesDocument;
pub use inventory::discover_locale_codes;
pub use metadata::{LocaleNames, LocaleRegistry};
pub use resolver::{
    reconcile_locales, validate_locale_code, CompletionResolver, LocaleReconciliation,
    MetadataResolver, NameResolver, ResolverChain, RESERVED_PREFIX,
};

/// Locale code → display name, kept sorted by code.
pub type LanguageNames = BTreeMap<String, String>;

/// A locale code paired with the display name resolved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEntry {
    pub code: String,
    pub display_name: String,
}
