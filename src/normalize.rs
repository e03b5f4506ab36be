//! Field-level normalization rules shared by both pipelines.

use std::collections::HashMap;

pub const DEFAULT_DECIMALS: i64 = 2;
pub const MIN_DECIMALS: i64 = 0;
pub const MAX_DECIMALS: i64 = 6;

/// Currency code → decimal places.
pub type DecimalTable = HashMap<String, i64>;

/// Hand-curated decimal places that win over any fetched metadata.
pub fn default_overrides() -> DecimalTable {
    [
        ("BTC", 8), // Bitcoin uses 8 decimal places
        ("JPY", 0),
        ("BHD", 3),
    ]
    .into_iter()
    .map(|(code, decimals)| (code.to_string(), decimals))
    .collect()
}

/// Trim and upper-case a currency code; absent input becomes the empty code.
pub fn normalize_code(code: Option<&str>) -> String {
    code.map(|c| c.trim().to_uppercase()).unwrap_or_default()
}

/// Decimal places for `code`: override, then ISO table, then the default,
/// always clamped to `[MIN_DECIMALS, MAX_DECIMALS]`.
pub fn resolve_decimals(code: &str, overrides: &DecimalTable, iso: &DecimalTable) -> u8 {
    let normalized = normalize_code(Some(code));

    let decimals = overrides
        .get(&normalized)
        .or_else(|| iso.get(&normalized))
        .copied()
        .unwrap_or(DEFAULT_DECIMALS);

    clamp_decimals(decimals)
}

pub fn clamp_decimals(decimals: i64) -> u8 {
    // Bounds fit in u8
    decimals.clamp(MIN_DECIMALS, MAX_DECIMALS) as u8
}

/// Upper-case the first character and leave the rest untouched.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"English"` or `"English (Native)"`.
///
/// When both names carry a parenthetical qualifier only their bases are
/// kept, so `"Japanese (Japan)"` + `"日本語 (日本)"` becomes `"Japanese (日本語)"`.
pub fn format_display_name(english: &str, native: Option<&str>) -> String {
    let native = match native {
        Some(native) if !native.is_empty() && native != english => native,
        _ => return english.to_string(),
    };

    if english.contains('(') && native.contains('(') {
        let english_base = base_name(english);
        let native_base = base_name(native);
        if !english_base.is_empty() && !native_base.is_empty() {
            return format!("{} ({})", english_base, native_base);
        }
    }

    format!("{} ({})", english, native)
}

fn base_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}
