//! Locale metadata registry: English and native display names for locale tags.
//!
//! This is the offline fallback used when translation statistics do not know
//! a locale. It uses a singleton pattern with `OnceLock`, initialized on first
//! access and immutable thereafter.

use regex::Regex;
use std::sync::OnceLock;

/// English and (optionally) native display name of a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleNames {
    pub english: String,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct NameEntry {
    code: &'static str,
    english: &'static str,
    native: Option<&'static str>,
}

const fn entry(code: &'static str, english: &'static str, native: &'static str) -> NameEntry {
    NameEntry {
        code,
        english,
        native: Some(native),
    }
}

const fn english_only(code: &'static str, english: &'static str) -> NameEntry {
    NameEntry {
        code,
        english,
        native: None,
    }
}

/// Non-standard codes in use, mapped to the tag their names come from.
const ALIASES: &[(&str, &str)] = &[("ar-AA", "ar")];

pub struct LocaleRegistry {
    languages: Vec<NameEntry>,
    regions: Vec<NameEntry>,
    scripts: Vec<NameEntry>,
    locales: Vec<NameEntry>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<language>[A-Za-z]{2,3})(?:[-_](?P<script>[A-Za-z]{4}))?(?:[-_](?P<region>[A-Za-z]{2}|[0-9]{3}))?$",
        )
        .expect("Invalid locale tag regex")
    })
}

/// A locale tag split into its subtags, with canonical casing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LocaleTag {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LocaleTag {
    fn parse(code: &str) -> Option<Self> {
        let caps = tag_regex().captures(code)?;

        let script = caps.name("script").map(|m| {
            let lower = m.as_str().to_lowercase();
            let mut chars = lower.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        });

        Some(Self {
            language: caps["language"].to_lowercase(),
            script,
            region: caps.name("region").map(|m| m.as_str().to_uppercase()),
        })
    }

    fn canonical(&self) -> String {
        let mut tag = self.language.clone();
        for subtag in [&self.script, &self.region].into_iter().flatten() {
            tag.push('-');
            tag.push_str(subtag);
        }
        tag
    }
}

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            languages: default_languages(),
            regions: default_regions(),
            scripts: default_scripts(),
            locales: default_locales(),
        })
    }

    /// Display names for a locale code such as `fr`, `pt-BR` or `zh_Hant`.
    ///
    /// Curated locales carry their own names. Any other tag with a known
    /// language is named after the language, qualified by its script and
    /// region (English name when known, the raw subtag otherwise). Returns
    /// `None` when the code cannot be parsed or the language is unknown.
    pub fn display_names(&self, code: &str) -> Option<LocaleNames> {
        let code = ALIASES
            .iter()
            .find(|(alias, _)| *alias == code)
            .map(|(_, target)| *target)
            .unwrap_or(code);

        let tag = LocaleTag::parse(code)?;

        if let Some(locale) = find(&self.locales, &tag.canonical()) {
            return Some(names_of(locale));
        }

        let language = find(&self.languages, &tag.language)?;
        let qualifiers: Vec<&str> = [(&self.scripts, &tag.script), (&self.regions, &tag.region)]
            .into_iter()
            .filter_map(|(table, subtag)| {
                let subtag = subtag.as_deref()?;
                Some(find(table, subtag).map_or(subtag, |entry| entry.english))
            })
            .collect();

        if qualifiers.is_empty() {
            return Some(names_of(language));
        }

        // The native name keeps the English qualifier; only the base is localized
        let qualifier = qualifiers.join(", ");
        let native = language.native.unwrap_or(language.english);
        Some(LocaleNames {
            english: format!("{} ({})", language.english, qualifier),
            native: Some(format!("{} ({})", native, qualifier)),
        })
    }
}

fn find<'a>(entries: &'a [NameEntry], code: &str) -> Option<&'a NameEntry> {
    entries.iter().find(|entry| entry.code == code)
}

fn names_of(entry: &NameEntry) -> LocaleNames {
    LocaleNames {
        english: entry.english.to_string(),
        native: entry.native.map(str::to_string),
    }
}

fn default_languages() -> Vec<NameEntry> {
    vec![
        entry("af", "Afrikaans", "Afrikaans"),
        entry("ar", "Arabic", "العربية"),
        entry("bg", "Bulgarian", "български"),
        entry("bn", "Bangla", "বাংলা"),
        entry("bs", "Bosnian", "bosanski"),
        entry("ca", "Catalan", "català"),
        entry("cs", "Czech", "čeština"),
        entry("da", "Danish", "dansk"),
        entry("de", "German", "Deutsch"),
        entry("el", "Greek", "Ελληνικά"),
        entry("en", "English", "English"),
        entry("eo", "Esperanto", "esperanto"),
        entry("es", "Spanish", "español"),
        entry("et", "Estonian", "eesti"),
        entry("eu", "Basque", "euskara"),
        entry("fa", "Persian", "فارسی"),
        entry("fi", "Finnish", "suomi"),
        entry("fr", "French", "français"),
        entry("ga", "Irish", "Gaeilge"),
        entry("gl", "Galician", "galego"),
        entry("he", "Hebrew", "עברית"),
        entry("hi", "Hindi", "हिन्दी"),
        entry("hr", "Croatian", "hrvatski"),
        entry("hu", "Hungarian", "magyar"),
        entry("id", "Indonesian", "Indonesia"),
        entry("is", "Icelandic", "íslenska"),
        entry("it", "Italian", "italiano"),
        entry("ja", "Japanese", "日本語"),
        entry("ko", "Korean", "한국어"),
        entry("lb", "Luxembourgish", "Lëtzebuergesch"),
        entry("lt", "Lithuanian", "lietuvių"),
        entry("lv", "Latvian", "latviešu"),
        entry("mk", "Macedonian", "македонски"),
        entry("ms", "Malay", "Melayu"),
        entry("nb", "Norwegian Bokmål", "norsk bokmål"),
        entry("nl", "Dutch", "Nederlands"),
        entry("pl", "Polish", "polski"),
        entry("pt", "Portuguese", "português"),
        entry("ro", "Romanian", "română"),
        entry("ru", "Russian", "русский"),
        entry("sk", "Slovak", "slovenčina"),
        entry("sl", "Slovenian", "slovenščina"),
        entry("sq", "Albanian", "shqip"),
        entry("sr", "Serbian", "српски"),
        entry("sv", "Swedish", "svenska"),
        entry("sw", "Swahili", "Kiswahili"),
        entry("ta", "Tamil", "தமிழ்"),
        entry("th", "Thai", "ไทย"),
        entry("tr", "Turkish", "Türkçe"),
        entry("uk", "Ukrainian", "українська"),
        entry("ur", "Urdu", "اردو"),
        entry("vi", "Vietnamese", "Tiếng Việt"),
        entry("zh", "Chinese", "中文"),
    ]
}

fn default_regions() -> Vec<NameEntry> {
    vec![
        english_only("419", "Latin America"),
        english_only("AE", "United Arab Emirates"),
        english_only("AL", "Albania"),
        english_only("AR", "Argentina"),
        english_only("AT", "Austria"),
        english_only("AU", "Australia"),
        english_only("BA", "Bosnia & Herzegovina"),
        english_only("BD", "Bangladesh"),
        english_only("BE", "Belgium"),
        english_only("BG", "Bulgaria"),
        english_only("BR", "Brazil"),
        english_only("CA", "Canada"),
        english_only("CH", "Switzerland"),
        english_only("CL", "Chile"),
        english_only("CN", "China"),
        english_only("CO", "Colombia"),
        english_only("CZ", "Czechia"),
        english_only("DE", "Germany"),
        english_only("DK", "Denmark"),
        english_only("EE", "Estonia"),
        english_only("EG", "Egypt"),
        english_only("ES", "Spain"),
        english_only("FI", "Finland"),
        english_only("FR", "France"),
        english_only("GB", "United Kingdom"),
        english_only("GR", "Greece"),
        english_only("HK", "Hong Kong SAR China"),
        english_only("HR", "Croatia"),
        english_only("HU", "Hungary"),
        english_only("ID", "Indonesia"),
        english_only("IE", "Ireland"),
        english_only("IL", "Israel"),
        english_only("IN", "India"),
        english_only("IR", "Iran"),
        english_only("IT", "Italy"),
        english_only("JP", "Japan"),
        english_only("KR", "South Korea"),
        english_only("LT", "Lithuania"),
        english_only("LU", "Luxembourg"),
        english_only("LV", "Latvia"),
        english_only("ME", "Montenegro"),
        english_only("MK", "North Macedonia"),
        english_only("MO", "Macao SAR China"),
        english_only("MX", "Mexico"),
        english_only("MY", "Malaysia"),
        english_only("NL", "Netherlands"),
        english_only("NO", "Norway"),
        english_only("NZ", "New Zealand"),
        english_only("PL", "Poland"),
        english_only("PT", "Portugal"),
        english_only("RO", "Romania"),
        english_only("RS", "Serbia"),
        english_only("RU", "Russia"),
        english_only("SA", "Saudi Arabia"),
        english_only("SE", "Sweden"),
        english_only("SG", "Singapore"),
        english_only("SI", "Slovenia"),
        english_only("SK", "Slovakia"),
        english_only("TH", "Thailand"),
        english_only("TR", "Türkiye"),
        english_only("TW", "Taiwan"),
        english_only("UA", "Ukraine"),
        english_only("US", "United States"),
        english_only("VN", "Vietnam"),
        english_only("ZA", "South Africa"),
    ]
}

fn default_scripts() -> Vec<NameEntry> {
    vec![
        english_only("Arab", "Arabic"),
        english_only("Cyrl", "Cyrillic"),
        english_only("Hans", "Simplified"),
        english_only("Hant", "Traditional"),
        english_only("Latn", "Latin"),
    ]
}

fn default_locales() -> Vec<NameEntry> {
    vec![
        entry("de-AT", "German (Austria)", "Deutsch (Österreich)"),
        entry("de-CH", "German (Switzerland)", "Deutsch (Schweiz)"),
        entry("de-DE", "German (Germany)", "Deutsch (Deutschland)"),
        entry("en-GB", "English (United Kingdom)", "English (United Kingdom)"),
        entry("en-US", "English (United States)", "English (United States)"),
        entry("es-419", "Spanish (Latin America)", "español (Latinoamérica)"),
        entry("es-ES", "Spanish (Spain)", "español (España)"),
        entry("es-MX", "Spanish (Mexico)", "español (México)"),
        entry("fr-CA", "French (Canada)", "français (Canada)"),
        entry("fr-FR", "French (France)", "français (France)"),
        entry("ja-JP", "Japanese (Japan)", "日本語 (日本)"),
        entry("ko-KR", "Korean (South Korea)", "한국어 (대한민국)"),
        entry("nb-NO", "Norwegian Bokmål (Norway)", "norsk bokmål (Norge)"),
        entry("pt-BR", "Portuguese (Brazil)", "português (Brasil)"),
        entry("pt-PT", "Portuguese (Portugal)", "português (Portugal)"),
        entry("ro-RO", "Romanian (Romania)", "română (România)"),
        entry("ru-RU", "Russian (Russia)", "русский (Россия)"),
        entry("sk-SK", "Slovak (Slovakia)", "slovenčina (Slovensko)"),
        entry("uk-UA", "Ukrainian (Ukraine)", "українська (Україна)"),
        entry("zh-CN", "Chinese (China)", "中文 (中国)"),
        entry("zh-HK", "Chinese (Hong Kong SAR China)", "中文 (中國香港特別行政區)"),
        entry("zh-Hans", "Chinese (Simplified)", "中文 (简体)"),
        entry("zh-Hant", "Chinese (Traditional)", "中文 (繁體)"),
        entry("zh-MO", "Chinese (Macao SAR China)", "中文 (中國澳門特別行政區)"),
        entry("zh-TW", "Chinese (Taiwan)", "中文 (台灣)"),
    ]
}
