// src/language/mod.rs
use crate::errors::SkyError;

/// Language codes as numbered by the game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LanguageCode {
    English = 0,
    German = 1,
    French = 2,
    Usa = 3,
    Swedish = 4,
    Italian = 5,
    Portuguese = 6,
    Spanish = 7,
    ChineseTraditional = 8,
}

/// Codes with text resources in the pack, in scan order.
pub const DISK_LANGUAGES: [LanguageCode; 8] = [
    LanguageCode::English,
    LanguageCode::German,
    LanguageCode::French,
    LanguageCode::Usa,
    LanguageCode::Swedish,
    LanguageCode::Italian,
    LanguageCode::Portuguese,
    LanguageCode::Spanish,
];

const TEXT_RESOURCE_BASE: u16 = 60600;

impl LanguageCode {
    /// First text file of this language, or `None` for the Chinese
    /// translation whose strings come from the executable.
    pub fn text_resource(self) -> Option<u16> {
        match self {
            LanguageCode::ChineseTraditional => None,
            code => Some(TEXT_RESOURCE_BASE + code as u16 * 8),
        }
    }
}

/// A language as requested by the user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    EnglishUsa,
    EnglishUk,
    German,
    French,
    Italian,
    PortugueseBrazil,
    Spanish,
    Swedish,
    ChineseTaiwan,
    Hebrew,
    Other,
}

impl Language {
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase().replace('-', "_");
        match tag.as_str() {
            "us" | "en_us" => Language::EnglishUsa,
            "gb" | "uk" | "en_gb" => Language::EnglishUk,
            "de" | "de_de" => Language::German,
            "fr" | "fr_fr" => Language::French,
            "it" | "it_it" => Language::Italian,
            "br" | "pt_br" => Language::PortugueseBrazil,
            "es" | "es_es" => Language::Spanish,
            "se" | "sv" | "sv_se" => Language::Swedish,
            "zh_tw" | "cn_tw" => Language::ChineseTaiwan,
            "he" | "he_il" | "hb" => Language::Hebrew,
            _ => Language::Other,
        }
    }

    /// Languages without a translation get English text.
    pub fn code(self) -> LanguageCode {
        match self {
            Language::EnglishUsa => LanguageCode::Usa,
            Language::EnglishUk => LanguageCode::English,
            Language::German => LanguageCode::German,
            Language::French => LanguageCode::French,
            Language::Italian => LanguageCode::Italian,
            Language::PortugueseBrazil => LanguageCode::Portuguese,
            Language::Spanish => LanguageCode::Spanish,
            Language::Swedish => LanguageCode::Swedish,
            Language::ChineseTaiwan => LanguageCode::ChineseTraditional,
            Language::Hebrew | Language::Other => LanguageCode::English,
        }
    }

    pub fn right_to_left(self) -> bool {
        matches!(self, Language::Hebrew)
    }
}

/// Picks a language whose text resources exist.
///
/// The requested code is kept when its resource exists (or when it needs
/// none). Otherwise UK English, then US English, then the first language
/// found in `DISK_LANGUAGES` order. No language at all is a config error.
pub fn resolve(
    requested: LanguageCode,
    file_exists: impl Fn(u16) -> bool,
) -> Result<LanguageCode, SkyError> {
    let available = |code: LanguageCode| code.text_resource().map_or(true, &file_exists);

    if available(requested) {
        return Ok(requested);
    }

    log::warn!(
        "The language {:?} is not present in this resource pack",
        requested
    );

    let fallback = [LanguageCode::English, LanguageCode::Usa]
        .into_iter()
        .chain(DISK_LANGUAGES)
        .find(|code| available(*code));

    match fallback {
        Some(code) => {
            log::info!("Falling back to language {:?}", code);
            Ok(code)
        }
        None => {
            log::error!("No language text resources found in the resource pack");
            Err(SkyError::Config(
                "no language text resources present in the resource pack".to_string(),
            ))
        }
    }
}
