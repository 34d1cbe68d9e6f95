use std::fmt;
use std::str::FromStr;

use icu_locale::Locale;

use crate::declension::{self, Declension};
use crate::error::{GrammarError, GrammarResult};

/// Languages with a declension. Regional variants share the declension of
/// their base language but keep their own label layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    English,
    EnglishGb,
    EnglishIn,
    EnglishAu,
    EnglishCa,
    German,
    GermanAt,
    GermanCh,
    French,
    FrenchCa,
    Spanish,
    SpanishMx,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::English,
        Language::EnglishGb,
        Language::EnglishIn,
        Language::EnglishAu,
        Language::EnglishCa,
        Language::German,
        Language::GermanAt,
        Language::GermanCh,
        Language::French,
        Language::FrenchCa,
        Language::Spanish,
        Language::SpanishMx,
        Language::Japanese,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::EnglishGb => "en-GB",
            Language::EnglishIn => "en-IN",
            Language::EnglishAu => "en-AU",
            Language::EnglishCa => "en-CA",
            Language::German => "de",
            Language::GermanAt => "de-AT",
            Language::GermanCh => "de-CH",
            Language::French => "fr",
            Language::FrenchCa => "fr-CA",
            Language::Spanish => "es",
            Language::SpanishMx => "es-MX",
            Language::Japanese => "ja",
        }
    }

    /// The ISO 639 code shared by every regional variant.
    pub fn base_code(self) -> &'static str {
        match self {
            Language::English
            | Language::EnglishGb
            | Language::EnglishIn
            | Language::EnglishAu
            | Language::EnglishCa => "en",
            Language::German | Language::GermanAt | Language::GermanCh => "de",
            Language::French | Language::FrenchCa => "fr",
            Language::Spanish | Language::SpanishMx => "es",
            Language::Japanese => "ja",
        }
    }

    pub fn is_same_language(self, other: Language) -> bool {
        self.base_code() == other.base_code()
    }

    /// Next language to consult when a label is missing. `None` ends the chain.
    pub fn fallback(self) -> Option<Language> {
        match self {
            Language::English => None,
            Language::EnglishGb | Language::EnglishCa => Some(Language::English),
            Language::EnglishIn | Language::EnglishAu => Some(Language::EnglishGb),
            Language::GermanAt | Language::GermanCh => Some(Language::German),
            Language::FrenchCa => Some(Language::French),
            Language::SpanishMx => Some(Language::Spanish),
            Language::German | Language::French | Language::Spanish | Language::Japanese => {
                Some(Language::English)
            }
        }
    }

    pub fn declension(self) -> &'static dyn Declension {
        declension::for_language(self)
    }

    /// Maps a BCP 47 or POSIX-style locale (`en_IN`, `de-AT`) to a language.
    /// Unknown regions of a supported language map to its generic regional variant.
    pub fn from_locale(locale: &str) -> GrammarResult<Language> {
        let normalized = locale.trim().replace('_', "-");
        let parsed: Locale = normalized
            .parse()
            .map_err(|_| GrammarError::InvalidLocale(locale.to_string()))?;
        let region = parsed.id.region.as_ref().map(|r| r.as_str().to_string());
        let language = match (parsed.id.language.as_str(), region.as_deref()) {
            ("en", None | Some("US")) => Language::English,
            ("en", Some("GB")) => Language::EnglishGb,
            ("en", Some("IN")) => Language::EnglishIn,
            ("en", Some("AU")) => Language::EnglishAu,
            ("en", Some("CA")) => Language::EnglishCa,
            ("en", Some(_)) => Language::EnglishGb,
            ("de", Some("AT")) => Language::GermanAt,
            ("de", Some("CH")) => Language::GermanCh,
            ("de", _) => Language::German,
            ("fr", Some("CA")) => Language::FrenchCa,
            ("fr", _) => Language::French,
            ("es", Some("MX")) => Language::SpanishMx,
            ("es", _) => Language::Spanish,
            ("ja", _) => Language::Japanese,
            _ => return Err(GrammarError::InvalidLocale(locale.to_string())),
        };
        Ok(language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_locale(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Language::English)]
    #[case("en_US", Language::English)]
    #[case("en-GB", Language::EnglishGb)]
    #[case("en_IN", Language::EnglishIn)]
    #[case("en-NZ", Language::EnglishGb)]
    #[case("de", Language::German)]
    #[case("de_AT", Language::GermanAt)]
    #[case("de-LU", Language::German)]
    #[case("fr-CA", Language::FrenchCa)]
    #[case("es-AR", Language::Spanish)]
    #[case("ja-JP", Language::Japanese)]
    fn test_from_locale(#[case] tag: &str, #[case] expected: Language) {
        assert_eq!(Language::from_locale(tag), Ok(expected));
    }

    #[test]
    fn test_unknown_language() {
        assert!(matches!(
            Language::from_locale("xx-YY"),
            Err(GrammarError::InvalidLocale(_))
        ));
        assert!(Language::from_locale("not a locale").is_err());
    }

    #[test]
    fn test_tags_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_locale(language.tag()), Ok(language));
        }
    }

    #[test]
    fn test_same_language() {
        assert!(Language::EnglishIn.is_same_language(Language::English));
        assert!(!Language::German.is_same_language(Language::English));
    }
}
