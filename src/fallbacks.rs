//! Locale fallback chains.
//!
//! A chain starts at the requested language and strips specificity until it
//! reaches US English, which has no fallback:
//!
//! - `en-IN` -> `en-GB` -> `en-US`
//! - `de-AT` -> `de` -> `en-US`
//! - `ja` -> `en-US`

use crate::error::GrammarResult;
use crate::language::Language;

/// Returns the ordered fallback chain for `language`, starting with itself.
pub fn language_chain(language: Language) -> Vec<Language> {
    let mut chain = vec![language];
    let mut current = language;
    while let Some(next) = current.fallback() {
        if chain.contains(&next) {
            break;
        }
        chain.push(next);
        current = next;
    }
    chain
}

/// Resolves a locale string into its language fallback chain.
pub fn resolve_locale_chain(locale: &str) -> GrammarResult<Vec<Language>> {
    Ok(language_chain(Language::from_locale(locale)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_chains() {
        assert_eq!(
            resolve_locale_chain("en-IN").unwrap(),
            vec![Language::EnglishIn, Language::EnglishGb, Language::English]
        );
        assert_eq!(
            resolve_locale_chain("en_CA").unwrap(),
            vec![Language::EnglishCa, Language::English]
        );
        assert_eq!(resolve_locale_chain("en").unwrap(), vec![Language::English]);
    }

    #[test]
    fn test_other_chains_end_in_english() {
        assert_eq!(
            resolve_locale_chain("de-CH").unwrap(),
            vec![Language::GermanCh, Language::German, Language::English]
        );
        assert_eq!(
            resolve_locale_chain("ja").unwrap(),
            vec![Language::Japanese, Language::English]
        );
    }

    #[test]
    fn test_every_chain_terminates() {
        for language in Language::ALL {
            let chain = language_chain(language);
            assert_eq!(chain.first(), Some(&language));
            assert_eq!(chain.last(), Some(&Language::English));
        }
    }
}
