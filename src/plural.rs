//! CLDR cardinal plural categories for `{{plural:...}}` choices.

use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::error::{GrammarError, GrammarResult};
use crate::language::Language;

/// Representative numbers probed to discover which categories a language
/// uses. The first number that lands in a category stands for it.
const PROBES: [(PluralCategory, &[usize]); 6] = [
    (PluralCategory::Zero, &[0]),
    (PluralCategory::One, &[1, 21, 31]),
    (PluralCategory::Two, &[2, 22]),
    (PluralCategory::Few, &[3, 4, 23]),
    (PluralCategory::Many, &[5, 11, 101, 1_000_000]),
    (PluralCategory::Other, &[6, 7, 10, 25, 100]),
];

fn rules_for(language: Language) -> GrammarResult<PluralRules> {
    let locale: Locale = language
        .tag()
        .parse()
        .map_err(|_| GrammarError::InvalidLocale(language.tag().to_string()))?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
        .map_err(|_| GrammarError::InvalidLocale(language.tag().to_string()))
}

/// Categories `language` distinguishes, in CLDR order (zero, one, two, few,
/// many, other). Positional plural forms map onto this list.
pub fn categories(language: Language) -> GrammarResult<Vec<PluralCategory>> {
    let rules = rules_for(language)?;
    Ok(PROBES
        .iter()
        .filter(|(category, probes)| {
            probes
                .iter()
                .any(|n| rules.category_for(*n) == *category)
        })
        .map(|(category, _)| *category)
        .collect())
}

/// Category of the integer `value` in `language`.
pub fn category_for(language: Language, value: usize) -> GrammarResult<PluralCategory> {
    Ok(rules_for(language)?.category_for(value))
}

pub fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}
