use crate::grammar::{
    AdjectiveForm, ArticleForm, ArticleKind, Case, Gender, NounForm, Number,
};
use crate::language::Language;

use super::{Declension, FormLookup};

/// German: four cases, three genders, no sound-dependent articles. Nouns keep
/// their capital letter in running text.
#[derive(Debug, Default)]
pub struct GermanDeclension;

const GENDERS: [Gender; 3] = [Gender::Masculine, Gender::Feminine, Gender::Neuter];

/// Adjective ending family, selected by the article in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inflection {
    Strong,
    Weak,
    Mixed,
}

impl GermanDeclension {
    fn plural_of(singular: &str) -> String {
        if singular.ends_with('e') {
            format!("{}n", singular)
        } else if singular.ends_with(['a', 'i', 'o', 'u', 'y']) {
            format!("{}s", singular)
        } else if singular.ends_with("er") || singular.ends_with("el") || singular.ends_with("en")
        {
            singular.to_string()
        } else {
            format!("{}e", singular)
        }
    }

    fn genitive_singular(nominative: &str) -> String {
        if nominative.ends_with('s')
            || nominative.ends_with('x')
            || nominative.ends_with('z')
            || nominative.ends_with("ß")
        {
            format!("{}es", nominative)
        } else {
            format!("{}s", nominative)
        }
    }

    fn dative_plural(nominative: &str) -> String {
        if nominative.ends_with('n') || nominative.ends_with('s') {
            nominative.to_string()
        } else {
            format!("{}n", nominative)
        }
    }

    fn ending(inflection: Inflection, form: AdjectiveForm) -> &'static str {
        use Case::*;
        use Gender::*;
        if form.number() == Number::Plural {
            return match (inflection, form.case()) {
                (Inflection::Strong, Nominative | Accusative) => "e",
                (Inflection::Strong, Genitive) => "er",
                _ => "en",
            };
        }
        match inflection {
            Inflection::Weak => match (form.case(), form.gender()) {
                (Nominative, _) => "e",
                (Accusative, Feminine | Neuter) => "e",
                _ => "en",
            },
            Inflection::Mixed => match (form.case(), form.gender()) {
                (Nominative, Masculine) => "er",
                (Nominative | Accusative, Feminine) => "e",
                (Nominative | Accusative, Neuter) => "es",
                _ => "en",
            },
            Inflection::Strong => match (form.case(), form.gender()) {
                (Nominative, Masculine) => "er",
                (Nominative | Accusative, Feminine) => "e",
                (Nominative | Accusative, Neuter) => "es",
                (Accusative, Masculine) => "en",
                (Genitive, Masculine | Neuter) => "en",
                (Genitive | Dative, Feminine) => "er",
                (Dative, Masculine | Neuter) => "em",
            },
        }
    }
}

impl Declension for GermanDeclension {
    fn language(&self) -> Language {
        Language::German
    }

    fn cases(&self) -> &'static [Case] {
        &Case::ALL
    }

    fn genders(&self) -> &'static [Gender] {
        &GENDERS
    }

    fn derive_noun(
        &self,
        form: NounForm,
        gender: Gender,
        known: FormLookup<'_>,
    ) -> Option<String> {
        let nominative = NounForm::new(form.number(), Case::Nominative);
        match (form.number(), form.case()) {
            (Number::Singular, Case::Nominative) => None,
            (Number::Plural, Case::Nominative) => known(NounForm::new(
                Number::Singular,
                Case::Nominative,
            ))
            .map(|s| Self::plural_of(&s)),
            (Number::Singular, Case::Genitive) if gender != Gender::Feminine => {
                known(nominative).map(|s| Self::genitive_singular(&s))
            }
            (Number::Plural, Case::Dative) => known(nominative).map(|s| Self::dative_plural(&s)),
            _ => known(nominative),
        }
    }

    fn derive_adjective(&self, base: &str, form: AdjectiveForm) -> String {
        let inflection = match (form.article(), form.number()) {
            (ArticleKind::Definite, _) => Inflection::Weak,
            (ArticleKind::Indefinite, Number::Singular) => Inflection::Mixed,
            _ => Inflection::Strong,
        };
        let stem = base.strip_suffix('e').unwrap_or(base);
        format!("{}{}", stem, Self::ending(inflection, form))
    }

    fn default_article(&self, kind: ArticleKind, form: ArticleForm) -> Option<&'static str> {
        use Case::*;
        use Gender::*;
        match kind {
            ArticleKind::Zero => None,
            ArticleKind::Definite => Some(match (form.number(), form.case(), form.gender()) {
                (Number::Plural, Nominative | Accusative, _) => "die ",
                (Number::Plural, Genitive, _) => "der ",
                (Number::Plural, Dative, _) => "den ",
                (_, Nominative, Masculine) => "der ",
                (_, Accusative, Masculine) => "den ",
                (_, Nominative | Accusative, Feminine) => "die ",
                (_, Nominative | Accusative, Neuter) => "das ",
                (_, Genitive, Masculine | Neuter) => "des ",
                (_, Genitive | Dative, Feminine) => "der ",
                (_, Dative, Masculine | Neuter) => "dem ",
            }),
            ArticleKind::Indefinite => match (form.number(), form.case(), form.gender()) {
                (Number::Plural, _, _) => None,
                (_, Nominative, Masculine | Neuter) => Some("ein "),
                (_, Accusative, Neuter) => Some("ein "),
                (_, Accusative, Masculine) => Some("einen "),
                (_, Nominative | Accusative, Feminine) => Some("eine "),
                (_, Genitive, Masculine | Neuter) => Some("eines "),
                (_, Genitive | Dative, Feminine) => Some("einer "),
                (_, Dative, Masculine | Neuter) => Some("einem "),
            },
        }
    }

    fn fold_noun(&self, text: &str) -> String {
        text.to_string()
    }
}
