use crate::grammar::{ArticleForm, ArticleKind, Case, Gender, NounForm, Number, StartsWith};
use crate::language::Language;

use super::{Declension, FormLookup};

/// English: singular and plural, no case, no gender. Articles depend on the
/// following sound ("a" vs "an").
#[derive(Debug, Default)]
pub struct EnglishDeclension;

impl EnglishDeclension {
    /// Regular plural of a singular noun phrase. Only the last word inflects.
    pub fn pluralize(singular: &str) -> String {
        let lower = singular.to_lowercase();
        if lower.ends_with('s')
            || lower.ends_with('x')
            || lower.ends_with('z')
            || lower.ends_with("ch")
            || lower.ends_with("sh")
        {
            return format!("{}es", singular);
        }
        if let Some(stem) = singular.strip_suffix(['y', 'Y']) {
            let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
            if matches!(before, Some(c) if c.is_alphabetic() && !"aeiou".contains(c)) {
                return format!("{}ies", stem);
            }
        }
        format!("{}s", singular)
    }
}

impl Declension for EnglishDeclension {
    fn language(&self) -> Language {
        Language::English
    }

    fn has_starts_with(&self) -> bool {
        true
    }

    fn derive_noun(
        &self,
        form: NounForm,
        _gender: Gender,
        known: FormLookup<'_>,
    ) -> Option<String> {
        match form.number() {
            Number::Singular => None,
            Number::Plural => known(NounForm::new(Number::Singular, Case::Nominative))
                .map(|s| Self::pluralize(&s)),
        }
    }

    fn default_article(&self, kind: ArticleKind, form: ArticleForm) -> Option<&'static str> {
        match (kind, form.number(), form.starts_with()) {
            (ArticleKind::Zero, _, _) => None,
            (ArticleKind::Indefinite, Number::Plural, _) => None,
            (ArticleKind::Indefinite, Number::Singular, StartsWith::Consonant) => Some("a "),
            (ArticleKind::Indefinite, Number::Singular, StartsWith::Vowel) => Some("an "),
            (ArticleKind::Definite, _, _) => Some("the "),
        }
    }
}
