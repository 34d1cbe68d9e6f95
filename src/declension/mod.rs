//! Per-language declension rules.
//!
//! A declension declares the legal form-key space of a language, derives the
//! forms a dictionary leaves unset, selects articles and inflects adjectives.
//! Declensions are stateless; one static instance per language family is
//! shared by every request.

mod english;
mod germanic;
mod romance;
mod simple;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{
    AdjectiveForm, ArticleForm, ArticleKind, Case, Gender, NounForm, Number, StartsWith,
};
use crate::language::Language;

pub use english::EnglishDeclension;
pub use germanic::GermanDeclension;
pub use romance::{FrenchDeclension, SpanishDeclension};
pub use simple::SimpleDeclension;

static VOWEL_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[aeiouàâäéèêëîïôöûùü]").expect("vowel pattern is valid")
});

static FORM_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(s|p|singular|plural)(?:-(n|a|g|d|nominative|accusative|genitive|dative))?$")
        .expect("form key pattern is valid")
});

static ENGLISH: EnglishDeclension = EnglishDeclension;
static GERMAN: GermanDeclension = GermanDeclension;
static FRENCH: FrenchDeclension = FrenchDeclension;
static SPANISH: SpanishDeclension = SpanishDeclension;
static JAPANESE: SimpleDeclension = SimpleDeclension::new(Language::Japanese);

/// Returns the shared declension for `language`.
pub fn for_language(language: Language) -> &'static dyn Declension {
    match language.base_code() {
        "de" => &GERMAN,
        "fr" => &FRENCH,
        "es" => &SPANISH,
        "ja" => &JAPANESE,
        _ => &ENGLISH,
    }
}

/// Resolves an already known form of the same noun.
pub type FormLookup<'a> = &'a dyn Fn(NounForm) -> Option<String>;

pub trait Declension: Send + Sync + fmt::Debug {
    /// Base language whose rules this declension implements.
    fn language(&self) -> Language;

    fn numbers(&self) -> &'static [Number] {
        &Number::ALL
    }

    fn cases(&self) -> &'static [Case] {
        &[Case::Nominative]
    }

    /// Genders nouns carry. Empty for genderless languages.
    fn genders(&self) -> &'static [Gender] {
        &[]
    }

    /// Whether article choice depends on the following sound.
    fn has_starts_with(&self) -> bool {
        false
    }

    fn has_articles(&self) -> bool {
        true
    }

    fn default_gender(&self) -> Gender {
        self.genders().first().copied().unwrap_or(Gender::Neuter)
    }

    /// Returns the canonical key for `(number, case)` or fails when the
    /// language lacks either axis value.
    fn noun_form(&self, number: Number, case: Case) -> GrammarResult<NounForm> {
        if !self.numbers().contains(&number) {
            return Err(GrammarError::unsupported(
                self.language(),
                format!("number {:?}", number),
            ));
        }
        if !self.cases().contains(&case) {
            return Err(GrammarError::unsupported(
                self.language(),
                format!("case {:?}", case),
            ));
        }
        Ok(NounForm::new(number, case))
    }

    /// Closest legal key, dropping axes the language does not carry.
    fn approximate_noun_form(&self, number: Number, case: Case) -> NounForm {
        let number = if self.numbers().contains(&number) {
            number
        } else {
            Number::Singular
        };
        let case = if self.cases().contains(&case) {
            case
        } else {
            Case::Nominative
        };
        NounForm::new(number, case)
    }

    /// Every legal noun key. Nominative keys come first and singular before
    /// plural, so each key only depends on keys listed before it.
    fn all_noun_forms(&self) -> Vec<NounForm> {
        self.cases()
            .iter()
            .flat_map(|case| {
                self.numbers()
                    .iter()
                    .map(move |number| NounForm::new(*number, *case))
            })
            .collect()
    }

    /// Forms a noun always carries from construction on.
    fn required_noun_forms(&self) -> Vec<NounForm> {
        self.numbers()
            .iter()
            .map(|number| NounForm::new(*number, Case::Nominative))
            .collect()
    }

    /// Derives an unset form from the forms already known.
    fn derive_noun(
        &self,
        form: NounForm,
        gender: Gender,
        known: FormLookup<'_>,
    ) -> Option<String>;

    fn adjective_form(
        &self,
        gender: Gender,
        number: Number,
        case: Case,
        article: ArticleKind,
        starts_with: StartsWith,
    ) -> AdjectiveForm {
        let form = self.article_form(gender, number, case, starts_with);
        AdjectiveForm::new(
            form.gender(),
            form.number(),
            form.case(),
            article,
            form.starts_with(),
        )
    }

    /// Inflects an adjective from its dictionary base.
    fn derive_adjective(&self, base: &str, _form: AdjectiveForm) -> String {
        base.to_string()
    }

    /// Builds the article key, dropping axes the language does not carry.
    fn article_form(
        &self,
        gender: Gender,
        number: Number,
        case: Case,
        starts_with: StartsWith,
    ) -> ArticleForm {
        let gender = if self.genders().contains(&gender) {
            gender
        } else {
            self.default_gender()
        };
        let approx = self.approximate_noun_form(number, case);
        let starts_with = if self.has_starts_with() {
            starts_with
        } else {
            StartsWith::Consonant
        };
        ArticleForm::new(gender, approx.number(), approx.case(), starts_with)
    }

    /// Built-in article text including its trailing space or elision mark.
    fn default_article(&self, kind: ArticleKind, form: ArticleForm) -> Option<&'static str>;

    /// Lower-cases a noun for a lower-case reference.
    fn fold_noun(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn fold_modifier(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn infer_starts_with(&self, word: &str) -> StartsWith {
        if self.has_starts_with() && VOWEL_START.is_match(word.trim_start()) {
            StartsWith::Vowel
        } else {
            StartsWith::Consonant
        }
    }

    /// Parses a storage key such as `s`, `p-a` or `plural-dative`.
    fn parse_noun_form_key(&self, key: &str) -> GrammarResult<NounForm> {
        let caps = FORM_KEY.captures(key.trim()).ok_or_else(|| {
            GrammarError::unsupported(self.language(), format!("form key '{}'", key))
        })?;
        let number = caps[1]
            .parse::<Number>()
            .map_err(|e| GrammarError::unsupported(self.language(), e))?;
        let case = match caps.get(2) {
            Some(m) => m
                .as_str()
                .parse::<Case>()
                .map_err(|e| GrammarError::unsupported(self.language(), e))?,
            None => Case::Nominative,
        };
        self.noun_form(number, case)
    }
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
