//! Adjectives and article overrides, the words that agree with a noun.

use std::collections::HashMap;

use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{
    AdjectiveForm, ArticleForm, ArticleKind, Case, Gender, Number, StartsWith,
};
use crate::language::Language;

#[derive(Debug, Clone, PartialEq)]
pub struct Adjective {
    name: String,
    language: Language,
    base: String,
    starts_with: StartsWith,
    overrides: HashMap<(Gender, Number, Case), String>,
}

impl Adjective {
    /// Creates an adjective inflected from `base` by the language's rules.
    pub fn new(language: Language, name: &str, base: &str) -> Self {
        Adjective {
            name: name.to_lowercase(),
            language,
            base: base.to_string(),
            starts_with: language.declension().infer_starts_with(base),
            overrides: HashMap::new(),
        }
    }

    pub fn with_starts_with(mut self, starts_with: StartsWith) -> Self {
        self.starts_with = starts_with;
        self
    }

    /// Overrides an irregular form. The key reads `gender-number-case`
    /// (`f-s-n`); trailing parts default to singular nominative.
    pub fn with_form_key(mut self, key: &str, value: &str) -> GrammarResult<Self> {
        let invalid = |detail: String| GrammarError::unsupported(self.language, detail);
        let mut parts = key.split('-');
        let gender = parts
            .next()
            .unwrap_or_default()
            .parse::<Gender>()
            .map_err(invalid)?;
        let number = match parts.next() {
            Some(n) => n.parse::<Number>().map_err(invalid)?,
            None => Number::Singular,
        };
        let case = match parts.next() {
            Some(c) => c.parse::<Case>().map_err(invalid)?,
            None => Case::Nominative,
        };
        self.overrides.insert((gender, number, case), value.to_string());
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn starts_with(&self) -> StartsWith {
        self.starts_with
    }

    pub fn get_string(&self, form: AdjectiveForm) -> String {
        match self
            .overrides
            .get(&(form.gender(), form.number(), form.case()))
        {
            Some(value) => value.clone(),
            None => self.language.declension().derive_adjective(&self.base, form),
        }
    }
}

/// A dictionary-supplied article that replaces the built-in text for every
/// form it matches. Unset axes match anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub kind: ArticleKind,
    pub gender: Option<Gender>,
    pub number: Option<Number>,
    pub case: Option<Case>,
    pub starts_with: Option<StartsWith>,
    pub value: String,
}

impl Article {
    pub fn new(kind: ArticleKind, value: &str) -> Self {
        Article {
            kind,
            gender: None,
            number: None,
            case: None,
            starts_with: None,
            value: value.to_string(),
        }
    }

    pub fn matches(&self, kind: ArticleKind, form: ArticleForm) -> bool {
        self.kind == kind
            && self.gender.is_none_or(|g| g == form.gender())
            && self.number.is_none_or(|n| n == form.number())
            && self.case.is_none_or(|c| c == form.case())
            && self.starts_with.is_none_or(|s| s == form.starts_with())
    }
}
