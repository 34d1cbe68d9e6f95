//! Dictionary nouns.
//!
//! A noun stores the forms its source provides plus the forms its language
//! always needs; everything else is derived by the declension the first time
//! any derived form is requested. Nouns are immutable once built: renaming
//! produces a new noun through [`Noun::clone_with`].

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::declension::Declension;
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{Case, Gender, NounForm, Number, StartsWith};
use crate::language::Language;

/// What a noun names in the host application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NounType {
    #[default]
    Entity,
    Field,
    Other,
}

#[derive(Debug)]
pub struct Noun {
    name: String,
    noun_type: NounType,
    language: Language,
    gender: Gender,
    starts_with: StartsWith,
    forms: HashMap<NounForm, String>,
    inflected: bool,
    copied: bool,
    derived: OnceLock<HashMap<NounForm, String>>,
}

impl Noun {
    pub fn builder(language: Language, name: &str) -> NounBuilder {
        NounBuilder::new(language, name)
    }

    /// Canonical name, lower-cased.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn noun_type(&self) -> NounType {
        self.noun_type
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn declension(&self) -> &'static dyn Declension {
        self.language.declension()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn starts_with(&self) -> StartsWith {
        self.starts_with
    }

    pub fn is_inflected(&self) -> bool {
        self.inflected
    }

    /// True when the noun was copied from a language with another declension.
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Forms held since construction.
    pub fn stored_forms(&self) -> &HashMap<NounForm, String> {
        &self.forms
    }

    /// Returns the stored or derived string for `form`.
    pub fn get_string(&self, form: NounForm) -> GrammarResult<&str> {
        let form = if self.inflected {
            form
        } else {
            NounForm::new(Number::Singular, Case::Nominative)
        };
        if let Some(value) = self.forms.get(&form) {
            return Ok(value);
        }
        self.derived()
            .get(&form)
            .map(String::as_str)
            .ok_or_else(|| GrammarError::NoFormAvailable {
                noun: self.name.clone(),
                form: form.key(),
            })
    }

    fn derived(&self) -> &HashMap<NounForm, String> {
        self.derived.get_or_init(|| {
            let declension = self.declension();
            let mut all = self.forms.clone();
            for form in declension.all_noun_forms() {
                if all.contains_key(&form) {
                    continue;
                }
                let value = if self.copied {
                    all.get(&NounForm::new(form.number(), Case::Nominative))
                        .or_else(|| all.get(&NounForm::new(Number::Singular, Case::Nominative)))
                        .cloned()
                } else {
                    declension.derive_noun(form, self.gender, &|f| all.get(&f).cloned())
                };
                if let Some(value) = value {
                    all.insert(form, value);
                }
            }
            all.retain(|form, _| !self.forms.contains_key(form));
            all
        })
    }

    /// Produces an independent noun with the same identity and new
    /// grammatical properties. The canonical noun is left untouched.
    pub fn clone_with(
        &self,
        gender: Gender,
        starts_with: StartsWith,
        forms: HashMap<NounForm, String>,
    ) -> GrammarResult<Noun> {
        let mut builder = NounBuilder::new(self.language, &self.name)
            .with_type(self.noun_type)
            .with_gender(gender)
            .with_starts_with(starts_with)
            .inflected(self.inflected);
        builder.forms = forms;
        builder.build()
    }

    /// Copies the nominative forms into `language`, for nouns that reach a
    /// label set through a fallback language with a different declension.
    pub fn copy_into(&self, language: Language) -> GrammarResult<Noun> {
        let target = language.declension();
        let mut builder = NounBuilder::new(language, &self.name)
            .with_type(self.noun_type)
            .with_gender(self.gender)
            .with_starts_with(self.starts_with)
            .inflected(self.inflected);
        for number in target.numbers() {
            let source = self
                .declension()
                .approximate_noun_form(*number, Case::Nominative);
            let form = target.noun_form(*number, Case::Nominative)?;
            builder = builder.with_form(form, self.get_string(source)?);
        }
        builder.copied = true;
        builder.build()
    }
}

impl PartialEq for Noun {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.noun_type == other.noun_type
    }
}

impl Eq for Noun {}

impl Hash for Noun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.noun_type.hash(state);
    }
}

/// Builder for [`Noun`]. Only the singular nominative is mandatory.
#[derive(Debug, Clone)]
pub struct NounBuilder {
    language: Language,
    name: String,
    noun_type: NounType,
    gender: Option<Gender>,
    starts_with: Option<StartsWith>,
    forms: HashMap<NounForm, String>,
    inflected: bool,
    copied: bool,
}

impl NounBuilder {
    pub fn new(language: Language, name: &str) -> Self {
        NounBuilder {
            language,
            name: name.to_lowercase(),
            noun_type: NounType::default(),
            gender: None,
            starts_with: None,
            forms: HashMap::new(),
            inflected: true,
            copied: false,
        }
    }

    pub fn with_type(mut self, noun_type: NounType) -> Self {
        self.noun_type = noun_type;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_starts_with(mut self, starts_with: StartsWith) -> Self {
        self.starts_with = Some(starts_with);
        self
    }

    pub fn with_form(mut self, form: NounForm, value: &str) -> Self {
        self.forms.insert(form, value.to_string());
        self
    }

    /// Sets a form from its storage key (`s`, `p-a` ...).
    pub fn with_form_key(self, key: &str, value: &str) -> GrammarResult<Self> {
        let form = self.language.declension().parse_noun_form_key(key)?;
        Ok(self.with_form(form, value))
    }

    /// Invariant nouns use their singular for every form.
    pub fn inflected(mut self, inflected: bool) -> Self {
        self.inflected = inflected;
        self
    }

    pub fn build(self) -> GrammarResult<Noun> {
        let declension = self.language.declension();
        let singular = NounForm::new(Number::Singular, Case::Nominative);
        let Some(singular_value) = self.forms.get(&singular).cloned() else {
            return Err(GrammarError::NoFormAvailable {
                noun: self.name,
                form: singular.key(),
            });
        };
        let gender = self.gender.unwrap_or_else(|| declension.default_gender());
        let starts_with = self
            .starts_with
            .unwrap_or_else(|| declension.infer_starts_with(&singular_value));

        let mut forms = self.forms;
        if self.inflected {
            for form in declension.required_noun_forms() {
                if forms.contains_key(&form) {
                    continue;
                }
                let value = if self.copied {
                    Some(singular_value.clone())
                } else {
                    declension.derive_noun(form, gender, &|f| forms.get(&f).cloned())
                };
                if let Some(value) = value {
                    forms.insert(form, value);
                }
            }
        }

        Ok(Noun {
            name: self.name,
            noun_type: self.noun_type,
            language: self.language,
            gender,
            starts_with,
            forms,
            inflected: self.inflected,
            copied: self.copied,
            derived: OnceLock::new(),
        })
    }
}
