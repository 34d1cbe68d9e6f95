//! Entity renaming.
//!
//! A [`RenamingProvider`] substitutes a customer-chosen noun for a canonical
//! entity name. Providers are handed to a [`Localizer`](crate::Localizer)
//! per request and consulted on every render, so a rename takes effect on the
//! next label without touching any cached label set.
//!
//! Providers follow a single-writer-then-many-readers discipline: register
//! renames while setting up a session, then share the provider read-only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::dictionary::Dictionary;
use crate::error::{GrammarError, GrammarResult};
use crate::fallbacks::language_chain;
use crate::grammar::{Gender, NounForm, Number, StartsWith};
use crate::language::Language;
use crate::noun::Noun;

/// Anything a label can refer to by canonical entity name.
pub trait Renameable {
    fn canonical_name(&self) -> &str;

    /// Display label for entities that have no dictionary noun.
    fn custom_label(&self, _number: Number) -> Option<String> {
        None
    }
}

impl Renameable for str {
    fn canonical_name(&self) -> &str {
        self
    }
}

impl Renameable for String {
    fn canonical_name(&self) -> &str {
        self
    }
}

impl<T: Renameable + ?Sized> Renameable for &T {
    fn canonical_name(&self) -> &str {
        (**self).canonical_name()
    }

    fn custom_label(&self, number: Number) -> Option<String> {
        (**self).custom_label(number)
    }
}

/// An entity defined outside the dictionary with its own labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEntity {
    pub name: String,
    pub singular: String,
    pub plural: String,
}

impl CustomEntity {
    pub fn new(name: &str, singular: &str, plural: &str) -> Self {
        CustomEntity {
            name: name.to_string(),
            singular: singular.to_string(),
            plural: plural.to_string(),
        }
    }
}

impl Renameable for CustomEntity {
    fn canonical_name(&self) -> &str {
        &self.name
    }

    fn custom_label(&self, number: Number) -> Option<String> {
        Some(match number {
            Number::Singular => self.singular.clone(),
            Number::Plural => self.plural.clone(),
        })
    }
}

pub trait RenamingProvider: Send + Sync {
    /// The registered substitute for `name` in `language`, if any.
    fn renamed_noun(&self, language: Language, name: &str) -> Option<Arc<Noun>>;

    fn use_renamed_nouns(&self) -> bool;

    /// The noun to render for `name`: the substitute when one is registered
    /// and renaming is enabled, the dictionary noun otherwise.
    fn get_renameable(&self, dictionary: &Dictionary, name: &str) -> Option<Arc<Noun>> {
        if self.use_renamed_nouns() {
            if let Some(noun) = self.renamed_noun(dictionary.language(), name) {
                return Some(noun);
            }
        }
        dictionary.get_noun(name, false)
    }
}

/// Provider that never renames.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRenaming;

impl RenamingProvider for NoRenaming {
    fn renamed_noun(&self, _language: Language, _name: &str) -> Option<Arc<Noun>> {
        None
    }

    fn use_renamed_nouns(&self) -> bool {
        false
    }
}

/// In-memory map of renamed nouns.
#[derive(Debug)]
pub struct RenamedNouns {
    nouns: RwLock<HashMap<(Language, String), Arc<Noun>>>,
    enabled: AtomicBool,
}

impl Default for RenamedNouns {
    fn default() -> Self {
        RenamedNouns::new()
    }
}

impl RenamedNouns {
    pub fn new() -> Self {
        RenamedNouns {
            nouns: RwLock::new(HashMap::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Registers `noun` as the substitute for its own canonical name.
    pub fn register(&self, noun: Noun) -> Arc<Noun> {
        let noun = Arc::new(noun);
        self.nouns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((noun.language(), noun.name().to_string()), Arc::clone(&noun));
        noun
    }

    /// Clones the dictionary noun `name` with new properties and registers
    /// the result.
    pub fn rename(
        &self,
        dictionary: &Dictionary,
        name: &str,
        gender: Gender,
        starts_with: StartsWith,
        forms: HashMap<NounForm, String>,
    ) -> GrammarResult<Arc<Noun>> {
        let canonical =
            dictionary
                .get_noun(name, false)
                .ok_or_else(|| GrammarError::MissingEntity {
                    reference: name.to_string(),
                })?;
        let renamed = canonical.clone_with(gender, starts_with, forms)?;
        Ok(self.register(renamed))
    }

    /// Toggles renamed forms on or off. Registrations are kept either way.
    pub fn set_use_renamed_nouns(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn remove(&self, language: Language, name: &str) -> Option<Arc<Noun>> {
        self.nouns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(language, name.to_lowercase()))
    }

    pub fn clear(&self) {
        self.nouns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RenamingProvider for RenamedNouns {
    /// Falls back through regional variants of the same language, so a rename
    /// registered for `en-US` also applies to `en-IN`.
    fn renamed_noun(&self, language: Language, name: &str) -> Option<Arc<Noun>> {
        let nouns = self.nouns.read().unwrap_or_else(PoisonError::into_inner);
        let name = name.to_lowercase();
        language_chain(language)
            .into_iter()
            .take_while(|candidate| candidate.is_same_language(language))
            .find_map(|candidate| nouns.get(&(candidate, name.clone())).cloned())
    }

    fn use_renamed_nouns(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
