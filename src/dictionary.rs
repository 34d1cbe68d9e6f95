use std::collections::HashMap;
use std::sync::Arc;

use crate::declension::Declension;
use crate::error::GrammarResult;
use crate::grammar::{ArticleForm, ArticleKind, Case, NounForm, Number};
use crate::language::Language;
use crate::modifier::{Adjective, Article};
use crate::noun::Noun;

/// Nouns, adjectives and article overrides of one assembled label set.
#[derive(Debug, Clone)]
pub struct Dictionary {
    language: Language,
    nouns: HashMap<String, Arc<Noun>>,
    adjectives: HashMap<String, Arc<Adjective>>,
    articles: Vec<Article>,
}

impl Dictionary {
    pub fn new(language: Language) -> Self {
        Dictionary {
            language,
            nouns: HashMap::new(),
            adjectives: HashMap::new(),
            articles: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn declension(&self) -> &'static dyn Declension {
        self.language.declension()
    }

    /// Adds a noun unless one with the same name is already present.
    /// Returns whether the noun was added.
    pub fn add_noun(&mut self, noun: Arc<Noun>) -> bool {
        if self.nouns.contains_key(noun.name()) {
            return false;
        }
        self.nouns.insert(noun.name().to_string(), noun);
        true
    }

    pub fn add_adjective(&mut self, adjective: Arc<Adjective>) -> bool {
        if self.adjectives.contains_key(adjective.name()) {
            return false;
        }
        self.adjectives
            .insert(adjective.name().to_string(), adjective);
        true
    }

    pub fn add_article(&mut self, article: Article) {
        self.articles.push(article);
    }

    /// Looks up a noun by case-insensitive name. With `create`, an unknown
    /// name yields a new invariant noun spelled the way it was asked for.
    pub fn get_noun(&self, name: &str, create: bool) -> Option<Arc<Noun>> {
        if let Some(noun) = self.nouns.get(&name.to_lowercase()) {
            return Some(Arc::clone(noun));
        }
        if !create {
            return None;
        }
        self.create_noun(name).ok().map(Arc::new)
    }

    fn create_noun(&self, name: &str) -> GrammarResult<Noun> {
        Noun::builder(self.language, name)
            .with_form(NounForm::new(Number::Singular, Case::Nominative), name)
            .inflected(false)
            .build()
    }

    pub fn get_adjective(&self, name: &str) -> Option<Arc<Adjective>> {
        self.adjectives.get(&name.to_lowercase()).cloned()
    }

    /// Article text for `form`, preferring dictionary overrides.
    pub fn article(&self, kind: ArticleKind, form: ArticleForm) -> Option<String> {
        if let Some(article) = self.articles.iter().find(|a| a.matches(kind, form)) {
            return Some(article.value.clone());
        }
        self.declension()
            .default_article(kind, form)
            .map(str::to_string)
    }

    pub fn nouns(&self) -> impl Iterator<Item = &Arc<Noun>> {
        self.nouns.values()
    }

    pub fn len(&self) -> usize {
        self.nouns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nouns.is_empty()
    }
}
