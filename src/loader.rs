//! Label sources.
//!
//! Parsing label files is the job of the host application; this module only
//! fixes the record shapes a source hands over and ships two providers, an
//! in-memory one and one reading a directory of JSON files.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{ArticleKind, Case, Gender, Number, StartsWith};
use crate::language::Language;
use crate::noun::NounType;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounRecord {
    pub name: String,
    #[serde(default, rename = "type")]
    pub noun_type: NounType,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub starts_with: Option<StartsWith>,
    /// Form key (`s`, `p`, `s-a` ...) to surface string.
    pub forms: BTreeMap<String, String>,
    #[serde(default = "yes")]
    pub inflected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjectiveRecord {
    pub name: String,
    pub base: String,
    #[serde(default)]
    pub starts_with: Option<StartsWith>,
    /// Irregular forms keyed `gender-number-case`.
    #[serde(default)]
    pub forms: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub article: ArticleKind,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub number: Option<Number>,
    #[serde(default)]
    pub case: Option<Case>,
    #[serde(default)]
    pub starts_with: Option<StartsWith>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Defaults to the section the alias is declared in.
    #[serde(default)]
    pub section: Option<String>,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Text(String),
    Alias { alias: AliasTarget },
}

/// Everything one source provides for one language and layer.
///
/// ```json
/// {
///     "@metadata": { ... },
///     "nouns": [{ "name": "Account", "gender": "m", "forms": { "s": "Account" } }],
///     "sections": { "Page": { "title": "{{Entity:0|plural}}" } }
/// }
/// ```
///
/// Top-level and label keys starting with `@` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSource {
    #[serde(default)]
    pub nouns: Vec<NounRecord>,
    #[serde(default)]
    pub adjectives: Vec<AdjectiveRecord>,
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    #[serde(default)]
    pub sections: BTreeMap<String, BTreeMap<String, LabelValue>>,
}

impl LabelSource {
    pub fn with_label(mut self, section: &str, key: &str, text: &str) -> Self {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), LabelValue::Text(text.to_string()));
        self
    }

    pub fn with_alias(
        mut self,
        section: &str,
        key: &str,
        target_section: &str,
        target_key: &str,
    ) -> Self {
        self.sections.entry(section.to_string()).or_default().insert(
            key.to_string(),
            LabelValue::Alias {
                alias: AliasTarget {
                    section: Some(target_section.to_string()),
                    key: target_key.to_string(),
                },
            },
        );
        self
    }

    pub fn with_noun(mut self, noun: NounRecord) -> Self {
        self.nouns.push(noun);
        self
    }

    pub fn with_adjective(mut self, adjective: AdjectiveRecord) -> Self {
        self.adjectives.push(adjective);
        self
    }
}

/// Supplies label sources per language. `Ok(None)` means the source has
/// nothing for that language.
pub trait LabelSourceProvider: Send + Sync {
    fn load(&self, language: Language) -> GrammarResult<Option<LabelSource>>;
}

/// Sources held in memory. Replacing a source takes effect on the next
/// loader reset.
#[derive(Debug, Default)]
pub struct InMemorySource {
    sources: RwLock<HashMap<Language, LabelSource>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        InMemorySource::default()
    }

    pub fn with_source(self, language: Language, source: LabelSource) -> Self {
        self.insert(language, source);
        self
    }

    pub fn insert(&self, language: Language, source: LabelSource) {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(language, source);
    }
}

impl LabelSourceProvider for InMemorySource {
    fn load(&self, language: Language) -> GrammarResult<Option<LabelSource>> {
        Ok(self
            .sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&language)
            .cloned())
    }
}

/// Reads `<locale>.json` files from a directory. `en-US` is found as
/// `en-US.json`, `en_US.json` or `en.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> GrammarResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(GrammarError::Source(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        Ok(JsonDirSource { dir })
    }

    fn candidates(language: Language) -> Vec<String> {
        let tag = language.tag();
        let mut names = vec![tag.to_string(), tag.replace('-', "_")];
        if language == Language::English {
            names.push(language.base_code().to_string());
        }
        names.dedup();
        names
    }
}

impl LabelSourceProvider for JsonDirSource {
    fn load(&self, language: Language) -> GrammarResult<Option<LabelSource>> {
        for name in Self::candidates(language) {
            let path = self.dir.join(format!("{}.json", name));
            if path.is_file() {
                debug!(path = %path.display(), language = %language, "reading label source");
                return load_source_from_file(&path).map(Some);
            }
        }
        Ok(None)
    }
}

/// Loads one label source file.
///
/// # Errors
/// - File read errors
/// - Invalid JSON or a root that is not an object
pub fn load_source_from_file(path: &Path) -> GrammarResult<LabelSource> {
    let content = fs::read_to_string(path).map_err(|e| {
        GrammarError::Source(format!("failed to read '{}': {}", path.display(), e))
    })?;
    let mut source: LabelSource = serde_json::from_str(&content).map_err(|e| {
        GrammarError::Source(format!("failed to parse '{}': {}", path.display(), e))
    })?;

    source.sections.retain(|section, labels| {
        labels.retain(|key, _| !key.starts_with('@'));
        !section.starts_with('@')
    });
    if source.sections.is_empty() && source.nouns.is_empty() {
        warn!(path = %path.display(), "label source has no labels and no nouns");
    }
    Ok(source)
}
