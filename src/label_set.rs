//! Layered label sets.
//!
//! A [`LabelSetLoader`] owns one layer (its source and layer id) and may wrap
//! a parent loader. Asking a loader for a language assembles a [`LabelSet`]:
//! an immutable, flattened view over an explicit ordered list of layers.
//!
//! # Layer order
//!
//! Layers are ordered locale-major: for each language of the fallback chain
//! (`en-IN`, `en-GB`, `en-US`), the outermost loader's layer comes first and
//! the root loader's layer last. The first layer holding a key wins.
//!
//! # Invariants
//!
//! | Property | Guarantee |
//! |---|---|
//! | Aliases | Resolved at assembly against the whole stack, so a more specific locale or an override layer that redefines the target is what the alias shows |
//! | Alias cycles | Fail assembly with [`GrammarError::AliasCycle`] |
//! | Grammatical forms | Every template is validated against its own layer's language when the layer is parsed |
//! | Caching | One set per language per loader; concurrent first requests may assemble twice but cache one result |
//! | Generations | A cached set remembers the generation of every loader it was built from and is rebuilt once any of them is reset |
//! | Reset | Readers keep the `Arc<LabelSet>` they hold; the next request sees only freshly read sources |

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::dictionary::Dictionary;
use crate::error::{GrammarError, GrammarResult};
use crate::fallbacks::language_chain;
use crate::language::Language;
use crate::loader::{LabelSource, LabelSourceProvider, LabelValue};
use crate::modifier::{Adjective, Article};
use crate::noun::{Noun, NounBuilder};
use crate::render::Renderer;
use crate::renaming::NoRenaming;
use crate::template::Template;

type LabelKey = (String, String);

#[derive(Debug, Clone)]
enum LayerEntry {
    Template(Arc<Template>),
    Alias(LabelKey),
}

/// One parsed source: compiled templates plus dictionary records, all bound
/// to the language the source was loaded for.
#[derive(Debug)]
pub struct LabelLayer {
    id: String,
    language: Language,
    entries: HashMap<LabelKey, LayerEntry>,
    nouns: Vec<Arc<Noun>>,
    adjectives: Vec<Arc<Adjective>>,
    articles: Vec<Article>,
}

impl LabelLayer {
    pub fn parse(id: &str, language: Language, source: LabelSource) -> GrammarResult<LabelLayer> {
        let mut entries = HashMap::new();
        for (section, labels) in source.sections {
            if section.starts_with('@') {
                continue;
            }
            for (key, value) in labels {
                if key.starts_with('@') {
                    continue;
                }
                let entry = match value {
                    LabelValue::Text(text) => LayerEntry::Template(Arc::new(Template::compile(
                        &text, language, &section, &key,
                    )?)),
                    LabelValue::Alias { alias } => LayerEntry::Alias((
                        alias.section.unwrap_or_else(|| section.clone()),
                        alias.key,
                    )),
                };
                entries.insert((section.clone(), key), entry);
            }
        }

        let mut nouns = Vec::with_capacity(source.nouns.len());
        for record in source.nouns {
            let mut builder = NounBuilder::new(language, &record.name)
                .with_type(record.noun_type)
                .inflected(record.inflected);
            if let Some(gender) = record.gender {
                builder = builder.with_gender(gender);
            }
            if let Some(starts_with) = record.starts_with {
                builder = builder.with_starts_with(starts_with);
            }
            for (key, value) in &record.forms {
                builder = builder.with_form_key(key, value)?;
            }
            nouns.push(Arc::new(builder.build()?));
        }

        let mut adjectives = Vec::with_capacity(source.adjectives.len());
        for record in source.adjectives {
            let mut adjective = Adjective::new(language, &record.name, &record.base);
            if let Some(starts_with) = record.starts_with {
                adjective = adjective.with_starts_with(starts_with);
            }
            for (key, value) in &record.forms {
                adjective = adjective.with_form_key(key, value)?;
            }
            adjectives.push(Arc::new(adjective));
        }

        let articles = source
            .articles
            .into_iter()
            .map(|record| Article {
                kind: record.article,
                gender: record.gender,
                number: record.number,
                case: record.case,
                starts_with: record.starts_with,
                value: record.value,
            })
            .collect();

        Ok(LabelLayer {
            id: id.to_string(),
            language,
            entries,
            nouns,
            adjectives,
            articles,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved label: its compiled template and where it came from.
#[derive(Debug, Clone)]
pub struct LabelRef {
    pub section: String,
    pub key: String,
    pub template: Arc<Template>,
    /// Id of the layer that supplied the template.
    pub layer: String,
    /// Language of that layer.
    pub language: Language,
}

/// Immutable flattened view of all layers for one language.
#[derive(Debug)]
pub struct LabelSet {
    language: Language,
    layer_id: String,
    labels: HashMap<LabelKey, LabelRef>,
    dictionary: Dictionary,
    allow_other_forms: bool,
}

impl LabelSet {
    /// Flattens `layers`, most authoritative first.
    pub fn assemble(
        language: Language,
        layer_id: &str,
        layers: &[Arc<LabelLayer>],
    ) -> GrammarResult<LabelSet> {
        let mut labels = HashMap::new();
        for (index, layer) in layers.iter().enumerate() {
            for key in layer.entries.keys() {
                if labels.contains_key(key) {
                    continue;
                }
                match resolve_entry(layers, index, key)? {
                    Some(label) => {
                        labels.insert(key.clone(), label);
                    }
                    None => warn!(
                        section = %key.0,
                        key = %key.1,
                        layer = %layer.id,
                        "dropping alias with a missing target"
                    ),
                }
            }
        }

        let mut dictionary = Dictionary::new(language);
        for layer in layers {
            let same_language = layer.language.is_same_language(language);
            for noun in &layer.nouns {
                if dictionary.get_noun(noun.name(), false).is_some() {
                    continue;
                }
                let noun = if same_language {
                    Arc::clone(noun)
                } else {
                    Arc::new(noun.copy_into(language)?)
                };
                dictionary.add_noun(noun);
            }
            if same_language {
                for adjective in &layer.adjectives {
                    dictionary.add_adjective(Arc::clone(adjective));
                }
                for article in &layer.articles {
                    dictionary.add_article(article.clone());
                }
            }
        }

        let allow_other_forms = layers
            .iter()
            .any(|layer| !layer.language.is_same_language(language));

        debug!(
            language = %language,
            layer_id,
            layers = layers.len(),
            labels = labels.len(),
            nouns = dictionary.len(),
            allow_other_forms,
            "assembled label set"
        );

        Ok(LabelSet {
            language,
            layer_id: layer_id.to_string(),
            labels,
            dictionary,
            allow_other_forms,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Whether templates may ask for forms this language lacks. True as soon
    /// as any layer of the set comes from another language.
    pub fn allow_other_grammatical_forms(&self) -> bool {
        self.allow_other_forms
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&LabelRef> {
        self.labels.get(&(section.to_string(), key.to_string()))
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Renders a label that needs no renameables, leniently.
    pub fn get_string(&self, section: &str, key: &str, args: &[&str]) -> GrammarResult<String> {
        let label = self
            .get(section, key)
            .ok_or_else(|| GrammarError::LabelNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        Renderer {
            dictionary: &self.dictionary,
            renaming: &NoRenaming,
            entities: &[],
            args,
            allow_other_forms: self.allow_other_forms,
            strict: false,
        }
        .render(&label.template)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All `(section, key)` pairs, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.keys().map(|(s, k)| (s.as_str(), k.as_str()))
    }
}

/// Resolves the entry for `key` declared in layer `from`. Alias targets are
/// looked up from the top of the stack, like any other read.
fn resolve_entry(
    layers: &[Arc<LabelLayer>],
    from: usize,
    key: &LabelKey,
) -> GrammarResult<Option<LabelRef>> {
    let mut visited: HashSet<(usize, LabelKey)> = HashSet::new();
    let mut chain: Vec<String> = Vec::new();
    let mut current = key.clone();
    let mut start = from;
    loop {
        let Some((index, entry)) = layers[start..]
            .iter()
            .enumerate()
            .find_map(|(offset, layer)| layer.entries.get(&current).map(|e| (start + offset, e)))
        else {
            return Ok(None);
        };
        chain.push(format!("{}.{}", current.0, current.1));
        if !visited.insert((index, current.clone())) {
            return Err(GrammarError::AliasCycle { chain });
        }
        match entry {
            LayerEntry::Template(template) => {
                let layer = &layers[index];
                return Ok(Some(LabelRef {
                    section: key.0.clone(),
                    key: key.1.clone(),
                    template: Arc::clone(template),
                    layer: layer.id.clone(),
                    language: layer.language,
                }));
            }
            LayerEntry::Alias(target) => {
                current = target.clone();
                start = 0;
            }
        }
    }
}

/// Loads, layers and caches label sets for one layer id.
pub struct LabelSetLoader {
    source: Arc<dyn LabelSourceProvider>,
    layer_id: String,
    parent: Option<Arc<LabelSetLoader>>,
    layers: RwLock<HashMap<Language, Option<Arc<LabelLayer>>>>,
    sets: RwLock<HashMap<Language, CachedSet>>,
    generation: AtomicU64,
}

/// A cached set and the lineage generations it was assembled under.
#[derive(Debug)]
struct CachedSet {
    generations: Vec<u64>,
    set: Arc<LabelSet>,
}

impl std::fmt::Debug for LabelSetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelSetLoader")
            .field("layer_id", &self.layer_id)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl LabelSetLoader {
    pub fn new(
        source: Arc<dyn LabelSourceProvider>,
        layer_id: &str,
        parent: Option<Arc<LabelSetLoader>>,
    ) -> Self {
        LabelSetLoader {
            source,
            layer_id: layer_id.to_string(),
            parent,
            layers: RwLock::new(HashMap::new()),
            sets: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn parent(&self) -> Option<&Arc<LabelSetLoader>> {
        self.parent.as_ref()
    }

    /// This loader and its ancestors, outermost first.
    fn lineage(&self) -> Vec<&LabelSetLoader> {
        let mut lineage = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(loader) = current {
            lineage.push(loader);
            current = loader.parent.as_deref();
        }
        lineage
    }

    /// This loader's own parsed layer for `language`, read on first use.
    fn layer(&self, language: Language) -> GrammarResult<Option<Arc<LabelLayer>>> {
        if let Some(layer) = self
            .layers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&language)
        {
            return Ok(layer.clone());
        }

        let generation = self.generation.load(Ordering::Acquire);
        let layer = match self.source.load(language)? {
            Some(source) => Some(Arc::new(LabelLayer::parse(
                &self.layer_id,
                language,
                source,
            )?)),
            None => None,
        };

        let mut layers = self.layers.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            return Ok(layer);
        }
        Ok(layers.entry(language).or_insert(layer).clone())
    }

    /// Ordered layers for `language`: locale-major, outermost loader first.
    pub fn layers_for(&self, language: Language) -> GrammarResult<Vec<Arc<LabelLayer>>> {
        let lineage = self.lineage();
        let mut layers = Vec::new();
        for candidate in language_chain(language) {
            for loader in &lineage {
                if let Some(layer) = loader.layer(candidate)? {
                    layers.push(layer);
                }
            }
        }
        Ok(layers)
    }

    /// Generation of every loader in the lineage, outermost first.
    fn generations(&self) -> Vec<u64> {
        self.lineage()
            .iter()
            .map(|loader| loader.generation.load(Ordering::Acquire))
            .collect()
    }

    /// The assembled set for `language`, built on first request and cached.
    /// A cached set is only served while no loader of the lineage has been
    /// reset since it was assembled.
    pub fn get_set(&self, language: Language) -> GrammarResult<Arc<LabelSet>> {
        let generations = self.generations();
        if let Some(cached) = self
            .sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&language)
        {
            if cached.generations == generations {
                return Ok(Arc::clone(&cached.set));
            }
        }

        let layers = self.layers_for(language)?;
        let set = Arc::new(LabelSet::assemble(language, &self.layer_id, &layers)?);

        let mut sets = self.sets.write().unwrap_or_else(PoisonError::into_inner);
        if self.generations() != generations {
            return Ok(set);
        }
        if let Some(cached) = sets.get(&language) {
            if cached.generations == generations {
                return Ok(Arc::clone(&cached.set));
            }
        }
        sets.insert(
            language,
            CachedSet {
                generations,
                set: Arc::clone(&set),
            },
        );
        Ok(set)
    }

    /// Drops every cached layer and set of this loader and its ancestors.
    /// Sources are read again on the next request.
    pub fn reset(&self) {
        for loader in self.lineage() {
            let mut layers = loader.layers.write().unwrap_or_else(PoisonError::into_inner);
            let mut sets = loader.sets.write().unwrap_or_else(PoisonError::into_inner);
            loader.generation.fetch_add(1, Ordering::AcqRel);
            layers.clear();
            sets.clear();
        }
        info!(layer_id = %self.layer_id, "label caches reset");
    }
}
