use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{GrammarError, GrammarResult};
use crate::label_set::{LabelSet, LabelSetLoader};
use crate::language::Language;
use crate::render::Renderer;
use crate::renaming::{NoRenaming, Renameable, RenamingProvider};

/// Hands out localizers for locales, backed by one loader chain.
#[derive(Debug, Clone)]
pub struct LocalizerFactory {
    loader: Arc<LabelSetLoader>,
    default_language: Language,
}

impl LocalizerFactory {
    pub fn new(loader: Arc<LabelSetLoader>) -> Self {
        LocalizerFactory {
            loader,
            default_language: Language::English,
        }
    }

    /// Language used for locales no declension covers.
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn loader(&self) -> &Arc<LabelSetLoader> {
        &self.loader
    }

    pub fn localizer(&self, locale: &str) -> GrammarResult<Localizer<'static>> {
        let language = match Language::from_locale(locale) {
            Ok(language) => language,
            Err(err) => {
                warn!(error = %err, fallback = %self.default_language, "unsupported locale");
                self.default_language
            }
        };
        debug!(locale, language = %language, "creating localizer");
        Ok(Localizer::new(self.loader.get_set(language)?))
    }
}

/// Renders labels for one language with an optional renaming provider.
///
/// A localizer never caches what the provider returns, so renames registered
/// after the localizer was created still apply.
#[derive(Clone)]
pub struct Localizer<'r> {
    label_set: Arc<LabelSet>,
    renaming: &'r dyn RenamingProvider,
}

impl std::fmt::Debug for Localizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("language", &self.label_set.language())
            .finish_non_exhaustive()
    }
}

static NO_RENAMING: NoRenaming = NoRenaming;

impl Localizer<'static> {
    pub fn new(label_set: Arc<LabelSet>) -> Self {
        Localizer {
            label_set,
            renaming: &NO_RENAMING,
        }
    }
}

impl<'r> Localizer<'r> {
    /// Same labels, rendered through `renaming`.
    pub fn with_renaming<'p>(&self, renaming: &'p dyn RenamingProvider) -> Localizer<'p> {
        Localizer {
            label_set: Arc::clone(&self.label_set),
            renaming,
        }
    }

    pub fn renaming(&self) -> &'r dyn RenamingProvider {
        self.renaming
    }

    pub fn language(&self) -> Language {
        self.label_set.language()
    }

    pub fn label_set(&self) -> &Arc<LabelSet> {
        &self.label_set
    }

    /// Renders a label, substituting visible placeholders for anything that
    /// cannot be resolved.
    pub fn get_label(
        &self,
        section: &str,
        key: &str,
        entities: &[&dyn Renameable],
        args: &[&str],
    ) -> String {
        match self.render(section, key, entities, args, false) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, section, key, "label unavailable");
                missing_label(section, key)
            }
        }
    }

    /// Renders a label, failing on a missing label or any unresolved reference.
    pub fn get_label_throw(
        &self,
        section: &str,
        key: &str,
        entities: &[&dyn Renameable],
        args: &[&str],
    ) -> GrammarResult<String> {
        self.render(section, key, entities, args, true)
    }

    fn render(
        &self,
        section: &str,
        key: &str,
        entities: &[&dyn Renameable],
        args: &[&str],
        strict: bool,
    ) -> GrammarResult<String> {
        let label = self
            .label_set
            .get(section, key)
            .ok_or_else(|| GrammarError::LabelNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        if label.language != self.label_set.language() {
            debug!(
                section,
                key,
                from = %label.language,
                "label served from fallback language"
            );
        }
        Renderer {
            dictionary: self.label_set.dictionary(),
            renaming: self.renaming,
            entities,
            args,
            allow_other_forms: self.label_set.allow_other_grammatical_forms(),
            strict,
        }
        .render(&label.template)
    }
}

/// Text shown in place of a label that no layer defines.
pub fn missing_label(section: &str, key: &str) -> String {
    format!(
        "__MISSING LABEL__ PropertyFile - val {} not found in section {}",
        key, section
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{InMemorySource, LabelSource};

    fn factory() -> LocalizerFactory {
        let source = InMemorySource::new().with_source(
            Language::English,
            LabelSource::default().with_label("Page", "step", "Step $1 of $2"),
        );
        LocalizerFactory::new(Arc::new(LabelSetLoader::new(Arc::new(source), "base", None)))
    }

    #[test]
    fn test_strict_and_lenient_missing_label() {
        let localizer = factory().localizer("en_US").unwrap();
        assert!(matches!(
            localizer.get_label_throw("Page", "nope", &[], &[]),
            Err(GrammarError::LabelNotFound { .. })
        ));
        assert_eq!(
            localizer.get_label("Page", "nope", &[], &[]),
            "__MISSING LABEL__ PropertyFile - val nope not found in section Page"
        );
    }

    #[test]
    fn test_unknown_locale_uses_default_language() {
        let localizer = factory().localizer("xx-YY").unwrap();
        assert_eq!(localizer.language(), Language::English);
        assert_eq!(
            localizer.get_label_throw("Page", "step", &[], &["1", "5"]).unwrap(),
            "Step 1 of 5"
        );
    }
}
