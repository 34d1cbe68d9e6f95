use crate::grammar::{ArticleForm, ArticleKind, Gender, NounForm, Number};
use crate::language::Language;

use super::{Declension, FormLookup};

/// Uninflected languages: one noun form, no articles, no agreement.
#[derive(Debug)]
pub struct SimpleDeclension {
    language: Language,
}

impl SimpleDeclension {
    pub const fn new(language: Language) -> Self {
        SimpleDeclension { language }
    }
}

impl Declension for SimpleDeclension {
    fn language(&self) -> Language {
        self.language
    }

    fn numbers(&self) -> &'static [Number] {
        &[Number::Singular]
    }

    fn has_articles(&self) -> bool {
        false
    }

    fn derive_noun(
        &self,
        _form: NounForm,
        _gender: Gender,
        _known: FormLookup<'_>,
    ) -> Option<String> {
        None
    }

    fn default_article(&self, _kind: ArticleKind, _form: ArticleForm) -> Option<&'static str> {
        None
    }

    fn fold_noun(&self, text: &str) -> String {
        text.to_string()
    }
}
