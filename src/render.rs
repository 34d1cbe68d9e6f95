//! Rendering of compiled templates.
//!
//! Rendering runs in passes over the segments of one template. Literal
//! text, arguments, nouns and choices render first; adjectives then agree
//! with their rendered noun; articles render last because they also depend
//! on the sound of the word right after them.
//!
//! In lenient mode every failure degrades to a visible placeholder and a
//! `warn!` event. In strict mode the first failure is returned.

use std::sync::Arc;

use tracing::warn;

use crate::declension::capitalize;
use crate::dictionary::Dictionary;
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{ArticleKind, Case, Gender, Number, StartsWith};
use crate::noun::Noun;
use crate::plural;
use crate::renaming::{Renameable, RenamingProvider};
use crate::template::{
    AdjectiveRef, ArticleRef, GenderChoice, NounRef, NounTarget, PluralChoice, Segment, Template,
};

pub const MISSING_ENTITY: &str = "<Entity>";
pub const MISSING_ENTITIES: &str = "<Entities>";

/// Grammatical facts of a rendered noun that its modifiers agree with.
#[derive(Debug, Clone, Copy)]
struct Agreement {
    gender: Gender,
    number: Number,
    case: Case,
    starts_with: StartsWith,
}

/// The noun behind a reference: a dictionary (possibly renamed) noun, or a
/// label supplied by the renameable itself.
enum Resolved {
    Noun(Arc<Noun>),
    Label(String),
}

pub struct Renderer<'a> {
    pub dictionary: &'a Dictionary,
    pub renaming: &'a dyn RenamingProvider,
    pub entities: &'a [&'a dyn Renameable],
    pub args: &'a [&'a str],
    pub allow_other_forms: bool,
    pub strict: bool,
}

impl Renderer<'_> {
    pub fn render(&self, template: &Template) -> GrammarResult<String> {
        let segments = template.segments();
        let mut out = vec![String::new(); segments.len()];
        let mut agreements: Vec<Option<Agreement>> = vec![None; segments.len()];

        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Text(text) => out[i] = text.clone(),
                Segment::Arg(placeholder) => out[i] = placeholder.localize(self.args),
                Segment::Noun(reference) => {
                    let (text, agreement) = self.render_noun(reference)?;
                    out[i] = text;
                    agreements[i] = agreement;
                }
                Segment::Plural(choice) => out[i] = self.render_plural(choice)?,
                Segment::Gender(choice) => out[i] = self.render_gender(choice)?,
                Segment::Adjective(_) | Segment::Article(_) => {}
            }
        }

        for (i, segment) in segments.iter().enumerate() {
            if let Segment::Adjective(reference) = segment {
                out[i] = self.render_adjective(reference, agreements[reference.noun])?;
            }
        }

        for i in (0..segments.len()).rev() {
            if let Segment::Article(reference) = &segments[i] {
                let following = self.following_sound(segments, &out, &agreements, i);
                out[i] = self.render_article(reference, agreements[reference.noun], following)?;
                Self::join_article(&mut out, i);
            }
        }

        Ok(out.concat())
    }

    fn degrade(&self, err: GrammarError, placeholder: &str) -> GrammarResult<String> {
        if self.strict {
            return Err(err);
        }
        warn!(error = %err, "rendering with placeholder {}", placeholder);
        Ok(placeholder.to_string())
    }

    fn missing_placeholder(number: Number) -> &'static str {
        match number {
            Number::Singular => MISSING_ENTITY,
            Number::Plural => MISSING_ENTITIES,
        }
    }

    fn resolve(&self, target: &NounTarget, number: Number) -> Option<Resolved> {
        match target {
            NounTarget::Entity(index) => {
                let entity = self.entities.get(*index)?;
                if let Some(noun) = self
                    .renaming
                    .get_renameable(self.dictionary, entity.canonical_name())
                {
                    return Some(Resolved::Noun(noun));
                }
                entity.custom_label(number).map(Resolved::Label)
            }
            NounTarget::Named(name) => self
                .renaming
                .get_renameable(self.dictionary, name)
                .map(Resolved::Noun),
        }
    }

    fn render_noun(&self, reference: &NounRef) -> GrammarResult<(String, Option<Agreement>)> {
        let missing = Self::missing_placeholder(reference.number);
        let Some(resolved) = self.resolve(&reference.target, reference.number) else {
            let err = GrammarError::MissingEntity {
                reference: match &reference.target {
                    NounTarget::Entity(i) => format!("#{}", i),
                    NounTarget::Named(name) => name.clone(),
                },
            };
            return Ok((self.degrade(err, missing)?, None));
        };

        let declension = self.dictionary.declension();
        let (text, agreement) = match resolved {
            Resolved::Noun(noun) => {
                let form = match noun
                    .declension()
                    .noun_form(reference.number, reference.case)
                {
                    Ok(form) => form,
                    Err(_) if self.allow_other_forms => noun
                        .declension()
                        .approximate_noun_form(reference.number, reference.case),
                    Err(err) => return Ok((self.degrade(err, missing)?, None)),
                };
                let text = match noun.get_string(form) {
                    Ok(text) => text.to_string(),
                    Err(err) => return Ok((self.degrade(err, missing)?, None)),
                };
                let agreement = Agreement {
                    gender: noun.gender(),
                    number: form.number(),
                    case: form.case(),
                    starts_with: noun.starts_with(),
                };
                (text, agreement)
            }
            Resolved::Label(label) => {
                let agreement = Agreement {
                    gender: declension.default_gender(),
                    number: reference.number,
                    case: reference.case,
                    starts_with: declension.infer_starts_with(&label),
                };
                (label, agreement)
            }
        };

        let article = match reference.article {
            ArticleKind::Zero => String::new(),
            kind => self.article_text(kind, agreement, agreement.starts_with),
        };
        let rendered = if reference.capital {
            capitalize(&format!("{}{}", article, text))
        } else {
            format!(
                "{}{}",
                declension.fold_modifier(&article),
                declension.fold_noun(&text)
            )
        };
        let rendered = if reference.escape_html {
            escape_html(&rendered)
        } else {
            rendered
        };
        Ok((rendered, Some(agreement)))
    }

    fn article_text(
        &self,
        kind: ArticleKind,
        agreement: Agreement,
        following: StartsWith,
    ) -> String {
        let form = self.dictionary.declension().article_form(
            agreement.gender,
            agreement.number,
            agreement.case,
            following,
        );
        self.dictionary.article(kind, form).unwrap_or_default()
    }

    fn render_adjective(
        &self,
        reference: &AdjectiveRef,
        agreement: Option<Agreement>,
    ) -> GrammarResult<String> {
        let Some(adjective) = self.dictionary.get_adjective(&reference.name) else {
            let err = GrammarError::MissingEntity {
                reference: format!("adjective {}", reference.name),
            };
            return self.degrade(err, &reference.name);
        };
        let Some(agreement) = agreement else {
            return Ok(adjective.base().to_string());
        };
        let declension = adjective.language().declension();
        let form = declension.adjective_form(
            agreement.gender,
            agreement.number,
            agreement.case,
            reference.article,
            agreement.starts_with,
        );
        let text = adjective.get_string(form);
        Ok(if reference.capital {
            capitalize(&text)
        } else {
            declension.fold_modifier(&text)
        })
    }

    /// Articles carry their own separator ("a ", "l'"), so whitespace the
    /// template puts between an article and its word is dropped.
    fn join_article(out: &mut [String], at: usize) {
        let spaced = out
            .get(at + 1)
            .is_some_and(|next| next.starts_with(char::is_whitespace));
        if out[at].is_empty() || !spaced {
            return;
        }
        if out[at].ends_with(char::is_whitespace) {
            let len = out[at].trim_end().len();
            out[at].truncate(len);
        } else {
            let next = out[at + 1].trim_start().to_string();
            out[at + 1] = next;
        }
    }

    /// Sound class of the word after segment `at`, skipping whitespace.
    fn following_sound(
        &self,
        segments: &[Segment],
        out: &[String],
        agreements: &[Option<Agreement>],
        at: usize,
    ) -> StartsWith {
        let next = (at + 1..segments.len())
            .find(|&j| !matches!(&segments[j], Segment::Text(_)) || !out[j].trim().is_empty())
            .unwrap_or(segments.len());
        match segments.get(next) {
            Some(Segment::Noun(reference)) if reference.article == ArticleKind::Zero => {
                match agreements[next] {
                    Some(agreement) => agreement.starts_with,
                    None => StartsWith::Consonant,
                }
            }
            Some(Segment::Adjective(reference)) => self
                .dictionary
                .get_adjective(&reference.name)
                .map(|adjective| adjective.starts_with())
                .unwrap_or_else(|| self.dictionary.declension().infer_starts_with(&out[next])),
            Some(_) => self.dictionary.declension().infer_starts_with(&out[next]),
            None => StartsWith::Consonant,
        }
    }

    fn render_article(
        &self,
        reference: &ArticleRef,
        agreement: Option<Agreement>,
        following: StartsWith,
    ) -> GrammarResult<String> {
        let Some(agreement) = agreement else {
            return Ok(String::new());
        };
        let text = self.article_text(reference.kind, agreement, following);
        Ok(if reference.capital {
            capitalize(&text)
        } else {
            self.dictionary.declension().fold_modifier(&text)
        })
    }

    fn render_plural(&self, choice: &PluralChoice) -> GrammarResult<String> {
        let value = choice.argument.localize(self.args);
        let value = value.trim();
        if let Some((_, template)) = choice.named.iter().find(|(name, _)| name == value) {
            return self.render(template);
        }

        let language = self.dictionary.language();
        let category = match value.parse::<usize>() {
            Ok(n) => plural::category_for(language, n)?,
            Err(_) => icu_plurals::PluralCategory::Other,
        };
        let name = plural::category_name(category);
        if let Some((_, template)) = choice.named.iter().find(|(n, _)| n == name) {
            return self.render(template);
        }

        let categories = plural::categories(language)?;
        let index = categories.iter().position(|c| *c == category).unwrap_or(usize::MAX);
        let template = choice
            .positional
            .get(index)
            .or_else(|| choice.positional.last())
            .or_else(|| {
                choice
                    .named
                    .iter()
                    .find(|(n, _)| n == "other")
                    .map(|(_, t)| t)
            });
        match template {
            Some(template) => self.render(template),
            None => Ok(String::new()),
        }
    }

    fn render_gender(&self, choice: &GenderChoice) -> GrammarResult<String> {
        let gender = match self.resolve(&NounTarget::Entity(choice.entity), Number::Singular) {
            Some(Resolved::Noun(noun)) => noun.gender(),
            Some(Resolved::Label(_)) => self.dictionary.declension().default_gender(),
            None => {
                let err = GrammarError::MissingEntity {
                    reference: format!("#{}", choice.entity),
                };
                if self.strict {
                    return Err(err);
                }
                warn!(error = %err, "gender choice falls back to the default gender");
                self.dictionary.declension().default_gender()
            }
        };
        let position = match gender {
            Gender::Masculine => 0,
            Gender::Feminine => 1,
            Gender::Neuter => 2,
        };
        let template = choice
            .named
            .iter()
            .find(|(g, _)| *g == gender)
            .map(|(_, t)| t)
            .or_else(|| choice.positional.get(position))
            .or_else(|| {
                choice
                    .named
                    .iter()
                    .find(|(g, _)| *g == Gender::Masculine)
                    .map(|(_, t)| t)
            })
            .or_else(|| choice.positional.first());
        match template {
            Some(template) => self.render(template),
            None => Ok(String::new()),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::NounForm;
    use crate::language::Language;
    use crate::modifier::Adjective;
    use crate::renaming::{CustomEntity, NoRenaming, RenamedNouns};
    use std::collections::HashMap;

    fn noun(language: Language, singular: &str, gender: Gender) -> Arc<Noun> {
        Arc::new(
            Noun::builder(language, singular)
                .with_gender(gender)
                .with_form(NounForm::new(Number::Singular, Case::Nominative), singular)
                .build()
                .unwrap(),
        )
    }

    fn english() -> Dictionary {
        let mut dictionary = Dictionary::new(Language::English);
        dictionary.add_noun(noun(Language::English, "Account", Gender::Neuter));
        dictionary.add_noun(noun(Language::English, "Case", Gender::Neuter));
        dictionary
    }

    fn german() -> Dictionary {
        let mut dictionary = Dictionary::new(Language::German);
        dictionary.add_noun(noun(Language::German, "Account", Gender::Masculine));
        dictionary.add_noun(noun(Language::German, "Firma", Gender::Feminine));
        dictionary.add_noun(noun(Language::German, "Konto", Gender::Neuter));
        dictionary.add_adjective(Arc::new(Adjective::new(Language::German, "neu", "neu")));
        dictionary
    }

    fn render(
        dictionary: &Dictionary,
        renaming: &dyn RenamingProvider,
        source: &str,
        entities: &[&dyn Renameable],
        args: &[&str],
        strict: bool,
    ) -> GrammarResult<String> {
        let template = Template::compile(source, dictionary.language(), "Test", "key").unwrap();
        Renderer {
            dictionary,
            renaming,
            entities,
            args,
            allow_other_forms: false,
            strict,
        }
        .render(&template)
    }

    #[test]
    fn test_english_articles() {
        let dictionary = english();
        let text = render(
            &dictionary,
            &NoRenaming,
            "Create {{entity:0|article=a}} or {{entity:1|article=a}}",
            &[&"Account", &"Case"],
            &[],
            true,
        )
        .unwrap();
        assert_eq!(text, "Create an account or a case");
    }

    #[test]
    fn test_capitalized_reference() {
        let dictionary = english();
        let text = render(
            &dictionary,
            &NoRenaming,
            "{{Entity:0|plural|article=the}} for $1",
            &[&"account"],
            &["Acme"],
            true,
        )
        .unwrap();
        assert_eq!(text, "The Accounts for Acme");
    }

    #[test]
    fn test_german_agreement() {
        let dictionary = german();
        let source = "Erstellen Sie {{article:a}}{{adj:neu}} {{entity:0|case=a}}";
        let cases = [
            ("Account", "Erstellen Sie einen neuen Account"),
            ("Firma", "Erstellen Sie eine neue Firma"),
            ("Konto", "Erstellen Sie ein neues Konto"),
        ];
        for (entity, expected) in cases {
            let text = render(&dictionary, &NoRenaming, source, &[&entity], &[], true).unwrap();
            assert_eq!(text, expected);
        }
    }

    #[test]
    fn test_renamed_gender_flips_agreement() {
        let dictionary = german();
        let renaming = RenamedNouns::new();
        let mut forms = HashMap::new();
        forms.insert(NounForm::new(Number::Singular, Case::Nominative), "Kunde".to_string());
        renaming
            .rename(&dictionary, "Konto", Gender::Masculine, StartsWith::Consonant, forms)
            .unwrap();
        let text = render(
            &dictionary,
            &renaming,
            "{{Article:the}}{{adj:neu}} {{entity:0}}",
            &[&"Konto"],
            &[],
            true,
        )
        .unwrap();
        assert_eq!(text, "Der neue Kunde");
    }

    #[test]
    fn test_lenient_missing_entity() {
        let dictionary = english();
        let text = render(
            &dictionary,
            &NoRenaming,
            "Delete {{entity:0|plural}}?",
            &[&"Widget"],
            &[],
            false,
        )
        .unwrap();
        assert_eq!(text, "Delete <Entities>?");

        let err = render(&dictionary, &NoRenaming, "Delete {{entity:1}}", &[], &[], true);
        assert!(matches!(err, Err(GrammarError::MissingEntity { .. })));
    }

    #[test]
    fn test_custom_entity_label() {
        let dictionary = english();
        let invoice = CustomEntity::new("invoice__c", "Invoice", "Invoices");
        let text = render(
            &dictionary,
            &NoRenaming,
            "Open {{entity:0|article=a}}",
            &[&invoice],
            &[],
            true,
        )
        .unwrap();
        assert_eq!(text, "Open an invoice");
    }

    #[test]
    fn test_plural_choice() {
        let dictionary = english();
        let source = concat!(
            "{{plural:$1|one {{entity:0}}|$1 {{entity:0|plural}}",
            "|0=no {{entity:0|plural}}}}"
        );
        let render_with = |n: &str| {
            render(&dictionary, &NoRenaming, source, &[&"Account"], &[n], true).unwrap()
        };
        assert_eq!(render_with("1"), "one account");
        assert_eq!(render_with("4"), "4 accounts");
        assert_eq!(render_with("0"), "no accounts");
    }

    #[test]
    fn test_gender_choice() {
        let dictionary = german();
        let source = "{{gender:0|m=Er|f=Sie|n=Es}} ist da";
        let text = render(&dictionary, &NoRenaming, source, &[&"Firma"], &[], true).unwrap();
        assert_eq!(text, "Sie ist da");
    }

    #[test]
    fn test_spaced_article_agrees_with_noun() {
        let dictionary = english();
        let source = "Create {{article:a}} {{entity:0}}";
        let render_with = |entity: &str| {
            render(&dictionary, &NoRenaming, source, &[&entity], &[], true).unwrap()
        };
        assert_eq!(render_with("Account"), "Create an account");
        assert_eq!(render_with("Case"), "Create a case");
    }

    #[test]
    fn test_spaced_elided_article() {
        let mut dictionary = Dictionary::new(Language::French);
        dictionary.add_noun(noun(Language::French, "Ami", Gender::Masculine));
        dictionary.add_noun(noun(Language::French, "Compte", Gender::Masculine));
        let source = "{{Article:the}} {{entity:0}}";
        let render_with = |entity: &str| {
            render(&dictionary, &NoRenaming, source, &[&entity], &[], true).unwrap()
        };
        assert_eq!(render_with("Ami"), "L'ami");
        assert_eq!(render_with("Compte"), "Le compte");
    }

    #[test]
    fn test_escape_html() {
        let mut dictionary = english();
        dictionary.add_noun(noun(Language::English, "Q&A", Gender::Neuter));
        let text = render(
            &dictionary,
            &NoRenaming,
            "{{Noun:q&a|escape}}",
            &[],
            &[],
            true,
        )
        .unwrap();
        assert_eq!(text, "Q&amp;A");
    }
}
