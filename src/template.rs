//! Compiled label templates.
//!
//! Templates are compiled once, when a label layer is loaded, into a closed
//! set of segments bound to the layer's language. Rendering never re-parses.
//!
//! | Syntax | Segment |
//! |---|---|
//! | `$1` | [`Segment::Arg`] |
//! | `{{entity:0\|plural\|case=a\|article=a}}` | [`Segment::Noun`] for renameable 0 |
//! | `{{noun:account}}` | [`Segment::Noun`] for a dictionary noun |
//! | `{{article:the}}` | [`Segment::Article`] agreeing with the nearest noun |
//! | `{{adj:new}}` | [`Segment::Adjective`] agreeing with the nearest noun |
//! | `{{plural:$1\|item\|items}}` | [`Segment::Plural`] |
//! | `{{gender:0\|m=..\|f=..\|n=..}}` | [`Segment::Gender`] |
//!
//! A reference title written with a capital (`Entity`, `Article`) renders
//! capitalized; a lower-case title folds the output to lower case the way
//! the language does. Modifiers bind to the next noun reference, or the
//! previous one when no noun follows.

use crate::ast::{AstNode, Placeholder, Reference};
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{ArticleKind, Case, Gender, Number};
use crate::language::Language;
use crate::parser::Parser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NounTarget {
    /// Index into the renameables passed to the localizer.
    Entity(usize),
    /// A dictionary noun named in the template.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounRef {
    pub target: NounTarget,
    pub number: Number,
    pub case: Case,
    pub article: ArticleKind,
    pub capital: bool,
    pub escape_html: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjectiveRef {
    pub name: String,
    /// Segment index of the governing noun.
    pub noun: usize,
    /// Article in front of the noun phrase, which selects the ending family.
    pub article: ArticleKind,
    pub capital: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    pub kind: ArticleKind,
    pub noun: usize,
    pub capital: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluralChoice {
    pub argument: Placeholder,
    /// Forms in the order of the language's plural categories.
    pub positional: Vec<Template>,
    /// Forms keyed by category name (`one`, `other` ...) or exact integer.
    pub named: Vec<(String, Template)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenderChoice {
    pub entity: usize,
    /// Forms in masculine, feminine, neuter order.
    pub positional: Vec<Template>,
    pub named: Vec<(Gender, Template)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Arg(Placeholder),
    Noun(NounRef),
    Adjective(AdjectiveRef),
    Article(ArticleRef),
    Plural(PluralChoice),
    Gender(GenderChoice),
}

/// A label compiled for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    language: Language,
    segments: Vec<Segment>,
}

impl Template {
    /// Compiles `source` for `language`. `section` and `key` only label errors.
    pub fn compile(
        source: &str,
        language: Language,
        section: &str,
        key: &str,
    ) -> GrammarResult<Template> {
        TemplateCompiler {
            language,
            section,
            key,
        }
        .compile(source)
    }

    /// A template made of literal text only.
    pub fn literal(text: &str, language: Language) -> Template {
        Template {
            source: text.to_string(),
            language,
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Highest renameable index referenced, plus one.
    pub fn entity_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Noun(NounRef {
                    target: NounTarget::Entity(i),
                    ..
                }) => i + 1,
                Segment::Gender(choice) => choice.entity + 1,
                Segment::Plural(choice) => choice
                    .positional
                    .iter()
                    .chain(choice.named.iter().map(|(_, t)| t))
                    .map(Template::entity_count)
                    .max()
                    .unwrap_or(0),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

struct TemplateCompiler<'a> {
    language: Language,
    section: &'a str,
    key: &'a str,
}

/// Placeholder index for modifiers until they are bound to a noun.
const UNBOUND: usize = usize::MAX;

impl TemplateCompiler<'_> {
    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::template(self.section, self.key, message)
    }

    fn compile(&self, source: &str) -> GrammarResult<Template> {
        let ast = Parser::new(source).parse();
        let mut segments = Vec::with_capacity(ast.len());
        for node in ast {
            let segment = match node {
                AstNode::Text(text) => Segment::Text(text),
                AstNode::Placeholder(placeholder) => Segment::Arg(placeholder),
                AstNode::Reference(reference) => self.compile_reference(reference)?,
            };
            if let (Segment::Text(more), Some(Segment::Text(previous))) =
                (&segment, segments.last_mut())
            {
                previous.push_str(more);
                continue;
            }
            segments.push(segment);
        }
        self.bind_modifiers(&mut segments)?;
        Ok(Template {
            source: source.to_string(),
            language: self.language,
            segments,
        })
    }

    fn compile_reference(&self, reference: Reference) -> GrammarResult<Segment> {
        let capital = reference.is_capitalized();
        match reference.title.to_lowercase().as_str() {
            "entity" => {
                let argument = reference.argument.as_deref().unwrap_or_default();
                let index = argument
                    .parse::<usize>()
                    .map_err(|_| self.error(format!("bad entity index '{}'", argument)))?;
                self.compile_noun(NounTarget::Entity(index), &reference, capital)
            }
            "noun" => match reference.argument.as_deref() {
                Some(name) if !name.is_empty() => {
                    self.compile_noun(NounTarget::Named(name.to_lowercase()), &reference, capital)
                }
                _ => Err(self.error("noun reference without a name")),
            },
            "article" => {
                let kind = reference
                    .argument
                    .as_deref()
                    .unwrap_or_default()
                    .parse::<ArticleKind>()
                    .map_err(|e| self.error(e))?;
                Ok(Segment::Article(ArticleRef {
                    kind,
                    noun: UNBOUND,
                    capital,
                }))
            }
            "adj" | "adjective" => match reference.argument.as_deref() {
                Some(name) if !name.is_empty() => Ok(Segment::Adjective(AdjectiveRef {
                    name: name.to_lowercase(),
                    noun: UNBOUND,
                    article: ArticleKind::Zero,
                    capital,
                })),
                _ => Err(self.error("adjective reference without a name")),
            },
            "plural" => self.compile_plural(&reference),
            "gender" => self.compile_gender(&reference),
            _ => Ok(Segment::Text(reference.to_string())),
        }
    }

    fn compile_noun(
        &self,
        target: NounTarget,
        reference: &Reference,
        capital: bool,
    ) -> GrammarResult<Segment> {
        let mut noun = NounRef {
            target,
            number: Number::Singular,
            case: Case::Nominative,
            article: ArticleKind::Zero,
            capital,
            escape_html: false,
        };
        for value in reference.positional() {
            let value = value.trim();
            if value.eq_ignore_ascii_case("escape") {
                noun.escape_html = true;
            } else if let Ok(number) = value.parse::<Number>() {
                noun.number = number;
            } else if let Ok(case) = value.parse::<Case>() {
                noun.case = case;
            } else if let Ok(article) = value.parse::<ArticleKind>() {
                noun.article = article;
            } else {
                return Err(self.error(format!("unknown noun parameter '{}'", value)));
            }
        }
        for (name, value) in reference.named() {
            let value = value.trim();
            match name.to_lowercase().as_str() {
                "number" => noun.number = value.parse().map_err(|e: String| self.error(e))?,
                "case" => noun.case = value.parse().map_err(|e: String| self.error(e))?,
                "article" => noun.article = value.parse().map_err(|e: String| self.error(e))?,
                "escape" => noun.escape_html = matches!(value, "true" | "yes" | "1"),
                other => return Err(self.error(format!("unknown noun parameter '{}'", other))),
            }
        }
        self.language
            .declension()
            .noun_form(noun.number, noun.case)
            .map_err(|e| self.error(e.to_string()))?;
        if noun.article != ArticleKind::Zero && !self.language.declension().has_articles() {
            noun.article = ArticleKind::Zero;
        }
        Ok(Segment::Noun(noun))
    }

    fn compile_plural(&self, reference: &Reference) -> GrammarResult<Segment> {
        let argument = reference.argument.as_deref().unwrap_or_default();
        let argument = Placeholder::new(argument)
            .map_err(|e| self.error(format!("plural needs a $n argument: {}", e)))?;
        let positional = reference
            .positional()
            .map(|form| self.compile(form))
            .collect::<GrammarResult<Vec<_>>>()?;
        let named = reference
            .named()
            .map(|(name, form)| -> GrammarResult<(String, Template)> {
                Ok((name.to_lowercase(), self.compile(form)?))
            })
            .collect::<GrammarResult<Vec<_>>>()?;
        Ok(Segment::Plural(PluralChoice {
            argument,
            positional,
            named,
        }))
    }

    fn compile_gender(&self, reference: &Reference) -> GrammarResult<Segment> {
        let argument = reference.argument.as_deref().unwrap_or_default();
        let entity = argument
            .parse::<usize>()
            .map_err(|_| self.error(format!("bad entity index '{}'", argument)))?;
        let positional = reference
            .positional()
            .map(|form| self.compile(form))
            .collect::<GrammarResult<Vec<_>>>()?;
        let named = reference
            .named()
            .map(|(name, form)| -> GrammarResult<(Gender, Template)> {
                let gender = name.parse::<Gender>().map_err(|e| self.error(e))?;
                Ok((gender, self.compile(form)?))
            })
            .collect::<GrammarResult<Vec<_>>>()?;
        Ok(Segment::Gender(GenderChoice {
            entity,
            positional,
            named,
        }))
    }

    fn bind_modifiers(&self, segments: &mut [Segment]) -> GrammarResult<()> {
        let nouns: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Segment::Noun(_)))
            .map(|(i, _)| i)
            .collect();
        let governor = |at: usize| {
            nouns
                .iter()
                .copied()
                .find(|&n| n > at)
                .or_else(|| nouns.iter().copied().rev().find(|&n| n < at))
        };

        for i in 0..segments.len() {
            let slot = match &mut segments[i] {
                Segment::Article(article) => &mut article.noun,
                Segment::Adjective(adjective) => &mut adjective.noun,
                _ => continue,
            };
            *slot = governor(i).ok_or_else(|| self.error("modifier without a noun"))?;
        }

        // Adjectives take their ending family from the article of the phrase.
        for i in 0..segments.len() {
            let Segment::Adjective(adjective) = &segments[i] else {
                continue;
            };
            let noun = adjective.noun;
            let standalone = segments.iter().find_map(|s| match s {
                Segment::Article(article) if article.noun == noun => Some(article.kind),
                _ => None,
            });
            let article = match (standalone, &segments[noun]) {
                (Some(kind), _) => kind,
                (None, Segment::Noun(noun)) => noun.article,
                (None, _) => ArticleKind::Zero,
            };
            if let Segment::Adjective(adjective) = &mut segments[i] {
                adjective.article = article;
            }
        }
        Ok(())
    }
}
