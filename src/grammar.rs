//! Grammatical categories and the composite form keys built from them.
//!
//! Every category is a closed enumeration. Form keys are plain value types
//! with structural equality, but they can only be obtained through a
//! [`Declension`](crate::declension::Declension), which guarantees that a key
//! only ever carries axes its language actually has.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Number {
    #[serde(rename = "s", alias = "singular")]
    Singular,
    #[serde(rename = "p", alias = "plural")]
    Plural,
}

impl Number {
    pub const ALL: [Number; 2] = [Number::Singular, Number::Plural];

    pub fn code(self) -> &'static str {
        match self {
            Number::Singular => "s",
            Number::Plural => "p",
        }
    }
}

impl FromStr for Number {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sg" | "singular" => Ok(Number::Singular),
            "p" | "pl" | "plural" => Ok(Number::Plural),
            other => Err(format!("unknown number '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Case {
    #[serde(rename = "n", alias = "nominative")]
    Nominative,
    #[serde(rename = "a", alias = "accusative")]
    Accusative,
    #[serde(rename = "g", alias = "genitive")]
    Genitive,
    #[serde(rename = "d", alias = "dative")]
    Dative,
}

impl Case {
    pub const ALL: [Case; 4] = [
        Case::Nominative,
        Case::Accusative,
        Case::Genitive,
        Case::Dative,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Case::Nominative => "n",
            Case::Accusative => "a",
            Case::Genitive => "g",
            Case::Dative => "d",
        }
    }
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "nom" | "nominative" => Ok(Case::Nominative),
            "a" | "acc" | "accusative" => Ok(Case::Accusative),
            "g" | "gen" | "genitive" => Ok(Case::Genitive),
            "d" | "dat" | "dative" => Ok(Case::Dative),
            other => Err(format!("unknown case '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m", alias = "masculine")]
    Masculine,
    #[serde(rename = "f", alias = "feminine")]
    Feminine,
    #[serde(rename = "n", alias = "neuter")]
    Neuter,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Masculine => "m",
            Gender::Feminine => "f",
            Gender::Neuter => "n",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "masculine" => Ok(Gender::Masculine),
            "f" | "feminine" => Ok(Gender::Feminine),
            "n" | "neuter" => Ok(Gender::Neuter),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Phonetic class of a word's first sound, which drives article choice
/// ("a" vs "an", "le" vs "l'").
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StartsWith {
    #[default]
    #[serde(rename = "c", alias = "consonant")]
    Consonant,
    #[serde(rename = "v", alias = "vowel")]
    Vowel,
}

impl FromStr for StartsWith {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" | "consonant" => Ok(StartsWith::Consonant),
            "v" | "vowel" => Ok(StartsWith::Vowel),
            other => Err(format!("unknown starts-with class '{}'", other)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ArticleKind {
    #[default]
    #[serde(rename = "zero")]
    Zero,
    #[serde(rename = "a")]
    Indefinite,
    #[serde(rename = "the")]
    Definite,
}

impl FromStr for ArticleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "zero" | "none" => Ok(ArticleKind::Zero),
            "a" | "an" | "indefinite" => Ok(ArticleKind::Indefinite),
            "the" | "definite" => Ok(ArticleKind::Definite),
            other => Err(format!("unknown article '{}'", other)),
        }
    }
}

/// Form key of a noun. Caseless languages always carry `Case::Nominative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NounForm {
    number: Number,
    case: Case,
}

impl NounForm {
    pub(crate) const fn new(number: Number, case: Case) -> Self {
        NounForm { number, case }
    }

    pub fn number(&self) -> Number {
        self.number
    }

    pub fn case(&self) -> Case {
        self.case
    }

    /// Storage key used in label sources: `s`, `p`, `s-a`, `p-d` ...
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NounForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case == Case::Nominative {
            write!(f, "{}", self.number.code())
        } else {
            write!(f, "{}-{}", self.number.code(), self.case.code())
        }
    }
}

/// Form key of an adjective, agreeing with the noun it modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdjectiveForm {
    gender: Gender,
    number: Number,
    case: Case,
    article: ArticleKind,
    starts_with: StartsWith,
}

impl AdjectiveForm {
    pub(crate) const fn new(
        gender: Gender,
        number: Number,
        case: Case,
        article: ArticleKind,
        starts_with: StartsWith,
    ) -> Self {
        AdjectiveForm {
            gender,
            number,
            case,
            article,
            starts_with,
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn number(&self) -> Number {
        self.number
    }

    pub fn case(&self) -> Case {
        self.case
    }

    pub fn article(&self) -> ArticleKind {
        self.article
    }

    pub fn starts_with(&self) -> StartsWith {
        self.starts_with
    }
}

impl fmt::Display for AdjectiveForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.gender.code(),
            self.number.code(),
            self.case.code()
        )
    }
}

/// Form key of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleForm {
    gender: Gender,
    number: Number,
    case: Case,
    starts_with: StartsWith,
}

impl ArticleForm {
    pub(crate) const fn new(
        gender: Gender,
        number: Number,
        case: Case,
        starts_with: StartsWith,
    ) -> Self {
        ArticleForm {
            gender,
            number,
            case,
            starts_with,
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn number(&self) -> Number {
        self.number
    }

    pub fn case(&self) -> Case {
        self.case
    }

    pub fn starts_with(&self) -> StartsWith {
        self.starts_with
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noun_form_keys() {
        assert_eq!(NounForm::new(Number::Singular, Case::Nominative).key(), "s");
        assert_eq!(NounForm::new(Number::Plural, Case::Dative).key(), "p-d");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Plural".parse::<Number>(), Ok(Number::Plural));
        assert_eq!("acc".parse::<Case>(), Ok(Case::Accusative));
        assert_eq!("f".parse::<Gender>(), Ok(Gender::Feminine));
        assert_eq!("an".parse::<ArticleKind>(), Ok(ArticleKind::Indefinite));
        assert!("ablative".parse::<Case>().is_err());
    }

    #[test]
    fn test_structural_equality() {
        let a = NounForm::new(Number::Singular, Case::Genitive);
        let b = NounForm::new(Number::Singular, Case::Genitive);
        assert_eq!(a, b);
        assert_ne!(a, NounForm::new(Number::Plural, Case::Genitive));
    }
}
