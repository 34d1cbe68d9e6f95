//! Raw syntax tree of a label template, before it is bound to a language.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Text(String),
    Placeholder(Placeholder),
    Reference(Reference),
}

/// A positional argument such as `$1`. `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub index: usize,
}

impl Placeholder {
    pub fn new(name: &str) -> Result<Self, String> {
        let digits = name
            .strip_prefix('$')
            .ok_or_else(|| format!("'{}' is not a placeholder", name))?;
        let index = digits
            .parse::<usize>()
            .map_err(|_| format!("'{}' is not a placeholder", name))?;
        if index == 0 {
            return Err("placeholders are numbered from $1".to_string());
        }
        Ok(Placeholder {
            name: name.to_string(),
            index: index - 1,
        })
    }

    /// Substitutes the argument, keeping the placeholder text when the
    /// caller passed too few arguments.
    pub fn localize(&self, args: &[&str]) -> String {
        match args.get(self.index) {
            Some(value) => value.to_string(),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One `|`-separated part of a reference. Named parts read `name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: Option<String>,
    pub value: String,
}

/// A `{{title:argument|part|name=value}}` construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub title: String,
    pub argument: Option<String>,
    pub parts: Vec<Part>,
}

impl Reference {
    pub fn new(title: &str, argument: Option<&str>, parts: Vec<Part>) -> Self {
        Reference {
            title: title.to_string(),
            argument: argument.map(str::to_string),
            parts,
        }
    }

    /// True when the title is written with a leading capital (`Entity`).
    pub fn is_capitalized(&self) -> bool {
        self.title.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn positional(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(|p| p.name.is_none())
            .map(|p| p.value.as_str())
    }

    pub fn named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parts
            .iter()
            .filter_map(|p| p.name.as_deref().map(|n| (n, p.value.as_str())))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}", self.title)?;
        if let Some(argument) = &self.argument {
            write!(f, ":{}", argument)?;
        }
        for part in &self.parts {
            match &part.name {
                Some(name) => write!(f, "|{}={}", name, part.value)?,
                None => write!(f, "|{}", part.value)?,
            }
        }
        write!(f, "}}}}")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AstNodeList(pub Vec<AstNode>);

impl AstNodeList {
    pub fn new() -> Self {
        AstNodeList(Vec::new())
    }

    pub fn push(&mut self, node: AstNode) {
        self.0.push(node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AstNode> {
        self.0.get(index)
    }
}

impl IntoIterator for AstNodeList {
    type Item = AstNode;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AstNodeList {
    type Item = &'a AstNode;
    type IntoIter = std::slice::Iter<'a, AstNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
