use crate::ast::{AstNode, AstNodeList, Part, Placeholder, Reference};

/// A parser for label templates made of text, `$n` placeholders and
/// `{{title:argument|parts}}` references.
///
/// Positions are byte offsets into the input, always on a char boundary.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.position..].starts_with(prefix)
    }

    /// Consumes the current character and advances the position.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// Reads text up to the next `{{` or `$`. A lone `{` or a `$` that does
    /// not start a placeholder is consumed as text.
    fn parse_text(&mut self) -> AstNode {
        let start = self.position;
        self.consume();
        while let Some(c) = self.peek() {
            if (c == '{' && self.starts_with("{{")) || c == '$' {
                break;
            }
            self.consume();
        }
        AstNode::Text(self.input[start..self.position].to_string())
    }

    fn parse_placeholder(&mut self) -> Option<AstNode> {
        let start = self.position;
        if self.consume() != Some('$') {
            self.position = start;
            return None;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }
        match Placeholder::new(&self.input[start..self.position]) {
            Ok(placeholder) => Some(AstNode::Placeholder(placeholder)),
            Err(_) => {
                self.position = start;
                None
            }
        }
    }

    /// Reads until one of `stops` or the closing braces, keeping nested
    /// `{{...}}` intact.
    fn parse_balanced_text(&mut self, stops: &[char]) -> String {
        let start = self.position;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if self.starts_with("{{") {
                depth += 1;
                self.consume();
                self.consume();
                continue;
            }
            if self.starts_with("}}") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                self.consume();
                self.consume();
                continue;
            }
            if depth == 0 && stops.contains(&c) {
                break;
            }
            self.consume();
        }
        self.input[start..self.position].to_string()
    }

    /// Parses a `{{title:argument|part|name=value}}` reference.
    ///
    /// The title runs to the first `:` or `|`. The optional argument follows
    /// the colon. Each `|` starts a part, which is named when it contains
    /// `=`. If the closing `}}` is missing the parser backtracks and
    /// returns `None`, so the caller can treat the braces as text.
    fn parse_reference(&mut self) -> Option<AstNode> {
        let start = self.position;
        if !self.starts_with("{{") {
            return None;
        }
        self.consume();
        self.consume();

        let title = self.parse_balanced_text(&[':', '|']);
        let mut argument = None;
        if self.peek() == Some(':') {
            self.consume();
            argument = Some(self.parse_balanced_text(&['|']));
        }
        let mut parts = Vec::new();
        while self.peek() == Some('|') {
            self.consume();
            let value = self.parse_balanced_text(&['|', '=']);
            if self.peek() == Some('=') {
                self.consume();
                let named = self.parse_balanced_text(&['|']);
                parts.push(Part {
                    name: Some(value.trim().to_string()),
                    value: named,
                });
            } else {
                parts.push(Part { name: None, value });
            }
        }

        if !self.starts_with("}}") || title.trim().is_empty() {
            self.position = start;
            return None;
        }
        self.consume();
        self.consume();

        Some(AstNode::Reference(Reference::new(
            title.trim(),
            argument.as_deref().map(str::trim),
            parts,
        )))
    }

    pub fn parse(&mut self) -> AstNodeList {
        let mut ast = AstNodeList::new();
        while self.position < self.input.len() {
            let node = if self.starts_with("{{") {
                self.parse_reference()
            } else if self.peek() == Some('$') {
                self.parse_placeholder()
            } else {
                None
            };
            match node {
                Some(node) => ast.push(node),
                None => {
                    let text = self.parse_text();
                    if let (AstNode::Text(more), Some(AstNode::Text(previous))) =
                        (&text, ast.0.last_mut())
                    {
                        previous.push_str(more);
                        continue;
                    }
                    ast.push(text);
                }
            }
        }
        ast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser() {
        let input = "Step $1 of $2: {{entity:0|plural|case=a}} saved";
        let ast = Parser::new(input).parse();
        assert_eq!(ast.len(), 7);
        assert_eq!(ast.get(0), Some(&AstNode::Text("Step ".to_string())));
        assert_eq!(
            ast.get(1),
            Some(&AstNode::Placeholder(Placeholder::new("$1").unwrap()))
        );
        assert_eq!(
            ast.get(5),
            Some(&AstNode::Reference(Reference::new(
                "entity",
                Some("0"),
                vec![
                    Part {
                        name: None,
                        value: "plural".to_string()
                    },
                    Part {
                        name: Some("case".to_string()),
                        value: "a".to_string()
                    },
                ]
            )))
        );
    }

    #[test]
    fn test_parse_text() {
        let ast = Parser::new("Hello, World!").parse();
        assert_eq!(ast.0, vec![AstNode::Text("Hello, World!".to_string())]);
    }

    #[test]
    fn test_unclosed_reference_is_text() {
        let ast = Parser::new("Costs {{plural:$1|one").parse();
        assert_eq!(ast.get(0), Some(&AstNode::Text("Costs {{plural:".to_string())));
        assert_eq!(
            ast.get(1),
            Some(&AstNode::Placeholder(Placeholder::new("$1").unwrap()))
        );
        assert_eq!(ast.get(2), Some(&AstNode::Text("|one".to_string())));
    }

    #[test]
    fn test_dollar_without_digits() {
        let ast = Parser::new("Price: $ 5").parse();
        assert_eq!(ast.0, vec![AstNode::Text("Price: $ 5".to_string())]);
    }

    #[test]
    fn test_nested_reference_in_part() {
        let ast = Parser::new("{{gender:0|m={{entity:0}} is|f=she}}").parse();
        let Some(AstNode::Reference(reference)) = ast.get(0) else {
            panic!("expected a reference");
        };
        assert_eq!(reference.parts[0].value, "{{entity:0}} is");
    }

    #[test]
    fn test_multibyte_text() {
        let ast = Parser::new("Übersicht für $1 – {{Entity:0}}").parse();
        assert_eq!(ast.len(), 4);
        assert_eq!(ast.get(0), Some(&AstNode::Text("Übersicht für ".to_string())));
    }
}
