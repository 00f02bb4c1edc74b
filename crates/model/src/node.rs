//! RDF nodes: IRIs, blank nodes and literals.
//!
//! Node payloads are reference counted, so cloning a node (and any statement
//! holding nodes) never copies string data.

use core::fmt;
use core::str::{CharIndices, FromStr};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// An RDF term in one of the three node kinds.
///
/// The textual form used by [`Display`](fmt::Display), [`FromStr`] and serde is
/// the N-Triples one: `<iri>`, `_:label`, `"lexical"`, `"lexical"@lang` or
/// `"lexical"^^<datatype>`. Parsing decodes the N-Triples escapes (`\t \b \n
/// \r \f \" \' \\` in literals, `\uXXXX` and `\UXXXXXXXX` in literals and IRIs).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Node {
    Iri(Arc<str>),
    Blank(Arc<str>),
    Literal(Literal),
}

/// Lexical form of a literal plus at most one of language tag or datatype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    lexical: Arc<str>,
    tag: LiteralTag,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralTag {
    Plain,
    Language(Arc<str>),
    Datatype(Arc<str>),
}

impl Literal {
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn tag(&self) -> &LiteralTag {
        &self.tag
    }

    pub fn language(&self) -> Option<&str> {
        match &self.tag {
            LiteralTag::Language(language) => Some(language),
            _ => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        match &self.tag {
            LiteralTag::Datatype(datatype) => Some(datatype),
            _ => None,
        }
    }
}

impl Node {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Node::Iri(Arc::from(iri.as_ref()))
    }

    /// Blank node from its label, without the `_:` prefix.
    pub fn blank(label: impl AsRef<str>) -> Self {
        Node::Blank(Arc::from(label.as_ref()))
    }

    /// Plain literal without language tag or datatype.
    pub fn literal(lexical: impl AsRef<str>) -> Self {
        Node::Literal(Literal { lexical: Arc::from(lexical.as_ref()), tag: LiteralTag::Plain })
    }

    pub fn lang_literal(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Node::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            tag: LiteralTag::Language(Arc::from(language.as_ref())),
        })
    }

    pub fn typed_literal(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Node::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            tag: LiteralTag::Datatype(Arc::from(datatype.as_ref())),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Iri(_) => "iri",
            Node::Blank(_) => "blank",
            Node::Literal(_) => "literal",
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(label) => write!(f, "_:{label}"),
            Node::Literal(literal) => {
                f.write_str("\"")?;
                for ch in literal.lexical.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        '\u{8}' => f.write_str("\\b")?,
                        '\u{c}' => f.write_str("\\f")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")?;
                match &literal.tag {
                    LiteralTag::Plain => Ok(()),
                    LiteralTag::Language(language) => write!(f, "@{language}"),
                    LiteralTag::Datatype(datatype) => write!(f, "^^<{datatype}>"),
                }
            }
        }
    }
}

impl FromStr for Node {
    type Err = ModelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ModelError::Empty);
        }
        if let Some(rest) = text.strip_prefix('<') {
            let body = rest
                .strip_suffix('>')
                .ok_or_else(|| ModelError::Unterminated { kind: "iri", input: text.to_owned() })?;
            return Ok(Node::iri(parse_iri(body, text)?));
        }
        if let Some(label) = text.strip_prefix("_:") {
            if label.is_empty() {
                return Err(ModelError::EmptyBlankLabel);
            }
            if label.chars().any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '<' | '>' | '"')) {
                return Err(ModelError::InvalidBlankLabel { label: label.to_owned() });
            }
            return Ok(Node::blank(label));
        }
        if let Some(rest) = text.strip_prefix('"') {
            return parse_literal(text, rest);
        }
        Err(ModelError::UnknownSyntax(text.to_owned()))
    }
}

fn forbidden_in_iri(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control() || matches!(ch, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`')
}

fn parse_iri(body: &str, text: &str) -> Result<String, ModelError> {
    let mut iri = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((_, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'u')) => iri.push(read_uchar(&mut chars, 4, text)?),
                Some((_, 'U')) => iri.push(read_uchar(&mut chars, 8, text)?),
                Some((_, escape)) => return Err(ModelError::InvalidEscape { escape, input: text.to_owned() }),
                None => return Err(ModelError::Unterminated { kind: "iri", input: text.to_owned() }),
            },
            ch if forbidden_in_iri(ch) => return Err(ModelError::InvalidIriChar { ch, input: text.to_owned() }),
            ch => iri.push(ch),
        }
    }
    Ok(iri)
}

/// Decodes the hex digits of a `\u` or `\U` escape.
fn read_uchar(chars: &mut CharIndices<'_>, digits: usize, text: &str) -> Result<char, ModelError> {
    let mut code = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|(_, ch)| ch.to_digit(16))
            .ok_or_else(|| ModelError::InvalidUnicodeEscape { input: text.to_owned() })?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or_else(|| ModelError::InvalidCodePoint { code, input: text.to_owned() })
}

fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|primary| !primary.is_empty() && primary.chars().all(|ch| ch.is_ascii_alphabetic()));
    primary_ok && subtags.all(|subtag| !subtag.is_empty() && subtag.chars().all(|ch| ch.is_ascii_alphanumeric()))
}

fn parse_literal(text: &str, body: &str) -> Result<Node, ModelError> {
    let mut lexical = String::new();
    let mut chars = body.char_indices();
    let suffix = loop {
        let Some((index, ch)) = chars.next() else {
            return Err(ModelError::Unterminated { kind: "literal", input: text.to_owned() });
        };
        match ch {
            '"' => break &body[index + 1..],
            '\\' => {
                let escaped = match chars.next().map(|(_, escape)| escape) {
                    Some('t') => '\t',
                    Some('b') => '\u{8}',
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('f') => '\u{c}',
                    Some('"') => '"',
                    Some('\'') => '\'',
                    Some('\\') => '\\',
                    Some('u') => read_uchar(&mut chars, 4, text)?,
                    Some('U') => read_uchar(&mut chars, 8, text)?,
                    Some(escape) => return Err(ModelError::InvalidEscape { escape, input: text.to_owned() }),
                    None => return Err(ModelError::Unterminated { kind: "literal", input: text.to_owned() }),
                };
                lexical.push(escaped);
            }
            other => lexical.push(other),
        }
    };

    if suffix.is_empty() {
        return Ok(Node::literal(lexical));
    }
    if let Some(language) = suffix.strip_prefix('@') {
        if !is_language_tag(language) {
            return Err(ModelError::InvalidLanguage { tag: language.to_owned() });
        }
        return Ok(Node::lang_literal(lexical, language));
    }
    if let Some(datatype) = suffix.strip_prefix("^^<").and_then(|rest| rest.strip_suffix('>')) {
        return Ok(Node::typed_literal(lexical, parse_iri(datatype, text)?));
    }
    Err(ModelError::LiteralSuffix { suffix: suffix.to_owned() })
}

impl TryFrom<String> for Node {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<http://example.org/a>", Node::iri("http://example.org/a"))]
    #[case("_:b0", Node::blank("b0"))]
    #[case("\"plain\"", Node::literal("plain"))]
    #[case("\"caf\u{e9}\"", Node::literal("caf\u{e9}"))]
    #[case("\"a\\tb\\bc\\fd\"", Node::literal("a\tb\u{8}c\u{c}d"))]
    #[case("\"chat\"@fr", Node::lang_literal("chat", "fr"))]
    #[case("\"color\"@en-US", Node::lang_literal("color", "en-US"))]
    #[case(
        "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        Node::typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer")
    )]
    fn parses_and_prints_ntriples_form(#[case] text: &str, #[case] expected: Node) {
        let node: Node = text.parse().unwrap();
        assert_eq!(node, expected);
        assert_eq!(node.to_string(), text);
    }

    #[rstest]
    #[case("\"caf\\u00E9\"", Node::literal("caf\u{e9}"))]
    #[case("\"\\U0001F600\"", Node::literal("\u{1F600}"))]
    #[case("\"it\\'s\"", Node::literal("it's"))]
    #[case("\"\\u0041\\u0042\"@en", Node::lang_literal("AB", "en"))]
    #[case("<http://ex/caf\\u00E9>", Node::iri("http://ex/caf\u{e9}"))]
    #[case("\"1\"^^<http://ex/\\u0074ype>", Node::typed_literal("1", "http://ex/type"))]
    fn decodes_escapes(#[case] text: &str, #[case] expected: Node) {
        assert_eq!(text.parse::<Node>().unwrap(), expected);
    }

    #[rstest]
    fn literal_escapes_survive_display() {
        let node = Node::literal("say \"hi\"\n");
        assert_eq!(node.to_string(), r#""say \"hi\"\n""#);
        assert_eq!(node.to_string().parse::<Node>().unwrap(), node);
    }

    #[rstest]
    #[case("", ModelError::Empty)]
    #[case("_:", ModelError::EmptyBlankLabel)]
    #[case("_:b 0", ModelError::InvalidBlankLabel { label: "b 0".into() })]
    #[case("<http://a", ModelError::Unterminated { kind: "iri", input: "<http://a".into() })]
    #[case("<http://a b>", ModelError::InvalidIriChar { ch: ' ', input: "<http://a b>".into() })]
    #[case("<a\"b>", ModelError::InvalidIriChar { ch: '"', input: "<a\"b>".into() })]
    #[case("<a>b>", ModelError::InvalidIriChar { ch: '>', input: "<a>b>".into() })]
    #[case("\"open", ModelError::Unterminated { kind: "literal", input: "\"open".into() })]
    #[case("\"x\"junk", ModelError::LiteralSuffix { suffix: "junk".into() })]
    #[case("\"x\"@", ModelError::InvalidLanguage { tag: String::new() })]
    #[case("\"x\"@en us", ModelError::InvalidLanguage { tag: "en us".into() })]
    #[case("\"\\q\"", ModelError::InvalidEscape { escape: 'q', input: "\"\\q\"".into() })]
    #[case("\"\\u00G9\"", ModelError::InvalidUnicodeEscape { input: "\"\\u00G9\"".into() })]
    #[case("\"\\u00\"", ModelError::InvalidUnicodeEscape { input: "\"\\u00\"".into() })]
    #[case("\"\\uD800\"", ModelError::InvalidCodePoint { code: 0xD800, input: "\"\\uD800\"".into() })]
    #[case("\"\\UFFFFFFFF\"", ModelError::InvalidCodePoint { code: 0xFFFF_FFFF, input: "\"\\UFFFFFFFF\"".into() })]
    #[case("plain", ModelError::UnknownSyntax("plain".into()))]
    fn rejects_malformed_nodes(#[case] text: &str, #[case] expected: ModelError) {
        assert_eq!(text.parse::<Node>().unwrap_err(), expected);
    }

    #[rstest]
    #[case(Node::literal("v"), None, None)]
    #[case(Node::lang_literal("v", "de"), Some("de"), None)]
    #[case(Node::typed_literal("v", "http://ex/dt"), None, Some("http://ex/dt"))]
    fn literal_carries_at_most_one_annotation(
        #[case] node: Node,
        #[case] language: Option<&str>,
        #[case] datatype: Option<&str>,
    ) {
        let literal = node.as_literal().unwrap();
        assert_eq!(literal.lexical(), "v");
        assert_eq!(literal.language(), language);
        assert_eq!(literal.datatype(), datatype);
        assert_eq!(node.to_string().parse::<Node>().unwrap(), node);
    }

    #[rstest]
    fn clones_share_payload() {
        let node = Node::iri("http://example.org/shared");
        let copy = node.clone();
        match (&node, &copy) {
            (Node::Iri(a), Node::Iri(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }
}
