use thiserror::Error;

/// Errors raised while reading nodes from their N-Triples form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("empty node")]
    Empty,
    #[error("unterminated {kind} in `{input}`")]
    Unterminated { kind: &'static str, input: String },
    #[error("blank node without label")]
    EmptyBlankLabel,
    #[error("blank node label `{label}` contains whitespace or delimiters")]
    InvalidBlankLabel { label: String },
    #[error("character {ch:?} not allowed in iri `{input}`")]
    InvalidIriChar { ch: char, input: String },
    #[error("invalid escape `\\{escape}` in `{input}`")]
    InvalidEscape { escape: char, input: String },
    #[error("malformed unicode escape in `{input}`")]
    InvalidUnicodeEscape { input: String },
    #[error("escape U+{code:X} is not a unicode scalar value in `{input}`")]
    InvalidCodePoint { code: u32, input: String },
    #[error("invalid language tag `{tag}`")]
    InvalidLanguage { tag: String },
    #[error("unexpected suffix `{suffix}` after literal")]
    LiteralSuffix { suffix: String },
    #[error("not a node: `{0}` (expected <iri>, _:label or \"literal\")")]
    UnknownSyntax(String),
}
