use anyhow::Context;
use rdfcursor_core::{PullCursor, Source};
use rdfcursor_model::{Node, Statement};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

pub type CliResult<T> = anyhow::Result<T>;

/// Reads a JSON document from `path`, or from standard input when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("failed to read standard input")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// A statement and the graph it was found in.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EntrySummary {
    pub statement: Statement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Node>,
}

/// Renders the rest of `stream` in the debug line format and exhausts it.
pub fn render_text<S>(stream: &mut PullCursor<S>) -> CliResult<String>
where
    S: Source<Item = Statement, Context = Node>,
{
    let mut buffer = Vec::new();
    stream.write_remaining(&mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn render_json<S>(stream: &mut PullCursor<S>) -> CliResult<String>
where
    S: Source<Item = Statement, Context = Node>,
{
    let mut entries = Vec::new();
    while !stream.is_end() {
        if let Some((statement, context)) = stream.entry() {
            entries.push(EntrySummary { statement: statement.clone(), context: context.cloned() });
        }
        stream.advance();
    }
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Partial statement built from optional command-line parts; `None` when no
/// part is given.
pub fn pattern(subject: Option<&Node>, predicate: Option<&Node>, object: Option<&Node>) -> Option<Statement> {
    let partial =
        Statement { subject: subject.cloned(), predicate: predicate.cloned(), object: object.cloned() };
    (partial != Statement::default()).then_some(partial)
}
