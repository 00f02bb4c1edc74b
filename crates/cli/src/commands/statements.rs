use crate::OutputFormat;
use crate::util::{CliResult, pattern, read_json, render_json, render_text};
use clap::Args;
use rdfcursor_core::{BoxedSource, VecSource};
use rdfcursor_model::{Node, Statement, StatementStream, find_map};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct StatementsArgs {
    /// JSON array of `{"subject", "predicate", "object", "context"}` objects; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    #[arg(long = "subject", value_name = "NODE")]
    pub subject: Option<Node>,
    #[arg(long = "predicate", value_name = "NODE")]
    pub predicate: Option<Node>,
    #[arg(long = "object", value_name = "NODE")]
    pub object: Option<Node>,
    /// Keep only statements found in this graph.
    #[arg(long = "context", value_name = "NODE")]
    pub context: Option<Node>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct StatementRow {
    #[serde(flatten)]
    statement: Statement,
    #[serde(default)]
    context: Option<Node>,
}

pub fn run(args: &StatementsArgs) -> CliResult<String> {
    let rows: Vec<StatementRow> = read_json(&args.input)?;
    info!(statements = rows.len(), "streaming statements");

    let source: BoxedSource<Statement, Node> =
        Box::new(VecSource::with_contexts(rows.into_iter().map(|row| (row.statement, row.context))));
    let mut stream = StatementStream::new(source);

    if let Some(partial) = pattern(args.subject.as_ref(), args.predicate.as_ref(), args.object.as_ref()) {
        debug!(%partial, "filtering statements");
        stream.add_map(find_map(Some(partial)))?;
    }
    if let Some(graph) = args.context.clone() {
        debug!(%graph, "filtering by context");
        stream.add_map(move |cursor, statement| (cursor.current_context() == Some(&graph)).then_some(statement))?;
    }

    match args.format {
        OutputFormat::Text => render_text(&mut stream),
        OutputFormat::Json => render_json(&mut stream),
    }
}
