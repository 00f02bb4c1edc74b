use crate::OutputFormat;
use crate::util::{CliResult, pattern, read_json, render_json, render_text};
use clap::{Args, ValueEnum};
use rdfcursor_core::{PullCursor, StatementPart, VecSource, stream_from_node_iterator};
use rdfcursor_model::{Node, Statement, find_map};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct NodesArgs {
    /// JSON array of nodes (`"<iri>"`) or `{"node": ..., "context": ...}` objects; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// Statement part the nodes are written into.
    #[arg(long = "part", value_enum, default_value_t = PartArg::Object)]
    pub part: PartArg,
    #[arg(long = "subject", value_name = "NODE")]
    pub subject: Option<Node>,
    #[arg(long = "predicate", value_name = "NODE")]
    pub predicate: Option<Node>,
    #[arg(long = "object", value_name = "NODE")]
    pub object: Option<Node>,
    /// Keep only statements whose object equals this node.
    #[arg(long = "match-object", value_name = "NODE")]
    pub match_object: Option<Node>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartArg {
    Subject,
    Predicate,
    Object,
    All,
}

impl From<PartArg> for StatementPart {
    fn from(part: PartArg) -> Self {
        match part {
            PartArg::Subject => StatementPart::Subject,
            PartArg::Predicate => StatementPart::Predicate,
            PartArg::Object => StatementPart::Object,
            PartArg::All => StatementPart::All,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(crate) enum NodeRow {
    Bare(Node),
    WithContext {
        node: Node,
        #[serde(default)]
        context: Option<Node>,
    },
}

impl NodeRow {
    fn into_entry(self) -> (Node, Option<Node>) {
        match self {
            NodeRow::Bare(node) => (node, None),
            NodeRow::WithContext { node, context } => (node, context),
        }
    }
}

pub fn run(args: &NodesArgs) -> CliResult<String> {
    let rows: Vec<NodeRow> = read_json(&args.input)?;
    info!(nodes = rows.len(), part = %StatementPart::from(args.part), "expanding nodes into statements");

    let template = Statement {
        subject: args.subject.clone(),
        predicate: args.predicate.clone(),
        object: args.object.clone(),
    };
    let nodes = PullCursor::new(VecSource::with_contexts(rows.into_iter().map(NodeRow::into_entry)));
    let mut stream = stream_from_node_iterator(nodes, &template, args.part.into());

    let filter = pattern(None, None, args.match_object.as_ref());
    if filter.is_some() {
        stream.add_map(find_map(filter))?;
    }

    match args.format {
        OutputFormat::Text => render_text(&mut stream),
        OutputFormat::Json => render_json(&mut stream),
    }
}
