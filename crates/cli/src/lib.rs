//! Command-line front end that streams RDF nodes and statements through
//! `rdfcursor` cursors and prints them.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

mod commands;
mod util;

use commands::nodes::NodesArgs;
use commands::statements::StatementsArgs;
pub use util::CliResult;

#[derive(Parser, Debug)]
#[command(name = "rdfcursor", version, about = "Stream RDF nodes and statements through lazy cursors")]
struct Cli {
    /// Log cursor activity to stderr (`RUST_LOG` still takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a list of nodes into statements built from a template.
    Nodes(NodesArgs),
    /// Stream a list of statements, optionally filtered.
    Statements(StatementsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match &cli.command {
        Command::Nodes(args) => commands::nodes::run(args)?,
        Command::Statements(args) => commands::statements::run(args)?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.is_empty() && !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(io::stderr).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rdfcursor_model::Node;
    use rstest::rstest;

    #[rstest]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn parses_statement_filters() {
        let cli = Cli::try_parse_from([
            "rdfcursor",
            "statements",
            "data.json",
            "--subject",
            "<http://ex/a>",
            "--format",
            "json",
            "-v",
        ])
        .expect("parse");

        assert!(cli.verbose);
        let Command::Statements(args) = cli.command else { panic!("expected statements command") };
        assert_eq!(args.subject, Some(Node::iri("http://ex/a")));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[rstest]
    fn rejects_malformed_node_argument() {
        let result = Cli::try_parse_from(["rdfcursor", "nodes", "nodes.json", "--object", "oops"]);
        assert!(result.is_err());
    }
}
