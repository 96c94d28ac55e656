//! Command-line interface for the graph builder.

use std::path::PathBuf;

use aiact_harvester::config::{format_node_link, DEFAULT_BASE_URL};
use aiact_harvester::types::CanonicalId;
use aiact_harvester::{CorpusSource, HarvestConfig, Harvester};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::ProgressBar;

use crate::config::GraphConfig;
use crate::error::Result;
use crate::graph::ReferenceGraph;
use crate::pipeline::{GraphOrigin, OfflineSource, Pipeline, PipelineOutcome};

/// AI Act Graph - Build the article/recital reference graph of the EU AI Act.
#[derive(Parser)]
#[command(name = "aiact-graph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory with the input table and artifacts [env: AIACT_DATA_DIR, default: data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the site, used for fetching and node links
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Never download; fail if the input table is missing
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph and write the processed table and graph artifact.
    Build {
        #[command(flatten)]
        data: DataArgs,

        /// Rebuild even if a saved graph exists
        #[arg(short, long)]
        force: bool,
    },

    /// List all nodes in alphanumeric order.
    Nodes {
        #[command(flatten)]
        data: DataArgs,
    },

    /// List the items a node refers to.
    Neighbours {
        /// Canonical node ID (e.g., A5, R12)
        id: String,

        #[command(flatten)]
        data: DataArgs,

        /// List the items referring to the node instead
        #[arg(long)]
        incoming: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data, force } => build_command(&data, force),
        Commands::Nodes { data } => nodes_command(&data),
        Commands::Neighbours { id, data, incoming } => neighbours_command(&id, &data, incoming),
    }
}

fn graph_config(data: &DataArgs) -> Result<GraphConfig> {
    let config = match &data.data_dir {
        Some(dir) => GraphConfig::new(dir),
        None => GraphConfig::from_env()?,
    };
    Ok(config.with_base_url(data.base_url.as_str()))
}

/// Run the pipeline with the source the arguments ask for.
fn run_pipeline(config: &GraphConfig, offline: bool, force: bool) -> Result<PipelineOutcome> {
    let harvester;
    let source: &dyn CorpusSource = if offline {
        &OfflineSource
    } else {
        harvester = Harvester::new(HarvestConfig::default().with_base_url(config.base_url.as_str()))?;
        &harvester
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Building graph...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let outcome = Pipeline::new(config.clone(), source).load_or_build(force);
    spinner.finish_and_clear();
    outcome
}

/// Execute the build command.
fn build_command(data: &DataArgs, force: bool) -> Result<()> {
    let config = graph_config(data)?;
    let outcome = run_pipeline(&config, data.offline, force)?;

    match outcome.origin {
        GraphOrigin::Cache => println!(
            "{} saved graph (use --force to rebuild)",
            style("Using").bold()
        ),
        GraphOrigin::Built { fetched_corpus } => {
            if fetched_corpus {
                println!(
                    "{} {}",
                    style("Fetched corpus to:").green().bold(),
                    config.input_table_path().display()
                );
            }
            println!("  Rows: {}", outcome.rows.len());
            println!(
                "{} {}",
                style("Saved table:").green().bold(),
                config.processed_table_path().display()
            );
        }
    }

    print_summary(&outcome.graph);
    println!(
        "{} {}",
        style("Graph:").green().bold(),
        config.graph_path().display()
    );
    Ok(())
}

fn print_summary(graph: &ReferenceGraph) {
    let placeholders = graph
        .nodes_sorted()
        .iter()
        .filter(|node| !node.fetched)
        .count();
    println!("  Nodes: {}", style(graph.node_count()).cyan());
    println!("  Edges: {}", style(graph.edge_count()).cyan());
    println!("  References: {}", graph.reference_count());
    if placeholders > 0 {
        println!("  Unfetched targets: {}", style(placeholders).yellow());
    }
}

/// Execute the nodes command.
fn nodes_command(data: &DataArgs) -> Result<()> {
    let config = graph_config(data)?;
    let outcome = run_pipeline(&config, data.offline, false)?;
    for node in outcome.graph.nodes_sorted() {
        let label = format_node_link(&node.id, &config.base_url);
        match &node.title {
            Some(title) => println!("{label}  {}", style(title).dim()),
            None => println!("{label}"),
        }
    }
    Ok(())
}

/// Execute the neighbours command.
fn neighbours_command(raw_id: &str, data: &DataArgs, incoming: bool) -> Result<()> {
    let id: CanonicalId = raw_id.trim().parse()?;
    let config = graph_config(data)?;
    let outcome = run_pipeline(&config, data.offline, false)?;

    let ids = if incoming {
        outcome.graph.predecessors(&id)?
    } else {
        outcome.graph.neighbours(&id)?
    };
    if ids.is_empty() {
        println!("{}", style(format!("{id} has no references")).dim());
    }
    for neighbour in ids {
        println!("{}", format_node_link(&neighbour, &config.base_url));
    }
    Ok(())
}
