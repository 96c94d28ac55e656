//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{HarvestConfig, ARTICLE_COUNT, DEFAULT_BASE_URL, DEFAULT_INPUT_TABLE, RECITAL_COUNT};
use crate::error::Result;
use crate::harvester::Harvester;
use crate::table::write_items;
use crate::types::ItemType;

/// AI Act Harvester - Download EU AI Act articles and recitals.
#[derive(Parser)]
#[command(name = "aiact-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download all articles and recitals into the input table.
    Fetch {
        /// Output CSV file
        #[arg(short, long, default_value = DEFAULT_INPUT_TABLE)]
        output: PathBuf,

        /// Base URL of the site to harvest
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Fetch articles 1..=N
        #[arg(long, default_value_t = ARTICLE_COUNT)]
        articles: u32,

        /// Fetch recitals 1..=N
        #[arg(long, default_value_t = RECITAL_COUNT)]
        recitals: u32,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            output,
            base_url,
            articles,
            recitals,
        } => {
            let config = HarvestConfig::default()
                .with_base_url(base_url)
                .with_articles(1..=articles)
                .with_recitals(1..=recitals);
            fetch_command(config, &output)
        }
    }
}

/// Execute the fetch command.
fn fetch_command(config: HarvestConfig, output: &Path) -> Result<()> {
    let harvester = Harvester::new(config)?;
    let total = harvester.config().page_count() as u64;

    println!(
        "{} {} pages from {}",
        style("Downloading").bold(),
        style(total).cyan(),
        style(&harvester.config().base_url).green()
    );
    println!();

    let pb = ProgressBar::new(total);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let corpus = harvester.harvest_with_progress(|item_type: ItemType, number| {
        pb.set_message(format!("{item_type} {number}"));
        pb.inc(1);
    });
    pb.finish_and_clear();
    let corpus = corpus?;

    println!("  Articles: {}", corpus.count(ItemType::Article));
    println!("  Recitals: {}", corpus.count(ItemType::Recital));
    if !corpus.warnings.is_empty() {
        println!("  Skipped: {}", style(corpus.warnings.len()).yellow().bold());
        for warning in &corpus.warnings {
            println!("    {}", style(warning).dim());
        }
    }

    write_items(output, &corpus.items)?;

    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fetch_defaults() {
        let cli = Cli::parse_from(["aiact-harvester", "fetch"]);

        let Commands::Fetch {
            output,
            base_url,
            articles,
            recitals,
        } = cli.command;
        assert_eq!(output, PathBuf::from("data/articles_and_recitals.csv"));
        assert_eq!(base_url, "https://artificialintelligenceact.eu");
        assert_eq!(articles, 113);
        assert_eq!(recitals, 180);
    }

    #[test]
    fn test_cli_parse_fetch_with_limits() {
        let cli = Cli::parse_from([
            "aiact-harvester",
            "fetch",
            "--output",
            "/tmp/items.csv",
            "--articles",
            "3",
            "--recitals",
            "0",
        ]);

        let Commands::Fetch {
            output,
            articles,
            recitals,
            ..
        } = cli.command;
        assert_eq!(output, PathBuf::from("/tmp/items.csv"));
        assert_eq!(articles, 3);
        assert_eq!(recitals, 0);
    }
}
