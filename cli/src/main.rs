//! Command-line front end for the economic agent core
//!
//! Loads banks and households from parameter files, applies transaction
//! files, then prints each agent's rendered state and balance-sheet check.

use anyhow::Context;
use clap::{Parser, Subcommand};
use econ_agent_core::{
    AgentCore, AgentKind, AgentRegistry, EconomicAgent, Parameters, RegistrySnapshot,
    StateVariables,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "econ-agent", version, about = "Inspect economic agents and their ledgers")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load agents and transactions, then print every agent
    Render {
        #[command(flatten)]
        agents: AgentFiles,
    },

    /// Load agents and transactions, then check each balance sheet
    Check {
        #[command(flatten)]
        agents: AgentFiles,

        /// Asset transaction types (defaults to the agent kind's balance sheet)
        #[arg(long, value_delimiter = ',')]
        assets: Vec<String>,

        /// Liability transaction types (defaults to the agent kind's balance sheet)
        #[arg(long, value_delimiter = ',')]
        liabilities: Vec<String>,
    },

    /// Load agents and transactions, then write a JSON checkpoint
    Snapshot {
        #[command(flatten)]
        agents: AgentFiles,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct AgentFiles {
    /// Bank parameter file (repeatable)
    #[arg(long = "bank")]
    banks: Vec<PathBuf>,

    /// Household parameter file (repeatable)
    #[arg(long = "household")]
    households: Vec<PathBuf>,

    /// Transaction file (repeatable)
    #[arg(short, long = "transactions")]
    transactions: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Render { agents } => {
            let registry = load_registry(&agents)?;
            for agent in registry.agents() {
                print!("{}", agent.render());
            }
        }

        Commands::Check {
            agents,
            assets,
            liabilities,
        } => {
            let registry = load_registry(&agents)?;
            let mut all_consistent = true;
            for agent in registry.agents() {
                let (default_assets, default_liabilities) = agent.kind().balance_sheet();
                let assets = type_list(&assets, default_assets);
                let liabilities = type_list(&liabilities, default_liabilities);

                let consistent = agent.check_consistency(&assets, &liabilities);
                all_consistent &= consistent;
                println!(
                    "{} ({}): assets={} liabilities={} consistent={}",
                    agent.identifier(),
                    agent.kind(),
                    assets.iter().map(|t| agent.get_account(t)).sum::<f64>(),
                    liabilities.iter().map(|t| agent.get_account(t)).sum::<f64>(),
                    consistent
                );
            }
            if !all_consistent {
                anyhow::bail!("inconsistent balance sheets found");
            }
        }

        Commands::Snapshot { agents, output } => {
            let registry = load_registry(&agents)?;
            let json = RegistrySnapshot::capture(&registry)?.to_json()?;
            std::fs::write(&output, json)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(path = %output.display(), agents = registry.num_agents(), "snapshot written");
        }
    }

    Ok(())
}

fn load_registry(files: &AgentFiles) -> anyhow::Result<AgentRegistry> {
    let mut registry = AgentRegistry::new();

    let kinds = files
        .banks
        .iter()
        .map(|path| (AgentKind::Bank, path))
        .chain(files.households.iter().map(|path| (AgentKind::Household, path)));

    for (kind, path) in kinds {
        let agent = load_agent(kind, path, &registry)?;
        registry.register(agent)?;
    }

    for path in &files.transactions {
        let outcome = registry.load_transactions_from_file(path)?;
        tracing::info!(path = %path.display(), entries = outcome.entries, "transactions loaded");
    }

    Ok(registry)
}

fn load_agent(
    kind: AgentKind,
    path: &Path,
    registry: &AgentRegistry,
) -> anyhow::Result<Box<dyn EconomicAgent>> {
    // Replaced by the identifier in the file
    let core = AgentCore::new(kind.to_string(), Parameters::new(), StateVariables::new())?;
    let mut agent = kind.into_agent(core);
    let outcome = agent.load_parameters_from_file(path, registry)?;
    tracing::info!(
        agent = %agent.identifier(),
        kind = %kind,
        parameters = outcome.entries,
        "agent loaded"
    );
    Ok(agent)
}

fn type_list<'a>(requested: &'a [String], default: &'static [&'static str]) -> Vec<&'a str> {
    if requested.is_empty() {
        default.to_vec()
    } else {
        requested.iter().map(String::as_str).collect()
    }
}
