mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod generation;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::generate::{self, GenerateCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::project::{Project, ProjectId};
use crate::error::AppResult;
use crate::infra::memory::InMemoryTicketStore;
use crate::infra::openai::OpenAiClient;
use crate::workflow::defaults::{DEFAULT_PRIORITY_NAME, DEFAULT_STATUS_NAME};

#[derive(Parser)]
#[command(
    name = "ticketsmith",
    author,
    version,
    about = "AI-assisted ticket generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate starter tickets for a project from its name and description.
    Generate(GenerateArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Project name used as generation context.
    #[arg(short, long)]
    name: String,
    /// Optional project description.
    #[arg(short, long)]
    description: Option<String>,
    /// Extra free-text instructions for the generator.
    #[arg(short, long)]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> AppResult<()> {
    let config = AppConfig::load()?;
    let client = OpenAiClient::from_config(&config)?;

    // Tickets land in a local store seeded with the default workflow rows;
    // the generated batch is printed once the transaction commits.
    let store = Arc::new(InMemoryTicketStore::new());
    let project = Project {
        id: ProjectId(1),
        name: args.name,
        description: args.description,
    };
    store.insert_status(project.id, DEFAULT_STATUS_NAME)?;
    store.insert_priority(DEFAULT_PRIORITY_NAME)?;

    let context = AppContext::new(Arc::new(client), store.clone(), store.clone());

    let count = generate::run(
        &context,
        GenerateCommandArgs {
            project: project.clone(),
            prompt: args.prompt,
        },
    )
    .await?;

    println!("Created {count} tickets for project \"{}\".", project.name);
    for ticket in store.find_by_project(project.id)? {
        println!("\n[{}] {}", ticket.id.0, ticket.name);
        for line in ticket.description.lines() {
            println!("    {line}");
        }
    }

    Ok(())
}
