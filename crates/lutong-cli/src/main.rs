use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lutong_application::LutongServices;
use lutong_infrastructure::config_service;

mod commands;

#[derive(Parser)]
#[command(name = "lutong")]
#[command(about = "Lutong BahAI - inspect and maintain the local recipe store", long_about = None)]
struct Cli {
    /// Store directory (overrides config and LUTONG_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or register the device profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse and delete chat sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Browse, search and delete saved recipes
    Recipes {
        #[command(subcommand)]
        action: RecipesAction,
    },
    /// Legacy flat chat log
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Store maintenance
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Register (or replace) the profile name
    Set { name: String },
}

#[derive(Subcommand)]
enum SessionsAction {
    List,
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum RecipesAction {
    /// List recipes, optionally filtered by title, description or ingredient
    List { query: Option<String> },
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    Show,
    Clear,
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create or upgrade the store and print its schema version
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config_service::load_config()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let services = LutongServices::open(config).await?;

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&services).await?,
            ProfileAction::Set { name } => commands::profile::set(&services, &name).await?,
        },
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::sessions::list(&services).await?,
            SessionsAction::Show { id } => commands::sessions::show(&services, &id).await?,
            SessionsAction::Delete { id } => commands::sessions::delete(&services, &id).await?,
        },
        Commands::Recipes { action } => match action {
            RecipesAction::List { query } => {
                commands::recipes::list(&services, query.as_deref()).await?
            }
            RecipesAction::Show { id } => commands::recipes::show(&services, &id).await?,
            RecipesAction::Delete { id } => commands::recipes::delete(&services, &id).await?,
        },
        Commands::History { action } => match action {
            HistoryAction::Show => commands::history::show(&services).await?,
            HistoryAction::Clear => commands::history::clear(&services).await?,
        },
        Commands::Store { action } => match action {
            StoreAction::Init => commands::store::init(&services).await?,
        },
    }

    Ok(())
}
