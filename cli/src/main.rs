use anyhow::Result;
use api_client::{ContentApi, HttpContentApi};
use clap::{Parser, Subcommand};
use colored::*;
use fields::Language;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod utils;

use commands::{config, health, list, search, show, Context, Outcome};
use utils::{env_paths::EnvPaths, logging, portal_config::PortalConfig};

/// Amn CLI - Browse and search the Amn cybersecurity awareness portal
#[derive(Parser)]
#[command(name = "amn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Display language (ar, en)
    #[arg(short, long, global = true)]
    lang: Option<Language>,

    /// Configuration file (defaults to ./config/amn.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write daily log files to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long, global = true, default_value = "text", value_parser = ["text", "json", "yaml"])]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every content type
    Search {
        /// Search terms
        query: String,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Results per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Only show results of this type (e.g. News, StandardControl)
        #[arg(short = 't', long = "type")]
        entity_type: Option<String>,
    },

    /// List a domain's top level, or the children of a path
    List {
        /// Domain id (e.g. standards, procedures)
        domain: String,

        /// Slugs from the domain root down to the parent
        slugs: Vec<String>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Only list items matching this text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show the page at a path
    Show {
        /// Domain id (e.g. standards, procedures)
        domain: String,

        /// Slugs from the domain root down to the page
        #[arg(required = true)]
        slugs: Vec<String>,
    },

    /// Check configuration and backend health
    Health,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    List,

    /// Print one configuration value (e.g. "api.base_url")
    Get {
        /// Dotted path into the configuration
        section: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = EnvPaths::load(cli.config.clone(), cli.log_dir.clone())?;
    let guard = match logging::init_logging(cli.verbose, paths.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let outcome = run(cli, &paths).await;
    drop(guard);

    match outcome {
        Ok(Outcome::Done) => Ok(()),
        Ok(Outcome::NotFound) => std::process::exit(2),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, paths: &EnvPaths) -> Result<Outcome> {
    let mut portal = PortalConfig::load(&paths.config_path, paths.config_explicit)?;
    portal.apply_overrides(|key| env::var(key).ok())?;
    if let Some(language) = cli.lang {
        portal.language = language;
    }
    portal.validate()?;

    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::List => config::list(&portal, &cli.format)?,
            ConfigAction::Get { section } => config::get(&portal, section, &cli.format)?,
        }
        return Ok(Outcome::Done);
    }

    let api: Arc<dyn ContentApi> = Arc::new(HttpContentApi::new(portal.api.clone())?);
    let ctx = Context::new(portal, api, cli.format);

    match cli.command {
        Commands::Search {
            query,
            page,
            page_size,
            entity_type,
        } => search::execute(&ctx, &query, page, page_size, entity_type).await,
        Commands::List {
            domain,
            slugs,
            page,
            query,
        } => list::execute(&ctx, &domain, slugs, page, query).await,
        Commands::Show { domain, slugs } => show::execute(&ctx, &domain, slugs).await,
        Commands::Health => health::execute(&ctx).await,
        Commands::Config { .. } => Ok(Outcome::Done),
    }
}
