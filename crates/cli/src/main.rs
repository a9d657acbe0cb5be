use std::path::PathBuf;

use anyhow::{Context, Result};
use chore_core::recipe_manager::{RecipeManager, RecipeManagerConfig};
use chore_core::ChoreError;
use clap::{Parser, Subcommand};
use colored::*;

mod commands;

/// Chore - run named toolchain recipes in dependency order
#[derive(Parser)]
#[command(name = "chore")]
#[command(about = "Run named shell recipes in dependency order")]
#[command(version)]
struct Cli {
    /// Directory to look for the recipe file in (defaults to current directory)
    #[arg(short = 'C', long, default_value = ".")]
    directory: PathBuf,

    /// Recipe file, relative to the directory (defaults to chore.yml)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes in the recipe file
    List,
    /// Show the execution order for recipes without running them
    Plan {
        /// Recipes to plan (defaults to the default recipe)
        recipes: Vec<String>,
    },
    /// Run recipes and their prerequisites
    Run {
        /// Print command lines without running them
        #[arg(long)]
        dry_run: bool,
        /// Recipes to run (defaults to the default recipe)
        recipes: Vec<String>,
    },
    /// Show the recipe prerequisite graph
    Graph,
    /// Resolve and print every variable
    Evaluate,
    /// Print the JSON schema of the recipe file
    Schema,
    /// Write the bundled toolchain recipes to the recipe file
    Init {
        /// Overwrite an existing recipe file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = dispatch(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        let code = err
            .downcast_ref::<ChoreError>()
            .map(ChoreError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = RecipeManagerConfig {
        working_root: cli.directory,
        recipe_file: cli.file,
    };

    // Commands that do not need a valid recipe file
    match cli.command {
        Commands::Schema => return commands::schema::execute(),
        Commands::Init { force } => return commands::init::execute(&config, force),
        _ => {}
    }

    let manager = RecipeManager::new(config).context("Failed to load recipes")?;

    match cli.command {
        Commands::List => commands::list::execute(&manager),
        Commands::Plan { recipes } => commands::plan::execute(&manager, &recipes),
        Commands::Run { dry_run, recipes } => {
            commands::run::execute(&manager, &recipes, dry_run).await
        }
        Commands::Graph => commands::graph::execute(&manager),
        Commands::Evaluate => commands::evaluate::execute(&manager).await,
        Commands::Schema | Commands::Init { .. } => Ok(()),
    }
}
