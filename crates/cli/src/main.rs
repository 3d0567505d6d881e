//! Promptforge CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize the config directory
//! - `serve`    — Start the HTTP gateway (stream relay + catalog API)
//! - `generate` — Run the generation loop for a topic and goal
//! - `refine`   — Refine a previously generated prompt
//! - `models`   — List model ids offered by the provider
//! - `doctor`   — Diagnose configuration and connectivity

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "promptforge",
    about = "Promptforge — AI prompt generation engine",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the configuration directory
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate prompts for a topic and goal
    Generate(GenerateArgs),

    /// Refine a previously generated prompt
    Refine(RefineArgs),

    /// List model ids offered by the provider
    Models {
        /// Query a running gateway instead of the provider API
        #[arg(long)]
        relay_url: Option<String>,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[derive(Args)]
struct GenerateArgs {
    /// The subject the prompts should cover
    #[arg(short, long)]
    topic: String,

    /// What the generated prompts should accomplish
    #[arg(short, long)]
    goal: String,

    /// Restrict generation to these personas (repeatable)
    #[arg(short = 'P', long = "persona")]
    personas: Vec<String>,

    /// Model id driving the loop (falls back to the configured default)
    #[arg(short, long)]
    model: Option<String>,

    /// Route completions through a running gateway instead of the provider
    #[arg(long)]
    relay_url: Option<String>,
}

#[derive(Args)]
struct RefineArgs {
    /// Title of the record being refined
    #[arg(long)]
    title: String,

    /// Persona the record was generated with
    #[arg(long)]
    persona: String,

    /// The prompt text to refine
    #[arg(long)]
    prompt: String,

    /// Extra instruction steering the refinement
    #[arg(short, long)]
    instruction: Option<String>,

    /// Model id (falls back to the configured default)
    #[arg(short, long)]
    model: Option<String>,

    /// Route completions through a running gateway instead of the provider
    #[arg(long)]
    relay_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate(args) => commands::generate::run(args).await?,
        Commands::Refine(args) => commands::refine::run(args).await?,
        Commands::Models { relay_url } => commands::models::run(relay_url).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
