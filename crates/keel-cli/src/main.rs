use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

#[derive(Parser)]
#[command(
    name = "keel",
    about = "Resolve deployment plans for the chat app infrastructure",
    version,
    propagate_version = true
)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a parameters file into a full deployment plan
    Plan {
        /// Parameters file (flat or ARM shape); `-` reads stdin
        #[arg(short, long)]
        params: String,
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Print only the named outputs of a plan, as JSON
    Outputs {
        #[arg(short, long)]
        params: String,
    },
    /// Show the canonical names for every component
    Names {
        #[arg(long)]
        app: String,
        #[arg(long)]
        env: String,
        #[arg(long)]
        region: String,
    },
    /// List supported regions and their short codes
    Regions,
    /// Walk a plan's stages with a provisioner that touches nothing
    Simulate {
        #[arg(short, long)]
        params: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Plan { params, format } => commands::plan(&params, format),
        Commands::Outputs { params } => commands::outputs(&params),
        Commands::Names { app, env, region } => commands::names(&app, &env, &region),
        Commands::Regions => commands::regions(),
        Commands::Simulate { params } => commands::simulate(&params).await,
    }
}

/// Logs go to stderr so plan JSON on stdout stays pipeable.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
