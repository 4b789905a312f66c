use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brightwave_core::AppConfig;

mod commands;

use commands::preview::PreviewKind;

#[derive(Parser)]
#[command(name = "brightwave")]
#[command(author, version, about = "The Brightwave agency site, in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the site
    Run {
        /// Page to open first
        #[arg(short, long, default_value = "/")]
        path: String,
    },
    /// Send a contact enquiry without the interactive form
    Submit {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        company: String,
        /// One of the agency's services
        #[arg(long)]
        service: String,
        #[arg(long)]
        budget: String,
    },
    /// Show which page a path resolves to
    Route {
        path: String,
    },
    /// Sample a motion component headlessly and print its frames
    Preview {
        #[arg(value_enum)]
        kind: PreviewKind,
        /// Number of frames to print
        #[arg(short, long, default_value_t = 8)]
        frames: u32,
        /// Terminal width to simulate
        #[arg(short, long, default_value_t = 80)]
        width: u16,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The interactive terminal owns stdout, so its logs go to a file
    let interactive = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_tracing(&config, interactive)?;

    match cli.command {
        Some(Commands::Run { path }) => commands::run::run(config, &path).await,
        None => commands::run::run(config, "/").await,
        Some(Commands::Submit {
            first_name,
            last_name,
            email,
            phone,
            company,
            service,
            budget,
        }) => {
            let fields = commands::submit::SubmitFields {
                first_name,
                last_name,
                email,
                phone,
                company,
                service,
                budget,
            };
            commands::submit::run(&config, fields).await
        }
        Some(Commands::Route { path }) => commands::route::run(&path),
        Some(Commands::Preview { kind, frames, width }) => {
            commands::preview::run(&config, kind, frames, width)
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
            ConfigAction::Path => commands::config::path(),
        },
    }
}

fn init_tracing(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
