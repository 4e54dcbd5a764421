mod send;
mod sites;
mod watch;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pharos")]
#[command(about = "Pharos analytics command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send page-view events through the tracker SDK
    Send {
        /// Path to report
        #[arg(long, default_value = "/")]
        path: String,
        /// Referrer to report (empty means direct traffic)
        #[arg(long, default_value = "")]
        referrer: String,
        /// Number of events to send
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Poll live stats for a site and print each applied snapshot
    Watch {
        /// Site to watch (defaults to PHAROS_SITE_ID, else the first site)
        #[arg(long)]
        site: Option<String>,
        /// Output format: json or text
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// List the sites visible to the configured token
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = pharos_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Send {
            path,
            referrer,
            count,
        }) => send::run_send(&config, &path, &referrer, count).await,
        Some(Commands::Watch { site, format }) => {
            watch::run_watch(&config, site.as_deref(), &format).await
        }
        Some(Commands::Sites) => sites::run_sites(&config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
