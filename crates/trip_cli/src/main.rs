//! Command-line front end for the trip planner.
//! Wires configuration, the HTTP gateway and the planner components together.

mod commands;

use clap::Parser;
use trip_planner::{GatewayConfig, TripPlanner, TripPlannerError};

use commands::Command;

/// Plan trips across campsites
#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Manage trips, campsites and bookings", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the trip server (overrides TRIP_PLANNER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides TRIP_PLANNER_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn gateway_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = GatewayConfig::from_env()?;

        if let Some(ref url) = self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(ref token) = self.token {
            config = config.with_bearer_token(token.clone());
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("❌ {:#}", e);
        match e.downcast_ref::<TripPlannerError>() {
            Some(remote) => eprintln!("{}", remote.user_message()),
            None => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.gateway_config()?;
    log::debug!("🌐 Using trip server at {}", config.base_url);

    let planner = TripPlanner::connect(config)?;
    cli.command.execute(&planner).await
}
