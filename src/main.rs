//! ChargeSlot booking service
//!
//! ```sh
//! # Default config (~/.config/chargeslot/config.toml)
//! chargeslot
//!
//! # Custom config and port
//! chargeslot --config /etc/chargeslot/config.toml --port 9000
//!
//! # Validate config without starting
//! chargeslot --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use chargeslot::config::{default_config_path, AppConfig};
use chargeslot::server::{init_tracing, ServerHandle, ServerOptions};

/// Charger slot reservation service.
#[derive(Parser, Debug)]
#[command(
    name = "chargeslot",
    version,
    about = "Overlap-safe charger slot booking service",
    long_about = "REST API for booking charger time slots with a storage-level \
                  no-overlap guarantee, booking/payment lifecycle and owner revenue.\n\n\
                  Default config: ~/.config/chargeslot/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CHARGESLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.check {
        return match loaded {
            Ok(_) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.server.address());
                println!("   Database    : {}", config.database.url);
                println!(
                    "   Slots       : {}-{} every {} min, {} days ahead",
                    config.booking.opening_time,
                    config.booking.closing_time,
                    config.booking.slot_minutes,
                    config.booking.admission_days
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.wait().await;
    Ok(())
}
