//! synthtopod daemon entry point.
//!
//! Loads settings, activates the topology provider against a logging
//! controller and then applies port-state commands read from stdin until
//! stdin closes, `quit` is entered or Ctrl-C is received.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use synthtopo_common::DeviceProvider;
use synthtopod::config::DEFAULT_SETTINGS_PATH;
use synthtopod::{Command, LoggingRegistry, ProviderSettings, TopologyProvider};

/// Synthetic network topology provider
#[derive(Parser, Debug)]
#[command(name = "synthtopod")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML)
    #[arg(short = 'c', long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Topology file, overrides the settings file
    #[arg(short = 't', long)]
    topology: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides the settings file
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Port range size per device, overrides the settings file
    #[arg(short = 'p', long)]
    ports_per_device: Option<u32>,
}

/// Initialize tracing. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn load_settings(args: &Args) -> anyhow::Result<ProviderSettings> {
    let mut settings = ProviderSettings::load_or_default(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;

    if let Some(path) = &args.topology {
        settings.topology.config_path = path.clone();
    }
    if let Some(level) = &args.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(ports) = args.ports_per_device {
        settings.topology.ports_per_device = ports;
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

/// Applies one command line. Returns false when the daemon should stop.
fn handle_line(provider: &TopologyProvider, line: &str) -> bool {
    let command = match Command::parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            warn!("Ignoring command '{}': {}", line.trim(), e);
            return true;
        }
    };

    match command {
        Command::PortState {
            connect_point,
            enable,
        } => {
            match provider.change_port_state(connect_point.device_id(), connect_point.port(), enable)
            {
                Ok(transition) => info!("{} -> link {}", connect_point, transition),
                Err(e) => error!("Port state change for {} failed: {}", connect_point, e),
            }
        }
        Command::ShowLinks => {
            let mut links: Vec<_> = provider.links().into_iter().collect();
            links.sort();
            info!("{} link entries", links.len());
            for (src, dst) in links {
                info!("  {} -> {}", src, dst);
            }
        }
        Command::ShowDownLinks => {
            let mut down: Vec<_> = provider.down_links().into_iter().collect();
            down.sort();
            info!("{} down entries", down.len());
            for (cp, peer) in down {
                info!("  {} (peer {})", cp, peer);
            }
        }
        Command::ShowDevice(device_id) => match provider.device(&device_id) {
            Ok(description) => {
                info!(
                    "{} type={} manufacturer={:?} chassis={}",
                    device_id,
                    description.device_type,
                    description.manufacturer,
                    description.chassis_id
                );
                for port in provider.ports(&device_id).unwrap_or_default() {
                    let status = if port.enabled { "enabled" } else { "disabled" };
                    info!("  port {} {}", port.number, status);
                }
            }
            Err(e) => warn!("{}", e),
        },
        Command::Role { device_id, role } => provider.role_changed(&device_id, role),
        Command::Quit => return false,
    }
    true
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = load_settings(&args)?;
    init_logging(&settings.logging.level)?;

    info!("--- Starting synthtopod ---");
    info!("Settings: {}", args.config.display());
    info!("Topology: {}", settings.topology.config_path.display());
    info!("Ports per device: {}", settings.topology.ports_per_device);

    let registry = LoggingRegistry::new();
    let provider = TopologyProvider::new(settings);

    if let Err(e) = provider.activate(&registry) {
        warn!("Running with an empty topology: {}", e);
    }
    info!(
        "Topology ready: {} devices, {} link entries",
        provider.device_count(),
        provider.links().len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read command")? {
                    Some(line) => {
                        if !handle_line(&provider, &line) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        info!("Command input closed");
                        break;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => warn!("Received SIGINT, shutting down gracefully..."),
                    Err(e) => error!("Failed to listen for ctrl-c: {}", e),
                }
                break;
            }
        }
    }

    provider.deactivate(&registry);

    let counts = registry.controller().counts();
    info!(
        "Events sent: {} devices, {} port lists, {} port status changes, {} links",
        counts.devices_connected,
        counts.port_updates,
        counts.port_status_changes,
        counts.links_detected
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => {
            info!("synthtopod exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // The subscriber may not be installed yet.
            eprintln!("synthtopod error: {:#}", e);
            error!("synthtopod error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
