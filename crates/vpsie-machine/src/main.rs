mod commands;

use clap::{Args, Parser, Subcommand};
use commands::lifecycle::Action;
use machine_driver::{MachineStore, WaitConfig};
use machine_driver_vpsie::DriverOptions;
use machine_driver_vpsie::options::{
    DEFAULT_DATACENTER_ID, DEFAULT_DOCKER_PORT, DEFAULT_IMAGE_ID, DEFAULT_OFFER_ID,
    DEFAULT_SSH_PORT, DEFAULT_SSH_USER,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vpsie-machine")]
#[command(about = "Provision and manage VPSie machines", long_about = None)]
struct Cli {
    /// Directory holding machine records and SSH keys
    #[arg(long, global = true, env = "MACHINE_STORAGE_PATH")]
    storage_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a machine and install its SSH key
    Create {
        /// Machine name (also used as hostname)
        name: String,

        #[command(flatten)]
        vpsie: VpsieArgs,
    },
    /// Show the machine's state as reported by VPSie
    Status { name: String },
    /// Show the machine's IP address
    Ip { name: String },
    /// Show the machine's Docker URL
    Url { name: String },
    /// Start a machine
    Start { name: String },
    /// Stop a machine
    Stop { name: String },
    /// Restart a machine
    Restart { name: String },
    /// Kill a machine
    Kill { name: String },
    /// Remove a machine
    Rm {
        name: String,
        /// Delete the VPSie instance but keep the local record and keys
        #[arg(long)]
        keep_record: bool,
    },
    /// Show the stored machine record as JSON
    Inspect { name: String },
    /// List stored machines
    Ls,
    /// Show version
    Version,
}

#[derive(Args, Debug)]
struct VpsieArgs {
    /// VPSie API client ID
    #[arg(long = "vpsie-client-id", env = "VPSIE_CLIENT_ID", default_value = "")]
    client_id: String,

    /// VPSie API client secret
    #[arg(
        long = "vpsie-client-secret",
        env = "VPSIE_CLIENT_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    client_secret: String,

    /// Image (operating system) ID
    #[arg(long = "vpsie-image-id", env = "VPSIE_IMAGE_ID", default_value = DEFAULT_IMAGE_ID)]
    image_id: String,

    /// Offer (plan) ID
    #[arg(long = "vpsie-offer-id", env = "VPSIE_OFFER_ID", default_value = DEFAULT_OFFER_ID)]
    offer_id: String,

    /// Datacenter ID
    #[arg(
        long = "vpsie-datacenter-id",
        env = "VPSIE_DATACENTER_ID",
        default_value = DEFAULT_DATACENTER_ID
    )]
    datacenter_id: String,

    /// VPSie API base URL
    #[arg(long = "vpsie-api-url", env = "VPSIE_API_URL")]
    api_url: Option<String>,

    /// SSH user
    #[arg(long = "vpsie-ssh-user", default_value = DEFAULT_SSH_USER)]
    ssh_user: String,

    /// SSH port
    #[arg(long = "vpsie-ssh-port", default_value_t = DEFAULT_SSH_PORT)]
    ssh_port: u16,

    /// Docker daemon port used for the machine URL
    #[arg(long = "vpsie-docker-port", default_value_t = DEFAULT_DOCKER_PORT)]
    docker_port: u16,

    /// Seconds between two readiness checks
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    wait_interval: u64,

    /// Seconds to wait for each readiness gate
    #[arg(long, default_value_t = 180)]
    wait_timeout: u64,
}

impl VpsieArgs {
    fn into_options(self) -> DriverOptions {
        let defaults = DriverOptions::default();
        DriverOptions {
            client_id: self.client_id,
            client_secret: self.client_secret,
            image_id: self.image_id,
            offer_id: self.offer_id,
            datacenter_id: self.datacenter_id,
            api_url: self.api_url.unwrap_or(defaults.api_url),
            ssh_user: self.ssh_user,
            ssh_port: self.ssh_port,
            docker_port: self.docker_port,
            wait: WaitConfig::new(
                Duration::from_secs(self.wait_interval),
                Duration::from_secs(self.wait_timeout),
            ),
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries command results only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn storage_root(storage_path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match storage_path {
        Some(path) => Ok(path),
        None => dirs::data_dir()
            .map(|dir| dir.join("vpsie-machine"))
            .ok_or_else(|| {
                anyhow::anyhow!("could not determine a data directory; set MACHINE_STORAGE_PATH")
            }),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if matches!(cli.command, Commands::Version) {
        println!("vpsie-machine {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let store = MachineStore::new(storage_root(cli.storage_path)?);
    tracing::debug!("Using storage path {}", store.root().display());

    match cli.command {
        Commands::Create { name, vpsie } => {
            commands::create::handle(&store, &name, vpsie.into_options()).await?;
        }
        Commands::Status { name } => commands::status::state(&store, &name).await?,
        Commands::Ip { name } => commands::status::ip(&store, &name).await?,
        Commands::Url { name } => commands::status::url(&store, &name).await?,
        Commands::Start { name } => commands::lifecycle::handle(&store, &name, Action::Start).await?,
        Commands::Stop { name } => commands::lifecycle::handle(&store, &name, Action::Stop).await?,
        Commands::Restart { name } => {
            commands::lifecycle::handle(&store, &name, Action::Restart).await?
        }
        Commands::Kill { name } => commands::lifecycle::handle(&store, &name, Action::Kill).await?,
        Commands::Rm { name, keep_record } => {
            commands::rm::handle(&store, &name, keep_record).await?
        }
        Commands::Inspect { name } => commands::inspect::handle(&store, &name).await?,
        Commands::Ls => commands::ls::handle(&store).await?,
        Commands::Version => {}
    }

    Ok(())
}
