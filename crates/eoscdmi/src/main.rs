//! EOS CDMI command-line tool
//!
//! Runs the CDMI QoS backend operations against an EOS MGM and prints the
//! results as JSON. Also encodes and decodes `mgm.cmd.proto` values for
//! debugging.

use anyhow::{Context, Result};
use cdmibackend::{EosStorageBackend, StorageBackend};
use clap::{Parser, Subcommand};
use eosclient::{decode_command, encode_command, QosCommand};
use eosconfig::PluginConfig;
use tracing::debug;

#[derive(Parser)]
#[command(name = "eos-cdmi")]
#[command(about = "CDMI QoS operations on an EOS instance", long_about = None)]
struct Cli {
    /// Plugin configuration file path
    #[arg(
        short = 'c',
        long,
        env = "EOS_CDMI_CONF",
        default_value = eosconfig::DEFAULT_CONFIG_PATH
    )]
    conf: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all CDMI capabilities
    Capabilities,
    /// Show the QoS status of an object
    Status {
        /// Object path
        path: String,
    },
    /// Request a QoS transition
    Update {
        /// Object path
        path: String,
        /// Target capability URI (e.g. /cdmi_capabilities/dataobject/disk_replica)
        capability: String,
    },
    /// Print the encoded form of a QoS command
    Encode {
        #[command(subcommand)]
        command: EncodeCommand,
    },
    /// Decode an mgm.cmd.proto value
    Decode {
        /// Encoded command
        encoded: String,
    },
}

#[derive(Subcommand)]
enum EncodeCommand {
    /// qos list
    List,
    /// qos list <class>
    ListClass { class_name: String },
    /// qos get <path>
    Get { path: String },
    /// qos set <path> <class>
    Set { path: String, class_name: String },
}

impl From<EncodeCommand> for QosCommand {
    fn from(command: EncodeCommand) -> Self {
        match command {
            EncodeCommand::List => QosCommand::List,
            EncodeCommand::ListClass { class_name } => QosCommand::ListClass { class_name },
            EncodeCommand::Get { path } => QosCommand::Get { path },
            EncodeCommand::Set { path, class_name } => QosCommand::Set { path, class_name },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { command } => {
            println!("{}", encode_command(&command.into()));
        }
        Commands::Decode { encoded } => {
            let command = decode_command(&encoded).context("Failed to decode command")?;
            println!("{}", command);
        }
        Commands::Capabilities => {
            let backend = load_backend(&cli.conf)?;
            let capabilities = backend
                .capabilities()
                .await
                .context("Failed to list capabilities")?;
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
        }
        Commands::Status { path } => {
            let backend = load_backend(&cli.conf)?;
            let status = backend
                .current_status(&path)
                .await
                .with_context(|| format!("Failed to get status of {}", path))?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Update { path, capability } => {
            let backend = load_backend(&cli.conf)?;
            backend
                .update_cdmi_object(&path, &capability)
                .await
                .with_context(|| format!("Failed to update {}", path))?;

            if cli.debug {
                eprintln!("Requested transition of {} to {}", path, capability);
            }
        }
    }

    Ok(())
}

/// Load the plugin configuration and build the backend
fn load_backend(conf: &str) -> Result<EosStorageBackend> {
    debug!("Loading configuration from: {}", conf);
    let config = PluginConfig::from_file(conf)
        .with_context(|| format!("Failed to read configuration {}", conf))?;

    let backend =
        EosStorageBackend::from_config(&config).context("Invalid EOS endpoint configuration")?;
    debug!("Using EOS endpoint {}", backend.client().endpoint());

    Ok(backend)
}
