//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod auth;
pub mod config;
pub mod engine_group;
pub mod init;
pub mod scan;
pub mod status;
pub mod tenant;

use crate::client::{AuthToken, EnterpriseApi, EnterpriseClient};
use crate::config::Config;
use crate::error::{Error, Result};

/// Output format options
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format - one row per entry (default)
    #[default]
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}

/// spiderop - companion CLI for enterprise scanning platforms
#[derive(Parser, Debug)]
#[command(name = "spiderop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "SPIDEROP_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "SPIDEROP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the enterprise rest endpoint URL
    #[arg(long, global = true, env = "SPIDEROP_ENDPOINT", hide_env = true)]
    pub endpoint: Option<String>,

    /// Enable debug logging (shows why operations came back empty)
    #[arg(long, global = true, env = "SPIDEROP_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize spiderop configuration
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Authentication checks
    #[command(subcommand)]
    Auth(AuthCommands),

    /// List accessible tenants (clients)
    #[command(subcommand)]
    Client(ClientCommands),

    /// List scan engine groups
    #[command(subcommand)]
    EngineGroup(EngineGroupCommands),

    /// Manage scan configurations
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Run scans and fetch their results
    #[command(subcommand)]
    Scan(ScanCommands),
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Verify the configured credentials against the service
    Test,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// List tenant id/name pairs visible to the configured account
    List,
}

#[derive(Subcommand, Debug)]
pub enum EngineGroupCommands {
    /// List engine group names available to the configured account
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List scan configuration names
    List,

    /// Create or update a scan configuration (upsert by name)
    Save {
        /// Configuration name
        #[arg(long)]
        name: String,

        /// Target URL the scan will crawl
        #[arg(long)]
        target_url: url::Url,

        /// Engine group name to run on (resolved to an id)
        #[arg(long, conflicts_with = "engine_group_id")]
        engine_group: Option<String>,

        /// Engine group id to run on
        #[arg(long)]
        engine_group_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    /// Start a scan from a named configuration
    Run {
        /// Name of the scan configuration to run
        config_name: String,

        /// Poll until the scan reaches a terminal state
        #[arg(long)]
        wait: bool,

        /// Seconds between polls (defaults to the configured preference)
        #[arg(long)]
        interval: Option<u64>,

        /// Give up waiting after this many seconds
        #[arg(long, requires = "wait")]
        timeout: Option<u64>,
    },

    /// Show the current status of a scan
    Status {
        /// Scan identifier returned by `scan run`
        scan_id: String,
    },

    /// Fetch the vulnerability summary XML for a scan
    Vulns {
        /// Scan identifier
        scan_id: String,

        /// Write the XML to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Download the report zip for a scan
    Report {
        /// Scan identifier
        scan_id: String,

        /// Output path (defaults to scan-<id>-<timestamp>.zip)
        #[arg(long)]
        output: Option<String>,
    },
}

/// An authenticated connection to the enterprise service.
///
/// Loads the config, builds the client and performs the per-invocation
/// login every token-requiring command starts with. The contract has no
/// token refresh, so each CLI run authenticates fresh.
pub struct Session {
    pub config: Config,
    pub client: EnterpriseClient,
    pub token: AuthToken,
}

impl Session {
    pub async fn open(config_path: Option<&str>, endpoint: Option<&str>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let endpoint = config.resolve_endpoint(endpoint)?;
        let client = EnterpriseClient::new(endpoint)?;

        let auth = config.auth_model()?;
        let token = client.login(&auth).await.ok_or_else(|| {
            Error::Other(
                "login failed; check credentials and endpoint (re-run with --debug for the cause)"
                    .to_string(),
            )
        })?;

        Ok(Self {
            config,
            client,
            token,
        })
    }
}
