//! spiderop - companion CLI for enterprise application scanning platforms

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::{
    AuthCommands, Cli, ClientCommands, Commands, ConfigCommands, EngineGroupCommands, ScanCommands,
};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // --debug surfaces the causes the contract's absence signaling hides
    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref(), cli.endpoint.as_deref()).await,
        Commands::Status => cli::status::run(cli.config.as_deref(), cli.endpoint.as_deref()),
        Commands::Version => {
            println!("spiderop version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Auth(auth_cmd) => match auth_cmd {
            AuthCommands::Test => {
                cli::auth::test(cli.config.as_deref(), cli.endpoint.as_deref()).await
            }
        },
        Commands::Client(client_cmd) => match client_cmd {
            ClientCommands::List => {
                cli::tenant::list(cli.format, cli.config.as_deref(), cli.endpoint.as_deref()).await
            }
        },
        Commands::EngineGroup(group_cmd) => match group_cmd {
            EngineGroupCommands::List => {
                cli::engine_group::list(cli.format, cli.config.as_deref(), cli.endpoint.as_deref())
                    .await
            }
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => {
                cli::config::list(cli.format, cli.config.as_deref(), cli.endpoint.as_deref()).await
            }
            ConfigCommands::Save {
                name,
                target_url,
                engine_group,
                engine_group_id,
            } => {
                cli::config::save(
                    name,
                    target_url,
                    engine_group,
                    engine_group_id,
                    cli.config.as_deref(),
                    cli.endpoint.as_deref(),
                )
                .await
            }
        },
        Commands::Scan(scan_cmd) => match scan_cmd {
            ScanCommands::Run {
                config_name,
                wait,
                interval,
                timeout,
            } => {
                cli::scan::run(
                    config_name,
                    wait,
                    interval,
                    timeout,
                    cli.format,
                    cli.config.as_deref(),
                    cli.endpoint.as_deref(),
                )
                .await
            }
            ScanCommands::Status { scan_id } => {
                cli::scan::status(
                    scan_id,
                    cli.format,
                    cli.config.as_deref(),
                    cli.endpoint.as_deref(),
                )
                .await
            }
            ScanCommands::Vulns { scan_id, output } => {
                cli::scan::vulns(
                    scan_id,
                    output,
                    cli.config.as_deref(),
                    cli.endpoint.as_deref(),
                )
                .await
            }
            ScanCommands::Report { scan_id, output } => {
                cli::scan::report(
                    scan_id,
                    output,
                    cli.config.as_deref(),
                    cli.endpoint.as_deref(),
                )
                .await
            }
        },
    }
}
