//! Status command implementation

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(config_path: Option<&str>, endpoint_override: Option<&str>) -> Result<()> {
    println!("{}\n", "spiderop Configuration Status".bold());

    let resolved_path = Config::resolve_path(config_path)?;

    match Config::load(config_path) {
        Ok(config) => {
            println!(
                "Config file: {}",
                resolved_path.display().to_string().cyan()
            );
            println!();

            match config.resolve_endpoint(endpoint_override) {
                Ok(endpoint) => {
                    if endpoint_override.is_some() {
                        println!("{} Endpoint: {} {}", "✓".green(), endpoint, "(override)".dimmed());
                    } else {
                        println!("{} Endpoint: {}", "✓".green(), endpoint);
                    }
                }
                Err(_) => {
                    println!("{} Endpoint not configured", "✗".red());
                    println!("  → Run 'spiderop init' or pass --endpoint");
                }
            }

            match &config.username {
                Some(username) => println!("{} Username: {}", "✓".green(), username),
                None => println!("{} Username not configured", "✗".red()),
            }

            if config.password.is_some() {
                println!("{} Password configured", "✓".green());
            } else {
                println!("{} Password not configured", "✗".red());
            }

            match &config.client_id {
                Some(client_id) => println!("{} Default tenant: {}", "✓".green(), client_id),
                None => println!("{} No default tenant (account-wide session)", "-".dimmed()),
            }

            println!(
                "\nPoll interval: {}s",
                config.preferences.poll_interval_secs
            );
        }
        Err(_) => {
            println!("{} No configuration found", "✗".red());
            println!("  Expected at: {}", resolved_path.display());
            println!("  → Run 'spiderop init' to set up");
        }
    }

    Ok(())
}
