//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::client::{AuthenticationModel, EnterpriseApi, EnterpriseClient};
use crate::config::Config;
use crate::error::{Error, Result};

/// Run the init command
pub async fn run(config_path: Option<&str>, endpoint_override: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to spiderop!".bold().green());
    println!("Let's set up your enterprise scanner configuration.\n");

    let endpoint: String = match endpoint_override {
        Some(endpoint) => {
            println!("Using endpoint: {}", endpoint.bold());
            endpoint.to_string()
        }
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enterprise rest endpoint URL (e.g. https://scanner.example.com/AppSpiderEnterprise/rest/v1)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                input
                    .parse::<url::Url>()
                    .map(|_| ())
                    .map_err(|e| format!("not a valid URL: {}", e))
            })
            .interact_text()?,
    };

    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Username")
        .interact_text()?;

    let password: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    println!("\n{}", "Verifying credentials...".cyan());
    let client = EnterpriseClient::new(endpoint.clone())?;
    let auth = AuthenticationModel::new(username.clone(), password.clone());
    let token = client.login(&auth).await.ok_or_else(|| {
        Error::Other("authentication failed; check the endpoint URL and credentials".to_string())
    })?;

    println!("{}", "✓ Authentication successful!".green());

    // Offer a tenant scope when the account can access more than one
    let client_id = match client.get_client_name_id_pairs(&token).await {
        Some(tenants) if tenants.len() > 1 => {
            let mut items: Vec<String> = tenants.iter().map(|t| t.name.clone()).collect();
            items.push("(no default tenant)".to_string());

            println!("\nThis account can access {} tenants.", tenants.len());
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Select a default tenant")
                .items(&items)
                .default(0)
                .interact_opt()?;

            selection
                .filter(|idx| *idx < tenants.len())
                .map(|idx| tenants[idx].id.clone())
        }
        _ => None,
    };

    let config = Config {
        endpoint: Some(endpoint),
        username: Some(username),
        password: Some(password),
        client_id,
        preferences: Default::default(),
    };
    config.save(config_path)?;

    let saved_path = Config::resolve_path(config_path)?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        saved_path.display()
    );

    if let Some(client_id) = &config.client_id {
        println!("  Default tenant: {}", client_id.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "spiderop status".cyan());
    println!(
        "  {} - List scan configurations",
        "spiderop config list".cyan()
    );
    println!(
        "  {} - Start a scan",
        "spiderop scan run <config-name>".cyan()
    );

    Ok(())
}
