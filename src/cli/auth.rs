//! Auth command implementations

use colored::Colorize;

use crate::client::{EnterpriseApi, EnterpriseClient};
use crate::config::Config;
use crate::error::{Error, Result};

/// Run the auth test command
pub async fn test(config_path: Option<&str>, endpoint: Option<&str>) -> Result<()> {
    let config = Config::load(config_path)?;
    let endpoint = config.resolve_endpoint(endpoint)?;
    let auth = config.auth_model()?;

    let client = EnterpriseClient::new(endpoint.clone())?;
    println!("Testing authentication against {}...", endpoint.cyan());

    if client.test_authentication(&auth).await {
        println!("{} Credentials are valid", "✓".green());
        Ok(())
    } else {
        println!("{} Authentication failed", "✗".red());
        Err(Error::Other(
            "authentication failed; check credentials and endpoint (re-run with --debug for the cause)"
                .to_string(),
        ))
    }
}
