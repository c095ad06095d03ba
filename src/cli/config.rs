//! Scan configuration command implementations

use colored::Colorize;
use tabled::Tabled;
use url::Url;

use crate::cli::{OutputFormat, Session};
use crate::client::EnterpriseApi;
use crate::error::{Error, Result};
use crate::output::{format_json, format_table};

/// Config name for table display
#[derive(Tabled)]
struct ConfigDisplay {
    #[tabled(rename = "CONFIG")]
    name: String,
}

/// Run the config list command
pub async fn list(
    format: OutputFormat,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let names = session
        .client
        .get_config_names(&session.token)
        .await
        .ok_or_else(|| Error::Other("could not list scan configurations".to_string()))?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<ConfigDisplay> = names
                .into_iter()
                .map(|name| ConfigDisplay { name })
                .collect();
            println!("{}", format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", format_json(&names)?);
        }
    }

    Ok(())
}

/// Run the config save command (create-or-update by name)
pub async fn save(
    name: String,
    target_url: Url,
    engine_group: Option<String>,
    engine_group_id: Option<String>,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let engine_group_id = match (engine_group_id, engine_group) {
        (Some(id), _) => id,
        (None, Some(group_name)) => session
            .client
            .get_engine_group_id_from_name(&session.token, &group_name)
            .await
            .ok_or_else(|| {
                Error::Other(format!(
                    "engine group '{}' not found; see `spiderop engine-group list`",
                    group_name
                ))
            })?,
        (None, None) => {
            return Err(Error::Other(
                "pass --engine-group or --engine-group-id".to_string(),
            ));
        }
    };

    let saved = session
        .client
        .save_config(&session.token, &name, &target_url, &engine_group_id)
        .await;
    if !saved {
        return Err(Error::Other(format!(
            "saving scan configuration '{}' failed",
            name
        )));
    }

    println!(
        "{} Saved scan configuration {} targeting {}",
        "✓".green(),
        name.bold(),
        target_url
    );
    Ok(())
}
