//! Engine group command implementations

use tabled::Tabled;

use crate::cli::{OutputFormat, Session};
use crate::client::EnterpriseApi;
use crate::error::{Error, Result};
use crate::output::{format_json, format_table};

/// Engine group name for table display
#[derive(Tabled)]
struct EngineGroupDisplay {
    #[tabled(rename = "ENGINE GROUP")]
    name: String,
}

/// Run the engine-group list command
pub async fn list(
    format: OutputFormat,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let names = session
        .client
        .get_engine_group_names_for_client(&session.token)
        .await
        .ok_or_else(|| Error::Other("could not list engine groups".to_string()))?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<EngineGroupDisplay> = names
                .into_iter()
                .map(|name| EngineGroupDisplay { name })
                .collect();
            println!("{}", format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", format_json(&names)?);
        }
    }

    Ok(())
}
