//! Tenant (client) command implementations

use tabled::Tabled;

use crate::cli::{OutputFormat, Session};
use crate::client::{ClientIdNamePair, EnterpriseApi};
use crate::error::{Error, Result};
use crate::output::{format_json, format_table};

/// Tenant pair for table display
#[derive(Tabled)]
struct TenantDisplay {
    #[tabled(rename = "CLIENT ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
}

impl From<ClientIdNamePair> for TenantDisplay {
    fn from(pair: ClientIdNamePair) -> Self {
        Self {
            id: pair.id,
            name: pair.name,
        }
    }
}

/// Run the client list command
pub async fn list(
    format: OutputFormat,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let pairs = session
        .client
        .get_client_name_id_pairs(&session.token)
        .await
        .ok_or_else(|| Error::Other("could not list tenants".to_string()))?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<TenantDisplay> = pairs.into_iter().map(TenantDisplay::from).collect();
            println!("{}", format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", format_json(&pairs)?);
        }
    }

    Ok(())
}
