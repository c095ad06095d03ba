//! Scan command implementations

use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;
use tokio::io::AsyncWriteExt;

use crate::cli::{OutputFormat, Session};
use crate::client::EnterpriseApi;
use crate::error::{Error, Result};
use crate::output::{format_json, format_table};

/// Scan state for table display
#[derive(Tabled, Serialize)]
struct ScanStatusDisplay {
    #[tabled(rename = "SCAN ID")]
    scan_id: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "FINISHED")]
    finished: bool,
    #[tabled(rename = "REPORT")]
    has_report: bool,
}

/// Run the scan run command
pub async fn run(
    config_name: String,
    wait: bool,
    interval: Option<u64>,
    timeout: Option<u64>,
    format: OutputFormat,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let result = session
        .client
        .run_scan_by_config_name(&session.token, &config_name)
        .await;
    if !result.success {
        return Err(Error::Other(format!(
            "could not start a scan from '{}'; check the config name with `spiderop config list`",
            config_name
        )));
    }

    let scan_id = result.scan_id.ok_or_else(|| {
        Error::Other("service accepted the scan but returned no scan id".to_string())
    })?;

    println!(
        "{} Started scan {} from config {}",
        "✓".green(),
        scan_id.bold(),
        config_name.bold()
    );

    if !wait {
        return Ok(());
    }

    let interval = interval.unwrap_or(session.config.preferences.poll_interval_secs).max(1);
    wait_for_scan(&session, &scan_id, interval, timeout).await?;
    print_status(&session, &scan_id, format).await
}

/// Poll until the scan reaches a terminal state or the deadline passes.
async fn wait_for_scan(
    session: &Session,
    scan_id: &str,
    interval_secs: u64,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let deadline = timeout_secs.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));

    loop {
        let status = session
            .client
            .get_scan_status(&session.token, scan_id)
            .await
            .unwrap_or_else(|| "Unknown".to_string());
        spinner.set_message(format!("Scan {}: {}", scan_id, status));

        if session.client.is_scan_finished(&session.token, scan_id).await {
            spinner.finish_with_message(format!("Scan {}: {} (finished)", scan_id, status));
            return Ok(());
        }

        if let Some(deadline) = deadline {
            if tokio::time::Instant::now() >= deadline {
                spinner.finish_and_clear();
                return Err(Error::Other(format!(
                    "scan {} still running after {} seconds; check later with `spiderop scan status {}`",
                    scan_id,
                    timeout_secs.unwrap_or(0),
                    scan_id
                )));
            }
        }

        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
    }
}

/// Run the scan status command
pub async fn status(
    scan_id: String,
    format: OutputFormat,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;
    print_status(&session, &scan_id, format).await
}

async fn print_status(session: &Session, scan_id: &str, format: OutputFormat) -> Result<()> {
    let status = session
        .client
        .get_scan_status(&session.token, scan_id)
        .await
        .ok_or_else(|| Error::Other(format!("no status available for scan '{}'", scan_id)))?;
    let finished = session.client.is_scan_finished(&session.token, scan_id).await;
    let has_report = session.client.has_report(&session.token, scan_id).await;

    let row = ScanStatusDisplay {
        scan_id: scan_id.to_string(),
        status,
        finished,
        has_report,
    };

    match format {
        OutputFormat::Table => println!("{}", format_table(&[row])),
        OutputFormat::Json => println!("{}", format_json(&row)?),
    }

    Ok(())
}

/// Run the scan vulns command
pub async fn vulns(
    scan_id: String,
    output: Option<String>,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    let xml = session
        .client
        .get_vulnerabilities_summary_xml(&session.token, &scan_id)
        .await
        .ok_or_else(|| {
            Error::Other(format!(
                "no vulnerability summary available for scan '{}'",
                scan_id
            ))
        })?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, xml).await?;
            println!("{} Wrote vulnerability summary to {}", "✓".green(), path);
        }
        None => println!("{}", xml),
    }

    Ok(())
}

/// Run the scan report command
pub async fn report(
    scan_id: String,
    output: Option<String>,
    config_path: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let session = Session::open(config_path, endpoint).await?;

    if !session.client.has_report(&session.token, &scan_id).await {
        return Err(Error::Other(format!(
            "no report available for scan '{}' yet",
            scan_id
        )));
    }

    let zip = session
        .client
        .get_report_zip(&session.token, &scan_id)
        .await
        .ok_or_else(|| Error::Other(format!("report download failed for scan '{}'", scan_id)))?;

    let path = output.unwrap_or_else(|| {
        format!("scan-{}-{}.zip", scan_id, Utc::now().format("%Y%m%d-%H%M%S"))
    });

    let progress = match zip.content_length() {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let mut file = tokio::fs::File::create(&path).await?;
    let mut written = 0u64;
    let mut stream = zip;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Error::Api)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }
    file.flush().await?;
    progress.finish_and_clear();

    println!(
        "{} Downloaded report for scan {} to {} ({} bytes)",
        "✓".green(),
        scan_id.bold(),
        path,
        written
    );

    Ok(())
}
