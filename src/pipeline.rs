//! Linear processing pipeline
//!
//! Runs the resolver, submitter, starter, poller and fetcher stages in
//! order. Each stage feeds the next its identifier; there is no branching
//! and no concurrency, every await suspends the whole run.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher;
use crate::poller::{self, PollOutcome, PollTiming, ProductionStatusSource};
use crate::types::{Envelope, ProductionDetails, StatusCode};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Run the whole pipeline for one input file.
///
/// Returns the local paths of the downloaded output files.
pub async fn run(
    config: &Config,
    input: &Path,
    preset_name: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let client = ApiClient::new(config)?;

    info!(preset = preset_name, "looking up preset");
    let preset_uuid = resolve_preset(&client, preset_name).await?;
    info!(uuid = %preset_uuid, "using preset");

    info!(file = %input.display(), "uploading file");
    let uuid = submit(&client, input, Some(&preset_uuid)).await?;
    info!(production = %uuid, "production created");
    info!(url = %client.status_page_url(&uuid), "monitor at");

    start(&client, &uuid, config.start_delay).await?;

    let timing = PollTiming::from_config(config);
    let status_url = client.status_page_url(&uuid);
    let mut source = ProductionStatusSource::new(&client, &uuid);
    match poller::wait_for_done(&mut source, &timing, &status_url).await? {
        PollOutcome::Completed => {}
        PollOutcome::Failed => return Err(report_processing_error(&client, &uuid).await),
    }

    fetcher::download_outputs(&client, &uuid, output_dir).await
}

/// Resolve a preset name to its uuid by exact match against the listing.
///
/// A miss carries every listed name, in listing order, so the operator can
/// see what is actually available.
pub async fn resolve_preset(client: &ApiClient, name: &str) -> Result<String> {
    let presets = client.list_presets().await?;
    if let Some(preset) = presets.iter().find(|p| p.preset_name == name) {
        return Ok(preset.uuid.clone());
    }
    Err(Error::PresetNotFound {
        name: name.to_string(),
        available: presets.into_iter().map(|p| p.preset_name).collect(),
    })
}

/// Upload the input file and create the production.
pub async fn submit(client: &ApiClient, input: &Path, preset_uuid: Option<&str>) -> Result<String> {
    let base_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("input");
    let title = format!("Processed {base_name}");
    client.create_production(input, &title, preset_uuid).await
}

/// Send the start command, tolerating jobs that already auto-started.
///
/// The service auto-starts productions under some preset configurations, in
/// which case the explicit start call can fail even though the job is fine.
/// On a start failure the current status decides: waiting, processing or
/// done means the job is running and the failure is benign; anything else
/// surfaces the original start error.
pub async fn start(client: &ApiClient, uuid: &str, delay: std::time::Duration) -> Result<()> {
    // Let the create-production side effects settle server-side first.
    tokio::time::sleep(delay).await;

    info!("starting production");
    let start_err = match client.start_production(uuid).await {
        Ok(()) => {
            info!("production started");
            return Ok(());
        }
        Err(e) => e,
    };
    warn!(error = %start_err, "start command failed, checking current status");

    match client.get_status(uuid).await {
        Ok(status)
            if matches!(
                status.status,
                StatusCode::Waiting | StatusCode::Processing | StatusCode::Done
            ) =>
        {
            info!(status = %status.status, "production appears to be already started");
            Ok(())
        }
        Ok(status) => {
            warn!(status = %status.status, "production is not running");
            Err(start_err)
        }
        Err(status_err) => {
            warn!(error = %status_err, "status check after failed start also failed");
            Err(start_err)
        }
    }
}

/// Best-effort enrichment after the production reached the error status.
///
/// Fetches the full resource, dumps it raw for debugging and pulls out the
/// summary and message fields when they parse. A fetch or parse failure is
/// logged but never masks the underlying processing failure.
async fn report_processing_error(client: &ApiClient, uuid: &str) -> Error {
    error!("processing failed, fetching detailed error information");

    let raw = match client.get_production_raw(uuid).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "failed to fetch production details after failure");
            return Error::ProcessingFailed {
                summary: None,
                message: None,
            };
        }
    };
    info!(details = %raw, "full production details for debugging");

    match serde_json::from_str::<Envelope<ProductionDetails>>(&raw) {
        Ok(envelope) => {
            let details = envelope.data.unwrap_or_default();
            error!(
                summary = details.error_summary.as_deref().unwrap_or("no summary available"),
                message = details
                    .error_message
                    .as_deref()
                    .unwrap_or("no detailed message available"),
                warning = details.warning_message.as_deref().unwrap_or("no warnings"),
                "production error details"
            );
            Error::ProcessingFailed {
                summary: details.error_summary,
                message: details.error_message,
            }
        }
        Err(e) => {
            warn!(error = %e, "could not parse production details JSON");
            Error::ProcessingFailed {
                summary: None,
                message: None,
            }
        }
    }
}
