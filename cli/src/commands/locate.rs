//! Locate command implementation.

use std::fmt;
use std::time::Duration;

use anyhow::anyhow;
use obslocate_core::{Config, ConfigDiscovery, ConnectionConfig, Error};

use super::Outcome;
use crate::ui::{print_connection, print_not_found, print_qr_code};

/// Options shared by every discovery command
pub struct LocateOptions {
    pub config: Config,
    pub timeout: Option<Duration>,
    pub json: bool,
    pub qr: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    File,
    Window,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::File => write!(f, "settings file"),
            Strategy::Window => write!(f, "connect info window"),
        }
    }
}

/// Run the strategies in order; the first one that finds settings wins.
pub async fn locate(strategies: &[Strategy], options: &LocateOptions) -> anyhow::Result<Outcome> {
    let mut last_error = None;

    for &strategy in strategies {
        match run_with_retry(strategy, options).await {
            Ok(Some(connection)) => {
                print_connection(&connection, strategy, options.json)?;
                if options.qr {
                    print_qr_code(&connection.to_url());
                }
                return Ok(Outcome::Found);
            }
            Ok(None) => tracing::info!("{}: nothing found", strategy),
            Err(e) if strategies.len() > 1 => {
                tracing::warn!("{} failed: {:#}", strategy, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(e) = last_error {
        return Err(e);
    }
    print_not_found(options.json)?;
    Ok(Outcome::NotFound)
}

/// The dialog can close between the scan and the capture; that race gets
/// one more scan.
async fn run_with_retry(
    strategy: Strategy,
    options: &LocateOptions,
) -> anyhow::Result<Option<ConnectionConfig>> {
    match run_strategy(strategy, options).await? {
        Err(Error::CaptureFailed(reason)) => {
            tracing::warn!("capture failed ({}), scanning once more", reason);
            Ok(run_strategy(strategy, options).await??)
        }
        other => Ok(other?),
    }
}

/// Discovery blocks, so it runs on the blocking pool under the timeout.
async fn run_strategy(
    strategy: Strategy,
    options: &LocateOptions,
) -> anyhow::Result<obslocate_core::Result<Option<ConnectionConfig>>> {
    let config = options.config.clone();
    let task = tokio::task::spawn_blocking(move || {
        let discovery = ConfigDiscovery::new(config);
        match strategy {
            Strategy::File => discovery.from_settings_file(),
            Strategy::Window => discovery.from_connect_info_window(),
        }
    });

    let joined = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow!("{} timed out after {}s", strategy, limit.as_secs()))?,
        None => task.await,
    };

    Ok(joined?)
}
