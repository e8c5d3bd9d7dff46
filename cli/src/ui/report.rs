//! Human and JSON output of discovery results.

use obslocate_core::{ConnectionConfig, NetworkCandidate};
use serde::Serialize;

use crate::commands::Strategy;

#[derive(Serialize)]
struct Report<'a> {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection: Option<&'a ConnectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Print discovered connection settings.
pub fn print_connection(
    connection: &ConnectionConfig,
    source: Strategy,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let report = Report {
            found: true,
            source: Some(source.to_string()),
            connection: Some(connection),
            url: Some(connection.to_url()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let password = if connection.password().is_empty() {
        "\x1b[2m(none)\x1b[0m"
    } else {
        connection.password()
    };

    println!("\x1b[1;32m✓\x1b[0m Found via {}", source);
    println!("\x1b[1mAddress:\x1b[0m  {}", connection.address());
    println!("\x1b[1mPort:\x1b[0m     {}", connection.port());
    println!("\x1b[1mPassword:\x1b[0m {}", password);
    println!("\x1b[1mURL:\x1b[0m      {}", connection.to_url());
    Ok(())
}

/// Print the "nothing detected" state.
pub fn print_not_found(json: bool) -> anyhow::Result<()> {
    if json {
        let report = Report { found: false, source: None, connection: None, url: None };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\x1b[1;33m⬤\x1b[0m No obs-websocket settings found.");
        println!("\x1b[2mStart OBS once, or open Tools → WebSocket Server Settings → Show Connect Info.\x1b[0m");
    }
    Ok(())
}

/// Print ranked address candidates.
pub fn print_candidates(candidates: &[NetworkCandidate], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("\x1b[1;33m⬤\x1b[0m No Ethernet or Wi-Fi interface has an IPv4 address.");
        return Ok(());
    }

    println!("\n\x1b[1mLocal addresses (best first):\x1b[0m");
    for candidate in candidates {
        println!(
            "  • {:<15}  priority {:>3}  {}",
            candidate.address, candidate.priority, candidate.interface
        );
    }
    println!();
    Ok(())
}
