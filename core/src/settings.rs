//! OBS Studio's global.ini, read for the websocket server settings

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use crate::network::{self, InterfaceSource};
use crate::protocol::constants::{
    PASSWORD_KEY, PORT_KEY, SETTINGS_DIR, SETTINGS_FILE, SETTINGS_SECTION,
};
use crate::protocol::ConnectionConfig;
use crate::{Error, Result};

/// Port and password as stored on disk, unvalidated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketSettings {
    pub port: String,
    pub password: String,
}

/// Default location: `<config dir>/obs-studio/global.ini`
pub fn default_settings_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

/// Extract the websocket section from INI text.
///
/// Missing section or keys read as empty strings, the way OBS itself treats
/// them. Values are taken literally: no quote or escape processing.
pub fn parse_settings(content: &str) -> Result<WebSocketSettings> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = well_formed_lines(content);
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(&content, options)
        .map_err(|e| Error::Settings(e.to_string()))?;

    let section = ini.section(Some(SETTINGS_SECTION));
    let value = |key: &str| {
        section
            .and_then(|s| s.get(key))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    Ok(WebSocketSettings {
        port: value(PORT_KEY),
        password: value(PASSWORD_KEY),
    })
}

/// Keep only section headers, `key=value` pairs, comments and blank lines.
///
/// OBS skips a line without `=`; rust-ini would read it as a key continuing
/// onto the next lines and swallow whatever section follows.
fn well_formed_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            let line = line.trim();
            line.is_empty()
                || line.starts_with(';')
                || line.starts_with('#')
                || (line.starts_with('[') && line.ends_with(']'))
                || line.contains('=')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read the websocket settings, `Ok(None)` if the file does not exist
pub fn read_settings(path: &Path) -> Result<Option<WebSocketSettings>> {
    if !path.exists() {
        tracing::debug!("no OBS settings file at {}", path.display());
        return Ok(None);
    }

    // Other sections may hold paths in a legacy encoding
    let bytes = std::fs::read(path)?;
    parse_settings(&String::from_utf8_lossy(&bytes)).map(Some)
}

/// Settings-file strategy: port and password from disk, address from the
/// interface ranking.
///
/// The file is checked first, so a missing file is `Ok(None)` even on a host
/// without any usable address.
pub fn try_read_from_file(
    path: &Path,
    interfaces: &impl InterfaceSource,
) -> Result<Option<ConnectionConfig>> {
    let Some(settings) = read_settings(path)? else {
        return Ok(None);
    };

    let address = network::select_preferred_address(interfaces)?;
    tracing::info!("read websocket settings from {}", path.display());
    Ok(Some(ConnectionConfig::new(address, settings.port, settings.password)))
}
