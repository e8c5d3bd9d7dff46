//! obslocate core - finds obs-websocket connection settings
//!
//! OBS Studio exposes its websocket server settings in two places: its
//! `global.ini` settings file, and a QR code in the "connect info" dialog.
//! This library reads either one and reports the host's best LAN address
//! alongside the port and password.

pub mod decode;
pub mod discovery;
pub mod network;
pub mod protocol;
pub mod settings;
pub mod window;

mod error;

use std::path::PathBuf;

pub use error::{Error, Result};

/// Configuration for the discovery engine
#[derive(Debug, Clone)]
pub struct Config {
    /// OBS Studio's global settings file
    pub settings_file: PathBuf,
    /// Buffer capacity for window titles, terminator included
    pub title_capacity: usize,
}

impl Config {
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = path.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_file: settings::default_settings_file(),
            title_capacity: protocol::constants::TITLE_BUFFER_LEN,
        }
    }
}

// Re-export key types for convenience
pub use discovery::ConfigDiscovery;
pub use network::{InterfaceKind, InterfaceSource, NetworkCandidate, NetworkInterface, SystemInterfaces};
pub use protocol::ConnectionConfig;
pub use window::{Desktop, NativeDesktop, WindowHandle, WindowSystem};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.title_capacity, protocol::constants::TITLE_BUFFER_LEN);
        assert!(config.settings_file.ends_with("obs-studio/global.ini"));

        let config = config.with_settings_file("/tmp/global.ini");
        assert_eq!(config.settings_file, PathBuf::from("/tmp/global.ini"));
    }
}
