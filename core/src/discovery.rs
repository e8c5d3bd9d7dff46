//! The two discovery strategies, exposed side by side
//!
//! [`ConfigDiscovery`] never chains the strategies: the settings file and the
//! on-screen dialog have different preconditions and different trust levels,
//! so the caller picks which to try and in what order.

use crate::decode;
use crate::network::{self, InterfaceSource, SystemInterfaces};
use crate::protocol::ConnectionConfig;
use crate::settings;
use crate::window::{self, Desktop, NativeDesktop};
use crate::{Config, Result};

/// Stateless discovery engine; every call repeats the full search
pub struct ConfigDiscovery<N = SystemInterfaces, D = NativeDesktop> {
    config: Config,
    interfaces: N,
    desktop: D,
}

impl ConfigDiscovery {
    /// Discovery against the real OS
    pub fn new(config: Config) -> Self {
        Self::with_backends(config, SystemInterfaces, NativeDesktop)
    }
}

impl Default for ConfigDiscovery {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<N: InterfaceSource, D: Desktop> ConfigDiscovery<N, D> {
    /// Discovery with custom interface and window backends
    pub fn with_backends(config: Config, interfaces: N, desktop: D) -> Self {
        Self { config, interfaces, desktop }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settings-file strategy.
    ///
    /// `Ok(None)` if OBS never wrote its settings file. Fails with
    /// [`crate::Error::NoAddressFound`] when the file exists but the host has
    /// no LAN address to pair it with.
    pub fn from_settings_file(&self) -> Result<Option<ConnectionConfig>> {
        settings::try_read_from_file(&self.config.settings_file, &self.interfaces)
    }

    /// Connect-info dialog strategy.
    ///
    /// `Ok(None)` if the dialog is not open or shows no `obsws://` code.
    /// Fails with [`crate::Error::CaptureFailed`] if the dialog closes
    /// between the scan and the capture; a caller may simply retry.
    pub fn from_connect_info_window(&self) -> Result<Option<ConnectionConfig>> {
        let session = self.desktop.open()?;
        let Some(handle) = window::find_window_by_known_title(&session, self.config.title_capacity)?
        else {
            return Ok(None);
        };
        decode::decode_window(&session, handle)
    }

    /// The address the settings-file strategy would report
    pub fn preferred_address(&self) -> Result<String> {
        network::select_preferred_address(&self.interfaces)
    }

    /// Every eligible local address, best first
    pub fn ranked_addresses(&self) -> Result<Vec<network::NetworkCandidate>> {
        Ok(network::rank_candidates(&self.interfaces.interfaces()?))
    }
}
