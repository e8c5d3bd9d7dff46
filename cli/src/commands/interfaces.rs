//! Interfaces command implementation.

use obslocate_core::ConfigDiscovery;

use super::Outcome;
use crate::ui::print_candidates;

/// List eligible local addresses, best first.
pub fn show_interfaces(options: &super::LocateOptions) -> anyhow::Result<Outcome> {
    let discovery = ConfigDiscovery::new(options.config.clone());
    let candidates = discovery.ranked_addresses()?;

    print_candidates(&candidates, options.json)?;

    Ok(if candidates.is_empty() {
        Outcome::NotFound
    } else {
        Outcome::Found
    })
}
